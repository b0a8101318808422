use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tuvung_types::Query;

/// Chinese/Vietnamese vocabulary lookup
#[derive(Debug, Parser)]
#[command(name = "tuvung", version)]
pub struct Cli {
    /// JSON config file; environment variables still override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up one word and print the result as JSON
    Lookup(LookupArgs),
    /// Ask the tutor; new words are saved to the vocabulary file
    Chat {
        /// Chinese or Vietnamese message
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Print the saved vocabulary
    List,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Chinese text to translate into Vietnamese
    #[arg(
        long,
        short = 'c',
        required_unless_present = "vietnamese",
        conflicts_with = "vietnamese"
    )]
    pub chinese: Option<String>,

    /// Vietnamese text to resolve into Chinese
    #[arg(long, short = 'v')]
    pub vietnamese: Option<String>,

    /// Append the record to the vocabulary file on success
    #[arg(long, short = 's')]
    pub save: bool,
}

impl LookupArgs {
    pub fn query(&self) -> Query {
        Query {
            source_text: self.chinese.clone(),
            target_text: self.vietnamese.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_chinese() {
        let cli = Cli::try_parse_from(["tuvung", "lookup", "--chinese", "你好", "--save"]).unwrap();

        let Command::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        assert!(args.save);
        assert_eq!(args.query(), Query::source("你好"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_lookup_vietnamese_with_config() {
        let cli = Cli::try_parse_from([
            "tuvung",
            "lookup",
            "-v",
            "xin chào",
            "--config",
            "tuvung.json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("tuvung.json")));
        let Command::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        assert!(!args.save);
        assert_eq!(args.query(), Query::target("xin chào"));
    }

    #[test]
    fn test_lookup_needs_exactly_one_side() {
        assert!(Cli::try_parse_from(["tuvung", "lookup"]).is_err());
        assert!(
            Cli::try_parse_from(["tuvung", "lookup", "-c", "你好", "-v", "xin chào"]).is_err()
        );
    }

    #[test]
    fn test_chat_joins_words() {
        let cli = Cli::try_parse_from(["tuvung", "chat", "xin", "chào"]).unwrap();
        let Command::Chat { message } = cli.command else {
            panic!("expected chat");
        };
        assert_eq!(message.join(" "), "xin chào");
    }
}

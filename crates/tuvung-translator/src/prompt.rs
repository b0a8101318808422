use tuvung_types::Direction;
use unicode_normalization::UnicodeNormalization;

pub const LOOKUP_SYSTEM_PROMPT: &str =
    "You are a professional Chinese teacher for Vietnamese speakers. Always answer with JSON in exactly the requested format.";

const RECORD_FORMAT: &str = r#"Return JSON in exactly this format:
{
    "sourceText": "从",
    "phoneticTranscription": "cóng",
    "translatedText": "từ, theo",
    "exampleSentence": "我从学校来。(Wǒ cóng xuéxiào lái.) - Tôi đến từ trường học."
}

Notes:
- sourceText: Chinese characters (keep the given word, or pick the most common one)
- phoneticTranscription: full pinyin with tone marks
- translatedText: short, accurate Vietnamese meaning
- exampleSentence: one Chinese example sentence + pinyin + Vietnamese meaning

Return only the JSON, no other text."#;

/// Normalize user text before it goes into a prompt
pub fn normalize_input(text: &str) -> String {
    let text: String = text.trim().nfkc().collect();
    text.replace(['\n', '\r'], " ").trim().to_string()
}

/// User prompt for a vocabulary lookup
pub fn lookup_prompt(direction: Direction<'_>) -> String {
    match direction {
        Direction::Forward(chinese) => format!(
            "Give the vocabulary information for the Chinese word: \"{}\"\n{RECORD_FORMAT}",
            normalize_input(chinese)
        ),
        Direction::Reverse(vietnamese) => format!(
            "Find the Chinese word matching the Vietnamese meaning: \"{}\"\n{RECORD_FORMAT}",
            normalize_input(vietnamese)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_input() {
        // fullwidth latin folds to ascii under NFKC
        assert_eq!(normalize_input("  ＡＢＣ\n你好 "), "ABC 你好");
    }

    #[test]
    fn test_forward_prompt_embeds_word_and_shape() {
        let prompt = lookup_prompt(Direction::Forward("你好"));
        assert!(prompt.contains("Chinese word: \"你好\""));
        assert!(prompt.contains("\"translatedText\""));
        assert!(prompt.contains("\"phoneticTranscription\""));
    }

    #[test]
    fn test_reverse_prompt_asks_for_chinese() {
        let prompt = lookup_prompt(Direction::Reverse("xin chào"));
        assert!(prompt.contains("Vietnamese meaning: \"xin chào\""));
    }
}

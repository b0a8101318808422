use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tuvung_translator::ResponseShape;
use tuvung_types::{Direction, VocabularyRecord};

/// Characters stripped from both ends of every extracted field
const TRIM_CHARS: &[char] = &[
    '"', '\'', '`', '*', '“', '”', '‘', '’', ',', ';', ':', '，', '；', '：', '、', '「', '」',
    '『', '』',
];

static HAN_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Han}+").unwrap());

static PARENTHESIZED_LATIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(（]\s*([\p{Latin}\d][\p{Latin}\d\s'’-]*)[)）]").unwrap());

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"\n]+)"|“([^”\n]+)”"#).unwrap());

static TRANSLATION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[\s*\-]*(?:nghĩa|tiếng việt|vietnamese|meaning|translation)\s*\**\s*[:：]\s*(.+)$")
        .unwrap()
});

static PINYIN_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[\s*\-]*(?:pinyin|phiên âm)\s*\**\s*[:：]\s*(.+)$").unwrap()
});

static EXAMPLE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[\s*\-]*(?:ví dụ|example)\s*\**\s*[:：]\s*(.+)$").unwrap()
});

/// How a record was recovered from the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Decoded from a JSON object
    Structured,
    /// Assembled from text patterns, lower confidence
    Pattern,
    /// Bare translation from a translation-only provider
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub record: VocabularyRecord,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Record fields as providers spell them; both the camelCase names and the
/// short `chinese`/`pinyin`/`vietnamese` names are accepted.
#[derive(Debug, Default)]
struct RecordFields {
    source_text: Option<String>,
    phonetic_transcription: Option<String>,
    translated_text: Option<String>,
    example_sentence: Option<String>,
}

impl RecordFields {
    /// Read the string-valued fields of a JSON object; other values are ignored
    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            source_text: string_field(object, &["sourceText", "source_text", "chinese"]),
            phonetic_transcription: string_field(
                object,
                &["phoneticTranscription", "phonetic_transcription", "pinyin"],
            ),
            translated_text: string_field(
                object,
                &["translatedText", "translated_text", "vietnamese"],
            ),
            example_sentence: string_field(
                object,
                &["exampleSentence", "example_sentence", "example"],
            ),
        }
    }

    fn is_empty(&self) -> bool {
        self.source_text.is_none()
            && self.phonetic_transcription.is_none()
            && self.translated_text.is_none()
            && self.example_sentence.is_none()
    }
}

/// First of `keys` holding a string
fn string_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Extract a vocabulary record from a raw provider payload.
///
/// Required fields missing from the payload are taken from the query where
/// that is meaningful: the Chinese of a forward query, the Vietnamese of a
/// reverse query. A record with an empty required field is never returned.
pub fn parse(
    raw: &str,
    shape: ResponseShape,
    direction: Direction<'_>,
) -> Result<Parsed, ParseError> {
    match shape {
        ResponseShape::Rich => parse_rich(raw, direction),
        ResponseShape::TranslationOnly => parse_plain(raw, direction),
    }
}

fn parse_rich(raw: &str, direction: Direction<'_>) -> Result<Parsed, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::MalformedResponse("empty response".to_string()));
    }

    if let Some(fields) = decode_structured(raw) {
        let record = assemble(
            clean(fields.source_text.as_deref()),
            clean(fields.phonetic_transcription.as_deref()),
            clean(fields.translated_text.as_deref()),
            clean(fields.example_sentence.as_deref()),
            direction,
        )?;
        return Ok(Parsed {
            record,
            confidence: Confidence::Structured,
        });
    }

    let record = extract_patterns(raw, direction)?;
    tracing::warn!(
        "Structured decoding failed, recovered record from text patterns: {}",
        record
    );
    Ok(Parsed {
        record,
        confidence: Confidence::Pattern,
    })
}

fn parse_plain(raw: &str, direction: Direction<'_>) -> Result<Parsed, ParseError> {
    let translated = clean(Some(raw))
        .ok_or_else(|| ParseError::MalformedResponse("empty translation".to_string()))?;

    let record = match direction {
        Direction::Forward(chinese) => VocabularyRecord::new(chinese, translated),
        Direction::Reverse(vietnamese) => VocabularyRecord::new(translated, vietnamese),
    };

    Ok(Parsed {
        record,
        confidence: Confidence::Plain,
    })
}

/// Try the fenced block, then the whole payload, then the outermost braces.
///
/// Any payload holding a JSON object is answered from that object alone, even
/// when it lacks the record fields.
fn decode_structured(raw: &str) -> Option<RecordFields> {
    let candidates = [fenced_block(raw), Some(raw.trim()), brace_span(raw)];

    let mut decoded = candidates
        .into_iter()
        .flatten()
        .filter_map(|candidate| match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(object)) => Some(RecordFields::from_object(&object)),
            _ => None,
        });

    let first = decoded.next()?;
    if !first.is_empty() {
        return Some(first);
    }
    Some(decoded.find(|fields| !fields.is_empty()).unwrap_or(first))
}

/// Inner content of the first ``` fenced block, without its language tag
pub fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];

    let body = match after.find('\n') {
        Some(newline) if is_language_tag(&after[..newline]) => &after[newline + 1..],
        Some(_) => after,
        None => after
            .strip_prefix("json")
            .or_else(|| after.strip_prefix("JSON"))
            .unwrap_or(after),
    };

    let end = body.find("```").unwrap_or(body.len());
    Some(body[..end].trim())
}

fn is_language_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn extract_patterns(raw: &str, direction: Direction<'_>) -> Result<VocabularyRecord, ParseError> {
    // a forward query already names its Chinese word
    let han = match direction {
        Direction::Forward(_) => None,
        Direction::Reverse(_) => HAN_RUN.find(raw).map(|m| m.as_str()),
    };

    let phonetic =
        first_capture(&PINYIN_LABEL, raw).or_else(|| first_capture(&PARENTHESIZED_LATIN, raw));

    let translated = first_capture(&TRANSLATION_LABEL, raw).or_else(|| {
        QUOTED
            .captures_iter(raw)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str())
            .find(|text| !HAN_RUN.is_match(text))
    });

    let example = first_capture(&EXAMPLE_LABEL, raw);

    assemble(
        clean(han),
        clean(phonetic),
        clean(translated),
        clean(example),
        direction,
    )
}

fn first_capture<'t>(regex: &Regex, text: &'t str) -> Option<&'t str> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn assemble(
    source: Option<String>,
    phonetic: Option<String>,
    translated: Option<String>,
    example: Option<String>,
    direction: Direction<'_>,
) -> Result<VocabularyRecord, ParseError> {
    let (source, translated) = match direction {
        Direction::Forward(chinese) => (source.or_else(|| clean(Some(chinese))), translated),
        Direction::Reverse(vietnamese) => (source, translated.or_else(|| clean(Some(vietnamese)))),
    };

    let source =
        source.ok_or_else(|| ParseError::MalformedResponse("no source text".to_string()))?;
    let translated = translated
        .ok_or_else(|| ParseError::MalformedResponse("no translated text".to_string()))?;

    Ok(VocabularyRecord {
        source_text: source,
        phonetic_transcription: phonetic,
        translated_text: translated,
        example_sentence: example,
    })
}

/// Trim whitespace and separator punctuation; blank becomes `None`
fn clean(field: Option<&str>) -> Option<String> {
    field
        .map(|text| text.trim_matches(|c: char| c.is_whitespace() || TRIM_CHARS.contains(&c)))
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NI_HAO: Direction<'static> = Direction::Forward("你好");

    #[test]
    fn test_fenced_json_with_prose() {
        let raw = "Here is the entry you asked for:\n```json\n{\"translatedText\":\"xin chào\"}\n```\nHope it helps!";

        let parsed = parse(raw, ResponseShape::Rich, NI_HAO).unwrap();

        assert_eq!(parsed.confidence, Confidence::Structured);
        assert_eq!(parsed.record.translated_text, "xin chào");
        assert_eq!(parsed.record.source_text, "你好");
        assert_eq!(parsed.record.phonetic_transcription, None);
    }

    #[test]
    fn test_full_record_any_key_order() {
        let raw = r#"{
            "exampleSentence": "你好，我是老师。",
            "translatedText": " xin chào ",
            "phoneticTranscription": "nǐ hǎo",
            "sourceText": "你好"
        }"#;

        let record = parse(raw, ResponseShape::Rich, NI_HAO).unwrap().record;

        assert_eq!(record.source_text, "你好");
        assert_eq!(record.phonetic_transcription.as_deref(), Some("nǐ hǎo"));
        assert_eq!(record.translated_text, "xin chào");
        assert_eq!(record.example_sentence.as_deref(), Some("你好，我是老师。"));
    }

    #[test]
    fn test_short_field_names() {
        let raw = r#"```
{"chinese": "从", "pinyin": "cóng", "vietnamese": "từ, theo", "example": "我从学校来。"}
```"#;

        let record = parse(raw, ResponseShape::Rich, Direction::Reverse("từ"))
            .unwrap()
            .record;

        assert_eq!(record.source_text, "从");
        assert_eq!(record.phonetic_transcription.as_deref(), Some("cóng"));
        assert_eq!(record.translated_text, "từ, theo");
    }

    #[test]
    fn test_json_embedded_in_prose_without_fence() {
        let raw = r#"Sure! {"sourceText": "谢谢", "translatedText": "cảm ơn"} Anything else?"#;

        let parsed = parse(raw, ResponseShape::Rich, Direction::Reverse("cảm ơn")).unwrap();

        assert_eq!(parsed.confidence, Confidence::Structured);
        assert_eq!(parsed.record.source_text, "谢谢");
    }

    #[test]
    fn test_reverse_query_keeps_query_as_translation() {
        let raw = r#"{"sourceText": "你好", "phoneticTranscription": "nǐ hǎo"}"#;

        let record = parse(raw, ResponseShape::Rich, Direction::Reverse("xin chào"))
            .unwrap()
            .record;

        assert_eq!(record.source_text, "你好");
        assert_eq!(record.translated_text, "xin chào");
    }

    #[test]
    fn test_reverse_query_without_chinese_is_malformed() {
        let raw = r#"{"translatedText": "xin chào"}"#;
        let result = parse(raw, ResponseShape::Rich, Direction::Reverse("xin chào"));
        assert!(matches!(result, Err(ParseError::MalformedResponse(_))));
    }

    #[test]
    fn test_json_without_translation_is_malformed() {
        let raw = r#"{"sourceText": "你好", "translatedText": "  "}"#;
        let result = parse(raw, ResponseShape::Rich, NI_HAO);
        assert!(matches!(result, Err(ParseError::MalformedResponse(_))));
    }

    #[test]
    fn test_non_string_field_is_ignored() {
        let raw = "```json\n{\"sourceText\":\"你好\",\"phoneticTranscription\":\"nǐ hǎo\",\"translatedText\":\"xin chào\",\"exampleSentence\":{\"zh\":\"你好！\",\"vi\":\"Xin chào!\"}}\n```";

        let parsed = parse(raw, ResponseShape::Rich, NI_HAO).unwrap();

        assert_eq!(parsed.confidence, Confidence::Structured);
        assert_eq!(parsed.record.source_text, "你好");
        assert_eq!(parsed.record.phonetic_transcription.as_deref(), Some("nǐ hǎo"));
        assert_eq!(parsed.record.translated_text, "xin chào");
        assert_eq!(parsed.record.example_sentence, None);
    }

    #[test]
    fn test_json_object_never_falls_back_to_patterns() {
        let raw = r#"{"answer": {"vi": "xin chào"}, "note": "see above"}"#;
        let result = parse(raw, ResponseShape::Rich, NI_HAO);
        assert!(matches!(result, Err(ParseError::MalformedResponse(_))));

        let raw = r#"{"translatedText": 42, "sourceText": "你好"}"#;
        let result = parse(raw, ResponseShape::Rich, NI_HAO);
        assert!(matches!(result, Err(ParseError::MalformedResponse(_))));
    }

    #[test]
    fn test_markdown_bold_labels() {
        let raw = "你好\n**Pinyin:** nǐ hǎo\n**Nghĩa:** xin chào";
        let parsed = parse(raw, ResponseShape::Rich, NI_HAO).unwrap();
        assert_eq!(parsed.confidence, Confidence::Pattern);
        assert_eq!(parsed.record.phonetic_transcription.as_deref(), Some("nǐ hǎo"));
        assert_eq!(parsed.record.translated_text, "xin chào");

        let raw = "- **Phiên âm**: xièxie\n- **Nghĩa**: cảm ơn\n- **Ví dụ**: 谢谢你！";
        let record = parse(raw, ResponseShape::Rich, Direction::Forward("谢谢"))
            .unwrap()
            .record;
        assert_eq!(record.phonetic_transcription.as_deref(), Some("xièxie"));
        assert_eq!(record.translated_text, "cảm ơn");
        assert_eq!(record.example_sentence.as_deref(), Some("谢谢你！"));
    }

    #[test]
    fn test_pattern_fallback() {
        let raw = "你好 (nǐ hǎo) means \"xin chào\" in Vietnamese.";

        let parsed = parse(raw, ResponseShape::Rich, NI_HAO).unwrap();

        assert_eq!(parsed.confidence, Confidence::Pattern);
        assert_eq!(parsed.record.source_text, "你好");
        assert_eq!(parsed.record.phonetic_transcription.as_deref(), Some("nǐ hǎo"));
        assert_eq!(parsed.record.translated_text, "xin chào");
    }

    #[test]
    fn test_pattern_labels_win_over_quotes() {
        let raw = "Từ \"谢谢\"\nPinyin: xièxie\nNghĩa: cảm ơn\nVí dụ: 谢谢你！";

        let parsed = parse(raw, ResponseShape::Rich, Direction::Forward("谢谢")).unwrap();

        assert_eq!(parsed.confidence, Confidence::Pattern);
        assert_eq!(parsed.record.phonetic_transcription.as_deref(), Some("xièxie"));
        assert_eq!(parsed.record.translated_text, "cảm ơn");
        assert_eq!(parsed.record.example_sentence.as_deref(), Some("谢谢你！"));
    }

    #[test]
    fn test_pattern_reverse_finds_chinese() {
        let raw = "\"xin chào\" is 你好 (nǐ hǎo) in Chinese.";

        let record = parse(raw, ResponseShape::Rich, Direction::Reverse("xin chào"))
            .unwrap()
            .record;

        assert_eq!(record.source_text, "你好");
        assert_eq!(record.translated_text, "xin chào");
    }

    #[test]
    fn test_empty_and_unrelated_text_are_malformed() {
        for raw in ["", "   \n", "I'm sorry, I can't help with that."] {
            let result = parse(raw, ResponseShape::Rich, NI_HAO);
            assert!(
                matches!(result, Err(ParseError::MalformedResponse(_))),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_plain_forward_and_reverse() {
        let forward = parse(" Xin chào ", ResponseShape::TranslationOnly, NI_HAO).unwrap();
        assert_eq!(forward.confidence, Confidence::Plain);
        assert_eq!(forward.record, VocabularyRecord::new("你好", "Xin chào"));

        let reverse = parse(
            "你好",
            ResponseShape::TranslationOnly,
            Direction::Reverse("xin chào"),
        )
        .unwrap();
        assert_eq!(reverse.record, VocabularyRecord::new("你好", "xin chào"));
        assert!(reverse.record.phonetic_transcription.is_none());
        assert!(reverse.record.example_sentence.is_none());
    }

    #[test]
    fn test_plain_empty_is_malformed() {
        let result = parse("  ", ResponseShape::TranslationOnly, NI_HAO);
        assert!(matches!(result, Err(ParseError::MalformedResponse(_))));
    }

    #[test]
    fn test_fenced_block_variants() {
        assert_eq!(fenced_block("```json\n{\"a\":1}\n```"), Some("{\"a\":1}"));
        assert_eq!(fenced_block("text ```{\"a\":1}``` text"), Some("{\"a\":1}"));
        assert_eq!(fenced_block("```json{\"a\":1}```"), Some("{\"a\":1}"));
        assert_eq!(fenced_block("```\n{\"a\":1}"), Some("{\"a\":1}"));
        assert_eq!(fenced_block("no fences here"), None);
    }
}

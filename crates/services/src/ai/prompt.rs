use serde::Deserialize;
use spelling_core::model::{Difficulty, Grade, Word};

use crate::error::GenerationError;

pub const SYSTEM_PROMPT: &str =
    "You are an educational expert specializing in grade-appropriate spelling words for children.";

/// User prompt asking for `count` words at `grade`, focused on `description`.
#[must_use]
pub fn word_list_prompt(grade: Grade, count: usize, description: &str) -> String {
    format!(
        "Generate {count} age-appropriate spelling words for grade {grade} students.\n\
         Focus on {description}.\n\
         For each word, provide:\n\
         1. The word itself\n\
         2. A brief, kid-friendly definition\n\
         3. A simple example sentence\n\
         4. Difficulty level (easy/medium/hard)\n\n\
         Return the response as a JSON array of objects with properties: \
         word, definition, sentence, difficulty, grade.\n\
         Response must be just JSON with no additional text.\n\
         Ensure all words are appropriate for children in grade {grade}."
    )
}

#[derive(Debug, Deserialize)]
struct GeneratedWord {
    word: String,
    #[serde(default)]
    definition: String,
    #[serde(default)]
    sentence: String,
    #[serde(default)]
    difficulty: Option<String>,
}

/// Parse the model's text reply into words attributed to `grade`.
///
/// The JSON array may be wrapped in prose or a code fence, and the prose may
/// itself contain brackets: each `[` is tried in turn and the first non-empty
/// array of word objects wins. Entries with a blank word are dropped and
/// unknown difficulties fall back to medium.
///
/// # Errors
///
/// Returns `GenerationError::Parse` if no JSON array can be decoded.
pub fn parse_word_list(text: &str, grade: Grade) -> Result<Vec<Word>, GenerationError> {
    let mut last_error = None;
    let mut raw = None;
    for (start, _) in text.match_indices('[') {
        let mut stream =
            serde_json::Deserializer::from_str(&text[start..]).into_iter::<Vec<GeneratedWord>>();
        match stream.next() {
            Some(Ok(entries)) => {
                let found = !entries.is_empty();
                raw = Some(entries);
                if found {
                    break;
                }
            }
            Some(Err(err)) => last_error = Some(err),
            None => {}
        }
    }

    let raw = raw.ok_or_else(|| match last_error {
        Some(err) => GenerationError::Parse(err.to_string()),
        None => GenerationError::Parse("no JSON array in response".into()),
    })?;

    Ok(raw
        .into_iter()
        .filter(|entry| !entry.word.trim().is_empty())
        .map(|entry| {
            Word::new(
                entry.word.trim(),
                entry.definition.trim(),
                entry.sentence.trim(),
                parse_difficulty(entry.difficulty.as_deref()),
                grade,
            )
        })
        .collect())
}

fn parse_difficulty(raw: Option<&str>) -> Difficulty {
    match raw.map(|d| d.trim().to_ascii_lowercase()).as_deref() {
        Some("easy") => Difficulty::Easy,
        Some("hard") => Difficulty::Hard,
        _ => Difficulty::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade(value: u8) -> Grade {
        Grade::new(value).unwrap()
    }

    #[test]
    fn prompt_mentions_count_grade_and_focus() {
        let g = grade(3);
        let prompt = word_list_prompt(g, g.min_word_count(), g.description());
        assert!(prompt.contains("Generate 15 age-appropriate spelling words for grade 3"));
        assert!(prompt.contains("compound words, and basic prefixes"));
    }

    #[test]
    fn parses_fenced_reply_and_forces_grade() {
        let reply = "Here you go:\n```json\n[\
            {\"word\":\" Apple \",\"definition\":\"a fruit\",\"sentence\":\"I ate an apple.\",\"difficulty\":\"Easy\",\"grade\":4},\
            {\"word\":\"\",\"definition\":\"blank\"},\
            {\"word\":\"bridge\",\"difficulty\":\"tricky\"}\
        ]\n```";
        let words = parse_word_list(reply, grade(2)).unwrap();

        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word(), "Apple");
        assert_eq!(words[0].difficulty(), Difficulty::Easy);
        assert_eq!(words[0].grade(), grade(2));
        assert_eq!(words[1].difficulty(), Difficulty::Medium);
        assert_eq!(words[1].definition(), "");
    }

    #[test]
    fn rejects_reply_without_array() {
        let err = parse_word_list("Sorry, I can't help.", grade(1)).unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));

        let err = parse_word_list("[{\"word\": 3}]", grade(1)).unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[test]
    fn skips_bracketed_prose_around_the_array() {
        let before = "Here are [2] words:\n[{\"word\":\"cat\",\"difficulty\":\"easy\"},{\"word\":\"dog\"}]";
        let words = parse_word_list(before, grade(1)).unwrap();
        let spelled: Vec<&str> = words.iter().map(Word::word).collect();
        assert_eq!(spelled, vec!["cat", "dog"]);

        let after = "[{\"word\":\"cat\"}]\nNote: see [guide].";
        let words = parse_word_list(after, grade(2)).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].grade(), grade(2));

        let empty_first = "Skip [] this one. [{\"word\":\"sun\"}]";
        assert_eq!(parse_word_list(empty_first, grade(1)).unwrap().len(), 1);
    }
}

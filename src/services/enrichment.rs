use std::future::Future;

use tracing::debug;

use crate::models::ProcessedRecord;
use crate::processor::{Enricher, EnrichmentError};
use crate::services::llm_client::{ChatMessage, LlmClient, LlmError};

const SYSTEM_PROMPT: &str = "You are a bilingual English/Arabic linguistic analysis tool. \
You always answer with a single JSON object and nothing else.";

/// Enrichment service backed by the chat-completions API.
///
/// Asks the model for a full bilingual breakdown of one word and parses
/// the JSON object out of the reply.
#[derive(Clone)]
pub struct DictionaryEnricher {
    llm: LlmClient,
}

impl DictionaryEnricher {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    pub fn from_env() -> Self {
        Self::new(LlmClient::from_env())
    }

    pub fn is_available(&self) -> bool {
        self.llm.is_available()
    }
}

impl Enricher for DictionaryEnricher {
    fn enrich(
        &self,
        word: &str,
    ) -> impl Future<Output = Result<ProcessedRecord, EnrichmentError>> + Send {
        let messages = [
            ChatMessage {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: build_prompt(word),
            },
        ];

        async move {
            let response = self.llm.chat(&messages).await.map_err(map_llm_error)?;
            let content = response
                .first_content()
                .ok_or_else(|| EnrichmentError::MalformedResponse("empty reply".to_string()))?;

            let json_str = extract_json_from_response(content);
            let record: ProcessedRecord = serde_json::from_str(&json_str).map_err(|e| {
                EnrichmentError::MalformedResponse(format!("{} - response: {}", e, json_str))
            })?;

            debug!(word = %record.word, "dictionary entry generated");
            Ok(record)
        }
    }
}

fn build_prompt(word: &str) -> String {
    format!(
        r#"Provide a comprehensive bilingual breakdown of the query "{word}".

First determine whether the query is English or Arabic.
- If English: "word" is the query (correctly capitalized) and "arabicMeaning" is its most accurate Arabic translation.
- If Arabic: "word" is the most common direct English translation and "arabicMeaning" is the original Arabic query.
Then analyze the English word.

Return a JSON object with this exact structure:
{{
  "word": "...",
  "arabicMeaning": "...",
  "definition": "a clear, concise English definition",
  "partOfSpeech": "Noun|Verb|Adjective|...",
  "derivatives": [{{"word": "...", "partOfSpeech": "...", "meaning": "Arabic meaning"}}],
  "conjugation": [{{"tense": "Infinitive|Past Tense|Past Participle", "form": "...", "meaning": "Arabic meaning"}}],
  "synonyms": [{{"word": "...", "meaning": "Arabic meaning"}}],
  "antonyms": [{{"word": "...", "meaning": "Arabic meaning"}}]
}}

Rules:
- "partOfSpeech" must be the primary grammatical category, be very accurate
- "conjugation" is only populated for verbs, otherwise an empty array
- "synonyms" and "antonyms" should each list 2-3 common entries when they exist
- every derivative, conjugation, synonym and antonym MUST carry its Arabic meaning in "meaning"
- return ONLY the JSON, no explanation"#
    )
}

fn extract_json_from_response(response: &str) -> String {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            return trimmed[start..=end].to_string();
        }
    }

    if let Some(start) = trimmed.find("```json") {
        let after_marker = &trimmed[start + 7..];
        if let Some(end) = after_marker.find("```") {
            return after_marker[..end].trim().to_string();
        }
    }

    trimmed.to_string()
}

fn map_llm_error(err: LlmError) -> EnrichmentError {
    match err {
        LlmError::NotConfigured(_) => EnrichmentError::NotConfigured,
        LlmError::Json(e) => EnrichmentError::MalformedResponse(e.to_string()),
        LlmError::EmptyChoices => {
            EnrichmentError::MalformedResponse("empty reply".to_string())
        }
        other => EnrichmentError::Request(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_fenced_reply() {
        let response = r#"Here is the entry:
```json
{"word": "book", "arabicMeaning": "كتاب", "definition": "d", "partOfSpeech": "Noun"}
```"#;
        let json = extract_json_from_response(response);
        assert!(json.starts_with('{'));
        assert!(json.contains("arabicMeaning"));
    }

    #[test]
    fn test_extract_raw_json() {
        let response = r#"{"word": "book"}"#;
        assert_eq!(extract_json_from_response(response), response);
    }

    #[test]
    fn test_extracted_entry_parses() {
        let reply = r#"{"word": "Book", "arabicMeaning": "كتاب", "definition": "A written work.", "partOfSpeech": "Noun", "synonyms": [{"word": "volume", "meaning": "مجلد"}]}"#;
        let record: ProcessedRecord =
            serde_json::from_str(&extract_json_from_response(reply)).unwrap();
        assert_eq!(record.word, "Book");
        assert_eq!(record.synonyms.len(), 1);
        assert!(record.antonyms.is_empty());
    }

    #[test]
    fn test_prompt_mentions_the_query() {
        let prompt = build_prompt("resilient");
        assert!(prompt.contains("\"resilient\""));
        assert!(prompt.contains("arabicMeaning"));
    }
}

use serde::{Deserialize, Serialize};

/// Full dictionary entry produced by the enrichment call for one word.
///
/// Mirrors the JSON the model is asked to return; list fields are
/// optional in the reply and default to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedRecord {
    pub word: String,
    pub arabic_meaning: String,
    pub definition: String,
    pub part_of_speech: String,
    #[serde(default)]
    pub derivatives: Vec<Derivative>,
    #[serde(default)]
    pub conjugation: Vec<Conjugation>,
    #[serde(default)]
    pub synonyms: Vec<RelatedWord>,
    #[serde(default)]
    pub antonyms: Vec<RelatedWord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Derivative {
    pub word: String,
    pub part_of_speech: String,
    pub meaning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conjugation {
    pub tense: String,
    pub form: String,
    pub meaning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedWord {
    pub word: String,
    pub meaning: String,
}

use serde::{Deserialize, Serialize};

/// Output of the `collect` stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataOutput {
    pub fetched_at: String,
    pub total_items: usize,
    pub items: Vec<MetadataItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
    pub source: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<String>,
}

/// One curated item handed to the `extract` stage.
///
/// Usually written by an external reviewer, so every field is optional on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectedNews {
    pub title: String,
    pub source: String,
    pub link: String,
    pub pub_date: String,
    pub summary: String,
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Output of the `extract` stage and input of `send`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalOutput {
    pub generated_at: String,
    pub total_articles: usize,
    pub articles_extracted: usize,
    pub articles: Vec<FinalNews>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalNews {
    pub title: String,
    pub source: String,
    pub link: String,
    pub pub_date: String,
    pub summary: String,
    pub category: String,
    /// Extracted text, or the failure reason when `article_extracted` is false.
    pub full_article: String,
    pub article_extracted: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub article_truncated: bool,
}

//! Request and response shapes of the HTTP API, shared by the service and the client.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A news item as produced by the model.
///
/// Every field is a plain string and defaults to empty, so articles echoed
/// back by the client deserialize even when the model left fields out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub published_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

impl Article {
    /// Normalize one element of the model's news array.
    ///
    /// Returns `None` when the element is not a JSON object. Missing fields
    /// become empty strings, non-string scalars keep their JSON text, unknown
    /// keys are dropped.
    pub fn from_model_value(value: &Value) -> Option<Article> {
        let obj = value.as_object()?;
        let field = |key: &str| match obj.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        Some(Article {
            title: field("title"),
            description: field("description"),
            source: field("source"),
            published_at: field("published_at"),
            url: field("url"),
        })
    }
}

/// Explicit `null` deserializes like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_platform() -> String {
    "twitter".to_string()
}

fn default_tone() -> String {
    "informative".to_string()
}

fn default_theme() -> String {
    "daily roundup".to_string()
}

fn default_true() -> bool {
    true
}

/// Body of `POST /create_social_content`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialContentRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub article: Article,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_true")]
    pub include_hashtags: bool,
    #[serde(default = "default_true")]
    pub include_link: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_angle: Option<String>,
}

impl SocialContentRequest {
    pub fn new(article: Article, platform: impl Into<String>, tone: impl Into<String>) -> Self {
        Self {
            article,
            platform: platform.into(),
            tone: tone.into(),
            include_hashtags: true,
            include_link: true,
            custom_angle: None,
        }
    }
}

/// Body of `POST /create_content_series`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSeriesRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub articles: Vec<Article>,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tone")]
    pub tone: String,
}

/// Body of `POST /analyze_news`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub articles: Vec<Article>,
}

/// Parameters of `GET /generate_news`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub category: String,
    pub country: String,
    pub limit: usize,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            category: "general".to_string(),
            country: "us".to_string(),
            limit: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsResponse {
    pub success: bool,
    pub articles: Vec<Article>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialContentResponse {
    pub success: bool,
    pub content: String,
    pub platform: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSeriesResponse {
    pub success: bool,
    pub series: String,
    pub platform: String,
    pub theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis: String,
}

/// Uniform failure body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// Offending model output, only for malformed news responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

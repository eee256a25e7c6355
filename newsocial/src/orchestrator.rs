use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::llm::{LlmProvider, LlmRequest, ModelProfile, ModelProfiles};
use crate::models::{
    AnalysisResponse, AnalyzeRequest, Article, ContentSeriesRequest, ContentSeriesResponse,
    NewsQuery, NewsResponse, SocialContentRequest, SocialContentResponse,
};
use crate::prompts::{self, PromptPair};

/// Builds prompts for each operation, calls the model once and shapes the result.
///
/// Holds no per-request state: the provider is created once at startup and
/// shared by every request handler. `None` means no API key was configured.
#[derive(Clone)]
pub struct Orchestrator {
    provider: Option<Arc<dyn LlmProvider>>,
    profiles: ModelProfiles,
}

impl Orchestrator {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, profiles: ModelProfiles) -> Self {
        Self { provider, profiles }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn profiles(&self) -> &ModelProfiles {
        &self.profiles
    }

    pub async fn generate_news(&self, query: &NewsQuery) -> Result<NewsResponse, ApiError> {
        self.generate_news_on(query, Utc::now().date_naive()).await
    }

    /// News generation against an explicit "today"
    pub async fn generate_news_on(
        &self,
        query: &NewsQuery,
        today: NaiveDate,
    ) -> Result<NewsResponse, ApiError> {
        if query.limit == 0 {
            return Err(ApiError::InvalidParameter {
                name: "limit",
                reason: "must be a positive integer".to_string(),
            });
        }
        let provider = self.provider()?;

        info!(
            category = %query.category,
            country = %query.country,
            limit = query.limit,
            "generating news"
        );

        let prompts = prompts::news_prompts(query, today);
        let raw = call_model(provider, prompts, &self.profiles.news).await?;
        let articles = parse_articles(&raw, query.limit)?;

        let count = articles.len();
        info!(count, "news generated");
        Ok(NewsResponse {
            success: true,
            articles,
            count,
        })
    }

    pub async fn create_social_content(
        &self,
        request: &SocialContentRequest,
    ) -> Result<SocialContentResponse, ApiError> {
        let provider = self.provider()?;

        info!(
            platform = %request.platform,
            tone = %request.tone,
            include_hashtags = request.include_hashtags,
            include_link = request.include_link,
            "creating social content"
        );

        let prompts = prompts::social_prompts(request);
        let content = call_model(provider, prompts, &self.profiles.social).await?;

        Ok(SocialContentResponse {
            success: true,
            content,
            platform: request.platform.clone(),
        })
    }

    pub async fn create_content_series(
        &self,
        request: &ContentSeriesRequest,
    ) -> Result<ContentSeriesResponse, ApiError> {
        if request.articles.len() < prompts::SERIES_MIN_ARTICLES {
            warn!(articles = request.articles.len(), "series requested with too few articles");
            return Err(ApiError::InsufficientInput {
                required: prompts::SERIES_MIN_ARTICLES,
            });
        }
        let provider = self.provider()?;

        info!(
            platform = %request.platform,
            theme = %request.theme,
            articles = request.articles.len().min(prompts::SERIES_MAX_ARTICLES),
            "creating content series"
        );

        let prompts = prompts::series_prompts(
            &request.articles,
            &request.platform,
            &request.theme,
            &request.tone,
        );
        let series = call_model(provider, prompts, &self.profiles.series).await?;

        Ok(ContentSeriesResponse {
            success: true,
            series,
            platform: request.platform.clone(),
            theme: request.theme.clone(),
        })
    }

    pub async fn analyze_news(&self, request: &AnalyzeRequest) -> Result<AnalysisResponse, ApiError> {
        let provider = self.provider()?;

        info!(
            articles = request.articles.len().min(prompts::ANALYSIS_MAX_ARTICLES),
            "analyzing news"
        );

        let prompts = prompts::analysis_prompts(&request.articles);
        let analysis = call_model(provider, prompts, &self.profiles.analysis).await?;

        Ok(AnalysisResponse {
            success: true,
            analysis,
        })
    }

    fn provider(&self) -> Result<&dyn LlmProvider, ApiError> {
        self.provider.as_deref().ok_or(ApiError::MissingCredential)
    }
}

/// One model call; the returned text is trimmed
async fn call_model(
    provider: &dyn LlmProvider,
    prompts: PromptPair,
    profile: &ModelProfile,
) -> Result<String, ApiError> {
    let request = LlmRequest::new(prompts.system, prompts.user).with_profile(profile);

    let response = provider.generate(request).await.map_err(|e| {
        warn!(model = %profile.model, error = %format!("{:#}", e), "model call failed");
        ApiError::from(e)
    })?;

    debug!(
        model = %response.model,
        prompt_tokens = response.usage.prompt_tokens,
        completion_tokens = response.usage.completion_tokens,
        "model call completed"
    );

    let content = response.content.trim();
    if content.is_empty() {
        warn!(model = %response.model, "model returned empty content");
        return Err(ApiError::UpstreamCallFailure(
            "model returned empty content".to_string(),
        ));
    }
    Ok(content.to_string())
}

/// Parse the model's news output and keep the first `limit` items.
///
/// Anything other than a JSON array is rejected with the raw text attached,
/// as is a kept item that is not an object. Items past `limit` are ignored.
pub fn parse_articles(raw: &str, limit: usize) -> Result<Vec<Article>, ApiError> {
    let malformed = |reason: String| {
        warn!(%reason, raw, "malformed news output from model");
        ApiError::ModelOutputMalformed {
            reason,
            raw: raw.to_string(),
        }
    };

    let value: Value = serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;

    let mut items = match value {
        Value::Array(items) => items,
        _ => return Err(malformed("Expected list of articles".to_string())),
    };

    if items.len() != limit {
        debug!(requested = limit, produced = items.len(), "model returned a different number of articles");
    }
    items.truncate(limit);

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Article::from_model_value(item)
                .ok_or_else(|| malformed(format!("article {} is not an object", i)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_of_articles() {
        let raw = r#"[{"title":"A","description":"d1"},{"title":"B","url":"https://b.example"}]"#;
        let articles = parse_articles(raw, 5).expect("valid array");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "A");
        assert_eq!(articles[1].url, "https://b.example");
        assert_eq!(articles[1].description, "");
    }

    #[test]
    fn rejects_object_with_raw_text() {
        let raw = r#"{"articles": []}"#;
        match parse_articles(raw, 5) {
            Err(ApiError::ModelOutputMalformed { raw: got, .. }) => assert_eq!(got, raw),
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_markdown_wrapped_json() {
        let raw = "```json\n[]\n```";
        assert!(matches!(
            parse_articles(raw, 5),
            Err(ApiError::ModelOutputMalformed { .. })
        ));
    }

    #[test]
    fn rejects_array_of_strings() {
        assert!(matches!(
            parse_articles(r#"["headline one"]"#, 5),
            Err(ApiError::ModelOutputMalformed { .. })
        ));
    }

    #[test]
    fn items_past_limit_are_not_inspected() {
        let raw = r#"[{"title":"A"},{"title":"B"},"extra trailing string"]"#;
        let articles = parse_articles(raw, 2).expect("first two are objects");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[1].title, "B");

        assert!(matches!(
            parse_articles(raw, 3),
            Err(ApiError::ModelOutputMalformed { .. })
        ));
    }

    #[test]
    fn empty_array_is_accepted() {
        assert!(parse_articles("[]", 5).expect("empty").is_empty());
    }
}

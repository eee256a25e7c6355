use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use super::{ApiClient, ClientError, ClientResult};
use crate::models::{AnalyzeRequest, Article, ContentSeriesRequest, NewsQuery, SocialContentRequest};

/// Articles requested per fetch
pub const FETCH_LIMIT: usize = 5;
/// Articles sent to the series endpoint
pub const SERIES_ARTICLES: usize = 3;
pub const SERIES_THEME: &str = "Daily Update";

/// User-selected generation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub category: String,
    pub country: String,
    pub platform: String,
    pub tone: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            category: "general".to_string(),
            country: "us".to_string(),
            platform: "twitter".to_string(),
            tone: "informative".to_string(),
        }
    }
}

/// State of one interactive session: the last fetched list and the selected article.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    pub settings: SessionSettings,
    last_fetched: Vec<Article>,
    selected: Option<Article>,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            settings,
            last_fetched: Vec::new(),
            selected: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn articles(&self) -> &[Article] {
        &self.last_fetched
    }

    pub fn selected(&self) -> Option<&Article> {
        self.selected.as_ref()
    }

    /// Replace the fetched list; the previous selection no longer applies.
    pub fn replace_articles(&mut self, articles: Vec<Article>) {
        self.last_fetched = articles;
        self.selected = None;
    }

    /// Select an article by its zero-based position in the fetched list.
    pub fn select(&mut self, index: usize) -> ClientResult<&Article> {
        let article = self.last_fetched.get(index).cloned().ok_or_else(|| {
            ClientError::Precondition(format!(
                "No article #{} (fetched {})",
                index + 1,
                self.last_fetched.len()
            ))
        })?;
        Ok(self.selected.insert(article))
    }

    pub fn news_query(&self) -> NewsQuery {
        NewsQuery {
            category: self.settings.category.clone(),
            country: self.settings.country.clone(),
            limit: FETCH_LIMIT,
        }
    }

    pub fn social_request(&self) -> ClientResult<SocialContentRequest> {
        let article = self.selected.clone().ok_or_else(|| {
            ClientError::Precondition("Select an article first".to_string())
        })?;
        Ok(SocialContentRequest::new(
            article,
            self.settings.platform.clone(),
            self.settings.tone.clone(),
        ))
    }

    pub fn series_request(&self) -> ClientResult<ContentSeriesRequest> {
        if self.last_fetched.len() < 2 {
            return Err(ClientError::Precondition(
                "Fetch at least 2 articles to build a series".to_string(),
            ));
        }
        Ok(ContentSeriesRequest {
            articles: self.last_fetched.iter().take(SERIES_ARTICLES).cloned().collect(),
            platform: self.settings.platform.clone(),
            theme: SERIES_THEME.to_string(),
            tone: self.settings.tone.clone(),
        })
    }

    pub fn analyze_request(&self) -> ClientResult<AnalyzeRequest> {
        if self.last_fetched.is_empty() {
            return Err(ClientError::Precondition(
                "Fetch articles first to run analytics".to_string(),
            ));
        }
        Ok(AnalyzeRequest {
            articles: self.last_fetched.clone(),
        })
    }

    /// Fetch fresh articles; on failure the previous list is kept.
    pub async fn fetch_news(&mut self, client: &ApiClient) -> ClientResult<usize> {
        let response = client.generate_news(&self.news_query()).await?;
        info!(session = %self.id, count = response.count, "articles fetched");
        self.replace_articles(response.articles);
        Ok(self.last_fetched.len())
    }

    pub async fn generate_post(&self, client: &ApiClient) -> ClientResult<String> {
        let request = self.social_request()?;
        Ok(client.create_social_content(&request).await?.content)
    }

    pub async fn generate_series(&self, client: &ApiClient) -> ClientResult<String> {
        let request = self.series_request()?;
        Ok(client.create_content_series(&request).await?.series)
    }

    pub async fn analyze(&self, client: &ApiClient) -> ClientResult<String> {
        let request = self.analyze_request()?;
        Ok(client.analyze_news(&request).await?.analysis)
    }
}

/// Sessions keyed by id. Each session is locked on its own, so one session's
/// in-flight request never blocks another.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, settings: SessionSettings) -> (Uuid, Arc<Mutex<Session>>) {
        let session = Session::new(settings);
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id, handle.clone());
        (id, handle)
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .cloned()
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

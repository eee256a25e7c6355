#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use newsocial::llm::{LlmProvider, LlmRequest, LlmResponse, ModelProfiles, UsageMetadata};
use newsocial::orchestrator::Orchestrator;
use newsocial::server::{build_rocket, AppState};
use rocket::local::asynchronous::Client;

/// In-process provider that replays canned replies and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedProvider {
    pub fn replying(reply: &str) -> Arc<Self> {
        let provider = Self::default();
        provider.push_reply(reply);
        Arc::new(provider)
    }

    pub fn failing(message: &str) -> Arc<Self> {
        let provider = Self::default();
        provider
            .replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        Arc::new(provider)
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies.lock().unwrap().push_back(Ok(reply.to_string()));
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()));

        match reply {
            Ok(content) => Ok(LlmResponse {
                content,
                usage: UsageMetadata::default(),
                model: "scripted".to_string(),
            }),
            Err(message) => Err(anyhow::anyhow!(message)),
        }
    }
}

pub fn orchestrator_with(provider: Option<Arc<ScriptedProvider>>) -> Orchestrator {
    let provider = provider.map(|p| p as Arc<dyn LlmProvider>);
    Orchestrator::new(provider, ModelProfiles::default())
}

/// Rocket test client wired to the given provider (or none, as without an API key).
pub async fn test_client(provider: Option<Arc<ScriptedProvider>>) -> Client {
    let figment = rocket::Config::figment().merge(("log_level", "off"));
    let rocket = build_rocket(AppState::new(orchestrator_with(provider)), figment);
    Client::tracked(rocket).await.expect("valid rocket instance")
}

pub fn news_json(count: usize) -> String {
    let items: Vec<serde_json::Value> = (1..=count)
        .map(|i| {
            serde_json::json!({
                "title": format!("Headline {}", i),
                "description": format!("Story {}", i),
                "source": "Wire",
                "published_at": "2026-10-15",
                "url": format!("https://news.example/{}", i)
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}

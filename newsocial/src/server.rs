use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::http::{Header, Status};
use rocket::request::Request;
use rocket::response::Response;
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, options, post, routes, Build, Rocket, State};
use serde::Serialize;

use common::Config;

use crate::error::ApiError;
use crate::llm::{remote::RemoteLlmProvider, LlmProvider, ModelProfiles};
use crate::models::{
    AnalysisResponse, AnalyzeRequest, ContentSeriesRequest, ContentSeriesResponse, ErrorResponse,
    HealthResponse, NewsQuery, NewsResponse, SocialContentRequest, SocialContentResponse,
};
use crate::orchestrator::Orchestrator;
use crate::prompts;

/// Application state stored inside Rocket managed state.
#[derive(Clone)]
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            started_at: Utc::now(),
            orchestrator,
        }
    }
}

/// Response structure for `/api/v1/status`.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    uptime_seconds: i64,
    llm_configured: bool,
    platforms: Vec<&'static str>,
}

#[get("/health")]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "News social API running".to_string(),
    })
}

/// Status endpoint returning uptime and whether a model key is configured.
#[get("/api/v1/status")]
async fn status(state: &State<AppState>) -> Json<StatusResponse> {
    let uptime = (Utc::now() - state.started_at).num_seconds();

    Json(StatusResponse {
        status: "ok",
        uptime_seconds: uptime,
        llm_configured: state.orchestrator.is_configured(),
        platforms: prompts::platform_names(),
    })
}

/// `limit` is parsed by hand so a bad value gets the uniform error body
/// instead of Rocket's forward-to-404.
#[get("/generate_news?<category>&<country>&<limit>")]
async fn generate_news(
    state: &State<AppState>,
    category: Option<String>,
    country: Option<String>,
    limit: Option<String>,
) -> Result<Json<NewsResponse>, ApiError> {
    let defaults = NewsQuery::default();
    let limit = match limit.as_deref().map(str::trim) {
        None | Some("") => defaults.limit,
        Some(raw) => raw.parse::<usize>().map_err(|_| ApiError::InvalidParameter {
            name: "limit",
            reason: format!("'{}' is not a positive integer", raw),
        })?,
    };

    let query = NewsQuery {
        category: category.unwrap_or(defaults.category),
        country: country.unwrap_or(defaults.country),
        limit,
    };

    state.orchestrator.generate_news(&query).await.map(Json)
}

#[post("/create_social_content", data = "<body>")]
async fn create_social_content(
    state: &State<AppState>,
    body: Json<SocialContentRequest>,
) -> Result<Json<SocialContentResponse>, ApiError> {
    state
        .orchestrator
        .create_social_content(&body)
        .await
        .map(Json)
}

#[post("/create_content_series", data = "<body>")]
async fn create_content_series(
    state: &State<AppState>,
    body: Json<ContentSeriesRequest>,
) -> Result<Json<ContentSeriesResponse>, ApiError> {
    state
        .orchestrator
        .create_content_series(&body)
        .await
        .map(Json)
}

#[post("/analyze_news", data = "<body>")]
async fn analyze_news(
    state: &State<AppState>,
    body: Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    state.orchestrator.analyze_news(&body).await.map(Json)
}

/// CORS preflight for any path; headers are added by the `Cors` fairing.
#[options("/<_..>")]
fn preflight() -> Status {
    Status::NoContent
}

// ============================================================================
// Catchers: keep the `{success:false, error}` shape for Rocket-level failures
// ============================================================================

fn catcher_body(status: Status, error: String) -> Json<ErrorResponse> {
    tracing::debug!(code = status.code, %error, "request rejected by catcher");
    Json(ErrorResponse {
        success: false,
        error,
        raw: None,
    })
}

#[catch(400)]
fn bad_request(_req: &Request) -> Json<ErrorResponse> {
    catcher_body(Status::BadRequest, "Malformed request body".to_string())
}

#[catch(404)]
fn not_found(req: &Request) -> Json<ErrorResponse> {
    catcher_body(Status::NotFound, format!("No route for {} {}", req.method(), req.uri()))
}

#[catch(422)]
fn unprocessable(_req: &Request) -> Json<ErrorResponse> {
    catcher_body(
        Status::UnprocessableEntity,
        "Request body does not match the expected shape".to_string(),
    )
}

#[catch(500)]
fn internal_error(_req: &Request) -> Json<ErrorResponse> {
    catcher_body(Status::InternalServerError, "Internal server error".to_string())
}

/// Adds permissive cross-origin headers so a browser front end on another
/// origin can call the API.
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _req: &'r Request<'_>, res: &mut Response<'r>) {
        res.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        res.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, OPTIONS",
        ));
        res.set_header(Header::new("Access-Control-Allow-Headers", "Content-Type"));
    }
}

/// Create the shared model provider, or `None` when no API key is available.
pub fn build_provider(config: &Config) -> Option<Arc<dyn LlmProvider>> {
    let key_env = config.api_key_env();
    match config.api_key() {
        Some(api_key) => {
            let api_url = config.api_url();
            let profiles = ModelProfiles::from_config(&config.llm);
            // Every operation sends its own profile; the social model only
            // applies to requests built without one
            let provider = RemoteLlmProvider::new(api_url.clone(), api_key, profiles.social.model)
                .with_timeout(config.llm_timeout().as_secs());
            tracing::info!("LLM provider initialized: remote at {}", api_url);
            Some(Arc::new(provider) as Arc<dyn LlmProvider>)
        }
        None => {
            tracing::warn!(
                "LLM API key env var '{}' not set; generation endpoints will answer 400",
                key_env
            );
            None
        }
    }
}

/// Build the Rocket instance with state, routes, catchers and CORS.
pub fn build_rocket(state: AppState, figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .manage(state)
        .attach(Cors)
        .mount(
            "/",
            routes![
                health,
                status,
                generate_news,
                create_social_content,
                create_content_series,
                analyze_news,
                preflight,
            ],
        )
        .register(
            "/",
            catchers![
                bad_request,
                not_found,
                unprocessable,
                internal_error
            ],
        )
}

/// Build and launch the Rocket server from configuration.
///
/// The port comes from `port_override` (CLI), then `NEWS_API_PORT`, then `[server] port`.
/// This function blocks until the Rocket server shuts down (it awaits `rocket.launch().await`)
/// and returns an error if Rocket fails to start.
pub async fn launch_rocket(config: Arc<Config>, port_override: Option<u16>) -> Result<()> {
    let provider = build_provider(&config);
    let orchestrator = Orchestrator::new(provider, ModelProfiles::from_config(&config.llm));
    let state = AppState::new(orchestrator);

    let port = match port_override {
        Some(port) => port,
        None => config.port()?,
    };
    let address = config.bind_address();
    let figment = rocket::Config::figment()
        .merge(("address", address.clone()))
        .merge(("port", port));

    tracing::info!("Starting Rocket HTTP server on {}:{}", address, port);
    build_rocket(state, figment)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}

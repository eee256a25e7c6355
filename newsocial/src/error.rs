use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Failures of the orchestration operations, rendered as `{success:false, error}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("OpenAI API key missing")]
    MissingCredential,

    #[error("Need at least {required} articles")]
    InsufficientInput { required: usize },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Invalid JSON from model: {reason}")]
    ModelOutputMalformed { reason: String, raw: String },

    #[error("{0}")]
    UpstreamCallFailure(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::MissingCredential
            | ApiError::InsufficientInput { .. }
            | ApiError::InvalidParameter { .. } => Status::BadRequest,
            ApiError::ModelOutputMalformed { .. } => Status::BadGateway,
            ApiError::UpstreamCallFailure(_) => Status::InternalServerError,
        }
    }

    pub fn to_body(&self) -> ErrorResponse {
        let raw = match self {
            ApiError::ModelOutputMalformed { raw, .. } => Some(raw.clone()),
            _ => None,
        };
        ErrorResponse {
            success: false,
            error: self.to_string(),
            raw,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Keep the whole context chain, it is the only diagnosis the caller gets
        ApiError::UpstreamCallFailure(format!("{:#}", err))
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        (self.status(), Json(self.to_body())).respond_to(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(ApiError::MissingCredential.status(), Status::BadRequest);
        assert_eq!(ApiError::InsufficientInput { required: 2 }.status(), Status::BadRequest);
        assert_eq!(
            ApiError::ModelOutputMalformed { reason: "eof".into(), raw: "{".into() }.status(),
            Status::BadGateway
        );
        assert_eq!(
            ApiError::UpstreamCallFailure("down".into()).status(),
            Status::InternalServerError
        );
    }

    #[test]
    fn malformed_body_carries_raw_text() {
        let err = ApiError::ModelOutputMalformed {
            reason: "expected an array".into(),
            raw: "{\"title\":\"x\"}".into(),
        };
        let body = err.to_body();
        assert!(!body.success);
        assert_eq!(body.error, "Invalid JSON from model: expected an array");
        assert_eq!(body.raw.as_deref(), Some("{\"title\":\"x\"}"));
    }

    #[test]
    fn upstream_error_keeps_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("LLM HTTP request failed");
        let api: ApiError = err.into();
        assert_eq!(api.to_string(), "LLM HTTP request failed: connection refused");
    }
}

use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;

#[derive(Serialize)]
pub struct ProblemDetails {
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

/// Edge-level error type for HTTP handlers and the WebSocket upgrade path.
///
/// Session-scoped failures never reach this type; they are reported through
/// the message that triggered them (see `ws::protocol::Status`). Everything
/// at the HTTP edge is a `DomainError` mapped through `From` below.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
}

impl AppError {
    fn code(&self) -> ErrorCode {
        match self {
            AppError::BadRequest { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Internal { code, .. } => *code,
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::BadRequest { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::Internal { detail, .. } => detail.clone(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let code = err.code();
        let detail = err.detail().to_string();
        match err {
            DomainError::Validation(..) => AppError::BadRequest { code, detail },
            DomainError::Conflict(..) => AppError::Conflict { code, detail },
            DomainError::NotFound(..) => AppError::NotFound { code, detail },
            DomainError::Infra(..) => AppError::Internal { code, detail },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let problem_details = ProblemDetails {
            title: self.code().as_str().to_string(),
            status: status.as_u16(),
            detail: self.detail(),
            code: self.code().as_str().to_string(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .json(problem_details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::domain::{ConflictKind, NotFoundKind, ValidationKind};

    #[test]
    fn domain_errors_map_to_http_statuses() {
        let cases = [
            (
                DomainError::validation(ValidationKind::Other, "bad input"),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::not_found(NotFoundKind::Lobby, "no such lobby"),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::conflict(ConflictKind::LobbyFull, "full"),
                StatusCode::CONFLICT,
            ),
            (
                DomainError::infra("store unavailable"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (domain, status) in cases {
            let expected_code = domain.code();
            let app = AppError::from(domain);
            assert_eq!(app.status(), status);
            assert_eq!(app.code(), expected_code);
        }
    }

    #[test]
    fn responses_are_problem_json_with_the_stable_code() {
        let app = AppError::from(DomainError::validation(
            ValidationKind::Other,
            "username required",
        ));
        let response = app.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/problem+json"
        );
    }
}

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use clinicavet_common::DomainError;
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

pub type ApiResult<T> = Result<T, ApiProblem>;

const BASIC_CHALLENGE: &str = "Basic realm=\"clinicavet\"";

#[derive(Debug)]
pub struct ApiProblem {
    status: StatusCode,
    title: &'static str,
    detail: String,
    kind: &'static str,
    correlation_id: String,
    challenge: bool,
}

impl ApiProblem {
    pub fn from_domain_with_correlation(
        error: DomainError,
        correlation_id: Option<String>,
    ) -> Self {
        let with_correlation = |status, title, kind, detail| {
            Self::new(status, title, kind, detail, correlation_id.clone())
        };

        match error {
            DomainError::Validation(detail) => with_correlation(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                "https://clinicavet.dev/problems/validation",
                detail,
            ),
            DomainError::NotFound(detail) => with_correlation(
                StatusCode::NOT_FOUND,
                "Not found",
                "https://clinicavet.dev/problems/not-found",
                detail,
            ),
            DomainError::Conflict(detail) => with_correlation(
                StatusCode::CONFLICT,
                "Conflict",
                "https://clinicavet.dev/problems/conflict",
                detail,
            ),
            DomainError::Storage(detail) => {
                error!(detail = %detail, "storage failure while serving request");
                with_correlation(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error",
                    "https://clinicavet.dev/problems/storage",
                    detail,
                )
            }
            DomainError::Internal(detail) => {
                error!(detail = %detail, "internal failure while serving request");
                with_correlation(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "https://clinicavet.dev/problems/internal",
                    detail,
                )
            }
        }
    }

    /// 401 carrying a `WWW-Authenticate: Basic` challenge.
    pub fn unauthorized(detail: impl Into<String>, correlation_id: Option<String>) -> Self {
        let mut problem = Self::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "https://clinicavet.dev/problems/unauthorized",
            detail,
            correlation_id,
        );
        problem.challenge = true;
        problem
    }

    pub fn internal(detail: impl Into<String>, correlation_id: Option<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            "https://clinicavet.dev/problems/internal",
            detail,
            correlation_id,
        )
    }

    fn new(
        status: StatusCode,
        title: &'static str,
        kind: &'static str,
        detail: impl Into<String>,
        correlation_id: Option<String>,
    ) -> Self {
        Self {
            status,
            title,
            detail: detail.into(),
            kind,
            // Reuse the request id set by the middleware so logs and payload share one key.
            correlation_id: correlation_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            challenge: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct ProblemDetails {
    #[serde(rename = "type")]
    kind: String,
    title: String,
    status: u16,
    detail: String,
    correlation_id: String,
}

impl IntoResponse for ApiProblem {
    fn into_response(self) -> Response {
        let payload = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            correlation_id: self.correlation_id,
        };

        let mut response = (self.status, Json(payload)).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        if self.challenge {
            headers.insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_CHALLENGE),
            );
        }

        response
    }
}

/// The `x-request-id` of the current request, if it carries a usable one.
pub fn request_correlation_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty() && value.len() <= 128)
        .map(str::to_string)
}

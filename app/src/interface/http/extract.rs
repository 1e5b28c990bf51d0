//! Body and query extractors whose rejections are reported as problem+json.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};
use clinicavet_common::DomainError;
use serde::de::DeserializeOwned;

use crate::interface::http::problem::{ApiProblem, request_correlation_id};

/// `Json<T>` that answers malformed or incomplete bodies with a 400 problem.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiProblem;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = request_correlation_id(request.headers());
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiProblem::from_domain_with_correlation(
                json_rejection_error(&rejection),
                correlation_id,
            )),
        }
    }
}

/// `Query<T>` that answers unparsable query strings with a 400 problem.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiProblem;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = request_correlation_id(&parts.headers);
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiProblem::from_domain_with_correlation(
                query_rejection_error(&rejection),
                correlation_id,
            )),
        }
    }
}

fn json_rejection_error(rejection: &JsonRejection) -> DomainError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            DomainError::validation("request body must be sent as application/json")
        }
        other => DomainError::validation(other.body_text()),
    }
}

fn query_rejection_error(rejection: &QueryRejection) -> DomainError {
    DomainError::validation(rejection.body_text())
}

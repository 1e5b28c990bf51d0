use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
};
use clinicavet_application::dto::{
    DewormerApplicationRequest, HealthResponse, ListPetsQueryRequest, PaginatedPetsResponse,
    PetRequest, PetResponse, PetUpdateRequest, ReminderRequest, VaccineApplicationRequest,
};
use clinicavet_common::DomainError;
use uuid::Uuid;

use crate::{
    interface::http::{
        extract::{ApiJson, ApiQuery},
        problem::{ApiProblem, ApiResult, request_correlation_id},
    },
    state::AppState,
};

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn create_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<PetRequest>,
) -> ApiResult<(StatusCode, Json<PetResponse>)> {
    let correlation_id = request_correlation_id(&headers);
    let created = state
        .pet_service
        .create_pet(request)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_pets(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(query): ApiQuery<ListPetsQueryRequest>,
) -> ApiResult<Json<PaginatedPetsResponse>> {
    let correlation_id = request_correlation_id(&headers);
    let pets = state
        .pet_service
        .find_all(query)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(Json(pets))
}

pub async fn get_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<PetResponse>> {
    let correlation_id = request_correlation_id(&headers);
    let pet_id = parse_uuid("id", &id, correlation_id.clone())?;
    let pet = state
        .pet_service
        .find_by_id(pet_id)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(Json(pet))
}

pub async fn list_pets_by_guardian(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(guardian_id): Path<String>,
) -> ApiResult<Json<Vec<PetResponse>>> {
    let correlation_id = request_correlation_id(&headers);
    let guardian_id = parse_uuid("guardian_id", &guardian_id, correlation_id.clone())?;
    let pets = state
        .pet_service
        .find_by_guardian_id(guardian_id)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(Json(pets))
}

pub async fn update_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<PetUpdateRequest>,
) -> ApiResult<Json<PetResponse>> {
    let correlation_id = request_correlation_id(&headers);
    let pet_id = parse_uuid("id", &id, correlation_id.clone())?;
    let expected_version = parse_expected_version(&headers, correlation_id.clone())?;
    let updated = state
        .pet_service
        .update_pet(pet_id, request, expected_version)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(Json(updated))
}

pub async fn delete_pet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let correlation_id = request_correlation_id(&headers);
    let pet_id = parse_uuid("id", &id, correlation_id.clone())?;
    let expected_version = parse_expected_version(&headers, correlation_id.clone())?;
    state
        .pet_service
        .delete_pet(pet_id, expected_version)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_vaccine_application(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<VaccineApplicationRequest>,
) -> ApiResult<(StatusCode, Json<PetResponse>)> {
    let correlation_id = request_correlation_id(&headers);
    let pet_id = parse_uuid("id", &id, correlation_id.clone())?;
    let pet = state
        .pet_service
        .add_vaccine_application(pet_id, request)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;

    Ok((StatusCode::CREATED, Json(pet)))
}

pub async fn add_dewormer_application(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<DewormerApplicationRequest>,
) -> ApiResult<(StatusCode, Json<PetResponse>)> {
    let correlation_id = request_correlation_id(&headers);
    let pet_id = parse_uuid("id", &id, correlation_id.clone())?;
    let pet = state
        .pet_service
        .add_dewormer_application(pet_id, request)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;

    Ok((StatusCode::CREATED, Json(pet)))
}

pub async fn add_reminder(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<ReminderRequest>,
) -> ApiResult<(StatusCode, Json<PetResponse>)> {
    let correlation_id = request_correlation_id(&headers);
    let pet_id = parse_uuid("id", &id, correlation_id.clone())?;
    let pet = state
        .pet_service
        .add_reminder(pet_id, request)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;

    Ok((StatusCode::CREATED, Json(pet)))
}

fn parse_uuid(field: &str, raw: &str, correlation_id: Option<String>) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        ApiProblem::from_domain_with_correlation(
            DomainError::validation(format!("{field} must be a valid UUID string")),
            correlation_id,
        )
    })
}

/// `If-Match` is optional. When present it must hold a positive version,
/// optionally quoted like an entity tag.
fn parse_expected_version(
    headers: &HeaderMap,
    correlation_id: Option<String>,
) -> ApiResult<Option<i64>> {
    let Some(raw_if_match) = headers.get(header::IF_MATCH) else {
        return Ok(None);
    };

    let invalid = |detail: &str| {
        ApiProblem::from_domain_with_correlation(
            DomainError::validation(detail),
            correlation_id.clone(),
        )
    };

    let raw_if_match = raw_if_match
        .to_str()
        .map_err(|_| invalid("If-Match header must be valid ASCII"))?;

    let normalized = raw_if_match.trim().trim_matches('"');
    match normalized.parse::<i64>() {
        Ok(version) if version > 0 => Ok(Some(version)),
        _ => Err(invalid(
            "If-Match header must contain a positive integer version",
        )),
    }
}

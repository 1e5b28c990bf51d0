use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{Days, NaiveDate, Utc};
use clinicavet_app::{build_router, state::AppState};
use clinicavet_application::PetService;
use clinicavet_infrastructure::{CredentialVerifier, InMemoryPetRepository};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const USERNAME: &str = "vet";
const PASSWORD: &str = "s3cret";

fn test_app() -> Router {
    let repository = Arc::new(InMemoryPetRepository::new());
    let credentials = CredentialVerifier::from_password(USERNAME, PASSWORD, 4)
        .expect("test credentials hash");
    build_router(AppState::new(
        Arc::new(PetService::new(repository)),
        Arc::new(credentials),
    ))
}

fn basic_auth() -> String {
    format!("Basic {}", STANDARD.encode(format!("{USERNAME}:{PASSWORD}")))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn days_ago(days: u64) -> String {
    (today() - Days::new(days)).to_string()
}

fn days_ahead(days: u64) -> String {
    (today() + Days::new(days)).to_string()
}

fn authed(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth())
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    authed(method, uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid json request")
}

fn pet_body(guardian_id: &str, name: &str, microchip: Option<&str>) -> Value {
    json!({
        "guardian_id": guardian_id,
        "name": name,
        "birth_date": "2020-01-15",
        "breed": "Beagle",
        "sex": "male",
        "is_castrated": true,
        "microchip_number": microchip,
        "history": "Allergic to chicken"
    })
}

async fn create_pet(app: &Router, guardian_id: &str, name: &str, microchip: Option<&str>) -> Value {
    let (status, created) = request_json(
        app.clone(),
        json_request("POST", "/api/pets", pet_body(guardian_id, name, microchip)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    created
}

fn id_of(value: &Value) -> String {
    value
        .get("id")
        .and_then(Value::as_str)
        .expect("response carries an id")
        .to_string()
}

const GUARDIAN: &str = "6f1c1e1a-0b7e-4d55-9d3e-2f0f7b4a9c11";
const OTHER_GUARDIAN: &str = "0d5e7c3b-6a41-4b1f-8f0e-93a2c4d8e7f2";

#[tokio::test]
async fn health_is_public() {
    let (status, body) = request_json(
        test_app(),
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("valid health request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").and_then(Value::as_str), Some("ok"));
}

#[tokio::test]
async fn api_requires_basic_credentials() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/pets")
                .body(Body::empty())
                .expect("valid anonymous request"),
        )
        .await
        .expect("router should serve request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

    let (status, problem) = request_json(
        app.clone(),
        Request::builder()
            .uri("/api/pets")
            .header(
                header::AUTHORIZATION,
                format!("Basic {}", STANDARD.encode("vet:wrong")),
            )
            .body(Body::empty())
            .expect("valid wrong password request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_problem(&problem, 401, "Unauthorized");

    let (status, _) = request_json(
        app,
        authed("GET", "/api/pets")
            .body(Body::empty())
            .expect("valid authed request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_pet_contract() {
    let app = test_app();

    let created = create_pet(&app, GUARDIAN, "Snoopy", Some("985112000000001")).await;
    assert_eq!(created.get("name").and_then(Value::as_str), Some("Snoopy"));
    assert_eq!(created.get("sex").and_then(Value::as_str), Some("male"));
    assert_eq!(created.get("version").and_then(Value::as_i64), Some(1));
    assert!(created.get("age_years").and_then(Value::as_u64).is_some());
    assert_eq!(
        created
            .get("vaccine_applications")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(0)
    );

    let (status, problem) = request_json(
        app.clone(),
        json_request(
            "POST",
            "/api/pets",
            pet_body(OTHER_GUARDIAN, "Rex", Some("985112000000001")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_problem(&problem, 409, "Conflict");

    let mut future_birth = pet_body(GUARDIAN, "Nova", None);
    future_birth["birth_date"] = json!(days_ahead(30));
    let (status, problem) =
        request_json(app.clone(), json_request("POST", "/api/pets", future_birth)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed");

    let mut blank_breed = pet_body(GUARDIAN, "Nova", None);
    blank_breed["breed"] = json!("   ");
    let (status, problem) =
        request_json(app, json_request("POST", "/api/pets", blank_breed)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed");
}

#[tokio::test]
async fn read_pets_contract() {
    let app = test_app();
    let snoopy = create_pet(&app, GUARDIAN, "Snoopy", None).await;
    create_pet(&app, GUARDIAN, "Astro", None).await;
    create_pet(&app, OTHER_GUARDIAN, "Garfield", None).await;

    let (status, fetched) = request_json(
        app.clone(),
        authed("GET", &format!("/api/pets/{}", id_of(&snoopy)))
            .body(Body::empty())
            .expect("valid get request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched.get("name").and_then(Value::as_str), Some("Snoopy"));

    let (status, problem) = request_json(
        app.clone(),
        authed("GET", "/api/pets/not-a-uuid")
            .body(Body::empty())
            .expect("valid malformed id request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed");

    let (status, problem) = request_json(
        app.clone(),
        authed("GET", "/api/pets/7d0c64f2-2a3b-4c58-9a2f-5b0c6e1d8f90")
            .body(Body::empty())
            .expect("valid missing pet request"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_problem(&problem, 404, "Not found");

    let (status, page) = request_json(
        app.clone(),
        authed(
            "GET",
            &format!("/api/pets?guardian_id={GUARDIAN}&sort_by=name&order=asc&per_page=1"),
        )
        .body(Body::empty())
        .expect("valid list request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.get("total").and_then(Value::as_u64), Some(2));
    assert_eq!(page.get("total_pages").and_then(Value::as_u64), Some(2));
    assert_eq!(
        page.pointer("/items/0/name").and_then(Value::as_str),
        Some("Astro")
    );

    let (status, problem) = request_json(
        app.clone(),
        authed("GET", "/api/pets?page=0")
            .body(Body::empty())
            .expect("valid bad page request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed");

    let (status, pets) = request_json(
        app,
        authed("GET", &format!("/api/pets/guardian/{OTHER_GUARDIAN}"))
            .body(Body::empty())
            .expect("valid guardian request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pets = pets.as_array().expect("guardian route returns a list");
    assert_eq!(pets.len(), 1);
    assert_eq!(
        pets[0].get("name").and_then(Value::as_str),
        Some("Garfield")
    );
}

#[tokio::test]
async fn update_and_delete_contract() {
    let app = test_app();
    let created = create_pet(&app, GUARDIAN, "Snoopy", Some("985112000000001")).await;
    let uri = format!("/api/pets/{}", id_of(&created));

    let (status, updated) = request_json(
        app.clone(),
        json_request("PATCH", &uri, json!({ "breed": "Basset Hound" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        updated.get("breed").and_then(Value::as_str),
        Some("Basset Hound")
    );
    assert_eq!(updated.get("version").and_then(Value::as_i64), Some(2));

    let (status, problem) = request_json(
        app.clone(),
        authed("PATCH", &uri)
            .header("content-type", "application/json")
            .header("if-match", "1")
            .body(Body::from(json!({ "history": "Vaccinated" }).to_string()))
            .expect("valid stale patch request"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_problem(&problem, 409, "Conflict");

    let (status, problem) = request_json(
        app.clone(),
        authed("PATCH", &uri)
            .header("content-type", "application/json")
            .header("if-match", "not-a-number")
            .body(Body::from(json!({ "history": "Vaccinated" }).to_string()))
            .expect("valid invalid if-match request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed");

    let (status, problem) =
        request_json(app.clone(), json_request("PATCH", &uri, json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed");

    let (status, cleared) = request_json(
        app.clone(),
        authed("PATCH", &uri)
            .header("content-type", "application/json")
            .header("if-match", "\"2\"")
            .body(Body::from(json!({ "microchip_number": null }).to_string()))
            .expect("valid clearing patch request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared.get("microchip_number").is_some_and(Value::is_null));
    assert_eq!(
        cleared.get("history").and_then(Value::as_str),
        Some("Allergic to chicken")
    );
    assert_eq!(cleared.get("version").and_then(Value::as_i64), Some(3));

    let (status, problem) = request_json(
        app.clone(),
        authed("DELETE", &uri)
            .header("if-match", "1")
            .body(Body::empty())
            .expect("valid stale delete request"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_problem(&problem, 409, "Conflict");

    let (status, body) = request_json(
        app.clone(),
        authed("DELETE", &uri)
            .header("if-match", "3")
            .body(Body::empty())
            .expect("valid delete request"),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, problem) = request_json(
        app,
        authed("GET", &uri)
            .body(Body::empty())
            .expect("valid get after delete request"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_problem(&problem, 404, "Not found");
}

#[tokio::test]
async fn clinical_records_contract() {
    let app = test_app();
    let created = create_pet(&app, GUARDIAN, "Snoopy", None).await;
    let pet_uri = format!("/api/pets/{}", id_of(&created));

    let (status, with_vaccine) = request_json(
        app.clone(),
        json_request(
            "POST",
            &format!("{pet_uri}/vaccines"),
            json!({
                "vaccine_name": "Rabies",
                "applied_on": days_ago(10),
                "next_dose_on": days_ahead(355),
                "batch_number": "RB-2291",
                "veterinarian": "Dr. Costa"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        with_vaccine
            .pointer("/vaccine_applications/0/vaccine_name")
            .and_then(Value::as_str),
        Some("Rabies")
    );
    assert_eq!(with_vaccine.get("version").and_then(Value::as_i64), Some(2));

    let (status, problem) = request_json(
        app.clone(),
        json_request(
            "POST",
            &format!("{pet_uri}/vaccines"),
            json!({ "vaccine_name": "Rabies", "applied_on": days_ahead(3) }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed");

    let (status, problem) = request_json(
        app.clone(),
        json_request(
            "POST",
            "/api/pets/7d0c64f2-2a3b-4c58-9a2f-5b0c6e1d8f90/vaccines",
            json!({ "vaccine_name": "Rabies", "applied_on": days_ago(1) }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_problem(&problem, 404, "Not found");

    let (status, with_dewormer) = request_json(
        app.clone(),
        json_request(
            "POST",
            &format!("{pet_uri}/dewormers"),
            json!({
                "product_name": "Drontal",
                "applied_on": days_ago(5),
                "next_application_on": days_ahead(85),
                "dosage": "1 tablet"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        with_dewormer
            .pointer("/dewormer_applications/0/dosage")
            .and_then(Value::as_str),
        Some("1 tablet")
    );
    assert_eq!(with_dewormer.get("version").and_then(Value::as_i64), Some(3));

    let (status, with_reminder) = request_json(
        app.clone(),
        json_request(
            "POST",
            &format!("{pet_uri}/reminders"),
            json!({ "title": "Rabies booster", "remind_on": days_ahead(30) }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        with_reminder
            .pointer("/reminders/0/title")
            .and_then(Value::as_str),
        Some("Rabies booster")
    );

    let (status, problem) = request_json(
        app.clone(),
        json_request(
            "POST",
            &format!("{pet_uri}/reminders"),
            json!({ "title": "Too late", "remind_on": days_ago(1) }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed");

    let (status, fetched) = request_json(
        app,
        authed("GET", &pet_uri)
            .body(Body::empty())
            .expect("valid get request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched.get("version").and_then(Value::as_i64), Some(4));
    assert_eq!(
        fetched
            .get("reminders")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(1)
    );
}

#[tokio::test]
async fn problem_reuses_request_id() {
    let (status, problem) = request_json(
        test_app(),
        authed("GET", "/api/pets/not-a-uuid")
            .header("x-request-id", "req-from-client")
            .body(Body::empty())
            .expect("valid request with id"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        problem.get("correlation_id").and_then(Value::as_str),
        Some("req-from-client")
    );
}

#[tokio::test]
async fn malformed_input_is_reported_as_problem() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pets",
            json!({ "name": "Nova", "breed": "Beagle" }),
        ))
        .await
        .expect("router should serve request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/problem+json")
    );

    let mut wrong_type = pet_body(GUARDIAN, "Nova", None);
    wrong_type["is_castrated"] = json!("sometimes");
    let (status, problem) =
        request_json(app.clone(), json_request("POST", "/api/pets", wrong_type)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed");

    for query in ["sex=unknown", "page=abc"] {
        let (status, problem) = request_json(
            app.clone(),
            authed("GET", &format!("/api/pets?{query}"))
                .header("x-request-id", "req-query")
                .body(Body::empty())
                .expect("valid list request"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        assert_problem(&problem, 400, "Validation failed");
        assert_eq!(
            problem.get("correlation_id").and_then(Value::as_str),
            Some("req-query")
        );
    }

    let (status, problem) = request_json(
        app,
        authed("POST", "/api/pets")
            .body(Body::from(pet_body(GUARDIAN, "Nova", None).to_string()))
            .expect("valid request without content type"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed");
}

fn assert_problem(problem: &Value, expected_status: u16, expected_title: &str) {
    assert_eq!(
        problem.get("status").and_then(Value::as_u64),
        Some(u64::from(expected_status))
    );
    assert_eq!(
        problem.get("title").and_then(Value::as_str),
        Some(expected_title)
    );
    assert!(problem.get("detail").and_then(Value::as_str).is_some());
    assert!(
        problem
            .get("correlation_id")
            .and_then(Value::as_str)
            .is_some()
    );
    assert!(problem.get("type").and_then(Value::as_str).is_some());
}

async fn request_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(request)
        .await
        .expect("router should serve request");

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();

    if body.is_empty() {
        return (status, Value::Null);
    }

    let value = serde_json::from_slice(&body).expect("body should be valid json");
    (status, value)
}

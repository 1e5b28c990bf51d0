use axum::{
    Router,
    http::{HeaderName, Method},
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    interface::http::{
        auth::require_basic_auth,
        pets_handler::{
            add_dewormer_application, add_reminder, add_vaccine_application, create_pet,
            delete_pet, get_pet, healthcheck, list_pets, list_pets_by_guardian, update_pet,
        },
    },
    state::AppState,
};

pub fn build_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    let api = Router::new()
        .route("/api/pets", post(create_pet).get(list_pets))
        .route(
            "/api/pets/{id}",
            get(get_pet).patch(update_pet).delete(delete_pet),
        )
        .route(
            "/api/pets/guardian/{guardian_id}",
            get(list_pets_by_guardian),
        )
        .route("/api/pets/{id}/vaccines", post(add_vaccine_application))
        .route("/api/pets/{id}/dewormers", post(add_dewormer_application))
        .route("/api/pets/{id}/reminders", post(add_reminder))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_basic_auth,
        ));

    Router::new()
        .route("/health", get(healthcheck))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ]),
        )
        .with_state(state)
}

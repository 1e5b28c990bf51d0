use std::sync::Arc;

use clinicavet_application::PetService;
use clinicavet_infrastructure::CredentialVerifier;

#[derive(Clone)]
pub struct AppState {
    pub pet_service: Arc<PetService>,
    pub credentials: Arc<CredentialVerifier>,
}

impl AppState {
    pub fn new(pet_service: Arc<PetService>, credentials: Arc<CredentialVerifier>) -> Self {
        Self {
            pet_service,
            credentials,
        }
    }
}

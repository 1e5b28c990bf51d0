use async_trait::async_trait;
use clinicavet_common::{DomainError, Page};
use clinicavet_domain::{
    DewormerApplication, NewPet, Pet, PetListQuery, PetPatch, Reminder, VaccineApplication,
};
use uuid::Uuid;

/// Storage port for the pet aggregate.
///
/// Writes that target a missing pet, or that carry an `expected_version`
/// different from the stored one, match no row and report `None`/`false`.
/// Adding a child record bumps the pet's version.
#[async_trait]
pub trait PetRepository: Send + Sync {
    async fn create(&self, pet: NewPet) -> Result<Pet, DomainError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Pet>, DomainError>;
    async fn find_by_microchip(&self, microchip_number: &str) -> Result<Option<Pet>, DomainError>;
    async fn list(&self, query: PetListQuery) -> Result<Page<Pet>, DomainError>;
    async fn list_by_guardian(&self, guardian_id: Uuid) -> Result<Vec<Pet>, DomainError>;
    async fn update(
        &self,
        id: Uuid,
        patch: PetPatch,
        expected_version: Option<i64>,
    ) -> Result<Option<Pet>, DomainError>;
    async fn delete(&self, id: Uuid, expected_version: Option<i64>) -> Result<bool, DomainError>;
    async fn add_vaccine_application(
        &self,
        pet_id: Uuid,
        application: VaccineApplication,
    ) -> Result<Option<Pet>, DomainError>;
    async fn add_dewormer_application(
        &self,
        pet_id: Uuid,
        application: DewormerApplication,
    ) -> Result<Option<Pet>, DomainError>;
    async fn add_reminder(
        &self,
        pet_id: Uuid,
        reminder: Reminder,
    ) -> Result<Option<Pet>, DomainError>;
}

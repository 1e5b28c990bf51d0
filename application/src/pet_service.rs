use std::sync::Arc;

use chrono::Utc;
use clinicavet_common::{DomainError, messages};
use clinicavet_domain::{
    DewormerApplication, NewPet, Pet, PetPatch, Reminder, VaccineApplication,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::{
        DewormerApplicationRequest, ListPetsQueryRequest, PaginatedPetsResponse, PetRequest,
        PetResponse, PetUpdateRequest, ReminderRequest, VaccineApplicationRequest,
    },
    ports::PetRepository,
};

#[derive(Clone)]
pub struct PetService {
    repository: Arc<dyn PetRepository>,
}

impl PetService {
    pub fn new(repository: Arc<dyn PetRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_pet(&self, request: PetRequest) -> Result<PetResponse, DomainError> {
        let today = Utc::now().date_naive();
        let new_pet = NewPet::create(request.into(), today)?;

        if let Some(microchip_number) = new_pet.microchip_number.as_deref()
            && self
                .repository
                .find_by_microchip(microchip_number)
                .await?
                .is_some()
        {
            return Err(DomainError::conflict(
                messages::PET_MICROCHIP_ALREADY_REGISTERED,
            ));
        }

        let created = self.repository.create(new_pet).await?;
        info!(pet_id = %created.id, guardian_id = %created.guardian_id, "pet registered");
        Ok(PetResponse::from_domain(created, today))
    }

    pub async fn update_pet(
        &self,
        id: Uuid,
        request: PetUpdateRequest,
        expected_version: Option<i64>,
    ) -> Result<PetResponse, DomainError> {
        let patch = PetPatch::from(request).normalize()?;
        if patch.is_empty() {
            return Err(DomainError::validation(messages::PET_UPDATE_EMPTY));
        }

        self.require_pet(id).await?;

        if let Some(microchip_number) = patch.assigned_microchip()
            && let Some(owner) = self.repository.find_by_microchip(microchip_number).await?
            && owner.id != id
        {
            return Err(DomainError::conflict(
                messages::PET_MICROCHIP_ALREADY_REGISTERED,
            ));
        }

        let Some(updated) = self.repository.update(id, patch, expected_version).await? else {
            // Without a version check a miss means the pet was removed concurrently.
            return Err(match expected_version {
                Some(_) => DomainError::conflict(messages::VERSION_MISMATCH),
                None => DomainError::not_found(messages::PET_NOT_FOUND),
            });
        };

        info!(pet_id = %id, version = updated.version, "pet updated");
        Ok(self.respond(updated))
    }

    pub async fn delete_pet(&self, id: Uuid, expected_version: Option<i64>) -> Result<(), DomainError> {
        self.require_pet(id).await?;

        if !self.repository.delete(id, expected_version).await? {
            return Err(match expected_version {
                Some(_) => DomainError::conflict(messages::VERSION_MISMATCH),
                None => DomainError::not_found(messages::PET_NOT_FOUND),
            });
        }

        info!(pet_id = %id, "pet removed");
        Ok(())
    }

    pub async fn find_all(
        &self,
        query: ListPetsQueryRequest,
    ) -> Result<PaginatedPetsResponse, DomainError> {
        query.validate()?;
        let today = Utc::now().date_naive();
        let page = self.repository.list(query.into_domain()).await?;
        Ok(page.map(|pet| PetResponse::from_domain(pet, today)))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<PetResponse, DomainError> {
        let pet = self.require_pet(id).await?;
        Ok(self.respond(pet))
    }

    pub async fn find_by_guardian_id(
        &self,
        guardian_id: Uuid,
    ) -> Result<Vec<PetResponse>, DomainError> {
        let today = Utc::now().date_naive();
        let pets = self.repository.list_by_guardian(guardian_id).await?;
        Ok(pets
            .into_iter()
            .map(|pet| PetResponse::from_domain(pet, today))
            .collect())
    }

    pub async fn add_vaccine_application(
        &self,
        pet_id: Uuid,
        request: VaccineApplicationRequest,
    ) -> Result<PetResponse, DomainError> {
        let application = VaccineApplication::record(request.into(), Utc::now())?;
        let application_id = application.id;

        let Some(pet) = self
            .repository
            .add_vaccine_application(pet_id, application)
            .await?
        else {
            return Err(DomainError::not_found(messages::PET_NOT_FOUND));
        };

        info!(pet_id = %pet_id, application_id = %application_id, "vaccine application recorded");
        Ok(self.respond(pet))
    }

    pub async fn add_dewormer_application(
        &self,
        pet_id: Uuid,
        request: DewormerApplicationRequest,
    ) -> Result<PetResponse, DomainError> {
        let application = DewormerApplication::record(request.into(), Utc::now())?;
        let application_id = application.id;

        let Some(pet) = self
            .repository
            .add_dewormer_application(pet_id, application)
            .await?
        else {
            return Err(DomainError::not_found(messages::PET_NOT_FOUND));
        };

        info!(pet_id = %pet_id, application_id = %application_id, "dewormer application recorded");
        Ok(self.respond(pet))
    }

    pub async fn add_reminder(
        &self,
        pet_id: Uuid,
        request: ReminderRequest,
    ) -> Result<PetResponse, DomainError> {
        let reminder = Reminder::schedule(request.into(), Utc::now())?;
        let remind_on = reminder.remind_on;

        let Some(pet) = self.repository.add_reminder(pet_id, reminder).await? else {
            return Err(DomainError::not_found(messages::PET_NOT_FOUND));
        };

        info!(pet_id = %pet_id, %remind_on, "reminder scheduled");
        Ok(self.respond(pet))
    }

    async fn require_pet(&self, id: Uuid) -> Result<Pet, DomainError> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(messages::PET_NOT_FOUND))
    }

    fn respond(&self, pet: Pet) -> PetResponse {
        PetResponse::from_domain(pet, Utc::now().date_naive())
    }
}

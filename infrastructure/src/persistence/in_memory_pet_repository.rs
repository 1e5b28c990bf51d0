use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use clinicavet_application::PetRepository;
use clinicavet_common::{DomainError, Page, messages};
use clinicavet_domain::{
    DewormerApplication, NewPet, Pet, PetListQuery, PetPatch, Reminder, VaccineApplication,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Store {
    pets_by_id: HashMap<Uuid, Pet>,
    pet_id_by_microchip: HashMap<String, Uuid>,
}

impl Store {
    fn microchip_taken_by_other(&self, microchip_number: &str, id: Uuid) -> bool {
        self.pet_id_by_microchip
            .get(microchip_number)
            .is_some_and(|owner| *owner != id)
    }

    /// Returns the pet when it exists and `expected_version` (if any) matches.
    fn current_mut(&mut self, id: Uuid, expected_version: Option<i64>) -> Option<&mut Pet> {
        self.pets_by_id
            .get_mut(&id)
            .filter(|pet| expected_version.is_none_or(|version| pet.version == version))
    }

    fn touch(&mut self, id: Uuid, push: impl FnOnce(&mut Pet)) -> Option<Pet> {
        let pet = self.pets_by_id.get_mut(&id)?;
        push(pet);
        pet.version += 1;
        pet.updated_at = Utc::now();
        Some(pet.clone())
    }
}

/// Process-local repository used by tests and `CV_STORAGE=memory`.
#[derive(Default)]
pub struct InMemoryPetRepository {
    store: RwLock<Store>,
}

impl InMemoryPetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PetRepository for InMemoryPetRepository {
    async fn create(&self, pet: NewPet) -> Result<Pet, DomainError> {
        let mut store = self.store.write().await;

        if let Some(microchip_number) = pet.microchip_number.as_deref()
            && store.pet_id_by_microchip.contains_key(microchip_number)
        {
            return Err(DomainError::conflict(
                messages::PET_MICROCHIP_ALREADY_REGISTERED,
            ));
        }

        let created = Pet::from_new(pet, Utc::now());
        if let Some(microchip_number) = created.microchip_number.clone() {
            store.pet_id_by_microchip.insert(microchip_number, created.id);
        }
        store.pets_by_id.insert(created.id, created.clone());

        Ok(created)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Pet>, DomainError> {
        Ok(self.store.read().await.pets_by_id.get(&id).cloned())
    }

    async fn find_by_microchip(&self, microchip_number: &str) -> Result<Option<Pet>, DomainError> {
        let store = self.store.read().await;
        let Some(id) = store.pet_id_by_microchip.get(microchip_number.trim()) else {
            return Ok(None);
        };
        Ok(store.pets_by_id.get(id).cloned())
    }

    async fn list(&self, query: PetListQuery) -> Result<Page<Pet>, DomainError> {
        let mut items = self
            .store
            .read()
            .await
            .pets_by_id
            .values()
            .filter(|pet| query.matches(pet))
            .cloned()
            .collect::<Vec<_>>();

        items.sort_by(|left, right| query.compare(left, right));

        let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
        let per_page = usize::try_from(query.per_page).unwrap_or(usize::MAX);
        let paged = items
            .into_iter()
            .skip(query.offset())
            .take(per_page)
            .collect();

        Ok(Page::new(paged, query.page, query.per_page, total))
    }

    async fn list_by_guardian(&self, guardian_id: Uuid) -> Result<Vec<Pet>, DomainError> {
        let mut pets = self
            .store
            .read()
            .await
            .pets_by_id
            .values()
            .filter(|pet| pet.guardian_id == guardian_id)
            .cloned()
            .collect::<Vec<_>>();
        pets.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(pets)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: PetPatch,
        expected_version: Option<i64>,
    ) -> Result<Option<Pet>, DomainError> {
        let mut store = self.store.write().await;

        if let Some(microchip_number) = patch.assigned_microchip()
            && store.microchip_taken_by_other(microchip_number, id)
        {
            return Err(DomainError::conflict(
                messages::PET_MICROCHIP_ALREADY_REGISTERED,
            ));
        }

        let Some(pet) = store.current_mut(id, expected_version) else {
            return Ok(None);
        };

        let previous_microchip = pet.microchip_number.clone();
        pet.apply_patch(patch);
        pet.version += 1;
        pet.updated_at = Utc::now();
        let updated = pet.clone();

        if previous_microchip != updated.microchip_number {
            if let Some(previous) = previous_microchip {
                store.pet_id_by_microchip.remove(&previous);
            }
            if let Some(current) = updated.microchip_number.clone() {
                store.pet_id_by_microchip.insert(current, id);
            }
        }

        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid, expected_version: Option<i64>) -> Result<bool, DomainError> {
        let mut store = self.store.write().await;
        if store.current_mut(id, expected_version).is_none() {
            return Ok(false);
        }

        let removed = store
            .pets_by_id
            .remove(&id)
            .ok_or_else(|| DomainError::internal("deleted pet is missing from state"))?;
        if let Some(microchip_number) = removed.microchip_number {
            store.pet_id_by_microchip.remove(&microchip_number);
        }
        Ok(true)
    }

    async fn add_vaccine_application(
        &self,
        pet_id: Uuid,
        application: VaccineApplication,
    ) -> Result<Option<Pet>, DomainError> {
        let mut store = self.store.write().await;
        Ok(store.touch(pet_id, |pet| pet.add_vaccine_application(application)))
    }

    async fn add_dewormer_application(
        &self,
        pet_id: Uuid,
        application: DewormerApplication,
    ) -> Result<Option<Pet>, DomainError> {
        let mut store = self.store.write().await;
        Ok(store.touch(pet_id, |pet| pet.add_dewormer_application(application)))
    }

    async fn add_reminder(
        &self,
        pet_id: Uuid,
        reminder: Reminder,
    ) -> Result<Option<Pet>, DomainError> {
        let mut store = self.store.write().await;
        Ok(store.touch(pet_id, |pet| pet.add_reminder(reminder)))
    }
}

//! Conversions between transport DTOs and domain types.

use chrono::NaiveDate;
use clinicavet_common::SortOrder;
use clinicavet_domain::{
    DewormerApplication, DewormerApplicationDraft, Pet, PetDraft, PetListQuery, PetPatch,
    PetSortBy, Reminder, ReminderDraft, Sex, VaccineApplication, VaccineApplicationDraft,
};

use crate::dto::{
    DewormerApplicationRequest, DewormerApplicationResponse, ListPetsQueryRequest,
    PetRequest, PetResponse, PetSortByRequest, PetUpdateRequest, ReminderRequest,
    ReminderResponse, SexDto, SortOrderRequest, VaccineApplicationRequest,
    VaccineApplicationResponse,
};

impl From<SexDto> for Sex {
    fn from(value: SexDto) -> Self {
        match value {
            SexDto::Male => Sex::Male,
            SexDto::Female => Sex::Female,
        }
    }
}

impl From<Sex> for SexDto {
    fn from(value: Sex) -> Self {
        match value {
            Sex::Male => SexDto::Male,
            Sex::Female => SexDto::Female,
        }
    }
}

impl From<PetRequest> for PetDraft {
    fn from(value: PetRequest) -> Self {
        Self {
            guardian_id: value.guardian_id,
            name: value.name,
            birth_date: value.birth_date,
            breed: value.breed,
            sex: value.sex.into(),
            is_castrated: value.is_castrated,
            microchip_number: value.microchip_number,
            history: value.history,
        }
    }
}

impl From<PetUpdateRequest> for PetPatch {
    fn from(value: PetUpdateRequest) -> Self {
        Self {
            breed: value.breed,
            microchip_number: value.microchip_number,
            history: value.history,
        }
    }
}

impl From<VaccineApplicationRequest> for VaccineApplicationDraft {
    fn from(value: VaccineApplicationRequest) -> Self {
        Self {
            vaccine_name: value.vaccine_name,
            applied_on: value.applied_on,
            next_dose_on: value.next_dose_on,
            batch_number: value.batch_number,
            veterinarian: value.veterinarian,
        }
    }
}

impl From<DewormerApplicationRequest> for DewormerApplicationDraft {
    fn from(value: DewormerApplicationRequest) -> Self {
        Self {
            product_name: value.product_name,
            applied_on: value.applied_on,
            next_application_on: value.next_application_on,
            dosage: value.dosage,
        }
    }
}

impl From<ReminderRequest> for ReminderDraft {
    fn from(value: ReminderRequest) -> Self {
        Self {
            title: value.title,
            notes: value.notes,
            remind_on: value.remind_on,
        }
    }
}

impl From<PetSortByRequest> for PetSortBy {
    fn from(value: PetSortByRequest) -> Self {
        match value {
            PetSortByRequest::CreatedAt => PetSortBy::CreatedAt,
            PetSortByRequest::Name => PetSortBy::Name,
            PetSortByRequest::BirthDate => PetSortBy::BirthDate,
        }
    }
}

impl From<SortOrderRequest> for SortOrder {
    fn from(value: SortOrderRequest) -> Self {
        match value {
            SortOrderRequest::Asc => SortOrder::Asc,
            SortOrderRequest::Desc => SortOrder::Desc,
        }
    }
}

impl ListPetsQueryRequest {
    pub fn into_domain(self) -> PetListQuery {
        PetListQuery {
            page: self.page,
            per_page: self.per_page,
            guardian_id: self.guardian_id,
            name_contains: self.name_contains.map(|value| value.trim().to_string()),
            sex: self.sex.map(Sex::from),
            sort_by: self.sort_by.into(),
            sort_order: self.order.into(),
        }
    }
}

impl From<VaccineApplication> for VaccineApplicationResponse {
    fn from(value: VaccineApplication) -> Self {
        Self {
            id: value.id,
            vaccine_name: value.vaccine_name,
            applied_on: value.applied_on,
            next_dose_on: value.next_dose_on,
            batch_number: value.batch_number,
            veterinarian: value.veterinarian,
            created_at: value.created_at,
        }
    }
}

impl From<DewormerApplication> for DewormerApplicationResponse {
    fn from(value: DewormerApplication) -> Self {
        Self {
            id: value.id,
            product_name: value.product_name,
            applied_on: value.applied_on,
            next_application_on: value.next_application_on,
            dosage: value.dosage,
            created_at: value.created_at,
        }
    }
}

impl From<Reminder> for ReminderResponse {
    fn from(value: Reminder) -> Self {
        Self {
            id: value.id,
            title: value.title,
            notes: value.notes,
            remind_on: value.remind_on,
            created_at: value.created_at,
        }
    }
}

impl PetResponse {
    /// `today` drives the derived `age_years` field.
    pub fn from_domain(pet: Pet, today: NaiveDate) -> Self {
        let age_years = pet.age_in_years(today);
        Self {
            id: pet.id,
            guardian_id: pet.guardian_id,
            name: pet.name,
            birth_date: pet.birth_date,
            age_years,
            breed: pet.breed,
            sex: pet.sex.into(),
            is_castrated: pet.is_castrated,
            microchip_number: pet.microchip_number,
            history: pet.history,
            vaccine_applications: pet
                .vaccine_applications
                .into_iter()
                .map(VaccineApplicationResponse::from)
                .collect(),
            dewormer_applications: pet
                .dewormer_applications
                .into_iter()
                .map(DewormerApplicationResponse::from)
                .collect(),
            reminders: pet.reminders.into_iter().map(ReminderResponse::from).collect(),
            version: pet.version,
            created_at: pet.created_at,
            updated_at: pet.updated_at,
        }
    }
}

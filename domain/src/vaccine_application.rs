use chrono::{DateTime, NaiveDate, Utc};
use clinicavet_common::{DomainError, DomainResult, messages};
use uuid::Uuid;

use crate::text;

#[derive(Debug, Clone)]
pub struct VaccineApplicationDraft {
    pub vaccine_name: String,
    pub applied_on: NaiveDate,
    pub next_dose_on: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub veterinarian: Option<String>,
}

/// A vaccine dose given to a pet.
#[derive(Debug, Clone)]
pub struct VaccineApplication {
    pub id: Uuid,
    pub vaccine_name: String,
    pub applied_on: NaiveDate,
    pub next_dose_on: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub veterinarian: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl VaccineApplication {
    pub fn record(draft: VaccineApplicationDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        let vaccine_name = text::required(
            &draft.vaccine_name,
            100,
            messages::VACCINE_FIELD_REQUIRED,
            messages::VACCINE_NAME_TOO_LONG,
        )?;

        if draft.applied_on > now.date_naive() {
            return Err(DomainError::validation(messages::VACCINE_DATE_IN_FUTURE));
        }
        if draft
            .next_dose_on
            .is_some_and(|next| next <= draft.applied_on)
        {
            return Err(DomainError::validation(
                messages::VACCINE_NEXT_DOSE_NOT_AFTER_APPLICATION,
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            vaccine_name,
            applied_on: draft.applied_on,
            next_dose_on: draft.next_dose_on,
            batch_number: text::optional(draft.batch_number, 50, messages::VACCINE_BATCH_TOO_LONG)?,
            veterinarian: text::optional(
                draft.veterinarian,
                100,
                messages::VETERINARIAN_TOO_LONG,
            )?,
            created_at: now,
        })
    }
}

impl PartialEq for VaccineApplication {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

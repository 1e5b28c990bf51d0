use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clinicavet_common::{DomainError, DomainResult, SortOrder, messages};
use uuid::Uuid;

use crate::{
    dewormer_application::DewormerApplication, reminder::Reminder, text,
    vaccine_application::VaccineApplication,
};

pub const NAME_MAX_CHARS: usize = 100;
pub const BREED_MAX_CHARS: usize = 50;
pub const MICROCHIP_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(DomainError::validation(format!("unknown sex '{other}'"))),
        }
    }
}

/// Unvalidated input for registering a pet.
#[derive(Debug, Clone)]
pub struct PetDraft {
    pub guardian_id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub breed: String,
    pub sex: Sex,
    pub is_castrated: bool,
    pub microchip_number: Option<String>,
    pub history: Option<String>,
}

/// A validated pet that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPet {
    pub id: Uuid,
    pub guardian_id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub breed: String,
    pub sex: Sex,
    pub is_castrated: bool,
    pub microchip_number: Option<String>,
    pub history: Option<String>,
    pub version: i64,
}

impl NewPet {
    pub fn create(draft: PetDraft, today: NaiveDate) -> DomainResult<Self> {
        let name = text::required(
            &draft.name,
            NAME_MAX_CHARS,
            messages::PET_FIELD_REQUIRED,
            messages::PET_NAME_TOO_LONG,
        )?;
        let breed = text::required(
            &draft.breed,
            BREED_MAX_CHARS,
            messages::PET_FIELD_REQUIRED,
            messages::PET_BREED_TOO_LONG,
        )?;

        if draft.birth_date > today {
            return Err(DomainError::validation(messages::PET_BIRTH_DATE_IN_FUTURE));
        }

        let microchip_number = text::optional(
            draft.microchip_number,
            MICROCHIP_MAX_CHARS,
            messages::PET_MICROCHIP_TOO_LONG,
        )?;

        Ok(Self {
            id: Uuid::new_v4(),
            guardian_id: draft.guardian_id,
            name,
            birth_date: draft.birth_date,
            breed,
            sex: draft.sex,
            is_castrated: draft.is_castrated,
            microchip_number,
            history: text::free_text(draft.history),
            version: 1,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Pet {
    pub id: Uuid,
    pub guardian_id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub breed: String,
    pub sex: Sex,
    pub is_castrated: bool,
    pub microchip_number: Option<String>,
    pub history: Option<String>,
    pub vaccine_applications: Vec<VaccineApplication>,
    pub dewormer_applications: Vec<DewormerApplication>,
    pub reminders: Vec<Reminder>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pet {
    pub fn from_new(pet: NewPet, now: DateTime<Utc>) -> Self {
        Self {
            id: pet.id,
            guardian_id: pet.guardian_id,
            name: pet.name,
            birth_date: pet.birth_date,
            breed: pet.breed,
            sex: pet.sex,
            is_castrated: pet.is_castrated,
            microchip_number: pet.microchip_number,
            history: pet.history,
            vaccine_applications: Vec::new(),
            dewormer_applications: Vec::new(),
            reminders: Vec::new(),
            version: pet.version,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whole years lived as of `today`; zero for a birth date after `today`.
    pub fn age_in_years(&self, today: NaiveDate) -> u32 {
        let birth = self.birth_date;
        if birth > today {
            return 0;
        }

        let mut years = today.year() - birth.year();
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            years -= 1;
        }
        u32::try_from(years).unwrap_or(0)
    }

    pub fn apply_patch(&mut self, patch: PetPatch) {
        if let Some(breed) = patch.breed {
            self.breed = breed;
        }
        if let Some(microchip_number) = patch.microchip_number {
            self.microchip_number = microchip_number;
        }
        if let Some(history) = patch.history {
            self.history = history;
        }
    }

    pub fn add_vaccine_application(&mut self, application: VaccineApplication) {
        self.vaccine_applications.push(application);
    }

    pub fn add_dewormer_application(&mut self, application: DewormerApplication) {
        self.dewormer_applications.push(application);
    }

    pub fn add_reminder(&mut self, reminder: Reminder) {
        self.reminders.push(reminder);
    }
}

impl PartialEq for Pet {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Pet {}

/// Changes to the mutable part of a pet.
///
/// For the clearable fields the outer `Option` says whether the field is
/// touched and the inner one carries the new value (`None` clears it).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetPatch {
    pub breed: Option<String>,
    pub microchip_number: Option<Option<String>>,
    pub history: Option<Option<String>>,
}

impl PetPatch {
    /// Trims and validates the patch. A blank breed is dropped, not rejected.
    pub fn normalize(self) -> DomainResult<Self> {
        let breed = match self.breed {
            Some(breed) if breed.trim().is_empty() => None,
            Some(breed) => Some(text::required(
                &breed,
                BREED_MAX_CHARS,
                messages::PET_FIELD_REQUIRED,
                messages::PET_BREED_TOO_LONG,
            )?),
            None => None,
        };

        let microchip_number = match self.microchip_number {
            Some(value) => Some(text::optional(
                value,
                MICROCHIP_MAX_CHARS,
                messages::PET_MICROCHIP_TOO_LONG,
            )?),
            None => None,
        };

        Ok(Self {
            breed,
            microchip_number,
            history: self.history.map(text::free_text),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.breed.is_none() && self.microchip_number.is_none() && self.history.is_none()
    }

    /// The microchip number this patch assigns, if it assigns one.
    pub fn assigned_microchip(&self) -> Option<&str> {
        self.microchip_number
            .as_ref()
            .and_then(|value| value.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PetSortBy {
    #[default]
    CreatedAt,
    Name,
    BirthDate,
}

#[derive(Debug, Clone)]
pub struct PetListQuery {
    pub page: u32,
    pub per_page: u32,
    pub guardian_id: Option<Uuid>,
    pub name_contains: Option<String>,
    pub sex: Option<Sex>,
    pub sort_by: PetSortBy,
    pub sort_order: SortOrder,
}

impl Default for PetListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            guardian_id: None,
            name_contains: None,
            sex: None,
            sort_by: PetSortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl PetListQuery {
    pub fn offset(&self) -> usize {
        let page_index = usize::try_from(self.page.saturating_sub(1)).unwrap_or(usize::MAX);
        let per_page = usize::try_from(self.per_page).unwrap_or(usize::MAX);
        page_index.saturating_mul(per_page)
    }

    pub fn matches(&self, pet: &Pet) -> bool {
        if self.guardian_id.is_some_and(|id| id != pet.guardian_id) {
            return false;
        }
        if self.sex.is_some_and(|sex| sex != pet.sex) {
            return false;
        }
        if let Some(needle) = self.name_contains.as_deref() {
            return pet.name.to_lowercase().contains(&needle.to_lowercase());
        }
        true
    }

    /// Listing order: the requested key in the requested direction, then
    /// oldest first, then by id. Names compare case-insensitively.
    pub fn compare(&self, left: &Pet, right: &Pet) -> Ordering {
        let primary = match self.sort_by {
            PetSortBy::CreatedAt => left.created_at.cmp(&right.created_at),
            PetSortBy::Name => left.name.to_lowercase().cmp(&right.name.to_lowercase()),
            PetSortBy::BirthDate => left.birth_date.cmp(&right.birth_date),
        };
        let primary = match self.sort_order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };

        primary
            .then_with(|| left.created_at.cmp(&right.created_at))
            .then_with(|| left.id.cmp(&right.id))
    }
}

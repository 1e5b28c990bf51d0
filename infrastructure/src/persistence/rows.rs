use chrono::{DateTime, NaiveDate, Utc};
use clinicavet_common::DomainError;
use clinicavet_domain::{DewormerApplication, Pet, Reminder, Sex, VaccineApplication};
use sqlx::FromRow;
use uuid::Uuid;

pub(crate) const PET_COLUMNS: &str = "pet_id, guardian_id, name, birth_date, breed, sex, \
     is_castrated, microchip_number, history, version, created_at, updated_at";

#[derive(Debug, FromRow)]
pub(crate) struct PetRow {
    pub pet_id: Uuid,
    pub guardian_id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub breed: String,
    pub sex: String,
    pub is_castrated: bool,
    pub microchip_number: Option<String>,
    pub history: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PetRow {
    pub fn into_pet(self) -> Result<Pet, DomainError> {
        let sex = self.sex.parse::<Sex>().map_err(|_| {
            DomainError::storage(format!(
                "pet {} has an unreadable sex column '{}'",
                self.pet_id, self.sex
            ))
        })?;

        Ok(Pet {
            id: self.pet_id,
            guardian_id: self.guardian_id,
            name: self.name,
            birth_date: self.birth_date,
            breed: self.breed,
            sex,
            is_castrated: self.is_castrated,
            microchip_number: self.microchip_number,
            history: self.history,
            vaccine_applications: Vec::new(),
            dewormer_applications: Vec::new(),
            reminders: Vec::new(),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct VaccineApplicationRow {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub vaccine_name: String,
    pub applied_on: NaiveDate,
    pub next_dose_on: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub veterinarian: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<VaccineApplicationRow> for (Uuid, VaccineApplication) {
    fn from(row: VaccineApplicationRow) -> Self {
        (
            row.pet_id,
            VaccineApplication {
                id: row.id,
                vaccine_name: row.vaccine_name,
                applied_on: row.applied_on,
                next_dose_on: row.next_dose_on,
                batch_number: row.batch_number,
                veterinarian: row.veterinarian,
                created_at: row.created_at,
            },
        )
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct DewormerApplicationRow {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub product_name: String,
    pub applied_on: NaiveDate,
    pub next_application_on: Option<NaiveDate>,
    pub dosage: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DewormerApplicationRow> for (Uuid, DewormerApplication) {
    fn from(row: DewormerApplicationRow) -> Self {
        (
            row.pet_id,
            DewormerApplication {
                id: row.id,
                product_name: row.product_name,
                applied_on: row.applied_on,
                next_application_on: row.next_application_on,
                dosage: row.dosage,
                created_at: row.created_at,
            },
        )
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ReminderRow {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub title: String,
    pub notes: Option<String>,
    pub remind_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<ReminderRow> for (Uuid, Reminder) {
    fn from(row: ReminderRow) -> Self {
        (
            row.pet_id,
            Reminder {
                id: row.id,
                title: row.title,
                notes: row.notes,
                remind_on: row.remind_on,
                created_at: row.created_at,
            },
        )
    }
}

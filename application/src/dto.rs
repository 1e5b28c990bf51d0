use chrono::{DateTime, NaiveDate, Utc};
use clinicavet_common::{DomainError, Page};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SexDto {
    Male,
    Female,
}

#[derive(Debug, Deserialize)]
pub struct PetRequest {
    pub guardian_id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub breed: String,
    pub sex: SexDto,
    pub is_castrated: bool,
    #[serde(default)]
    pub microchip_number: Option<String>,
    #[serde(default)]
    pub history: Option<String>,
}

/// Partial update. For `microchip_number` and `history` an explicit `null`
/// clears the value while an absent key leaves it untouched.
#[derive(Debug, Default, Deserialize)]
pub struct PetUpdateRequest {
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub microchip_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub history: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct VaccineApplicationRequest {
    pub vaccine_name: String,
    pub applied_on: NaiveDate,
    #[serde(default)]
    pub next_dose_on: Option<NaiveDate>,
    #[serde(default)]
    pub batch_number: Option<String>,
    #[serde(default)]
    pub veterinarian: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DewormerApplicationRequest {
    pub product_name: String,
    pub applied_on: NaiveDate,
    #[serde(default)]
    pub next_application_on: Option<NaiveDate>,
    #[serde(default)]
    pub dosage: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReminderRequest {
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub remind_on: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ListPetsQueryRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub guardian_id: Option<Uuid>,
    #[serde(default)]
    pub name_contains: Option<String>,
    #[serde(default)]
    pub sex: Option<SexDto>,
    #[serde(default)]
    pub sort_by: PetSortByRequest,
    #[serde(default)]
    pub order: SortOrderRequest,
}

impl Default for ListPetsQueryRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            guardian_id: None,
            name_contains: None,
            sex: None,
            sort_by: PetSortByRequest::default(),
            order: SortOrderRequest::default(),
        }
    }
}

impl ListPetsQueryRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.page == 0 {
            return Err(DomainError::validation("page must be greater than 0"));
        }
        if self.per_page == 0 || self.per_page > 100 {
            return Err(DomainError::validation(
                "per_page must be between 1 and 100",
            ));
        }
        if let Some(name_contains) = self.name_contains.as_ref()
            && name_contains.trim().is_empty()
        {
            return Err(DomainError::validation("name_contains must not be blank"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PetSortByRequest {
    #[default]
    CreatedAt,
    Name,
    BirthDate,
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrderRequest {
    #[default]
    Desc,
    Asc,
}

#[derive(Debug, Serialize)]
pub struct PetResponse {
    pub id: Uuid,
    pub guardian_id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub age_years: u32,
    pub breed: String,
    pub sex: SexDto,
    pub is_castrated: bool,
    pub microchip_number: Option<String>,
    pub history: Option<String>,
    pub vaccine_applications: Vec<VaccineApplicationResponse>,
    pub dewormer_applications: Vec<DewormerApplicationResponse>,
    pub reminders: Vec<ReminderResponse>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct VaccineApplicationResponse {
    pub id: Uuid,
    pub vaccine_name: String,
    pub applied_on: NaiveDate,
    pub next_dose_on: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub veterinarian: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DewormerApplicationResponse {
    pub id: Uuid,
    pub product_name: String,
    pub applied_on: NaiveDate,
    pub next_application_on: Option<NaiveDate>,
    pub dosage: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReminderResponse {
    pub id: Uuid,
    pub title: String,
    pub notes: Option<String>,
    pub remind_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

pub type PaginatedPetsResponse = Page<PetResponse>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

const fn default_page() -> u32 {
    1
}

const fn default_per_page() -> u32 {
    20
}

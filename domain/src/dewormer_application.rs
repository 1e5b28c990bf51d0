use chrono::{DateTime, NaiveDate, Utc};
use clinicavet_common::{DomainError, DomainResult, messages};
use uuid::Uuid;

use crate::text;

#[derive(Debug, Clone)]
pub struct DewormerApplicationDraft {
    pub product_name: String,
    pub applied_on: NaiveDate,
    pub next_application_on: Option<NaiveDate>,
    pub dosage: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DewormerApplication {
    pub id: Uuid,
    pub product_name: String,
    pub applied_on: NaiveDate,
    pub next_application_on: Option<NaiveDate>,
    pub dosage: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DewormerApplication {
    pub fn record(draft: DewormerApplicationDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        let product_name = text::required(
            &draft.product_name,
            100,
            messages::DEWORMER_FIELD_REQUIRED,
            messages::DEWORMER_NAME_TOO_LONG,
        )?;

        if draft.applied_on > now.date_naive() {
            return Err(DomainError::validation(messages::DEWORMER_DATE_IN_FUTURE));
        }
        if let Some(next) = draft.next_application_on
            && next <= draft.applied_on
        {
            return Err(DomainError::validation(
                messages::DEWORMER_NEXT_NOT_AFTER_APPLICATION,
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            product_name,
            applied_on: draft.applied_on,
            next_application_on: draft.next_application_on,
            dosage: text::optional(draft.dosage, 50, messages::DEWORMER_DOSAGE_TOO_LONG)?,
            created_at: now,
        })
    }
}

impl PartialEq for DewormerApplication {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn validates_dates() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
        let applied_on = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();

        let recorded = DewormerApplication::record(
            DewormerApplicationDraft {
                product_name: " Drontal ".to_string(),
                applied_on,
                next_application_on: NaiveDate::from_ymd_opt(2024, 8, 20),
                dosage: Some("1 tablet".to_string()),
            },
            now,
        )
        .unwrap();
        assert_eq!(recorded.product_name, "Drontal");

        let error = DewormerApplication::record(
            DewormerApplicationDraft {
                product_name: "Drontal".to_string(),
                applied_on,
                next_application_on: NaiveDate::from_ymd_opt(2024, 5, 1),
                dosage: None,
            },
            now,
        )
        .unwrap_err();
        assert_eq!(
            error,
            DomainError::validation(messages::DEWORMER_NEXT_NOT_AFTER_APPLICATION)
        );

        let error = DewormerApplication::record(
            DewormerApplicationDraft {
                product_name: "Drontal".to_string(),
                applied_on: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
                next_application_on: None,
                dosage: None,
            },
            now,
        )
        .unwrap_err();
        assert_eq!(
            error,
            DomainError::validation(messages::DEWORMER_DATE_IN_FUTURE)
        );
    }
}

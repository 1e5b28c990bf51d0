use chrono::{DateTime, NaiveDate, Utc};
use clinicavet_common::{DomainError, DomainResult, messages};
use uuid::Uuid;

use crate::text;

#[derive(Debug, Clone)]
pub struct ReminderDraft {
    pub title: String,
    pub notes: Option<String>,
    pub remind_on: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: Uuid,
    pub title: String,
    pub notes: Option<String>,
    pub remind_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// Reminders may be due today but never earlier.
    pub fn schedule(draft: ReminderDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        let title = text::required(
            &draft.title,
            100,
            messages::REMINDER_FIELD_REQUIRED,
            messages::REMINDER_TITLE_TOO_LONG,
        )?;

        if draft.remind_on < now.date_naive() {
            return Err(DomainError::validation(messages::REMINDER_DATE_IN_PAST));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            notes: text::free_text(draft.notes),
            remind_on: draft.remind_on,
            created_at: now,
        })
    }
}

impl PartialEq for Reminder {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

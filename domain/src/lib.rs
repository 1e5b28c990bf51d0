//! Domain model for pet records.
//!
//! Nothing in here knows about HTTP, SQL or serialization formats. Entities
//! validate themselves on construction and report violations as
//! [`DomainError::Validation`](clinicavet_common::DomainError).

pub mod dewormer_application;
pub mod pet;
pub mod reminder;
pub mod vaccine_application;

mod text;

pub use dewormer_application::{DewormerApplication, DewormerApplicationDraft};
pub use pet::{NewPet, Pet, PetDraft, PetListQuery, PetPatch, PetSortBy, Sex};
pub use reminder::{Reminder, ReminderDraft};
pub use vaccine_application::{VaccineApplication, VaccineApplicationDraft};

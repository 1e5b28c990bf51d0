pub mod db;
pub mod persistence;
pub mod security;

pub use persistence::{InMemoryPetRepository, PostgresPetRepository};
pub use security::CredentialVerifier;

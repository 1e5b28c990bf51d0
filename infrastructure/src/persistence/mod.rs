pub mod in_memory_pet_repository;
pub mod postgres_pet_repository;

mod rows;

pub use in_memory_pet_repository::InMemoryPetRepository;
pub use postgres_pet_repository::PostgresPetRepository;

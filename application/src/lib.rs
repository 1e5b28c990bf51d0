pub mod dto;
pub mod mapper;
pub mod pet_service;
pub mod ports;

pub use pet_service::PetService;
pub use ports::PetRepository;

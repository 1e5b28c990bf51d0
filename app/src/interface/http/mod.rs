pub mod auth;
pub mod extract;
pub mod pets_handler;
pub mod problem;

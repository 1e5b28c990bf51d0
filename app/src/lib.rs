pub mod app;
pub mod config;
pub mod interface;
pub mod state;

pub use app::build_router;

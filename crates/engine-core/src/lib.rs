pub mod cache;
pub mod context;
pub mod error;
pub mod state;

pub mod catalog;
pub mod core;
pub mod error;
pub mod pagination;
pub mod query;
pub mod records;

pub mod catalogue;
pub mod error;
pub mod form;
pub mod refresh;

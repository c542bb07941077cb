pub mod breed;
pub mod record;

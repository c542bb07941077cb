pub mod field;
pub mod operator;

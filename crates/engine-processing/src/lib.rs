pub mod error;
pub mod filter;
pub mod sort;
pub mod stats;

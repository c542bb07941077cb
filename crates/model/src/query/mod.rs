pub mod predicate;
pub mod sort;

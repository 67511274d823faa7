pub mod amortization;
pub mod summary;

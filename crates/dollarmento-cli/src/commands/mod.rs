pub mod loan;
pub mod savings;

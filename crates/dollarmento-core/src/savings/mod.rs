pub mod goals;
pub mod projection;

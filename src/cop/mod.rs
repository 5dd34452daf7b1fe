pub mod calculate;
pub mod error;
pub mod table;

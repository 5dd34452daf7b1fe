pub mod dimension;
pub mod error;
pub mod registry;
pub mod unit;

pub mod cache;
pub mod error;
pub mod loader;
pub mod request;
pub mod response;
pub mod series_builder;

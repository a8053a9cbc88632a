pub mod client;
pub mod config;
pub mod entities;
pub mod error;
pub mod graph;
pub mod types;


pub use error::ApiError;

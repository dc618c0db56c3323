pub mod config;
pub mod data_loader;
pub mod errors;
pub mod export;
pub mod services;
pub mod table;
pub mod transformations;

#[cfg(feature = "server")]
pub mod server;

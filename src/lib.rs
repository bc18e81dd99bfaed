pub mod clients;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod mock_server;
pub mod models;
pub mod multipart;
pub mod sanitize;
pub mod server;
pub mod service;
pub mod transform;
pub mod validation;

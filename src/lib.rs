pub mod api;
pub mod config;
pub mod core;
pub mod prom;
pub mod service;
pub mod utils;
pub mod verifier;

#![allow(non_snake_case)]

// Declare the modules that form the library's public API (or internal structure)
pub mod config;
pub mod data_model;
pub mod error;
pub mod handler;
pub mod pipeline;
pub mod provider;
pub mod server;
pub mod store;
pub mod utils;
pub mod warehouse;

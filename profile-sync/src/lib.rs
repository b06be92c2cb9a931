pub mod api;
pub mod builder;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;

#[cfg(test)]
pub mod mock;

// Library exports for moodmentor
// This allows integration tests and external code to use the record types and store

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod models;
pub mod state;

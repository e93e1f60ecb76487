//! Infrastructure layer - Storage, logging and service implementations

pub mod database;
pub mod logging;
pub mod user;

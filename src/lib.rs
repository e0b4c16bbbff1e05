//! Blog posts API: an in-memory post store served over iron, plus the
//! configuration shared by the API and frontend binaries.

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod model;
pub mod query;

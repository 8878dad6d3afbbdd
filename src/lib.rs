//! healthlog library
//!
//! Personal health-metrics logging: SQLite entry store, BMI and daily
//! averages, CSV exchange, PDF export and trend charts.

pub mod build_info;
pub mod chart;
pub mod config;
pub mod db;
pub mod error;
pub mod exchange;
pub mod health;
pub mod models;
pub mod settings;
pub mod tools;

pub use error::{Error, Result};

//! HTTP request handlers

pub mod analyze;
pub mod common;
pub mod health;
pub mod history;
pub mod report;

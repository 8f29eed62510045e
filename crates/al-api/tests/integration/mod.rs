//! Integration test modules.

pub mod common;
pub mod health_tests;
pub mod webtrigger_tests;

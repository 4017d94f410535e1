//! Kinopoisk Scraper Core Library
//!
//! This crate provides scraping functionality for Kinopoisk.ru, the Russian
//! film database.
//!
//! # Features
//! - Log in and reuse the session cookies on later requests
//! - Get film details with per-field selection
//! - Search films by free-text query, optionally fetching every result's details
//! - Pages decoded from windows-1251 before parsing

pub mod client;
pub mod error;
pub mod parser;
pub mod scraper;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, KinopoiskClient};
pub use error::{KinopoiskError, Result};
pub use scraper::KinopoiskScraper;
pub use types::{
    FieldSelection, FilmRecord, FilmType, SearchOptions, SearchResultEntry, SearchResults,
    SessionToken,
};

//! HTML parsers for Kinopoisk.ru pages
//!
//! This module contains parsers for extracting data from Kinopoisk HTML pages:
//! - `dom`: Shared document query helpers
//! - `film`: Parse film detail page
//! - `search`: Parse search results page

pub mod dom;
pub mod film;
pub mod search;

// Re-export main parsing functions
pub use film::{extract_film, parse_film};
pub use search::{extract_film_id, extract_search_list, parse_search_results};

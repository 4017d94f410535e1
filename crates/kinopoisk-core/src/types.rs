//! Data types for the Kinopoisk scraper
//!
//! This module contains all the core data structures used throughout the library.
//! All types implement Serialize and Deserialize; JSON keys are camelCase.

use serde::{Deserialize, Serialize};

/// Kind of title described by a detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilmType {
    /// Feature film
    Film,
    /// TV series (сериал)
    Series,
}

/// Film details extracted from a Kinopoisk detail page.
///
/// Every field apart from `id` is `Some` exactly when it was enabled in the
/// [`FieldSelection`] used for the lookup. Numeric fields hold `NaN` when the
/// page text could not be parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmRecord {
    /// Kinopoisk identifier, digits kept as text
    pub id: String,
    /// Localized (Russian) title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Original title, empty for Russian productions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_title: Option<String>,
    /// Average user rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Number of votes behind the rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<f64>,
    /// Synopsis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Film or series
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub film_type: Option<FilmType>,
    /// Leading cast
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors: Option<Vec<String>>,
    /// Release year, always integral
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer: Option<Vec<String>>,
    /// Film editors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutting: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    /// Budget as rendered, currency included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    /// Worldwide box office as rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxoffice: Option<String>,
    /// Runtime as rendered (e.g. "142 мин. / 02:22")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl FilmRecord {
    /// Create a record carrying only the id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Search result item from the Kinopoisk search page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultEntry {
    /// Kinopoisk identifier
    pub id: String,
    /// Title as listed on the search page
    pub title: String,
}

/// Which optional fields of [`FilmRecord`] to extract.
///
/// `Default` enables everything. Deserializing a partial object keeps the
/// omitted fields enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldSelection {
    pub title: bool,
    pub rating: bool,
    pub votes: bool,
    pub alternative_title: bool,
    pub description: bool,
    #[serde(rename = "type")]
    pub film_type: bool,
    pub actors: bool,
    pub year: bool,
    pub country: bool,
    pub director: bool,
    pub scenario: bool,
    pub producer: bool,
    pub operator: bool,
    pub composer: bool,
    pub cutting: bool,
    pub genre: bool,
    pub budget: bool,
    pub boxoffice: bool,
    pub time: bool,
}

impl FieldSelection {
    /// Select every field
    pub fn all() -> Self {
        Self::with_all(true)
    }

    /// Select nothing; the record will only carry its id
    pub fn none() -> Self {
        Self::with_all(false)
    }

    fn with_all(on: bool) -> Self {
        Self {
            title: on,
            rating: on,
            votes: on,
            alternative_title: on,
            description: on,
            film_type: on,
            actors: on,
            year: on,
            country: on,
            director: on,
            scenario: on,
            producer: on,
            operator: on,
            composer: on,
            cutting: on,
            genre: on,
            budget: on,
            boxoffice: on,
            time: on,
        }
    }
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Session cookies returned by a successful login.
///
/// Holds the raw `Set-Cookie` header values; pass it back to later requests
/// to fetch pages as the logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken {
    cookies: Vec<String>,
}

impl SessionToken {
    /// Wrap raw `Set-Cookie` header values
    pub fn new(cookies: Vec<String>) -> Self {
        Self { cookies }
    }

    /// Raw `Set-Cookie` header values
    pub fn cookies(&self) -> &[String] {
        &self.cookies
    }

    /// Whether the token carries no cookies at all
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// Options for [`crate::KinopoiskScraper::search`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// Maximum number of search entries to consider (default: 5)
    pub limit: usize,
    /// Fetch the detail page of every entry (default: false)
    pub parse: bool,
    /// Fields to extract when `parse` is set
    pub parsing_options: FieldSelection,
    /// Maximum detail fetches in flight; `None` runs them all at once
    pub concurrency: Option<usize>,
    /// Session to attach to every request of the search
    pub session: Option<SessionToken>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            parse: false,
            parsing_options: FieldSelection::default(),
            concurrency: None,
            session: None,
        }
    }
}

/// Outcome of a search: bare entries, or full records when parsing was requested
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchResults {
    Entries(Vec<SearchResultEntry>),
    Films(Vec<FilmRecord>),
}

impl SearchResults {
    /// Number of results
    pub fn len(&self) -> usize {
        match self {
            Self::Entries(entries) => entries.len(),
            Self::Films(films) => films.len(),
        }
    }

    /// Whether the search yielded nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

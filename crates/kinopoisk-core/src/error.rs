//! Error types for the Kinopoisk scraper
//!
//! This module defines all error types used throughout the library.
//! KinopoiskError implements Serialize so front-ends can receive it as JSON.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for Kinopoisk scraper operations
#[derive(Error, Debug)]
pub enum KinopoiskError {
    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpError(#[source] reqwest::Error),

    /// Network, DNS or timeout failure while talking to the site
    #[error("Error while \"{url}\" processing: {source}")]
    Transport {
        /// URL of the failed request
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Login endpoint rejected the credentials (HTTP 200)
    #[error("Bad credentials")]
    InvalidCredentials,

    /// Login endpoint answered with a status other than 200 or 302
    #[error("Unknown kinopoisk status code - {0}")]
    UnexpectedUpstreamStatus(u16),

    /// Detail page carried no title for the requested id
    #[error("Film with id {0} not found")]
    NotFound(String),

    /// Search result link did not match the film link pattern.
    ///
    /// Only ever reported through diagnostics; list extraction drops the entry.
    #[error("Malformed search entry link: {0}")]
    MalformedSearchEntry(String),

    /// At least one detail lookup of a parsed search failed
    #[error("Error while parsing. {0}")]
    PartialParseFailure(#[source] Box<KinopoiskError>),

    /// Film id is empty or not made of decimal digits
    #[error("Invalid Kinopoisk ID: {0}")]
    InvalidId(String),

    /// Search query is empty
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// Configured base URL cannot be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Serialize KinopoiskError as its display string
impl Serialize for KinopoiskError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for Kinopoisk scraper operations
pub type Result<T> = std::result::Result<T, KinopoiskError>;

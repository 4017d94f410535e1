//! Main Kinopoisk scraper API
//!
//! This module provides the high-level API for scraping Kinopoisk.ru.
//! It combines the HTTP client with parsers to provide a simple interface
//! for logging in, getting film details and searching.

use futures::future::try_join_all;
use futures::{stream, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::client::{ClientConfig, KinopoiskClient};
use crate::error::{KinopoiskError, Result};
use crate::parser::{parse_film, parse_search_results};
use crate::types::{
    FieldSelection, FilmRecord, SearchOptions, SearchResultEntry, SearchResults, SessionToken,
};

/// Detail page path prefix, followed by the film id
const FILM_PATH: &str = "/film/";

/// Search page path prefix, followed by the url-encoded query
const SEARCH_PATH: &str = "/s/type/film/list/1/find/";

/// Login form endpoint
const LOGIN_PATH: &str = "/login/";

/// Value of the login form's `auth` field, sent as the literal text
const LOGIN_AUTH_MARKER: &str = "%E2%EE%E9%F2%E8+%ED%E0+%F1%E0%E9%F2";

/// Main scraper API for Kinopoisk.ru
///
/// Provides methods for logging in, fetching film details and searching.
/// All operations are asynchronous and independent of each other; the
/// scraper only holds configuration and HTTP client handles.
///
/// # Example
/// ```no_run
/// use kinopoisk_core::{FieldSelection, KinopoiskScraper};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = KinopoiskScraper::new()?;
///
///     let film = scraper.get_film("326", &FieldSelection::all(), None).await?;
///     println!("{:?} ({:?})", film.title, film.year);
///
///     Ok(())
/// }
/// ```
pub struct KinopoiskScraper {
    client: KinopoiskClient,
}

impl KinopoiskScraper {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        let client = KinopoiskClient::new()?;
        Ok(Self { client })
    }

    /// Create a new scraper with custom client configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be created.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = KinopoiskClient::with_config(config)?;
        Ok(Self { client })
    }

    /// Create a new scraper with a custom client.
    pub fn with_client(client: KinopoiskClient) -> Self {
        Self { client }
    }

    /// Log in and return the session cookies.
    ///
    /// The site answers a successful login with a redirect (302) and a
    /// rejected one by re-rendering the form (200).
    ///
    /// # Returns
    /// * `Ok(SessionToken)` with the cookies set by the login response
    /// * `Err(KinopoiskError::InvalidCredentials)` if the site rejected the credentials
    /// * `Err(KinopoiskError::UnexpectedUpstreamStatus)` for any other status
    /// * `Err(KinopoiskError::Transport)` on network failure
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionToken> {
        let form = [
            ("shop_user[login]", username),
            ("shop_user[pass]", password),
            ("shop_user[mem]", "on"),
            ("auth", LOGIN_AUTH_MARKER),
        ];

        let response = self.client.post_form(LOGIN_PATH, &form).await?;
        session_from_login_response(response.status(), response.headers())
    }

    /// Get details of a film.
    ///
    /// # Arguments
    /// * `id` - Kinopoisk id of the film (decimal digits)
    /// * `selection` - Fields to extract
    /// * `session` - Optional session from [`KinopoiskScraper::login`]
    ///
    /// # Returns
    /// * `Ok(FilmRecord)` with the selected fields
    /// * `Err(KinopoiskError::InvalidId)` if `id` is not made of digits
    /// * `Err(KinopoiskError::NotFound)` if the page has no such film
    ///
    /// # Example
    /// ```no_run
    /// use kinopoisk_core::{FieldSelection, KinopoiskScraper};
    ///
    /// # async fn example() -> Result<(), kinopoisk_core::KinopoiskError> {
    /// let scraper = KinopoiskScraper::new()?;
    /// let selection = FieldSelection { title: true, year: true, ..FieldSelection::none() };
    /// let film = scraper.get_film("326", &selection, None).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_film(
        &self,
        id: &str,
        selection: &FieldSelection,
        session: Option<&SessionToken>,
    ) -> Result<FilmRecord> {
        validate_id(id)?;

        let path = format!("{}{}", FILM_PATH, id);
        let html = self.client.fetch(&path, session).await?;

        parse_film(&html, id, selection)
    }

    /// Search films, optionally fetching the details of every result.
    ///
    /// With `options.parse` unset this returns [`SearchResults::Entries`].
    /// Otherwise every entry's detail page is fetched concurrently (at most
    /// `options.concurrency` at a time) and [`SearchResults::Films`] is
    /// returned in search order.
    ///
    /// # Errors
    /// * `KinopoiskError::InvalidQuery` if the query is empty
    /// * `KinopoiskError::PartialParseFailure` if any detail lookup failed;
    ///   no partial results are returned
    ///
    /// # Example
    /// ```no_run
    /// use kinopoisk_core::{KinopoiskScraper, SearchOptions};
    ///
    /// # async fn example() -> Result<(), kinopoisk_core::KinopoiskError> {
    /// let scraper = KinopoiskScraper::new()?;
    /// let options = SearchOptions { parse: true, ..SearchOptions::default() };
    /// let results = scraper.search("The Shawshank Redemption", &options).await?;
    /// println!("Found {} results", results.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResults> {
        let session = options.session.as_ref();
        let entries = self.search_entries(query, options.limit, session).await?;

        if !options.parse {
            return Ok(SearchResults::Entries(entries));
        }

        let films = self
            .fetch_details(&entries, &options.parsing_options, options.concurrency, session)
            .await?;
        Ok(SearchResults::Films(films))
    }

    /// Search films and return at most `limit` entries.
    ///
    /// Entries with malformed links are dropped, so fewer than `limit`
    /// entries may come back even when the site lists more.
    pub async fn search_entries(
        &self,
        query: &str,
        limit: usize,
        session: Option<&SessionToken>,
    ) -> Result<Vec<SearchResultEntry>> {
        if query.trim().is_empty() {
            return Err(KinopoiskError::InvalidQuery(
                "Search query cannot be empty".to_string(),
            ));
        }

        let path = format!("{}{}", SEARCH_PATH, urlencoding::encode(query));
        let html = self.client.fetch(&path, session).await?;

        let entries = parse_search_results(&html, limit);
        debug!(query, found = entries.len(), "search parsed");
        Ok(entries)
    }

    /// Search films and fetch the details of every result.
    ///
    /// Shorthand for [`KinopoiskScraper::search`] with `parse` set and
    /// unbounded concurrency.
    pub async fn search_films(
        &self,
        query: &str,
        limit: usize,
        selection: &FieldSelection,
        session: Option<&SessionToken>,
    ) -> Result<Vec<FilmRecord>> {
        let entries = self.search_entries(query, limit, session).await?;
        self.fetch_details(&entries, selection, None, session).await
    }

    /// Fetch details for each entry, keeping the entries' order.
    async fn fetch_details(
        &self,
        entries: &[SearchResultEntry],
        selection: &FieldSelection,
        concurrency: Option<usize>,
        session: Option<&SessionToken>,
    ) -> Result<Vec<FilmRecord>> {
        let lookups = entries
            .iter()
            .map(|entry| self.get_film(&entry.id, selection, session));

        let films = match concurrency {
            Some(limit) => {
                stream::iter(lookups)
                    .buffered(limit.max(1))
                    .try_collect::<Vec<_>>()
                    .await
            }
            None => try_join_all(lookups).await,
        };

        films.map_err(|error| {
            warn!(%error, "detail lookup failed, discarding search results");
            KinopoiskError::PartialParseFailure(Box::new(error))
        })
    }
}

/// Interpret the login endpoint's answer.
fn session_from_login_response(status: StatusCode, headers: &HeaderMap) -> Result<SessionToken> {
    match status {
        StatusCode::FOUND => {
            let cookies = headers
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .map(str::to_string)
                .collect();
            Ok(SessionToken::new(cookies))
        }
        StatusCode::OK => Err(KinopoiskError::InvalidCredentials),
        other => Err(KinopoiskError::UnexpectedUpstreamStatus(other.as_u16())),
    }
}

/// Film ids are non-empty runs of decimal digits.
fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KinopoiskError::InvalidId(id.to_string()));
    }
    Ok(())
}

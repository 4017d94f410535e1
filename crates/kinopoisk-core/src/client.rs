//! HTTP client for Kinopoisk.ru
//!
//! This module wraps reqwest with the header set Kinopoisk expects from a
//! desktop browser, attaches session cookies to requests inside the site
//! origin, and decodes the windows-1251 page bodies.

use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE};
use reqwest::{redirect, Url};
use tracing::debug;

use crate::error::{KinopoiskError, Result};
use crate::types::SessionToken;

/// Base URL for Kinopoisk.ru
pub const KINOPOISK_BASE_URL: &str = "http://www.kinopoisk.ru";

/// Desktop browser User-Agent; other agents get a different page layout
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/35.0.1916.114 Safari/537.36";

/// Accept-Language header for Russian content
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.8,en-US;q=0.6,en;q=0.4";

/// Configuration for the Kinopoisk HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site origin all paths are resolved against (default: Kinopoisk.ru)
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: KINOPOISK_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// HTTP client for Kinopoisk.ru
///
/// Pages are fetched with a plain GET; the status code is not interpreted
/// because the site answers missing films with a regular page. Form posts
/// go through a second client that does not follow redirects, so the login
/// redirect stays observable.
pub struct KinopoiskClient {
    /// Client for page fetches
    client: reqwest::Client,
    /// Client for form posts, redirects disabled
    form_client: reqwest::Client,
    /// Site origin
    base_url: Url,
}

impl KinopoiskClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// - `KinopoiskError::InvalidUrl` - `base_url` is not an absolute URL
    /// - `KinopoiskError::HttpError` - the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| KinopoiskError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(KinopoiskError::InvalidUrl(config.base_url));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Self::builder(timeout)
            .build()
            .map_err(KinopoiskError::HttpError)?;
        let form_client = Self::builder(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(KinopoiskError::HttpError)?;

        Ok(Self {
            client,
            form_client,
            base_url,
        })
    }

    fn builder(timeout: Duration) -> reqwest::ClientBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
        );

        reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
    }

    /// Site origin all paths are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a site path (e.g. "/film/326") to an absolute URL
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| KinopoiskError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Fetch a page by site path and return its decoded text
    ///
    /// # Errors
    /// - `KinopoiskError::InvalidUrl` - the path cannot be resolved
    /// - `KinopoiskError::Transport` - network failure
    pub async fn fetch(&self, path: &str, session: Option<&SessionToken>) -> Result<String> {
        let url = self.url(path)?;
        self.fetch_page(&url, session).await
    }

    /// Fetch an absolute URL and return its body decoded from windows-1251
    ///
    /// # Errors
    /// - `KinopoiskError::Transport` - network failure or unreadable body
    pub async fn fetch_page(&self, url: &Url, session: Option<&SessionToken>) -> Result<String> {
        debug!(%url, authenticated = session.is_some(), "fetching page");

        let mut request = self.client.get(url.clone());
        if let Some(cookies) = session.and_then(|s| session_cookies(&self.base_url, url, s)) {
            request = request.header(COOKIE, cookies);
        }

        let transport = |source| KinopoiskError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let body = response.bytes().await.map_err(transport)?;

        Ok(decode_windows_1251(&body))
    }

    /// Post a url-encoded form without following redirects
    ///
    /// # Errors
    /// - `KinopoiskError::InvalidUrl` - the path cannot be resolved
    /// - `KinopoiskError::Transport` - network failure
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<reqwest::Response> {
        let url = self.url(path)?;
        debug!(%url, "posting form");

        self.form_client
            .post(url.clone())
            .form(form)
            .send()
            .await
            .map_err(|source| KinopoiskError::Transport {
                url: url.to_string(),
                source,
            })
    }
}

/// Decode a page body from the site's windows-1251 encoding.
///
/// The declared charset is ignored; label matching relies on this exact code page.
pub fn decode_windows_1251(bytes: &[u8]) -> String {
    let (text, _) = encoding_rs::WINDOWS_1251.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Build the Cookie header a browser would send to `target` after receiving
/// the session's `Set-Cookie` headers from `origin`.
fn session_cookies(origin: &Url, target: &Url, session: &SessionToken) -> Option<HeaderValue> {
    let jar = Jar::default();
    for cookie in session.cookies() {
        jar.add_cookie_str(cookie, origin);
    }
    jar.cookies(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(cookies: &[&str]) -> SessionToken {
        SessionToken::new(cookies.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://www.kinopoisk.ru");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_client_creation() {
        let client = KinopoiskClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_invalid_base_url() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        match KinopoiskClient::with_config(config) {
            Err(KinopoiskError::InvalidUrl(msg)) => assert!(msg.contains("not a url")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_url_resolution() {
        let client = KinopoiskClient::new().unwrap();
        assert_eq!(
            client.url("/film/326").unwrap().as_str(),
            "http://www.kinopoisk.ru/film/326"
        );
        assert_eq!(
            client.url("/login/").unwrap().as_str(),
            "http://www.kinopoisk.ru/login/"
        );
    }

    #[test]
    fn test_decode_windows_1251() {
        // "жанр" in windows-1251
        let bytes = [0xE6, 0xE0, 0xED, 0xF0];
        assert_eq!(decode_windows_1251(&bytes), "жанр");
    }

    #[test]
    fn test_decode_windows_1251_mixed_ascii() {
        let (encoded, _, _) = encoding_rs::WINDOWS_1251.encode("<td>режиссер</td>");
        assert_eq!(decode_windows_1251(&encoded), "<td>режиссер</td>");
    }

    #[test]
    fn test_session_cookies_same_origin() {
        let origin = Url::parse("http://www.kinopoisk.ru/").unwrap();
        let target = Url::parse("http://www.kinopoisk.ru/film/326").unwrap();
        let session = token(&["PHPSESSID=abc; path=/", "user_country=ru; path=/"]);

        let header = session_cookies(&origin, &target, &session).unwrap();
        let value = header.to_str().unwrap();
        assert!(value.contains("PHPSESSID=abc"));
        assert!(value.contains("user_country=ru"));
    }

    #[test]
    fn test_session_cookies_other_host() {
        let origin = Url::parse("http://www.kinopoisk.ru/").unwrap();
        let target = Url::parse("http://example.com/film/326").unwrap();
        let session = token(&["PHPSESSID=abc; path=/"]);

        assert!(session_cookies(&origin, &target, &session).is_none());
    }

    #[test]
    fn test_session_cookies_empty_token() {
        let origin = Url::parse("http://www.kinopoisk.ru/").unwrap();
        assert!(session_cookies(&origin, &origin, &SessionToken::default()).is_none());
    }
}

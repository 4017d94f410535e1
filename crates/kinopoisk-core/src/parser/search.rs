//! Search results parser for Kinopoisk.ru
//!
//! Parses HTML from search results pages to extract film ids and titles.

use scraper::{Html, Selector};
use tracing::warn;

use crate::error::KinopoiskError;
use crate::types::SearchResultEntry;

use super::dom::first_text_node;

/// Film links inside the search results block
const RESULT_LINK_SELECTOR: &str = r#".search_results .info a[href^="/level"]"#;

/// Extract the film id from a search result link.
///
/// Search links look like `/level/1/film/{id}/sr/1/`.
///
/// # Examples
/// ```
/// use kinopoisk_core::parser::extract_film_id;
///
/// assert_eq!(extract_film_id("/level/1/film/326/sr/1/"), Some("326".to_string()));
/// assert_eq!(extract_film_id("/level/1/people/326/"), None);
/// ```
pub fn extract_film_id(href: &str) -> Option<String> {
    let re = regex_lite::Regex::new(r"/film/(\d+)/sr/").ok()?;
    let caps = re.captures(href)?;
    Some(caps.get(1)?.as_str().to_string())
}

/// Parse up to `limit` search entries from search page HTML.
pub fn parse_search_results(html: &str, limit: usize) -> Vec<SearchResultEntry> {
    let document = Html::parse_document(html);
    extract_search_list(&document, limit)
}

/// Extract up to `limit` search entries from a parsed search page.
///
/// The first `limit` result links are taken in document order. Links whose
/// target does not carry a film id are dropped (and logged), so the result
/// can be shorter than `limit` even when the page lists more films.
pub fn extract_search_list(document: &Html, limit: usize) -> Vec<SearchResultEntry> {
    let Ok(selector) = Selector::parse(RESULT_LINK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .take(limit)
        .filter_map(|link| {
            let href = link.value().attr("href").unwrap_or_default();
            match extract_film_id(href) {
                Some(id) => Some(SearchResultEntry {
                    id,
                    title: first_text_node(&link).unwrap_or_default(),
                }),
                None => {
                    let error = KinopoiskError::MalformedSearchEntry(href.to_string());
                    warn!(%error, "dropping search entry");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    const RESULTS: &str = r#"
        <html>
        <body>
            <div class="search_results">
                <div class="element most_wanted">
                    <div class="info">
                        <p class="name"><a href="/level/1/film/326/sr/1/" data-id="326">Побег из Шоушенка</a> <span class="year">1994</span></p>
                    </div>
                </div>
                <div class="element">
                    <div class="info">
                        <p class="name"><a href="/level/1/film/1047883/sr/1/">Побег из Шоушенка: Надежда</a></p>
                        <span class="gray"><a href="/level/4/people/25584/">Стивен Кинг</a></span>
                    </div>
                </div>
                <div class="element">
                    <div class="info">
                        <p class="name"><a href="/level/1/film/0042/sr/1/">Шоушенк</a></p>
                    </div>
                </div>
            </div>
            <div class="info"><a href="/level/1/film/111/sr/1/">Outside results</a></div>
        </body>
        </html>
    "#;

    #[test]
    fn test_extract_film_id() {
        assert_eq!(extract_film_id("/level/1/film/326/sr/1/"), Some("326".to_string()));
        assert_eq!(
            extract_film_id("/level/1/film/738950/sr/2/"),
            Some("738950".to_string())
        );
    }

    #[test]
    fn test_extract_film_id_keeps_leading_zeros() {
        assert_eq!(extract_film_id("/level/1/film/0042/sr/1/"), Some("0042".to_string()));
    }

    #[test]
    fn test_extract_film_id_invalid() {
        assert_eq!(extract_film_id("/level/4/people/25584/"), None);
        assert_eq!(extract_film_id("/level/1/film/326/"), None);
        assert_eq!(extract_film_id("/level/1/film/abc/sr/1/"), None);
        assert_eq!(extract_film_id(""), None);
    }

    #[test]
    fn test_parse_search_results() {
        let results = parse_search_results(RESULTS, 5);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, "326");
        assert_eq!(results[0].title, "Побег из Шоушенка");
        assert_eq!(results[1].id, "1047883");
        assert_eq!(results[2].id, "0042");
    }

    #[test]
    fn test_parse_search_results_limit() {
        let results = parse_search_results(RESULTS, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "326");

        assert!(parse_search_results(RESULTS, 0).is_empty());
    }

    #[test]
    fn test_malformed_links_count_towards_limit() {
        // The people link matches the selector but carries no film id
        let results = parse_search_results(RESULTS, 3);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].id, "1047883");
    }

    #[test]
    fn test_malformed_link_is_logged() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let results =
            tracing::subscriber::with_default(subscriber, || parse_search_results(RESULTS, 5));

        assert_eq!(results.len(), 3);
        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("dropping search entry"));
        assert!(output.contains("Malformed search entry link: /level/4/people/25584/"));
    }

    #[test]
    fn test_parse_empty_html() {
        let results = parse_search_results("<html><body></body></html>", 5);
        assert!(results.is_empty());
    }
}

//! Film detail parser for Kinopoisk.ru
//!
//! Parses HTML from film detail pages (`/film/{id}`) into a [`FilmRecord`],
//! extracting only the fields enabled in a [`FieldSelection`].

use scraper::{Html, Selector};

use crate::error::{KinopoiskError, Result};
use crate::types::{FieldSelection, FilmRecord, FilmType};

use super::dom::{
    first_text_node, labeled_cells, parse_float_prefix, parse_int_prefix, select_first,
    select_text,
};

// Info table labels, verbatim as rendered by the site.
const LABEL_YEAR: &str = "год";
const LABEL_COUNTRY: &str = "страна";
const LABEL_DIRECTOR: &str = "режиссер";
const LABEL_SCENARIO: &str = "сценарий";
const LABEL_PRODUCER: &str = "продюсер";
const LABEL_OPERATOR: &str = "оператор";
const LABEL_COMPOSER: &str = "композитор";
const LABEL_CUTTING: &str = "монтаж";
const LABEL_GENRE: &str = "жанр";
const LABEL_BUDGET: &str = "бюджет";
const LABEL_BOXOFFICE: &str = "сборы в мире";

/// Marker in the title block identifying a TV series
const SERIES_MARKER: &str = "сериал";

/// Link captions the site appends to value cells ("...слова", "...сборы")
const TRAILING_SUFFIXES: [&str; 2] = ["слова", "сборы"];

/// Entries standing in for truncated or empty lists
const PLACEHOLDERS: [&str; 2] = ["...", "-"];

/// Parse a film record from detail page HTML.
///
/// # Arguments
/// * `html` - Decoded HTML content of the detail page
/// * `id` - Kinopoisk id of the film (copied into the result)
/// * `selection` - Fields to extract
///
/// # Returns
/// * `Ok(FilmRecord)` with the selected fields
/// * `Err(KinopoiskError::NotFound)` if the page has no title
pub fn parse_film(html: &str, id: &str, selection: &FieldSelection) -> Result<FilmRecord> {
    let document = Html::parse_document(html);
    extract_film(&document, id, selection)
}

/// Extract a film record from a parsed detail page.
///
/// The site serves missing films as a regular page, so a missing title is
/// the only not-found signal. Individual fields never fail: missing text
/// becomes an empty string, empty list or `NaN`.
pub fn extract_film(document: &Html, id: &str, selection: &FieldSelection) -> Result<FilmRecord> {
    let title = extract_title(document).ok_or_else(|| KinopoiskError::NotFound(id.to_string()))?;

    let mut record = FilmRecord::new(id);

    if selection.title {
        record.title = Some(title);
    }
    if selection.rating {
        record.rating = Some(parse_float_prefix(&select_text(document, "span.rating_ball")));
    }
    if selection.votes {
        record.votes = Some(parse_votes(&select_text(document, "span.ratingCount")));
    }
    if selection.alternative_title {
        record.alternative_title = Some(select_text(
            document,
            r#"#headerFilm span[itemprop="alternativeHeadline"]"#,
        ));
    }
    if selection.description {
        record.description = Some(select_text(
            document,
            r#".brand_words[itemprop="description"]"#,
        ));
    }
    if selection.actors {
        record.actors = Some(extract_actors(document));
    }
    if selection.year {
        record.year = Some(parse_int_prefix(&labeled_link_text(document, LABEL_YEAR)));
    }
    if selection.country {
        record.country = Some(labeled_list(document, LABEL_COUNTRY));
    }
    if selection.director {
        record.director = Some(labeled_list(document, LABEL_DIRECTOR));
    }
    if selection.scenario {
        record.scenario = Some(labeled_list(document, LABEL_SCENARIO));
    }
    if selection.producer {
        record.producer = Some(labeled_list(document, LABEL_PRODUCER));
    }
    if selection.operator {
        record.operator = Some(labeled_list(document, LABEL_OPERATOR));
    }
    if selection.composer {
        record.composer = Some(labeled_list(document, LABEL_COMPOSER));
    }
    if selection.cutting {
        record.cutting = Some(labeled_list(document, LABEL_CUTTING));
    }
    if selection.genre {
        record.genre = Some(labeled_list(document, LABEL_GENRE));
    }
    if selection.budget {
        record.budget = Some(labeled_link_text(document, LABEL_BUDGET));
    }
    if selection.boxoffice {
        record.boxoffice = Some(labeled_link_text(document, LABEL_BOXOFFICE));
    }
    if selection.time {
        record.time = Some(select_text(document, ".time"));
    }
    if selection.film_type {
        record.film_type = Some(extract_type(document));
    }

    Ok(record)
}

/// Extract the localized title from the header block.
fn extract_title(document: &Html) -> Option<String> {
    let header = select_first(document, "#headerFilm .moviename-big")?;
    let title = first_text_node(&header)?.trim().to_string();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Film or series, judged by the marker span inside the title.
fn extract_type(document: &Html) -> FilmType {
    if select_text(document, "#headerFilm .moviename-big span").contains(SERIES_MARKER) {
        FilmType::Series
    } else {
        FilmType::Film
    }
}

/// Parse the vote count, ignoring thousands separators.
pub(crate) fn parse_votes(text: &str) -> f64 {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    parse_float_prefix(&digits)
}

/// Extract the cast list from the actor sidebar.
fn extract_actors(document: &Html) -> Vec<String> {
    let Some(list) = select_first(document, "#actorList ul") else {
        return Vec::new();
    };
    let Ok(selector) = Selector::parse(r#"li[itemprop="actors"] a"#) else {
        return Vec::new();
    };

    list.select(&selector)
        .map(|link| first_text_node(&link).unwrap_or_default())
        .filter(|name| name != "...")
        .collect()
}

/// Text of the first link in the value cells of a labeled row.
fn labeled_link_text(document: &Html, label: &str) -> String {
    let Ok(link_selector) = Selector::parse("a") else {
        return String::new();
    };

    labeled_cells(document, label)
        .iter()
        .find_map(|cell| cell.select(&link_selector).next())
        .map(|link| link.text().collect())
        .unwrap_or_default()
}

/// Comma-separated values of a labeled row, cleaned and without placeholders.
fn labeled_list(document: &Html, label: &str) -> Vec<String> {
    let text: String = labeled_cells(document, label)
        .iter()
        .flat_map(|cell| cell.text())
        .collect();
    split_list(&text)
}

/// Split a value cell's text on ", " and clean each entry.
///
/// Placeholders (`...`, `-`) and entries left empty after cleaning are
/// dropped, e.g. a trailing keyword link captioned `слова`. A missing row
/// therefore yields an empty list rather than `[""]`.
pub(crate) fn split_list(text: &str) -> Vec<String> {
    text.split(", ")
        .map(clean_entry)
        .filter(|entry| !entry.is_empty() && !PLACEHOLDERS.contains(&entry.as_str()))
        .collect()
}

/// Drop line breaks and the trailing link captions at each line end, then trim.
fn clean_entry(entry: &str) -> String {
    entry
        .split(['\r', '\n'])
        .map(|line| {
            TRAILING_SUFFIXES
                .iter()
                .find_map(|suffix| line.strip_suffix(*suffix))
                .unwrap_or(line)
        })
        .collect::<String>()
        .trim()
        .to_string()
}

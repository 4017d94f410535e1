//! Document query helpers shared by the page parsers.

use scraper::{ElementRef, Html, Selector};

/// Concatenated text of every element matching `css`, empty if none match.
pub fn select_text(document: &Html, css: &str) -> String {
    match Selector::parse(css) {
        Ok(selector) => document
            .select(&selector)
            .flat_map(|el| el.text())
            .collect(),
        Err(_) => String::new(),
    }
}

/// First element matching `css`.
pub fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

/// Text of the element's first child node, if that child is a text node.
///
/// Nested markup is ignored, so `<h1>Title <span>(сериал)</span></h1>`
/// yields `"Title "`.
pub fn first_text_node(element: &ElementRef) -> Option<String> {
    let child = element.children().next()?;
    child.value().as_text().map(|text| text.text.to_string())
}

/// Value cells of the `#infoTable` rows labeled `label`.
///
/// A row matches when one of its cells reads exactly `label` (ignoring
/// surrounding whitespace); every cell after it is a value cell.
pub fn labeled_cells<'a>(document: &'a Html, label: &str) -> Vec<ElementRef<'a>> {
    let Ok(row_selector) = Selector::parse("#infoTable tr") else {
        return Vec::new();
    };

    let mut values = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<ElementRef> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "td")
            .collect();

        if let Some(pos) = cells
            .iter()
            .position(|cell| cell.text().collect::<String>().trim() == label)
        {
            values.extend_from_slice(&cells[pos + 1..]);
        }
    }
    values
}

/// Parse the leading decimal number of `text`, `NaN` if there is none.
///
/// Trailing garbage is ignored: `"8.9 (12)"` parses as `8.9`.
pub fn parse_float_prefix(text: &str) -> f64 {
    leading_number(text, r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
}

/// Parse the leading integer of `text`, `NaN` if there is none.
pub fn parse_int_prefix(text: &str) -> f64 {
    leading_number(text, r"^[+-]?\d+")
}

fn leading_number(text: &str, pattern: &str) -> f64 {
    let Ok(re) = regex_lite::Regex::new(pattern) else {
        return f64::NAN;
    };
    re.find(text.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

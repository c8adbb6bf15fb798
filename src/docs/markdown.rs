//! HTML → Markdown flattening for documentation pages.
//!
//! `scraper` narrows the page to its content region and drops page chrome;
//! `html2md` does the conversion.

use scraper::{Html, Selector};

const TITLE_SUFFIX: &str = " | Kubernetes";
const CHROME: &str = "script, style, noscript, nav, iframe, svg";

/// Page title with the site suffix removed. `None` when missing or blank.
pub(crate) fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").expect("valid title selector");
    let raw = document.select(&selector).next()?.text().collect::<String>();
    let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let title = title.strip_suffix(TITLE_SUFFIX).unwrap_or(&title).trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Convert the page's `<main>` region (or `<body>` when absent) to Markdown.
pub(crate) fn main_content_markdown(document: &Html) -> String {
    let mut document = document.clone();
    strip_chrome(&mut document);

    let main = Selector::parse("main").expect("valid main selector");
    let body = Selector::parse("body").expect("valid body selector");
    let region = document
        .select(&main)
        .next()
        .or_else(|| document.select(&body).next())
        .unwrap_or_else(|| document.root_element());

    html2md::parse_html(&region.inner_html()).trim().to_string()
}

/// Convenience wrapper used by tests and the fetch path.
pub fn html_to_markdown(html: &str) -> String {
    main_content_markdown(&Html::parse_document(html))
}

fn strip_chrome(document: &mut Html) {
    let selector = Selector::parse(CHROME).expect("valid chrome selector");
    let ids: Vec<_> = document.select(&selector).map(|element| element.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

//! Publish-date extraction from page metadata
//!
//! Sources are consulted in priority order and the first usable value wins:
//! 1. JSON-LD blocks (`datePublished`, else the last `dateCreated`/`dateModified`)
//! 2. `<time itemprop="datePublished">` (the `datetime` attribute, else its text)
//! 3. `<meta>` tags (`article:published_time`, then `datePublished`,
//!    `dateCreated`, `dateModified`)

use scraper::{Html, Selector};
use serde_json::Value;

/// Where a publish-date hint was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSource {
    /// `application/ld+json` script block
    JsonLd,
    /// `<time itemprop="datePublished">` element
    TimeElement,
    /// `<meta>` tag
    MetaTag,
}

/// Raw publish-date string pulled from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedDateHint {
    /// The value as written in the markup
    pub value: String,
    /// Where it came from
    pub source: MetadataSource,
}

const META_PROPERTIES: &[&str] = &["article:published_time"];
const META_NAMES: &[&str] = &["datePublished", "dateCreated", "dateModified"];

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Find the most authoritative publish date declared by a page
///
/// # Examples
///
/// ```
/// use gleaner_gatekeeper::{extract_published_date, MetadataSource};
///
/// let html = r#"<html><head>
///   <meta property="article:published_time" content="2025-02-24T09:30:00+09:00">
/// </head></html>"#;
/// let hint = extract_published_date(html).unwrap();
/// assert_eq!(hint.source, MetadataSource::MetaTag);
/// assert_eq!(hint.value, "2025-02-24T09:30:00+09:00");
/// ```
pub fn extract_published_date(html: &str) -> Option<PublishedDateHint> {
    let doc = Html::parse_document(html);

    from_json_ld(&doc)
        .map(|value| PublishedDateHint { value, source: MetadataSource::JsonLd })
        .or_else(|| {
            from_time_element(&doc)
                .map(|value| PublishedDateHint { value, source: MetadataSource::TimeElement })
        })
        .or_else(|| {
            from_meta(&doc).map(|value| PublishedDateHint { value, source: MetadataSource::MetaTag })
        })
}

fn from_json_ld(doc: &Html) -> Option<String> {
    let sel = selector(r#"script[type="application/ld+json"]"#)?;
    let mut fallback = None;

    for script in doc.select(&sel) {
        let text = script.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(text.trim()) else {
            continue;
        };
        for object in json_ld_objects(&value) {
            if let Some(published) = string_field(object, "datePublished") {
                return Some(published);
            }
            let date = string_field(object, "dateCreated")
                .or_else(|| string_field(object, "dateModified"));
            if date.is_some() {
                fallback = date;
            }
        }
    }

    fallback
}

/// Top-level objects of a JSON-LD block, flattening arrays and `@graph`
fn json_ld_objects(value: &Value) -> Vec<&serde_json::Map<String, Value>> {
    match value {
        Value::Array(items) => items.iter().flat_map(json_ld_objects).collect(),
        Value::Object(map) => {
            let mut objects = vec![map];
            if let Some(graph) = map.get("@graph") {
                objects.extend(json_ld_objects(graph));
            }
            objects
        }
        _ => Vec::new(),
    }
}

fn string_field(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn from_time_element(doc: &Html) -> Option<String> {
    let sel = selector("time[itemprop]")?;

    for time in doc.select(&sel) {
        let is_published = time
            .value()
            .attr("itemprop")
            .is_some_and(|prop| prop.eq_ignore_ascii_case("datePublished"));
        if !is_published {
            continue;
        }

        if let Some(datetime) = time.value().attr("datetime").map(str::trim) {
            if !datetime.is_empty() {
                return Some(datetime.to_string());
            }
        }

        // Text may carry a label such as "公開日: 2025-02-24"; keep from the first digit.
        let text = time.text().collect::<String>();
        let text = text.trim();
        if let Some(start) = text.find(|c: char| c.is_ascii_digit()) {
            return Some(text[start..].trim().to_string());
        }
    }

    None
}

fn from_meta(doc: &Html) -> Option<String> {
    let by_property = META_PROPERTIES
        .iter()
        .map(|p| format!(r#"meta[property="{}"]"#, p));
    let by_name = META_NAMES.iter().map(|n| format!(r#"meta[name="{}"]"#, n));

    for css in by_property.chain(by_name) {
        let Some(sel) = selector(&css) else {
            continue;
        };
        let content = doc
            .select(&sel)
            .filter_map(|m| m.value().attr("content"))
            .map(str::trim)
            .find(|c| !c.is_empty());
        if let Some(content) = content {
            return Some(content.to_string());
        }
    }

    None
}

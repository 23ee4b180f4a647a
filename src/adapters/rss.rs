//! ESPN RSS news adapter.

use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::adapters::text::{classify_headline, parse_timestamp, relative_age, truncate_details, NEWS_SECTION_URL};
use crate::types::{AdapterError, NewsItem};
use crate::upstream::{Provider, RawPayload};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

/// Named HTML entities that are not valid XML.
fn scrub_html_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

/// Drop inline markup from a description.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn news(raw: &RawPayload, now: DateTime<Utc>) -> Result<Vec<NewsItem>, AdapterError> {
    let xml = raw.as_text().ok_or(AdapterError::WrongFormat {
        provider: Provider::EspnRss.name(),
        expected: "XML",
    })?;
    let rss: Rss = from_str(&scrub_html_entities(xml))
        .map_err(|e| AdapterError::shape(Provider::EspnRss.name(), e.to_string()))?;

    Ok(rss
        .channel
        .items
        .into_iter()
        .filter_map(|item| {
            let headline = item.title.as_deref().map(str::trim).unwrap_or_default().to_string();
            if headline.is_empty() {
                return None;
            }
            let link = item
                .link
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| NEWS_SECTION_URL.to_string());
            Some(NewsItem {
                kind: classify_headline(&headline),
                details: truncate_details(&strip_tags(item.description.as_deref().unwrap_or_default())),
                time: relative_age(item.pub_date.as_deref().and_then(parse_timestamp), now),
                headline,
                link,
            })
        })
        .collect())
}

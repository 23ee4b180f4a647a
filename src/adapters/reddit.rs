//! Reddit listing adapter (`/r/<sub>/<sort>.json`).

use serde_json::Value;

use crate::adapters::text::format_count;
use crate::adapters::{json_payload, stat_u32, str_at};
use crate::types::{AdapterError, SocialPost};
use crate::upstream::{Provider, RawPayload};

const PLATFORM: &str = "reddit";
const SITE: &str = "https://www.reddit.com";

fn permalink(path: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{SITE}{path}")
    }
}

/// Listing children as posts. Pinned moderator threads are skipped.
pub fn posts(raw: &RawPayload) -> Result<Vec<SocialPost>, AdapterError> {
    let payload = json_payload(Provider::Reddit, raw)?;
    let children = payload
        .pointer("/data/children")
        .and_then(Value::as_array)
        .ok_or_else(|| AdapterError::shape(PLATFORM, "no data.children listing"))?;

    Ok(children
        .iter()
        .filter_map(|child| child.get("data"))
        .filter(|post| post.get("stickied").and_then(Value::as_bool) != Some(true))
        .filter_map(|post| {
            let content = str_at(post, "/title");
            if content.is_empty() {
                return None;
            }
            let author = match str_at(post, "/author") {
                a if a.is_empty() => "[deleted]".to_string(),
                a => format!("u/{a}"),
            };
            let likes = post
                .get("ups")
                .or_else(|| post.get("score"))
                .map(stat_u32)
                .unwrap_or(0);
            let comments = post.get("num_comments").map(stat_u32).unwrap_or(0);
            Some(SocialPost {
                id: str_at(post, "/id"),
                platform: PLATFORM.to_string(),
                author,
                content,
                likes: format_count(likes as u64),
                comments: format_count(comments as u64),
                link: permalink(&str_at(post, "/permalink")),
            })
        })
        .collect())
}

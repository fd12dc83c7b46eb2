//! Blog posts.
//!
//! Post bodies are Markdown long-text fields, rendered to HTML at mapping
//! time. Raw HTML embedded in the Markdown is not passed through.

use chrono::{DateTime, Utc};
use coachsite_core::{BLOG_POST, EntryId};
use comrak::{Options, markdown_to_html};
use serde::Serialize;

use super::{ContentDomain, FeaturedDomain, SluggedDomain, SortOrder};
use crate::cache::CacheTier;
use crate::mapper::FieldReader;

const WORDS_PER_MINUTE: f32 = 200.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogPost {
    pub id: EntryId,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    /// Markdown source
    pub body: String,
    pub body_html: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub published_at: Option<DateTime<Utc>>,
    pub featured: bool,
    pub reading_time_minutes: u32,
}

/// The `blogPost` content type, newest first.
#[derive(Debug, Clone, Copy)]
pub struct BlogPosts;

impl ContentDomain for BlogPosts {
    type Record = BlogPost;

    const NAME: &'static str = "blog-posts";
    const CONTENT_TYPE: &'static str = BLOG_POST;
    const SORT: SortOrder = SortOrder::Descending("fields.publishedAt");
    const CACHE_TIER: CacheTier = CacheTier::Standard;

    fn map_entry(reader: &FieldReader<'_>) -> BlogPost {
        let body = reader.text("body");
        BlogPost {
            id: reader.id(),
            title: reader.text("title"),
            slug: reader.text("slug"),
            excerpt: reader.text("excerpt"),
            body_html: render_markdown(&body),
            reading_time_minutes: reading_time_minutes(&body),
            body,
            cover_image: reader.asset_url("coverImage"),
            author: reader.text("author"),
            published_at: reader.date("publishedAt"),
            featured: reader.flag("featured"),
        }
    }
}

impl FeaturedDomain for BlogPosts {}
impl SluggedDomain for BlogPosts {}

fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    markdown_to_html(content, &options)
}

/// Estimated reading time at 200 words per minute, at least one minute.
fn reading_time_minutes(content: &str) -> u32 {
    let word_count = content.split_whitespace().count();
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let minutes = ((word_count as f32) / WORDS_PER_MINUTE).ceil() as u32;
    minutes.max(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coachsite_core::EntryCollection;
    use serde_json::json;

    use super::*;
    use crate::mapper::map_domain;

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time_minutes(""), 1);
        assert_eq!(reading_time_minutes(&"word ".repeat(200)), 1);
        assert_eq!(reading_time_minutes(&"word ".repeat(201)), 2);
    }

    #[test]
    fn test_markdown_rendering_escapes_raw_html() {
        let html = render_markdown("# Hello\n\n<script>alert(1)</script>\n\n~~old~~");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn test_maps_post() {
        let collection: EntryCollection = serde_json::from_value(json!({
            "items": [{
                "sys": {"id": "p1"},
                "fields": {
                    "title": "Finding focus",
                    "slug": "finding-focus",
                    "body": "Some **bold** advice.",
                    "publishedAt": "2025-02-10"
                }
            }]
        }))
        .unwrap();

        let post = map_domain::<BlogPosts>(Some(&collection)).remove(0);
        assert_eq!(post.slug, "finding-focus");
        assert!(post.body_html.contains("<strong>bold</strong>"));
        assert_eq!(post.reading_time_minutes, 1);
        assert!(post.published_at.is_some());
        assert_eq!(post.cover_image, None);
        assert_eq!(post.author, "");
        assert!(!post.featured);
    }
}

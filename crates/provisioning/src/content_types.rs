//! Content-type schemas as first created by the migrations.
//!
//! Field ids here are the ones the read path maps. Later edits (see
//! `migrations`) are not reflected; use
//! [`crate::migrations::resolved_schemas`] for the current shape.

use coachsite_core::{
    BLOG_POST, CLIENT, EVENT, RESULT, SERVICE, TEAM_MEMBER, TESTIMONIAL, WHY_CHOOSE_US,
};

use crate::schema::{
    ContentTypeSchema, EditorWidget, FieldKind, FieldSchema, SLUG_PATTERN, URL_PATTERN, Validation,
};

fn title(max: u64) -> FieldSchema {
    FieldSchema::new("title", "Title", FieldKind::ShortText)
        .required()
        .validation(Validation::size(Some(1), Some(max)))
}

fn slug() -> FieldSchema {
    FieldSchema::new("slug", "Slug", FieldKind::ShortText)
        .required()
        .validation(Validation::unique())
        .validation(
            Validation::regexp(SLUG_PATTERN).message("Lowercase letters, digits and hyphens only"),
        )
        .widget(EditorWidget::SlugEditor)
}

fn url(id: &str, name: &str) -> FieldSchema {
    FieldSchema::new(id, name, FieldKind::ShortText)
        .validation(Validation::regexp(URL_PATTERN).message("Must be a full http(s) URL"))
        .widget(EditorWidget::UrlEditor)
}

fn image(id: &str, name: &str) -> FieldSchema {
    FieldSchema::new(id, name, FieldKind::AssetLink)
        .validation(Validation::mime_types(&["image"]))
        .widget(EditorWidget::AssetLinkEditor)
}

fn featured() -> FieldSchema {
    FieldSchema::new("featured", "Featured", FieldKind::Boolean)
        .widget(EditorWidget::Boolean)
        .help_text("Show in featured sections")
}

fn order() -> FieldSchema {
    FieldSchema::new("order", "Order", FieldKind::Integer)
        .validation(Validation::range(Some(0), Some(999)))
        .widget(EditorWidget::NumberEditor)
        .help_text("Lower numbers appear first; empty sorts last")
}

fn long_text(id: &str, name: &str, max: u64) -> FieldSchema {
    FieldSchema::new(id, name, FieldKind::LongText)
        .validation(Validation::size(None, Some(max)))
        .widget(EditorWidget::MultipleLine)
}

#[must_use]
pub fn client() -> ContentTypeSchema {
    ContentTypeSchema::new(CLIENT, "Client")
        .description("Organisations we have worked with")
        .display_field("name")
        .field(
            FieldSchema::new("name", "Name", FieldKind::ShortText)
                .required()
                .validation(Validation::size(Some(1), Some(100))),
        )
        .field(image("logo", "Logo"))
        .field(url("website", "Website"))
        .field(featured())
        .field(order())
}

#[must_use]
pub fn result() -> ContentTypeSchema {
    ContentTypeSchema::new(RESULT, "Result")
        .description("Measurable client outcomes")
        .display_field("title")
        .field(title(100))
        .field(
            FieldSchema::new("metric", "Metric", FieldKind::ShortText)
                .required()
                .validation(Validation::size(Some(1), Some(30)))
                .help_text("Headline figure, e.g. 40%"),
        )
        .field(long_text("description", "Description", 500))
        .field(FieldSchema::new("clientName", "Client name", FieldKind::ShortText))
        .field(image("image", "Image"))
        .field(featured())
        .field(order())
}

#[must_use]
pub fn testimonial() -> ContentTypeSchema {
    ContentTypeSchema::new(TESTIMONIAL, "Testimonial")
        .description("Client quotes")
        .display_field("authorName")
        .field(
            FieldSchema::new("quote", "Quote", FieldKind::LongText)
                .required()
                .validation(Validation::size(Some(10), Some(1000)))
                .widget(EditorWidget::MultipleLine),
        )
        .field(
            FieldSchema::new("authorName", "Author name", FieldKind::ShortText)
                .required()
                .validation(Validation::size(Some(1), Some(100))),
        )
        .field(FieldSchema::new("authorTitle", "Author title", FieldKind::ShortText))
        .field(FieldSchema::new("company", "Company", FieldKind::ShortText))
        .field(image("avatar", "Avatar"))
        .field(
            FieldSchema::new("rating", "Rating", FieldKind::Integer)
                .validation(Validation::range(Some(1), Some(5)).message("Rating must be 1-5"))
                .widget(EditorWidget::Rating),
        )
        .field(featured())
}

#[must_use]
pub fn why_choose_us() -> ContentTypeSchema {
    ContentTypeSchema::new(WHY_CHOOSE_US, "Why choose us")
        .description("Reasons to work with us")
        .display_field("title")
        .field(title(80))
        .field(
            FieldSchema::new("description", "Description", FieldKind::LongText)
                .required()
                .validation(Validation::size(Some(1), Some(300)))
                .widget(EditorWidget::MultipleLine),
        )
        .field(
            FieldSchema::new("icon", "Icon", FieldKind::ShortText)
                .help_text("Icon name from the site icon set"),
        )
        .field(order())
}

#[must_use]
pub fn service() -> ContentTypeSchema {
    ContentTypeSchema::new(SERVICE, "Service")
        .description("Coaching offers")
        .display_field("title")
        .field(title(100))
        .field(slug())
        .field(
            FieldSchema::new("summary", "Summary", FieldKind::ShortText)
                .required()
                .validation(Validation::size(Some(1), Some(200))),
        )
        .field(
            FieldSchema::new("description", "Description", FieldKind::LongText)
                .widget(EditorWidget::Markdown),
        )
        .field(
            FieldSchema::new("icon", "Icon", FieldKind::ShortText)
                .validation(Validation::one_of(&["compass", "target", "users", "trending-up", "message-circle"]))
                .widget(EditorWidget::Dropdown),
        )
        .field(image("image", "Image"))
        .field(featured())
        .field(order())
}

#[must_use]
pub fn team_member() -> ContentTypeSchema {
    ContentTypeSchema::new(TEAM_MEMBER, "Team member")
        .description("Coaches and staff")
        .display_field("name")
        .field(
            FieldSchema::new("name", "Name", FieldKind::ShortText)
                .required()
                .validation(Validation::size(Some(1), Some(100))),
        )
        .field(
            FieldSchema::new("role", "Role", FieldKind::ShortText)
                .required()
                .validation(Validation::size(Some(1), Some(100))),
        )
        .field(long_text("bio", "Bio", 2000))
        .field(image("photo", "Photo"))
        .field(url("linkedinUrl", "LinkedIn URL"))
        .field(order())
}

#[must_use]
pub fn blog_post() -> ContentTypeSchema {
    ContentTypeSchema::new(BLOG_POST, "Blog post")
        .description("Articles")
        .display_field("title")
        .field(title(150))
        .field(slug())
        .field(long_text("excerpt", "Excerpt", 300))
        .field(
            FieldSchema::new("body", "Body", FieldKind::LongText)
                .required()
                .widget(EditorWidget::Markdown),
        )
        .field(image("coverImage", "Cover image"))
        .field(
            FieldSchema::new("author", "Author", FieldKind::ShortText)
                .required()
                .validation(Validation::size(Some(1), Some(100))),
        )
        .field(
            FieldSchema::new("publishedAt", "Published at", FieldKind::Date)
                .required()
                .widget(EditorWidget::DatePicker),
        )
        .field(featured())
}

#[must_use]
pub fn event() -> ContentTypeSchema {
    ContentTypeSchema::new(EVENT, "Event")
        .description("Workshops and talks")
        .display_field("title")
        .field(title(150))
        .field(slug())
        .field(
            FieldSchema::new("description", "Description", FieldKind::LongText)
                .widget(EditorWidget::Markdown),
        )
        .field(
            FieldSchema::new("startDate", "Start date", FieldKind::Date)
                .required()
                .widget(EditorWidget::DatePicker),
        )
        .field(FieldSchema::new("endDate", "End date", FieldKind::Date).widget(EditorWidget::DatePicker))
        .field(FieldSchema::new("location", "Location", FieldKind::ShortText))
        .field(url("registrationUrl", "Registration URL"))
        .field(featured())
}

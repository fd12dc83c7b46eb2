//! Content-type identifiers shared by the read and write paths.
//!
//! The migrations create content types with exactly these ids and the query
//! layer filters entries by them, so they live in one place.

/// Client logos shown on the home page.
pub const CLIENT: &str = "client";
/// Measurable client outcomes.
pub const RESULT: &str = "result";
pub const TESTIMONIAL: &str = "testimonial";
/// "Why choose us" selling points.
pub const WHY_CHOOSE_US: &str = "whyChooseUs";
pub const SERVICE: &str = "service";
pub const TEAM_MEMBER: &str = "teamMember";
pub const BLOG_POST: &str = "blogPost";
pub const EVENT: &str = "event";

/// Sort position given to records without an explicit `order`, so they sort last.
pub const DEFAULT_ORDER: i64 = 999;

/// Locale used when writing field values.
pub const DEFAULT_LOCALE: &str = "en-US";

//! VirtuSys test utilities.
//!
//! JSON fixture builders for blocks, pages, slides, images and sites, in the
//! shape the admin API accepts, plus assertion helpers.

use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

/// A slug that will not collide with other tests sharing a database.
pub fn unique_slug(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::now_v7().simple())
}

/// Create a page fixture with a unique slug and an empty body.
pub fn test_page(title: &str) -> PageFixture {
    PageFixture {
        title: title.to_string(),
        slug: unique_slug("page"),
        live: true,
        tagline: String::new(),
        body: Vec::new(),
        meta_description: String::new(),
        show_in_navigation: true,
        footer_note: String::new(),
    }
}

/// A page builder producing admin API payloads.
#[derive(Debug, Clone)]
pub struct PageFixture {
    pub title: String,
    pub slug: String,
    pub live: bool,
    pub tagline: String,
    pub body: Vec<JsonValue>,
    pub meta_description: String,
    pub show_in_navigation: bool,
    pub footer_note: String,
}

impl PageFixture {
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = slug.to_string();
        self
    }

    /// Set as draft.
    pub fn draft(mut self) -> Self {
        self.live = false;
        self
    }

    pub fn hidden_from_navigation(mut self) -> Self {
        self.show_in_navigation = false;
        self
    }

    pub fn with_tagline(mut self, tagline: &str) -> Self {
        self.tagline = tagline.to_string();
        self
    }

    pub fn with_meta_description(mut self, description: &str) -> Self {
        self.meta_description = description.to_string();
        self
    }

    pub fn with_footer_note(mut self, note: &str) -> Self {
        self.footer_note = note.to_string();
        self
    }

    /// Append a stream block built with [`blocks`].
    pub fn with_block(mut self, block: JsonValue) -> Self {
        self.body.push(block);
        self
    }

    /// The admin API payload.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "title": self.title,
            "slug": self.slug,
            "live": self.live,
            "tagline": self.tagline,
            "body": self.body,
            "meta_description": self.meta_description,
            "show_in_navigation": self.show_in_navigation,
            "footer_note": self.footer_note,
        })
    }
}

/// A hero slide payload.
pub fn slide_input(title: &str) -> JsonValue {
    json!({
        "title": title,
        "subtitle": format!("{title} subtitle"),
        "button_text": "Learn more",
        "button_link": "https://virtusys.example/learn",
    })
}

/// A hero slide payload pointing at an image.
pub fn slide_with_image(title: &str, image_id: Uuid) -> JsonValue {
    let mut slide = slide_input(title);
    slide["image"] = json!(image_id);
    slide
}

/// An image registration payload.
pub fn image_input(title: &str) -> JsonValue {
    json!({
        "title": title,
        "file_url": format!("/media/{}.jpg", Uuid::now_v7().simple()),
        "width": 1600,
        "height": 900,
    })
}

/// A site payload on a unique hostname.
pub fn site_input(name: &str) -> JsonValue {
    json!({
        "hostname": format!("{}.test", Uuid::now_v7().simple()),
        "port": 80,
        "site_name": name,
    })
}

/// Stream block builders. Each returns `{"type": ..., "value": ...}`.
pub mod blocks {
    use serde_json::{Value as JsonValue, json};
    use uuid::Uuid;

    fn block(block_type: &str, value: JsonValue) -> JsonValue {
        json!({ "type": block_type, "value": value })
    }

    pub fn hero(headline: &str) -> JsonValue {
        block(
            "hero",
            json!({
                "headline": headline,
                "subheadline": "Global IT, delivered locally.",
                "button_text": "Get started",
                "button_link": "https://virtusys.example/start",
            }),
        )
    }

    pub fn hero_with_background(headline: &str, image_id: Uuid) -> JsonValue {
        let mut hero = hero(headline);
        hero["value"]["background_image"] = json!(image_id);
        hero
    }

    pub fn services(titles: &[&str]) -> JsonValue {
        let services: Vec<JsonValue> = titles
            .iter()
            .map(|title| json!({ "title": title, "description": format!("{title} done right.") }))
            .collect();
        block(
            "services_overview",
            json!({ "section_title": "Our Services", "services": services }),
        )
    }

    pub fn testimonial(client_name: &str, quote: &str, rating: i64) -> JsonValue {
        block(
            "testimonial_section",
            json!({
                "section_title": "What clients say",
                "testimonials": [
                    { "client_name": client_name, "quote": quote, "rating": rating }
                ],
            }),
        )
    }

    pub fn stats(items: &[(&str, &str)]) -> JsonValue {
        let stats: Vec<JsonValue> = items
            .iter()
            .map(|(label, value)| json!({ "label": label, "value": value }))
            .collect();
        block("stats", json!({ "section_title": "By the numbers", "stats": stats }))
    }

    pub fn cta(text: &str) -> JsonValue {
        block(
            "cta",
            json!({
                "text": text,
                "button_text": "Contact us",
                "button_link": "https://virtusys.example/contact",
            }),
        )
    }
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a validation error response names the given field.
    pub fn has_field_error(body: &Value, field: &str) {
        let found = body["fields"]
            .as_array()
            .is_some_and(|errors| errors.iter().any(|e| e["field"] == field));
        assert!(found, "Expected a validation error on '{field}', got: {body}");
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_builder() {
        let page = test_page("About")
            .draft()
            .with_tagline("Who we are")
            .with_block(blocks::hero("Hello"))
            .with_block(blocks::cta("Call us"));

        let json = page.to_json();
        assert_eq!(json["title"], "About");
        assert_eq!(json["live"], false);
        assert_eq!(json["body"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["body"][0]["type"], "hero");
        assert!(page.slug.starts_with("page-"));
    }

    #[test]
    fn test_unique_slugs() {
        assert_ne!(unique_slug("a"), unique_slug("a"));
    }

    #[test]
    fn test_block_builders() {
        let services = blocks::services(&["Cloud", "Security"]);
        assert_eq!(services["value"]["services"][1]["title"], "Security");

        let id = Uuid::now_v7();
        let hero = blocks::hero_with_background("Hi", id);
        assert_eq!(hero["value"]["background_image"], json!(id));
    }

    #[test]
    fn test_assertions() {
        let body = json!({ "error": "validation failed", "fields": [{ "field": "title", "message": "x" }] });
        assert::has_key(&body, "error");
        assert::has_field_error(&body, "title");
        assert::contains("hello world", "world");
        assert::not_contains("hello world", "foo");
    }
}

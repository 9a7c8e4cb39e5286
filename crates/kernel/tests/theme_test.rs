#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Theme tests over the real templates directory.

mod common;

use std::collections::HashMap;

use serde_json::json;
use uuid::Uuid;

use virtusys_kernel::content::{ContentStream, render_stream};
use virtusys_kernel::models::{HomePage, Image};
use virtusys_kernel::theme::ThemeEngine;
use virtusys_test_utils::{assert, blocks};

fn page(body: ContentStream) -> HomePage {
    HomePage {
        id: Uuid::now_v7(),
        title: "Welcome <home>".to_string(),
        slug: "home".to_string(),
        live: true,
        tagline: "IT innovation".to_string(),
        body,
        meta_description: String::new(),
        show_in_navigation: true,
        footer_note: "Offices worldwide".to_string(),
        created: 0,
        changed: 0,
    }
}

#[test]
fn every_block_template_is_loaded() {
    let engine = common::theme();
    for template in [
        "base.html",
        "pages/home_page.html",
        "blocks/hero.html",
        "blocks/service_overview.html",
        "blocks/service_overview_item.html",
        "blocks/testimonial_section.html",
        "blocks/testimonial_item.html",
        "blocks/stats.html",
        "blocks/stat_item.html",
        "blocks/cta.html",
    ] {
        assert!(engine.tera().get_template(template).is_ok(), "missing {template}");
    }
}

#[test]
fn page_template_resolves_through_suggestions() {
    let engine = common::theme();
    let suggestions = ThemeEngine::page_suggestions("home_page", "landing");
    let refs: Vec<&str> = suggestions.iter().map(String::as_str).collect();
    assert_eq!(
        engine.resolve_template(&refs).as_deref(),
        Some("pages/home_page.html")
    );
}

#[test]
fn stream_renders_each_block_with_resolved_images() {
    let engine = common::theme();
    let image = Image {
        id: Uuid::now_v7(),
        title: "Skyline".to_string(),
        file_url: "/media/skyline.jpg".to_string(),
        width: 1600,
        height: 900,
        created: 0,
    };
    let missing = Uuid::now_v7();

    let raw = json!([
        blocks::hero_with_background("Hello world", image.id),
        blocks::services(&["Cloud", "Security"]),
        blocks::testimonial("Lee Park", "Great partner.", 5),
        blocks::stats(&[("Uptime", "99.99%")]),
        blocks::hero_with_background("No picture", missing),
    ]);
    let stream = ContentStream::clean(Some(&raw), "body").unwrap();
    let images = HashMap::from([(image.id, image)]);

    let html = render_stream(&engine, &stream, &images);
    assert::contains(&html, "Hello world");
    assert::contains(&html, "skyline.jpg");
    assert::contains(&html, "Cloud");
    assert::contains(&html, "Security");
    assert::contains(&html, "Lee Park");
    assert::contains(&html, "★★★★★");
    assert::contains(&html, "99.99%");
    assert::contains(&html, "No picture");
    assert::contains(&html, "columns-3");
    assert_eq!(html.matches("background-image").count(), 1);
}

#[test]
fn page_context_renders_full_document() {
    let engine = common::theme();
    let home = page(ContentStream::new());

    let mut context = tera::Context::new();
    context.insert("site_name", "VirtuSys");
    context.insert("body_html", "<section class=\"block\">raw block</section>");
    context.insert("hero_slides", &Vec::<serde_json::Value>::new());
    context.insert("navigation", &json!([{ "title": "Home", "url": "/" }]));
    let context = home.get_context(context);

    let html = engine.render_page("home_page", &home.slug, &context).unwrap();
    assert::contains(&html, "Welcome &lt;home&gt;");
    assert::contains(&html, "<section class=\"block\">raw block</section>");
    assert::contains(&html, "Empowering global businesses through IT innovation.");
    assert::contains(&html, "VirtuSys Global");
    assert::contains(&html, "Offices worldwide");
    assert::not_contains(&html, "<address>");
}

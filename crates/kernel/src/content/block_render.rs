//! Server-side rendering of the content stream.
//!
//! Each block is rendered through its own template with the block payload
//! as `value`. Image ids in the payload are swapped for the image record
//! (or `null` when the image no longer exists) before rendering.

use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use super::stream::{ContentStream, StreamChild};
use crate::models::Image;
use crate::theme::ThemeEngine;

/// Render every block of the stream, in order, into one HTML string.
///
/// A block whose template fails is logged and left out.
pub fn render_stream(
    theme: &ThemeEngine,
    stream: &ContentStream,
    images: &HashMap<Uuid, Image>,
) -> String {
    let mut html = String::new();
    for child in stream {
        match render_child(theme, child, images) {
            Ok(rendered) => html.push_str(&rendered),
            Err(e) => warn!(
                block_id = %child.id,
                block_type = child.block.block_type(),
                error = ?e,
                "failed to render block"
            ),
        }
    }
    html
}

fn render_child(
    theme: &ThemeEngine,
    child: &StreamChild,
    images: &HashMap<Uuid, Image>,
) -> anyhow::Result<String> {
    let mut context = tera::Context::new();
    context.insert("value", &resolved_value(child, images));
    context.insert("block_id", &child.id);
    context.insert("block_type", child.block.block_type());
    theme.render(child.block.template(), &context)
}

/// The block payload with image ids replaced by image records.
pub fn resolved_value(child: &StreamChild, images: &HashMap<Uuid, Image>) -> Value {
    let mut value = child.block.value();
    for (path, id) in child.block.image_refs() {
        if let Some(slot) = pointer_mut(&mut value, &path) {
            *slot = images
                .get(&id)
                .and_then(|image| serde_json::to_value(image).ok())
                .unwrap_or(Value::Null);
        }
    }
    value
}

/// Walk a dotted path (`testimonials.0.avatar`) into a JSON value.
fn pointer_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::content::blocks::{HeroBlock, TestimonialItem, TestimonialSectionBlock};
    use crate::content::stream::ContentBlock;
    use serde_json::json;

    fn image(id: Uuid) -> Image {
        Image {
            id,
            title: "Team".to_string(),
            file_url: "/media/team.jpg".to_string(),
            width: 800,
            height: 600,
            created: 0,
        }
    }

    #[test]
    fn resolves_nested_images_and_nulls_missing() {
        let present = Uuid::now_v7();
        let missing = Uuid::now_v7();
        let child = StreamChild {
            id: Uuid::now_v7(),
            block: ContentBlock::TestimonialSection(TestimonialSectionBlock {
                section_title: "Clients".to_string(),
                testimonials: vec![
                    TestimonialItem {
                        client_name: "A".to_string(),
                        quote: "Q".to_string(),
                        avatar: Some(present),
                        ..Default::default()
                    },
                    TestimonialItem {
                        client_name: "B".to_string(),
                        quote: "Q".to_string(),
                        avatar: Some(missing),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }),
        };
        let images = HashMap::from([(present, image(present))]);

        let value = resolved_value(&child, &images);
        assert_eq!(value["testimonials"][0]["avatar"]["file_url"], "/media/team.jpg");
        assert_eq!(value["testimonials"][1]["avatar"], Value::Null);
        assert_eq!(value["section_title"], "Clients");
    }

    #[test]
    fn failing_block_is_skipped() {
        let mut engine = ThemeEngine::empty().unwrap();
        engine
            .tera_mut()
            .add_raw_template("blocks/hero.html", "<h1>{{ value.headline }}</h1>")
            .unwrap();

        let mut stream = ContentStream::new();
        stream.push(ContentBlock::Hero(HeroBlock {
            headline: "First".to_string(),
            ..Default::default()
        }));
        // No template registered for stats.
        stream.push(ContentBlock::Stats(Default::default()));
        stream.push(ContentBlock::Hero(HeroBlock {
            headline: "<Second>".to_string(),
            ..Default::default()
        }));

        let html = render_stream(&engine, &stream, &HashMap::new());
        assert_eq!(html, "<h1>First</h1><h1>&lt;Second&gt;</h1>");
    }

    #[test]
    fn pointer_walks_objects_and_arrays() {
        let mut value = json!({ "a": [{ "b": 1 }] });
        *pointer_mut(&mut value, "a.0.b").unwrap() = json!(2);
        assert_eq!(value["a"][0]["b"], 2);
        assert!(pointer_mut(&mut value, "a.5.b").is_none());
    }
}

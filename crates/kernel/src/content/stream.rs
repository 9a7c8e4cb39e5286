//! The homepage content stream: an ordered list of tagged blocks.
//!
//! Stored as JSONB in the shape
//! `[{ "type": "hero", "value": {...}, "id": "<uuid>" }, ...]`.
//! Every child carries a stable id so editors can reorder blocks without
//! losing identity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::blocks::{
    CtaBlock, HeroBlock, ServiceOverviewBlock, StatsBlock, StructBlock, TestimonialSectionBlock,
};
use super::fields::{FieldReader, ValidationErrors};

/// One block of the content stream, tagged by block type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ContentBlock {
    Hero(HeroBlock),
    ServicesOverview(ServiceOverviewBlock),
    TestimonialSection(TestimonialSectionBlock),
    Stats(StatsBlock),
    Cta(CtaBlock),
}

impl ContentBlock {
    /// Stream tags in the order the editor offers them.
    pub const TYPES: &'static [&'static str] = &[
        HeroBlock::NAME,
        ServiceOverviewBlock::NAME,
        TestimonialSectionBlock::NAME,
        StatsBlock::NAME,
        CtaBlock::NAME,
    ];

    /// Clean form data for the given stream tag.
    ///
    /// Returns `None` for an unknown tag; field errors land in `reader`.
    pub fn clean(block_type: &str, reader: &mut FieldReader<'_>) -> Option<Self> {
        let block = match block_type {
            "hero" => Self::Hero(HeroBlock::clean(reader)),
            "services_overview" => Self::ServicesOverview(ServiceOverviewBlock::clean(reader)),
            "testimonial_section" => {
                Self::TestimonialSection(TestimonialSectionBlock::clean(reader))
            }
            "stats" => Self::Stats(StatsBlock::clean(reader)),
            "cta" => Self::Cta(CtaBlock::clean(reader)),
            _ => return None,
        };
        Some(block)
    }

    pub fn block_type(&self) -> &'static str {
        match self {
            Self::Hero(_) => HeroBlock::NAME,
            Self::ServicesOverview(_) => ServiceOverviewBlock::NAME,
            Self::TestimonialSection(_) => TestimonialSectionBlock::NAME,
            Self::Stats(_) => StatsBlock::NAME,
            Self::Cta(_) => CtaBlock::NAME,
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            Self::Hero(_) => HeroBlock::TEMPLATE,
            Self::ServicesOverview(_) => ServiceOverviewBlock::TEMPLATE,
            Self::TestimonialSection(_) => TestimonialSectionBlock::TEMPLATE,
            Self::Stats(_) => StatsBlock::TEMPLATE,
            Self::Cta(_) => CtaBlock::TEMPLATE,
        }
    }

    /// Image references relative to the block value.
    pub fn image_refs(&self) -> Vec<(String, Uuid)> {
        match self {
            Self::Hero(b) => b.image_refs(),
            Self::ServicesOverview(b) => b.image_refs(),
            Self::TestimonialSection(b) => b.image_refs(),
            Self::Stats(b) => b.image_refs(),
            Self::Cta(b) => b.image_refs(),
        }
    }

    /// The block payload alone, without the type tag.
    pub fn value(&self) -> Value {
        let value = match self {
            Self::Hero(b) => serde_json::to_value(b),
            Self::ServicesOverview(b) => serde_json::to_value(b),
            Self::TestimonialSection(b) => serde_json::to_value(b),
            Self::Stats(b) => serde_json::to_value(b),
            Self::Cta(b) => serde_json::to_value(b),
        };
        value.unwrap_or(Value::Null)
    }
}

/// A block in the stream together with its stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChild {
    #[serde(flatten)]
    pub block: ContentBlock,
    pub id: Uuid,
}

/// Ordered sequence of content blocks. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentStream(Vec<StreamChild>);

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block with a fresh id, returning the id.
    pub fn push(&mut self, block: ContentBlock) -> Uuid {
        let id = Uuid::now_v7();
        self.0.push(StreamChild { block, id });
        id
    }

    pub fn children(&self) -> &[StreamChild] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &StreamChild> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Clean a submitted stream, reporting errors under `field`.
    ///
    /// Accepts `null` or an array of `{ "type", "value", "id"? }` objects.
    /// Children without an id are given one; ids must be unique.
    pub fn clean(value: Option<&Value>, field: &str) -> Result<Self, ValidationErrors> {
        let items = match value {
            None | Some(Value::Null) => return Ok(Self::new()),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(ValidationErrors::single(field, "Enter a list of blocks.")),
        };

        let mut errors = ValidationErrors::new();
        let mut children = Vec::with_capacity(items.len());
        let mut seen = HashSet::new();

        for (index, item) in items.iter().enumerate() {
            let path = format!("{field}.{index}");

            let Some(obj) = item.as_object() else {
                errors.add(path, "Expected a block object.");
                continue;
            };

            let id = match obj.get("id") {
                None | Some(Value::Null) => Uuid::now_v7(),
                Some(Value::String(s)) if s.trim().is_empty() => Uuid::now_v7(),
                Some(Value::String(s)) => match Uuid::parse_str(s.trim()) {
                    Ok(id) => id,
                    Err(_) => {
                        errors.add(format!("{path}.id"), "Enter a valid block id.");
                        continue;
                    }
                },
                Some(_) => {
                    errors.add(format!("{path}.id"), "Enter a valid block id.");
                    continue;
                }
            };
            if !seen.insert(id) {
                errors.add(format!("{path}.id"), "Duplicate block id.");
                continue;
            }

            let Some(block_type) = obj.get("type").and_then(Value::as_str) else {
                errors.add(format!("{path}.type"), "Block type is required.");
                continue;
            };

            let value = obj.get("value").unwrap_or(&Value::Null);
            let mut reader = FieldReader::with_prefix(value, format!("{path}.value"));
            match ContentBlock::clean(block_type, &mut reader) {
                Some(block) => {
                    errors.merge(reader.into_errors());
                    children.push(StreamChild { block, id });
                }
                None => {
                    errors.add(
                        format!("{path}.type"),
                        format!("Unknown block type '{block_type}'."),
                    );
                }
            }
        }

        errors.into_result()?;
        Ok(Self(children))
    }

    /// Every image reference in the stream with its full path under `field`.
    pub fn image_refs(&self, field: &str) -> Vec<(String, Uuid)> {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(index, child)| {
                child
                    .block
                    .image_refs()
                    .into_iter()
                    .map(move |(path, id)| (format!("{field}.{index}.value.{path}"), id))
            })
            .collect()
    }

    /// Distinct image ids referenced anywhere in the stream.
    pub fn image_ids(&self) -> Vec<Uuid> {
        let mut seen = HashSet::new();
        self.0
            .iter()
            .flat_map(|child| child.block.image_refs())
            .map(|(_, id)| id)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ContentStream {
    type Item = &'a StreamChild;
    type IntoIter = std::slice::Iter<'a, StreamChild>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

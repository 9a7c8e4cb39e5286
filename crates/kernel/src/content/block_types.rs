//! Block type registry.
//!
//! Provides:
//! - `BlockTypeDefinition`: schema and metadata for one stream block type
//! - `ItemTypeDefinition`: schema for the items nested inside list fields
//! - `BlockTypeRegistry`: the known block types, in editor order, with validation

use serde::Serialize;
use serde_json::Value;

use super::blocks::{
    CtaBlock, HeroBlock, ServiceOverviewBlock, ServiceOverviewItem, StatItem, StatsBlock,
    StructBlock, TestimonialItem, TestimonialSectionBlock,
};
use super::fields::{FieldReader, FieldSpec, ValidationErrors};
use super::stream::ContentBlock;

/// Schema of an item type used inside a block's list field.
#[derive(Debug, Clone, Serialize)]
pub struct ItemTypeDefinition {
    pub type_name: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub template: &'static str,
    pub fields: &'static [FieldSpec],
}

impl ItemTypeDefinition {
    fn of<B: StructBlock>() -> Self {
        Self {
            type_name: B::NAME,
            label: B::LABEL,
            icon: B::ICON,
            template: B::TEMPLATE,
            fields: B::FIELDS,
        }
    }
}

/// Definition of a single block type in the editor.
#[derive(Debug, Clone, Serialize)]
pub struct BlockTypeDefinition {
    /// Stream tag of the block type (e.g. "hero", "cta").
    pub type_name: &'static str,
    /// Human-readable label (e.g. "Hero Section").
    pub label: &'static str,
    pub icon: &'static str,
    pub template: &'static str,
    pub fields: &'static [FieldSpec],
    /// Item types referenced by this block's list fields.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub item_types: Vec<ItemTypeDefinition>,
}

impl BlockTypeDefinition {
    fn of<B: StructBlock>(item_types: Vec<ItemTypeDefinition>) -> Self {
        Self {
            type_name: B::NAME,
            label: B::LABEL,
            icon: B::ICON,
            template: B::TEMPLATE,
            fields: B::FIELDS,
            item_types,
        }
    }
}

/// Registry of block type definitions in declaration order.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct BlockTypeRegistry {
    types: Vec<BlockTypeDefinition>,
}

impl BlockTypeRegistry {
    /// Create a registry with hero, services_overview, testimonial_section,
    /// stats and cta, in that order.
    pub fn with_standard_types() -> Self {
        Self {
            types: vec![
                BlockTypeDefinition::of::<HeroBlock>(Vec::new()),
                BlockTypeDefinition::of::<ServiceOverviewBlock>(vec![
                    ItemTypeDefinition::of::<ServiceOverviewItem>(),
                ]),
                BlockTypeDefinition::of::<TestimonialSectionBlock>(vec![
                    ItemTypeDefinition::of::<TestimonialItem>(),
                ]),
                BlockTypeDefinition::of::<StatsBlock>(vec![ItemTypeDefinition::of::<StatItem>()]),
                BlockTypeDefinition::of::<CtaBlock>(Vec::new()),
            ],
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&BlockTypeDefinition> {
        self.types.iter().find(|d| d.type_name == type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.get(type_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockTypeDefinition> {
        self.types.iter()
    }

    /// Validate a single block payload against its registered type.
    pub fn validate_block(
        &self,
        type_name: &str,
        data: &Value,
    ) -> Result<ContentBlock, ValidationErrors> {
        if !self.contains(type_name) {
            return Err(ValidationErrors::single(
                "type",
                format!("Unknown block type '{type_name}'."),
            ));
        }

        let mut reader = FieldReader::new(data);
        match ContentBlock::clean(type_name, &mut reader) {
            Some(block) => reader.finish(block),
            None => Err(ValidationErrors::single(
                "type",
                format!("Unknown block type '{type_name}'."),
            )),
        }
    }
}

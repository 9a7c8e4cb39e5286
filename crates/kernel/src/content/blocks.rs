//! Content block payloads.
//!
//! Each block is a fixed-schema struct with a static field table, a `clean`
//! constructor that validates admin form data, and the template used to
//! render it. Three blocks carry an ordered list of nested items; items have
//! no identity beyond their position.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::fields::{FieldReader, FieldSpec, ValidationErrors};
use crate::choice_enum;

/// A structured block or list item with a declared schema.
pub trait StructBlock: Sized + Serialize {
    /// Machine name (the stream tag for top-level blocks).
    const NAME: &'static str;
    const LABEL: &'static str;
    /// Admin icon name.
    const ICON: &'static str;
    /// Template used to render this block.
    const TEMPLATE: &'static str;
    const FIELDS: &'static [FieldSpec];

    /// Build the block from form data, recording errors in `reader`.
    fn clean(reader: &mut FieldReader<'_>) -> Self;

    /// Image references with their paths relative to the block.
    fn image_refs(&self) -> Vec<(String, Uuid)> {
        Vec::new()
    }

    /// Validate a standalone JSON object.
    fn from_form(data: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(data);
        let block = Self::clean(&mut reader);
        reader.finish(block)
    }
}

fn image_ref(name: &str, id: Option<Uuid>) -> Option<(String, Uuid)> {
    id.map(|id| (name.to_string(), id))
}

// ---------------------------------------------------------------------------
// Hero
// ---------------------------------------------------------------------------

choice_enum! {
    /// Entrance animation for the hero section.
    pub enum AnimationStyle {
        #[default]
        Fade => ("fade", "Fade In"),
        SlideUp => ("slide-up", "Slide Up"),
        Zoom => ("zoom", "Zoom In"),
    }
}

choice_enum! {
    pub enum Alignment {
        Left => ("left", "Left"),
        #[default]
        Center => ("center", "Center"),
        Right => ("right", "Right"),
    }
}

const HERO_HEADLINE: FieldSpec = FieldSpec::char("headline", "Headline")
    .required()
    .max_length(150)
    .help("Main headline for the homepage hero.");
const HERO_SUBHEADLINE: FieldSpec = FieldSpec::text("subheadline", "Subheadline")
    .help("Short supporting description or tagline.");
const HERO_BACKGROUND_IMAGE: FieldSpec =
    FieldSpec::image("background_image", "Background image").help("Hero background image.");
const HERO_OVERLAY_COLOR: FieldSpec = FieldSpec::char("overlay_color", "Overlay color")
    .help("Add overlay color in hex or rgba (e.g. #00000080).");
const HERO_BUTTON_TEXT: FieldSpec = FieldSpec::char("button_text", "Button text").max_length(50);
const HERO_BUTTON_LINK: FieldSpec = FieldSpec::url("button_link", "Button link");
const HERO_ANIMATION_STYLE: FieldSpec = FieldSpec::choice(
    "animation_style",
    "Animation style",
    <AnimationStyle as super::fields::Choice>::CHOICES,
    Some("fade"),
);
const HERO_ALIGNMENT: FieldSpec = FieldSpec::choice(
    "alignment",
    "Alignment",
    <Alignment as super::fields::Choice>::CHOICES,
    Some("center"),
)
.required();

/// Landing section with headline, background and call to action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroBlock {
    pub headline: String,
    pub subheadline: String,
    pub background_image: Option<Uuid>,
    pub overlay_color: String,
    pub button_text: String,
    pub button_link: String,
    pub animation_style: Option<AnimationStyle>,
    pub alignment: Alignment,
}

impl StructBlock for HeroBlock {
    const NAME: &'static str = "hero";
    const LABEL: &'static str = "Hero Section";
    const ICON: &'static str = "image";
    const TEMPLATE: &'static str = "blocks/hero.html";
    const FIELDS: &'static [FieldSpec] = &[
        HERO_HEADLINE,
        HERO_SUBHEADLINE,
        HERO_BACKGROUND_IMAGE,
        HERO_OVERLAY_COLOR,
        HERO_BUTTON_TEXT,
        HERO_BUTTON_LINK,
        HERO_ANIMATION_STYLE,
        HERO_ALIGNMENT,
    ];

    fn clean(reader: &mut FieldReader<'_>) -> Self {
        Self {
            headline: reader.text(&HERO_HEADLINE),
            subheadline: reader.text(&HERO_SUBHEADLINE),
            background_image: reader.image(&HERO_BACKGROUND_IMAGE),
            overlay_color: reader.text(&HERO_OVERLAY_COLOR),
            button_text: reader.text(&HERO_BUTTON_TEXT),
            button_link: reader.text(&HERO_BUTTON_LINK),
            animation_style: reader.choice(&HERO_ANIMATION_STYLE),
            alignment: reader.choice(&HERO_ALIGNMENT).unwrap_or_default(),
        }
    }

    fn image_refs(&self) -> Vec<(String, Uuid)> {
        image_ref("background_image", self.background_image)
            .into_iter()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Service overview
// ---------------------------------------------------------------------------

choice_enum! {
    /// Grid width of the service overview.
    pub enum Columns {
        Two => ("2", "Two Columns"),
        #[default]
        Three => ("3", "Three Columns"),
        Four => ("4", "Four Columns"),
    }
}

const SERVICE_ICON_CLASS: FieldSpec = FieldSpec::char("icon_class", "Icon class")
    .help("FontAwesome or Bootstrap icon class, e.g. 'fa-solid fa-cloud'.");
const SERVICE_TITLE: FieldSpec = FieldSpec::char("title", "Title").required().max_length(100);
const SERVICE_DESCRIPTION: FieldSpec = FieldSpec::text("description", "Description")
    .required()
    .max_length(300);
const SERVICE_LINK_TEXT: FieldSpec = FieldSpec::char("link_text", "Link text").max_length(50);
const SERVICE_LINK_URL: FieldSpec = FieldSpec::url("link_url", "Link URL");

/// One card in the service overview grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceOverviewItem {
    pub icon_class: String,
    pub title: String,
    pub description: String,
    pub link_text: String,
    pub link_url: String,
}

impl StructBlock for ServiceOverviewItem {
    const NAME: &'static str = "service_overview_item";
    const LABEL: &'static str = "Service Overview Item";
    const ICON: &'static str = "cog";
    const TEMPLATE: &'static str = "blocks/service_overview_item.html";
    const FIELDS: &'static [FieldSpec] = &[
        SERVICE_ICON_CLASS,
        SERVICE_TITLE,
        SERVICE_DESCRIPTION,
        SERVICE_LINK_TEXT,
        SERVICE_LINK_URL,
    ];

    fn clean(reader: &mut FieldReader<'_>) -> Self {
        Self {
            icon_class: reader.text(&SERVICE_ICON_CLASS),
            title: reader.text(&SERVICE_TITLE),
            description: reader.text(&SERVICE_DESCRIPTION),
            link_text: reader.text(&SERVICE_LINK_TEXT),
            link_url: reader.text(&SERVICE_LINK_URL),
        }
    }
}

const OVERVIEW_SECTION_TITLE: FieldSpec = FieldSpec::char("section_title", "Section title")
    .required()
    .max_length(120);
const OVERVIEW_SECTION_DESCRIPTION: FieldSpec =
    FieldSpec::text("section_description", "Section description");
const OVERVIEW_SERVICES: FieldSpec =
    FieldSpec::list("services", "Services", ServiceOverviewItem::NAME);
const OVERVIEW_BACKGROUND_COLOR: FieldSpec = FieldSpec::char("background_color", "Background color")
    .help("Optional background color (e.g. #f5f5f5).");
const OVERVIEW_COLUMNS: FieldSpec = FieldSpec::choice(
    "columns",
    "Columns",
    <Columns as super::fields::Choice>::CHOICES,
    Some("3"),
)
.required();

/// Grid summary of the company's services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceOverviewBlock {
    pub section_title: String,
    pub section_description: String,
    pub services: Vec<ServiceOverviewItem>,
    pub background_color: String,
    pub columns: Columns,
}

impl StructBlock for ServiceOverviewBlock {
    const NAME: &'static str = "services_overview";
    const LABEL: &'static str = "Service Overview";
    const ICON: &'static str = "list-ul";
    const TEMPLATE: &'static str = "blocks/service_overview.html";
    const FIELDS: &'static [FieldSpec] = &[
        OVERVIEW_SECTION_TITLE,
        OVERVIEW_SECTION_DESCRIPTION,
        OVERVIEW_SERVICES,
        OVERVIEW_BACKGROUND_COLOR,
        OVERVIEW_COLUMNS,
    ];

    fn clean(reader: &mut FieldReader<'_>) -> Self {
        Self {
            section_title: reader.text(&OVERVIEW_SECTION_TITLE),
            section_description: reader.text(&OVERVIEW_SECTION_DESCRIPTION),
            services: reader.list(&OVERVIEW_SERVICES, ServiceOverviewItem::clean),
            background_color: reader.text(&OVERVIEW_BACKGROUND_COLOR),
            columns: reader.choice(&OVERVIEW_COLUMNS).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Testimonials
// ---------------------------------------------------------------------------

choice_enum! {
    pub enum LayoutStyle {
        #[default]
        Carousel => ("carousel", "Carousel"),
        Grid => ("grid", "Grid"),
        Single => ("single", "Single Highlight"),
    }
}

const TESTIMONIAL_CLIENT_NAME: FieldSpec = FieldSpec::char("client_name", "Client name").required();
const TESTIMONIAL_COMPANY: FieldSpec = FieldSpec::char("company", "Company");
const TESTIMONIAL_QUOTE: FieldSpec = FieldSpec::text("quote", "Quote").required();
const TESTIMONIAL_AVATAR: FieldSpec = FieldSpec::image("avatar", "Avatar");
const TESTIMONIAL_RATING: FieldSpec =
    FieldSpec::integer("rating", "Rating").help("Star rating (1-5).");

/// A single client quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestimonialItem {
    pub client_name: String,
    pub company: String,
    pub quote: String,
    pub avatar: Option<Uuid>,
    pub rating: Option<i64>,
}

impl StructBlock for TestimonialItem {
    const NAME: &'static str = "testimonial_item";
    const LABEL: &'static str = "Testimonial Item";
    const ICON: &'static str = "user";
    const TEMPLATE: &'static str = "blocks/testimonial_item.html";
    const FIELDS: &'static [FieldSpec] = &[
        TESTIMONIAL_CLIENT_NAME,
        TESTIMONIAL_COMPANY,
        TESTIMONIAL_QUOTE,
        TESTIMONIAL_AVATAR,
        TESTIMONIAL_RATING,
    ];

    fn clean(reader: &mut FieldReader<'_>) -> Self {
        Self {
            client_name: reader.text(&TESTIMONIAL_CLIENT_NAME),
            company: reader.text(&TESTIMONIAL_COMPANY),
            quote: reader.text(&TESTIMONIAL_QUOTE),
            avatar: reader.image(&TESTIMONIAL_AVATAR),
            rating: reader.integer(&TESTIMONIAL_RATING),
        }
    }

    fn image_refs(&self) -> Vec<(String, Uuid)> {
        image_ref("avatar", self.avatar).into_iter().collect()
    }
}

const TESTIMONIALS_SECTION_TITLE: FieldSpec = FieldSpec::char("section_title", "Section title")
    .required()
    .max_length(120);
const TESTIMONIALS_ITEMS: FieldSpec =
    FieldSpec::list("testimonials", "Testimonials", TestimonialItem::NAME);
const TESTIMONIALS_LAYOUT_STYLE: FieldSpec = FieldSpec::choice(
    "layout_style",
    "Layout style",
    <LayoutStyle as super::fields::Choice>::CHOICES,
    Some("carousel"),
)
.required();

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestimonialSectionBlock {
    pub section_title: String,
    pub testimonials: Vec<TestimonialItem>,
    pub layout_style: LayoutStyle,
}

impl StructBlock for TestimonialSectionBlock {
    const NAME: &'static str = "testimonial_section";
    const LABEL: &'static str = "Testimonials Section";
    const ICON: &'static str = "group";
    const TEMPLATE: &'static str = "blocks/testimonial_section.html";
    const FIELDS: &'static [FieldSpec] = &[
        TESTIMONIALS_SECTION_TITLE,
        TESTIMONIALS_ITEMS,
        TESTIMONIALS_LAYOUT_STYLE,
    ];

    fn clean(reader: &mut FieldReader<'_>) -> Self {
        Self {
            section_title: reader.text(&TESTIMONIALS_SECTION_TITLE),
            testimonials: reader.list(&TESTIMONIALS_ITEMS, TestimonialItem::clean),
            layout_style: reader.choice(&TESTIMONIALS_LAYOUT_STYLE).unwrap_or_default(),
        }
    }

    fn image_refs(&self) -> Vec<(String, Uuid)> {
        self.testimonials
            .iter()
            .enumerate()
            .flat_map(|(i, item)| {
                item.image_refs()
                    .into_iter()
                    .map(move |(path, id)| (format!("testimonials.{i}.{path}"), id))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

choice_enum! {
    pub enum StatsTheme {
        #[default]
        Light => ("light", "Light"),
        Dark => ("dark", "Dark"),
        Accent => ("accent", "Accent Color"),
    }
}

const STAT_LABEL: FieldSpec = FieldSpec::char("label", "Label").required();
const STAT_VALUE: FieldSpec = FieldSpec::char("value", "Value").required();
const STAT_ICON_CLASS: FieldSpec = FieldSpec::char("icon_class", "Icon class");

/// One figure in the stats band, e.g. "Clients served: 250+".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatItem {
    pub label: String,
    pub value: String,
    pub icon_class: String,
}

impl StructBlock for StatItem {
    const NAME: &'static str = "stat_item";
    const LABEL: &'static str = "Stat Item";
    const ICON: &'static str = "grip";
    const TEMPLATE: &'static str = "blocks/stat_item.html";
    const FIELDS: &'static [FieldSpec] = &[STAT_LABEL, STAT_VALUE, STAT_ICON_CLASS];

    fn clean(reader: &mut FieldReader<'_>) -> Self {
        Self {
            label: reader.text(&STAT_LABEL),
            value: reader.text(&STAT_VALUE),
            icon_class: reader.text(&STAT_ICON_CLASS),
        }
    }
}

const STATS_SECTION_TITLE: FieldSpec = FieldSpec::char("section_title", "Section title");
const STATS_ITEMS: FieldSpec = FieldSpec::list("stats", "Stats", StatItem::NAME);
const STATS_THEME: FieldSpec = FieldSpec::choice(
    "theme",
    "Theme",
    <StatsTheme as super::fields::Choice>::CHOICES,
    Some("light"),
)
.required();

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsBlock {
    pub section_title: String,
    pub stats: Vec<StatItem>,
    pub theme: StatsTheme,
}

impl StructBlock for StatsBlock {
    const NAME: &'static str = "stats";
    const LABEL: &'static str = "Company Stats";
    const ICON: &'static str = "bar-chart";
    const TEMPLATE: &'static str = "blocks/stats.html";
    const FIELDS: &'static [FieldSpec] = &[STATS_SECTION_TITLE, STATS_ITEMS, STATS_THEME];

    fn clean(reader: &mut FieldReader<'_>) -> Self {
        Self {
            section_title: reader.text(&STATS_SECTION_TITLE),
            stats: reader.list(&STATS_ITEMS, StatItem::clean),
            theme: reader.choice(&STATS_THEME).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Call to action
// ---------------------------------------------------------------------------

choice_enum! {
    pub enum CtaStyle {
        #[default]
        Primary => ("primary", "Primary"),
        Secondary => ("secondary", "Secondary"),
        Dark => ("dark", "Dark"),
        Light => ("light", "Light"),
    }
}

const CTA_TEXT: FieldSpec = FieldSpec::char("text", "Text").required().max_length(200);
const CTA_BUTTON_TEXT: FieldSpec = FieldSpec::char("button_text", "Button text")
    .required()
    .max_length(50);
const CTA_BUTTON_LINK: FieldSpec = FieldSpec::url("button_link", "Button link").required();
const CTA_STYLE: FieldSpec = FieldSpec::choice(
    "style",
    "Style",
    <CtaStyle as super::fields::Choice>::CHOICES,
    Some("primary"),
)
.required();
const CTA_BACKGROUND_IMAGE: FieldSpec = FieldSpec::image("background_image", "Background image");
const CTA_OVERLAY_OPACITY: FieldSpec = FieldSpec::decimal("overlay_opacity", "Overlay opacity", 3, 2)
    .help("Opacity value (e.g. 0.5)");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtaBlock {
    pub text: String,
    pub button_text: String,
    pub button_link: String,
    pub style: CtaStyle,
    pub background_image: Option<Uuid>,
    /// Decimal in its submitted notation, e.g. `"0.50"`.
    pub overlay_opacity: Option<String>,
}

impl StructBlock for CtaBlock {
    const NAME: &'static str = "cta";
    const LABEL: &'static str = "Call to Action";
    const ICON: &'static str = "plus";
    const TEMPLATE: &'static str = "blocks/cta.html";
    const FIELDS: &'static [FieldSpec] = &[
        CTA_TEXT,
        CTA_BUTTON_TEXT,
        CTA_BUTTON_LINK,
        CTA_STYLE,
        CTA_BACKGROUND_IMAGE,
        CTA_OVERLAY_OPACITY,
    ];

    fn clean(reader: &mut FieldReader<'_>) -> Self {
        Self {
            text: reader.text(&CTA_TEXT),
            button_text: reader.text(&CTA_BUTTON_TEXT),
            button_link: reader.text(&CTA_BUTTON_LINK),
            style: reader.choice(&CTA_STYLE).unwrap_or_default(),
            background_image: reader.image(&CTA_BACKGROUND_IMAGE),
            overlay_opacity: reader.decimal(&CTA_OVERLAY_OPACITY),
        }
    }

    fn image_refs(&self) -> Vec<(String, Uuid)> {
        image_ref("background_image", self.background_image)
            .into_iter()
            .collect()
    }
}

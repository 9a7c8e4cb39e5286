//! Admin panel layouts.
//!
//! Describes how the editable fields of each model are grouped for an admin
//! form, alongside the field specs themselves. Served at
//! `/admin/api/panels/{model}`.

use serde::Serialize;

use super::fields::FieldSpec;
use crate::models::{HeroSlideInput, HomePageInput, SiteSettingsInput};

/// One element of an edit form layout.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum Panel {
    /// A single field.
    Field { field: &'static str },
    /// Several fields under a shared heading.
    MultiField {
        heading: &'static str,
        children: Vec<Panel>,
    },
    /// Inline editing of related child records.
    Inline {
        relation: &'static str,
        label: &'static str,
    },
}

fn field(name: &'static str) -> Panel {
    Panel::Field { field: name }
}

/// A named tab of panels.
#[derive(Debug, Clone, Serialize)]
pub struct PanelTab {
    pub heading: &'static str,
    pub panels: Vec<Panel>,
}

/// Complete edit-form layout for one model.
#[derive(Debug, Clone, Serialize)]
pub struct PanelLayout {
    pub model: &'static str,
    pub tabs: Vec<PanelTab>,
    pub fields: &'static [FieldSpec],
}

impl PanelLayout {
    /// Every field named by a panel, in layout order.
    pub fn field_names(&self) -> Vec<&'static str> {
        fn collect(panels: &[Panel], out: &mut Vec<&'static str>) {
            for panel in panels {
                match panel {
                    Panel::Field { field } => out.push(*field),
                    Panel::MultiField { children, .. } => collect(children, out),
                    Panel::Inline { .. } => {}
                }
            }
        }

        let mut names = Vec::new();
        for tab in &self.tabs {
            collect(&tab.panels, &mut names);
        }
        names
    }
}

pub fn home_page_panels() -> PanelLayout {
    PanelLayout {
        model: "home_page",
        tabs: vec![
            PanelTab {
                heading: "Content",
                panels: vec![
                    field("title"),
                    field("tagline"),
                    field("body"),
                    Panel::Inline {
                        relation: "hero_slides",
                        label: "Hero Slides",
                    },
                ],
            },
            PanelTab {
                heading: "Promote",
                panels: vec![
                    field("slug"),
                    Panel::MultiField {
                        heading: "Homepage Settings",
                        children: vec![
                            field("meta_description"),
                            field("show_in_navigation"),
                            field("footer_note"),
                        ],
                    },
                ],
            },
            PanelTab {
                heading: "Settings",
                panels: vec![field("live")],
            },
        ],
        fields: HomePageInput::FIELDS,
    }
}

pub fn hero_slide_panels() -> PanelLayout {
    PanelLayout {
        model: "hero_slide",
        tabs: vec![PanelTab {
            heading: "Content",
            panels: vec![
                field("title"),
                field("subtitle"),
                field("image"),
                field("button_text"),
                field("button_link"),
            ],
        }],
        fields: HeroSlideInput::FIELDS,
    }
}

pub fn site_settings_panels() -> PanelLayout {
    PanelLayout {
        model: "site_settings",
        tabs: vec![PanelTab {
            heading: "Settings",
            panels: vec![
                Panel::MultiField {
                    heading: "Company Info",
                    children: vec![
                        field("site_logo"),
                        field("company_email"),
                        field("company_phone"),
                        field("company_address"),
                    ],
                },
                Panel::MultiField {
                    heading: "Design & Rebranding",
                    children: vec![
                        field("theme_color"),
                        field("linkedin_url"),
                        field("twitter_url"),
                        field("facebook_url"),
                    ],
                },
            ],
        }],
        fields: SiteSettingsInput::FIELDS,
    }
}

/// Layout for a model by name.
pub fn layout_for(model: &str) -> Option<PanelLayout> {
    match model {
        "home_page" => Some(home_page_panels()),
        "hero_slide" => Some(hero_slide_panels()),
        "site_settings" => Some(site_settings_panels()),
        _ => None,
    }
}

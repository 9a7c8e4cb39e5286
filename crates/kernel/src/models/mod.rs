//! Database models.

pub mod hero_slide;
pub mod home_page;
pub mod image;
pub mod site;
pub mod site_settings;

pub use hero_slide::{HeroSlide, HeroSlideInput, Reorder};
pub use home_page::{HomePage, HomePageInput};
pub use image::{CreateImage, Image};
pub use site::{Site, SiteInput};
pub use site_settings::{SiteSettings, SiteSettingsInput, SocialLink};

use crate::content::fields::ValidationErrors;

/// A unique constraint and the field error reported when a write breaks it.
pub(crate) struct UniqueField {
    pub constraint: &'static str,
    pub field: &'static str,
    pub message: &'static str,
}

/// Map a write failure to an `anyhow` error.
///
/// A unique violation on one of `fields` becomes a bare [`ValidationErrors`],
/// which the HTTP layer reports as a field error. Anything else gets
/// `context` attached.
pub(crate) fn write_error(
    error: sqlx::Error,
    fields: &[UniqueField],
    context: &'static str,
) -> anyhow::Error {
    let violated = error
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .and_then(|db| db.constraint())
        .and_then(|name| fields.iter().find(|f| f.constraint == name));

    match violated {
        Some(unique) => ValidationErrors::single(unique.field, unique.message).into(),
        None => anyhow::Error::new(error).context(context),
    }
}

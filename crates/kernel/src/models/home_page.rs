//! Homepage model.
//!
//! A page owns a content stream plus scalar metadata. Hero slides hang off
//! it in their own table (see [`super::hero_slide`]).

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::content::fields::{FieldKind, FieldReader, FieldSpec, ValidationErrors};
use crate::content::stream::ContentStream;
use crate::home_api::HomeApiResponse;

use super::{UniqueField, write_error};

/// Company name exposed to every page template.
pub const COMPANY_NAME: &str = "VirtuSys Global";

/// SEO description used when a page has no meta description.
pub const DEFAULT_SEO_DESCRIPTION: &str = "Empowering global businesses through IT innovation.";

/// Type identifier used by templates and the pages API.
pub const PAGE_TYPE: &str = "home.HomePage";

#[allow(clippy::expect_used)]
static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("valid regex literal"));

/// Homepage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HomePage {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,
    pub title: String,
    /// URL segment, unique across pages.
    pub slug: String,
    /// Whether the page is published.
    pub live: bool,
    pub tagline: String,
    /// Ordered content blocks.
    #[sqlx(json)]
    pub body: ContentStream,
    pub meta_description: String,
    pub show_in_navigation: bool,
    pub footer_note: String,
    /// Unix timestamp when created.
    pub created: i64,
    /// Unix timestamp when last changed.
    pub changed: i64,
}

const TITLE: FieldSpec = FieldSpec::char("title", "Title").required().max_length(255);
const SLUG_FIELD: FieldSpec = FieldSpec::char("slug", "Slug")
    .max_length(255)
    .help("The name of the page as it will appear in URLs. Derived from the title when blank.");
const LIVE: FieldSpec = FieldSpec::boolean("live", "Live");
const TAGLINE: FieldSpec = FieldSpec::char("tagline", "Tagline")
    .max_length(255)
    .help("A short tagline or slogan for the homepage.");
const BODY: FieldSpec = FieldSpec::new("body", "Body", FieldKind::Stream);
const META_DESCRIPTION: FieldSpec = FieldSpec::text("meta_description", "Meta description")
    .max_length(3000)
    .help("SEO meta description for search engines.");
const SHOW_IN_NAVIGATION: FieldSpec = FieldSpec::boolean("show_in_navigation", "Show in navigation")
    .help("Display this page in the main site navigation.");
const FOOTER_NOTE: FieldSpec = FieldSpec::char("footer_note", "Footer note")
    .max_length(255)
    .help("Optional footer text for homepage-specific notes.");

/// Validated input for creating or updating a page.
#[derive(Debug, Clone, PartialEq)]
pub struct HomePageInput {
    pub title: String,
    pub slug: String,
    pub live: bool,
    pub tagline: String,
    pub body: ContentStream,
    pub meta_description: String,
    pub show_in_navigation: bool,
    pub footer_note: String,
}

impl HomePageInput {
    pub const FIELDS: &'static [FieldSpec] = &[
        TITLE,
        SLUG_FIELD,
        LIVE,
        TAGLINE,
        BODY,
        META_DESCRIPTION,
        SHOW_IN_NAVIGATION,
        FOOTER_NOTE,
    ];

    /// Validate submitted page data. Checks needing the database (slug
    /// uniqueness, image existence) are done by [`HomePage::check_constraints`].
    pub fn clean(data: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(data);

        let title = reader.text(&TITLE);
        let mut slug = reader.text(&SLUG_FIELD);
        if slug.is_empty() {
            slug = slugify(&title);
            if slug.is_empty() && !title.is_empty() {
                reader.add_error(SLUG_FIELD.name, "Could not derive a slug from the title.");
            }
        } else if !SLUG.is_match(&slug) {
            reader.add_error(
                SLUG_FIELD.name,
                "Enter a valid slug consisting of lowercase letters, numbers, underscores or hyphens.",
            );
        }

        let live = reader.boolean(&LIVE, true);
        let tagline = reader.text(&TAGLINE);
        let body_path = reader.path(BODY.name);
        let body = match ContentStream::clean(reader.value(BODY.name), &body_path) {
            Ok(body) => body,
            Err(errors) => {
                reader.merge(errors);
                ContentStream::default()
            }
        };
        let meta_description = reader.text(&META_DESCRIPTION);
        let show_in_navigation = reader.boolean(&SHOW_IN_NAVIGATION, true);
        let footer_note = reader.text(&FOOTER_NOTE);

        reader.finish(Self {
            title,
            slug,
            live,
            tagline,
            body,
            meta_description,
            show_in_navigation,
            footer_note,
        })
    }
}

/// Lowercase the text and join its alphanumeric runs with hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug.truncate(255);
    slug
}

const SLUG_UNIQUE: &[UniqueField] = &[UniqueField {
    constraint: "home_page_slug_unique",
    field: "slug",
    message: "A page with this slug already exists.",
}];

const COLUMNS: &str = "id, title, slug, live, tagline, body, meta_description, show_in_navigation, footer_note, created, changed";

impl HomePage {
    /// SEO description for the page: its meta description, or the
    /// company-wide fallback.
    pub fn seo_description(&self) -> &str {
        if self.meta_description.trim().is_empty() {
            DEFAULT_SEO_DESCRIPTION
        } else {
            &self.meta_description
        }
    }

    /// Augment a base rendering context with the page-level keys.
    pub fn get_context(&self, mut context: tera::Context) -> tera::Context {
        context.insert("page", self);
        context.insert("company_name", COMPANY_NAME);
        context.insert("seo_description", self.seo_description());
        context.insert("api_data", &HomeApiResponse::get_data());
        context
    }

    /// Database checks that cannot run during field cleaning.
    pub async fn check_constraints(
        pool: &PgPool,
        input: &HomePageInput,
        exclude: Option<Uuid>,
    ) -> Result<ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !input.slug.is_empty() && Self::slug_taken(pool, &input.slug, exclude).await? {
            errors.add(
                SLUG_FIELD.name,
                format!("The slug '{}' is already in use.", input.slug),
            );
        }
        let refs = input.body.image_refs(BODY.name);
        errors.merge(super::Image::check_refs(pool, &refs).await?);
        Ok(errors)
    }

    /// Whether another page already uses the slug.
    pub async fn slug_taken(pool: &PgPool, slug: &str, exclude: Option<Uuid>) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM home_page WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(pool)
        .await
        .context("failed to check slug uniqueness")?;

        Ok(taken)
    }

    /// Create a new page.
    pub async fn create(pool: &PgPool, input: &HomePageInput) -> Result<Self> {
        let id = Uuid::now_v7();
        let now = chrono::Utc::now().timestamp();

        let page = sqlx::query_as::<_, HomePage>(&format!(
            r#"
            INSERT INTO home_page (id, title, slug, live, tagline, body, meta_description,
                                   show_in_navigation, footer_note, created, changed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(input.live)
        .bind(&input.tagline)
        .bind(sqlx::types::Json(&input.body))
        .bind(&input.meta_description)
        .bind(input.show_in_navigation)
        .bind(&input.footer_note)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(|e| write_error(e, SLUG_UNIQUE, "failed to create home page"))?;

        Ok(page)
    }

    /// Replace every editable field of a page.
    pub async fn update(pool: &PgPool, id: Uuid, input: &HomePageInput) -> Result<Option<Self>> {
        let now = chrono::Utc::now().timestamp();

        let page = sqlx::query_as::<_, HomePage>(&format!(
            r#"
            UPDATE home_page
            SET title = $2, slug = $3, live = $4, tagline = $5, body = $6,
                meta_description = $7, show_in_navigation = $8, footer_note = $9, changed = $10
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(input.live)
        .bind(&input.tagline)
        .bind(sqlx::types::Json(&input.body))
        .bind(&input.meta_description)
        .bind(input.show_in_navigation)
        .bind(&input.footer_note)
        .bind(now)
        .fetch_optional(pool)
        .await
        .map_err(|e| write_error(e, SLUG_UNIQUE, "failed to update home page"))?;

        Ok(page)
    }

    /// Delete a page. Its hero slides go with it.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM home_page WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete home page")?;

        Ok(result.rows_affected() > 0)
    }

    /// Find a page by ID, live or not.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let page = sqlx::query_as::<_, HomePage>(&format!(
            "SELECT {COLUMNS} FROM home_page WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch home page by id")?;

        Ok(page)
    }

    /// Find a live page by slug.
    pub async fn find_live_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let page = sqlx::query_as::<_, HomePage>(&format!(
            "SELECT {COLUMNS} FROM home_page WHERE slug = $1 AND live"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to fetch home page by slug")?;

        Ok(page)
    }

    /// The oldest live page, used when no site root is configured.
    pub async fn first_live(pool: &PgPool) -> Result<Option<Self>> {
        let page = sqlx::query_as::<_, HomePage>(&format!(
            "SELECT {COLUMNS} FROM home_page WHERE live ORDER BY created, id LIMIT 1"
        ))
        .fetch_optional(pool)
        .await
        .context("failed to fetch first live page")?;

        Ok(page)
    }

    /// List all pages, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let pages = sqlx::query_as::<_, HomePage>(&format!(
            "SELECT {COLUMNS} FROM home_page ORDER BY created, id"
        ))
        .fetch_all(pool)
        .await
        .context("failed to list home pages")?;

        Ok(pages)
    }

    /// List live pages, oldest first.
    pub async fn list_live(pool: &PgPool) -> Result<Vec<Self>> {
        let pages = sqlx::query_as::<_, HomePage>(&format!(
            "SELECT {COLUMNS} FROM home_page WHERE live ORDER BY created, id"
        ))
        .fetch_all(pool)
        .await
        .context("failed to list live pages")?;

        Ok(pages)
    }

    /// Live pages flagged for the main navigation.
    pub async fn list_in_navigation(pool: &PgPool) -> Result<Vec<Self>> {
        let pages = sqlx::query_as::<_, HomePage>(&format!(
            "SELECT {COLUMNS} FROM home_page WHERE live AND show_in_navigation ORDER BY created, id"
        ))
        .fetch_all(pool)
        .await
        .context("failed to list navigation pages")?;

        Ok(pages)
    }
}

//! Image asset model.
//!
//! Images are stored by reference only: blocks, slides and settings hold an
//! image id, and templates receive the resolved record.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::content::fields::{FieldReader, FieldSpec, ValidationErrors, normalize_url};

/// Image record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Image {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,
    pub title: String,
    /// Public URL or site-relative path of the file.
    pub file_url: String,
    pub width: i32,
    pub height: i32,
    /// Unix timestamp when created.
    pub created: i64,
}

const TITLE: FieldSpec = FieldSpec::char("title", "Title").required().max_length(255);
const FILE_URL: FieldSpec = FieldSpec::char("file_url", "File URL")
    .required()
    .max_length(500)
    .help("Absolute URL or a path starting with '/'.");
const WIDTH: FieldSpec = FieldSpec::integer("width", "Width");
const HEIGHT: FieldSpec = FieldSpec::integer("height", "Height");

/// Input for registering an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateImage {
    pub title: String,
    pub file_url: String,
    pub width: i32,
    pub height: i32,
}

impl CreateImage {
    pub const FIELDS: &'static [FieldSpec] = &[TITLE, FILE_URL, WIDTH, HEIGHT];

    pub fn clean(data: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(data);
        let title = reader.text(&TITLE);
        let mut file_url = reader.text(&FILE_URL);
        if !file_url.is_empty() && !file_url.starts_with('/') {
            match normalize_url(&file_url) {
                Some(url) => file_url = url,
                None => reader.add_error(FILE_URL.name, "Enter a valid URL."),
            }
        }
        let width = dimension(&mut reader, &WIDTH);
        let height = dimension(&mut reader, &HEIGHT);

        reader.finish(Self {
            title,
            file_url,
            width,
            height,
        })
    }
}

fn dimension(reader: &mut FieldReader<'_>, spec: &FieldSpec) -> i32 {
    let Some(value) = reader.integer(spec) else {
        return 0;
    };
    match i32::try_from(value) {
        Ok(v) if v >= 0 => v,
        _ => {
            reader.add_error(spec.name, "Ensure this value is greater than or equal to 0.");
            0
        }
    }
}

impl Image {
    /// Register a new image.
    pub async fn create(pool: &PgPool, input: &CreateImage) -> Result<Self> {
        let id = Uuid::now_v7();
        let now = chrono::Utc::now().timestamp();

        let image = sqlx::query_as::<_, Image>(
            r#"
            INSERT INTO image (id, title, file_url, width, height, created)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, file_url, width, height, created
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.file_url)
        .bind(input.width)
        .bind(input.height)
        .bind(now)
        .fetch_one(pool)
        .await
        .context("failed to create image")?;

        Ok(image)
    }

    /// Find an image by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let image = sqlx::query_as::<_, Image>(
            "SELECT id, title, file_url, width, height, created FROM image WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch image by id")?;

        Ok(image)
    }

    /// Load several images at once, keyed by id. Unknown ids are skipped.
    pub async fn find_many(pool: &PgPool, ids: &[Uuid]) -> Result<HashMap<Uuid, Self>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let images = sqlx::query_as::<_, Image>(
            "SELECT id, title, file_url, width, height, created FROM image WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
        .context("failed to fetch images")?;

        Ok(images.into_iter().map(|image| (image.id, image)).collect())
    }

    /// List all images, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let images = sqlx::query_as::<_, Image>(
            "SELECT id, title, file_url, width, height, created FROM image ORDER BY created DESC, id DESC",
        )
        .fetch_all(pool)
        .await
        .context("failed to list images")?;

        Ok(images)
    }

    /// Delete an image.
    ///
    /// Hero slides and site settings lose the reference via `ON DELETE SET
    /// NULL`. Stream blocks keep the id and render without the image.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM image WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete image")?;

        Ok(result.rows_affected() > 0)
    }

    /// Report every reference whose image does not exist.
    pub async fn check_refs(pool: &PgPool, refs: &[(String, Uuid)]) -> Result<ValidationErrors> {
        let ids: Vec<Uuid> = refs
            .iter()
            .map(|(_, id)| *id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(ValidationErrors::new());
        }

        let existing: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM image WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(pool)
            .await
            .context("failed to check image references")?;
        let existing: HashSet<Uuid> = existing.into_iter().collect();

        let mut errors = ValidationErrors::new();
        for (path, id) in refs {
            if !existing.contains(id) {
                errors.add(path.clone(), "Select a valid image.");
            }
        }
        Ok(errors)
    }
}

//! Hero slide model.
//!
//! Slides belong to one page and are ordered by `sort_order`. Positions are
//! kept unique and contiguous (`0..n`) per page: new slides are appended,
//! deletes compact the remaining positions, and reorders rewrite them all.
//! Every position change runs in one transaction holding the page row lock.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::content::fields::{FieldKind, FieldReader, FieldSpec, REQUIRED, ValidationErrors};

/// Hero slide record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HeroSlide {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,
    /// Owning page.
    pub page_id: Uuid,
    /// Zero-based position within the page.
    pub sort_order: i32,
    pub title: String,
    pub subtitle: String,
    pub image_id: Option<Uuid>,
    pub button_text: String,
    pub button_link: String,
}

const TITLE: FieldSpec = FieldSpec::char("title", "Title").required().max_length(255);
const SUBTITLE: FieldSpec = FieldSpec::char("subtitle", "Subtitle").max_length(255);
const IMAGE: FieldSpec = FieldSpec::image("image", "Image");
const BUTTON_TEXT: FieldSpec = FieldSpec::char("button_text", "Button text").max_length(255);
const BUTTON_LINK: FieldSpec = FieldSpec::url("button_link", "Button link").max_length(200);
const ORDER: FieldSpec = FieldSpec::new("order", "Order", FieldKind::List { item: "hero_slide" });

/// Validated input for creating or updating a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroSlideInput {
    pub title: String,
    pub subtitle: String,
    pub image_id: Option<Uuid>,
    pub button_text: String,
    pub button_link: String,
}

impl HeroSlideInput {
    pub const FIELDS: &'static [FieldSpec] = &[TITLE, SUBTITLE, IMAGE, BUTTON_TEXT, BUTTON_LINK];

    pub fn clean(data: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(data);
        let input = Self {
            title: reader.text(&TITLE),
            subtitle: reader.text(&SUBTITLE),
            image_id: reader.image(&IMAGE),
            button_text: reader.text(&BUTTON_TEXT),
            button_link: reader.text(&BUTTON_LINK),
        };
        reader.finish(input)
    }

    /// Image reference with its form path, if set.
    pub fn image_refs(&self) -> Vec<(String, Uuid)> {
        self.image_id
            .map(|id| (IMAGE.name.to_string(), id))
            .into_iter()
            .collect()
    }
}

/// Read the slide ids of a reorder request (`{"order": [id, ...]}`).
pub fn clean_order(data: &Value) -> Result<Vec<Uuid>, ValidationErrors> {
    let mut reader = FieldReader::new(data);
    let mut order = Vec::new();

    match reader.value(ORDER.name) {
        None => reader.add_error(ORDER.name, REQUIRED),
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                match item.as_str().map(|s| Uuid::parse_str(s.trim())) {
                    Some(Ok(id)) => order.push(id),
                    _ => reader.add_error(&format!("order.{index}"), "Enter a valid slide id."),
                }
            }
        }
        Some(_) => reader.add_error(ORDER.name, "Enter a list of slide ids."),
    }

    reader.finish(order)
}

/// Check that `order` is a permutation of the page's current slide ids.
pub fn check_order(current: &[Uuid], order: &[Uuid]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let known: HashSet<Uuid> = current.iter().copied().collect();
    let mut seen = HashSet::with_capacity(order.len());

    for (index, id) in order.iter().enumerate() {
        if !known.contains(id) {
            errors.add(
                format!("order.{index}"),
                format!("Slide {id} does not belong to this page."),
            );
        } else if !seen.insert(*id) {
            errors.add(format!("order.{index}"), format!("Slide {id} is listed twice."));
        }
    }

    let missing = current.iter().filter(|id| !seen.contains(*id)).count();
    if errors.is_empty() && missing > 0 {
        errors.add("order", format!("{missing} slide(s) missing from the new order."));
    }

    errors.into_result()
}

/// Outcome of [`HeroSlide::reorder`].
#[derive(Debug)]
pub enum Reorder {
    /// Slides in their new order.
    Done(Vec<HeroSlide>),
    PageNotFound,
    /// The order was not a permutation of the page's slides.
    Invalid(ValidationErrors),
}

const COLUMNS: &str = "id, page_id, sort_order, title, subtitle, image_id, button_text, button_link";

impl HeroSlide {
    /// Slides of a page in display order.
    pub async fn list_for_page(pool: &PgPool, page_id: Uuid) -> Result<Vec<Self>> {
        let slides = sqlx::query_as::<_, HeroSlide>(&format!(
            "SELECT {COLUMNS} FROM hero_slide WHERE page_id = $1 ORDER BY sort_order"
        ))
        .bind(page_id)
        .fetch_all(pool)
        .await
        .context("failed to list hero slides")?;

        Ok(slides)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let slide = sqlx::query_as::<_, HeroSlide>(&format!(
            "SELECT {COLUMNS} FROM hero_slide WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch hero slide by id")?;

        Ok(slide)
    }

    /// Append a slide to the end of the page's list.
    ///
    /// Returns `None` if the page does not exist.
    pub async fn create(
        pool: &PgPool,
        page_id: Uuid,
        input: &HeroSlideInput,
    ) -> Result<Option<Self>> {
        let mut tx = pool.begin().await.context("failed to begin transaction")?;

        if !lock_page(&mut tx, page_id).await? {
            return Ok(None);
        }

        let next: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM hero_slide WHERE page_id = $1",
        )
        .bind(page_id)
        .fetch_one(&mut *tx)
        .await
        .context("failed to compute next slide position")?;

        let slide = sqlx::query_as::<_, HeroSlide>(&format!(
            r#"
            INSERT INTO hero_slide (id, page_id, sort_order, title, subtitle, image_id, button_text, button_link)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(page_id)
        .bind(next)
        .bind(&input.title)
        .bind(&input.subtitle)
        .bind(input.image_id)
        .bind(&input.button_text)
        .bind(&input.button_link)
        .fetch_one(&mut *tx)
        .await
        .context("failed to create hero slide")?;

        tx.commit().await.context("failed to commit transaction")?;
        Ok(Some(slide))
    }

    /// Update a slide's fields. Its position is unchanged.
    pub async fn update(pool: &PgPool, id: Uuid, input: &HeroSlideInput) -> Result<Option<Self>> {
        let slide = sqlx::query_as::<_, HeroSlide>(&format!(
            r#"
            UPDATE hero_slide
            SET title = $2, subtitle = $3, image_id = $4, button_text = $5, button_link = $6
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.subtitle)
        .bind(input.image_id)
        .bind(&input.button_text)
        .bind(&input.button_link)
        .fetch_optional(pool)
        .await
        .context("failed to update hero slide")?;

        Ok(slide)
    }

    /// Delete a slide and close the gap it leaves.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let mut tx = pool.begin().await.context("failed to begin transaction")?;

        let page_id: Option<Uuid> =
            sqlx::query_scalar("SELECT page_id FROM hero_slide WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .context("failed to fetch hero slide owner")?;
        let Some(page_id) = page_id else {
            return Ok(false);
        };

        if !lock_page(&mut tx, page_id).await? {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM hero_slide WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("failed to delete hero slide")?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE hero_slide h
            SET sort_order = (r.position - 1)::int
            FROM (
                SELECT id, ROW_NUMBER() OVER (ORDER BY sort_order) AS position
                FROM hero_slide
                WHERE page_id = $1
            ) r
            WHERE h.id = r.id AND h.sort_order <> (r.position - 1)::int
            "#,
        )
        .bind(page_id)
        .execute(&mut *tx)
        .await
        .context("failed to compact hero slide positions")?;

        tx.commit().await.context("failed to commit transaction")?;
        Ok(true)
    }

    /// Rewrite the page's slide positions to follow `order`.
    ///
    /// `order` must name every slide of the page exactly once.
    pub async fn reorder(pool: &PgPool, page_id: Uuid, order: &[Uuid]) -> Result<Reorder> {
        let mut tx = pool.begin().await.context("failed to begin transaction")?;

        if !lock_page(&mut tx, page_id).await? {
            return Ok(Reorder::PageNotFound);
        }

        let current: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM hero_slide WHERE page_id = $1 ORDER BY sort_order")
                .bind(page_id)
                .fetch_all(&mut *tx)
                .await
                .context("failed to load hero slide ids")?;

        if let Err(errors) = check_order(&current, order) {
            return Ok(Reorder::Invalid(errors));
        }

        // The (page_id, sort_order) constraint is deferred to commit.
        for (position, id) in order.iter().enumerate() {
            let position = i32::try_from(position).context("too many hero slides")?;
            sqlx::query("UPDATE hero_slide SET sort_order = $2 WHERE id = $1")
                .bind(id)
                .bind(position)
                .execute(&mut *tx)
                .await
                .context("failed to update hero slide position")?;
        }

        let slides = sqlx::query_as::<_, HeroSlide>(&format!(
            "SELECT {COLUMNS} FROM hero_slide WHERE page_id = $1 ORDER BY sort_order"
        ))
        .bind(page_id)
        .fetch_all(&mut *tx)
        .await
        .context("failed to reload hero slides")?;

        tx.commit().await.context("failed to commit transaction")?;
        Ok(Reorder::Done(slides))
    }
}

/// Lock the page row for the rest of the transaction. False if it is gone.
async fn lock_page(tx: &mut Transaction<'_, Postgres>, page_id: Uuid) -> Result<bool> {
    let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM home_page WHERE id = $1 FOR UPDATE")
        .bind(page_id)
        .fetch_optional(&mut **tx)
        .await
        .context("failed to lock home page")?;

    Ok(locked.is_some())
}

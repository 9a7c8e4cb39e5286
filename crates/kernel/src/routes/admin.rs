//! Admin JSON API.
//!
//! Every route is nested under `/admin/api` and guarded by
//! [`require_admin_token`]. Request bodies are raw JSON objects cleaned
//! field by field; failures come back as 422 with per-field messages.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::content::panels::{self, PanelLayout};
use crate::content::{BlockTypeDefinition, ContentBlock};
use crate::error::{AppError, AppResult};
use crate::middleware::require_admin_token;
use crate::models::hero_slide;
use crate::models::{
    CreateImage, HeroSlide, HomePage, Image, Site, SiteInput, SiteSettings, SiteSettingsInput,
};
use crate::state::AppState;

/// Create the admin API router.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/api/block-types", get(list_block_types))
        .route("/admin/api/block-types/{block_type}/validate", post(validate_block))
        .route("/admin/api/panels/{model}", get(panel_layout))
        .route("/admin/api/images", get(list_images).post(create_image))
        .route("/admin/api/images/{id}", get(get_image).delete(delete_image))
        .route("/admin/api/pages", get(list_pages).post(create_page))
        .route(
            "/admin/api/pages/{id}",
            get(get_page).put(update_page).delete(delete_page),
        )
        .route(
            "/admin/api/pages/{id}/hero-slides",
            get(list_slides).post(add_slide),
        )
        .route("/admin/api/pages/{id}/hero-slides/order", put(reorder_slides))
        .route(
            "/admin/api/hero-slides/{id}",
            put(update_slide).delete(delete_slide),
        )
        .route("/admin/api/sites", get(list_sites).post(create_site))
        .route("/admin/api/sites/{id}", get(get_site).put(update_site))
        .route(
            "/admin/api/sites/{id}/settings",
            get(get_settings).put(update_settings),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin_token))
}

// =============================================================================
// Block types and panels
// =============================================================================

async fn list_block_types(State(state): State<AppState>) -> Json<Vec<BlockTypeDefinition>> {
    Json(state.block_types().iter().cloned().collect())
}

/// Validate one block payload without saving it.
async fn validate_block(
    State(state): State<AppState>,
    Path(block_type): Path<String>,
    Json(data): Json<Value>,
) -> AppResult<Json<ContentBlock>> {
    if !state.block_types().contains(&block_type) {
        return Err(AppError::NotFound);
    }
    let block = state.block_types().validate_block(&block_type, &data)?;
    Ok(Json(block))
}

async fn panel_layout(Path(model): Path<String>) -> AppResult<Json<PanelLayout>> {
    panels::layout_for(&model).map(Json).ok_or(AppError::NotFound)
}

// =============================================================================
// Images
// =============================================================================

async fn list_images(State(state): State<AppState>) -> AppResult<Json<Vec<Image>>> {
    Ok(Json(Image::list(state.db()).await?))
}

async fn get_image(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Image>> {
    let image = Image::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(image))
}

async fn create_image(
    State(state): State<AppState>,
    Json(data): Json<Value>,
) -> AppResult<(StatusCode, Json<Image>)> {
    let input = CreateImage::clean(&data)?;
    let image = Image::create(state.db(), &input).await?;
    info!(image_id = %image.id, "image created");
    Ok((StatusCode::CREATED, Json(image)))
}

/// Delete an image. Slides and settings pointing at it lose the reference.
async fn delete_image(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    if !Image::delete(state.db(), id).await? {
        return Err(AppError::NotFound);
    }
    info!(image_id = %id, "image deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Pages
// =============================================================================

async fn list_pages(State(state): State<AppState>) -> AppResult<Json<Vec<HomePage>>> {
    Ok(Json(HomePage::list(state.db()).await?))
}

async fn get_page(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<HomePage>> {
    let page = state.pages().load(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(page))
}

async fn create_page(
    State(state): State<AppState>,
    Json(data): Json<Value>,
) -> AppResult<(StatusCode, Json<HomePage>)> {
    let page = state.pages().create_page(&data).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<Value>,
) -> AppResult<Json<HomePage>> {
    Ok(Json(state.pages().update_page(id, &data).await?))
}

async fn delete_page(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.pages().delete_page(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Hero slides
// =============================================================================

async fn list_slides(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
) -> AppResult<Json<Vec<HeroSlide>>> {
    Ok(Json(state.pages().slides(page_id).await?))
}

async fn add_slide(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
    Json(data): Json<Value>,
) -> AppResult<(StatusCode, Json<HeroSlide>)> {
    let slide = state.pages().add_slide(page_id, &data).await?;
    Ok((StatusCode::CREATED, Json(slide)))
}

async fn reorder_slides(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
    Json(data): Json<Value>,
) -> AppResult<Json<Vec<HeroSlide>>> {
    let order = hero_slide::clean_order(&data)?;
    Ok(Json(state.pages().reorder_slides(page_id, &order).await?))
}

async fn update_slide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<Value>,
) -> AppResult<Json<HeroSlide>> {
    Ok(Json(state.pages().update_slide(id, &data).await?))
}

async fn delete_slide(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.pages().delete_slide(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Sites and settings
// =============================================================================

async fn list_sites(State(state): State<AppState>) -> AppResult<Json<Vec<Site>>> {
    Ok(Json(Site::list(state.db()).await?))
}

async fn get_site(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Site>> {
    let site = Site::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(site))
}

async fn create_site(
    State(state): State<AppState>,
    Json(data): Json<Value>,
) -> AppResult<(StatusCode, Json<Site>)> {
    let input = SiteInput::clean(&data)?;
    Site::check_constraints(state.db(), &input, None)
        .await?
        .into_result()?;

    let site = Site::create(state.db(), &input).await?;
    info!(site_id = %site.id, hostname = %site.hostname, port = site.port, "site created");
    Ok((StatusCode::CREATED, Json(site)))
}

async fn update_site(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<Value>,
) -> AppResult<Json<Site>> {
    require_site(&state, id).await?;
    let input = SiteInput::clean(&data)?;
    Site::check_constraints(state.db(), &input, Some(id))
        .await?
        .into_result()?;

    let site = Site::update(state.db(), id, &input)
        .await?
        .ok_or(AppError::NotFound)?;
    info!(site_id = %id, "site updated");
    Ok(Json(site))
}

/// Settings for a site, with the social links derived from them.
async fn get_settings(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Value>> {
    require_site(&state, id).await?;
    let settings = SiteSettings::for_site(state.db(), id).await?;
    Ok(Json(settings_body(&settings)))
}

async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<Value>,
) -> AppResult<Json<Value>> {
    require_site(&state, id).await?;
    let input = SiteSettingsInput::clean(&data)?;
    Image::check_refs(state.db(), &input.image_refs())
        .await?
        .into_result()?;

    let settings = SiteSettings::update(state.db(), id, &input).await?;
    info!(site_id = %id, "site settings updated");
    Ok(Json(settings_body(&settings)))
}

async fn require_site(state: &AppState, id: Uuid) -> AppResult<Site> {
    Site::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)
}

fn settings_body(settings: &SiteSettings) -> Value {
    json!({
        "settings": settings,
        "social_links": settings.social_links(),
    })
}

//! Public page routes.
//!
//! `/` serves the root page of the site matched by `Host`, falling back to
//! the oldest live page. `/{slug}` serves any live page by slug.

use std::collections::HashMap;

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tracing::error;

use crate::content::render_stream;
use crate::error::{AppError, AppResult};
use crate::models::{HeroSlide, HomePage, Image, Site};
use crate::state::AppState;

use super::helpers::{html_escape, inject_site_context};

/// Template family for page rendering.
const PAGE_TEMPLATE: &str = "home_page";

/// Create the public page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root_page))
        .route("/{slug}", get(page_by_slug))
}

/// A hero slide with its image resolved for templates.
#[derive(Serialize)]
struct SlideView<'a> {
    #[serde(flatten)]
    slide: &'a HeroSlide,
    image: Option<&'a Image>,
}

async fn root_page(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let site = current_site(&state, &headers).await?;

    let mut page = None;
    if let Some(root_id) = site.as_ref().and_then(|s| s.root_page_id) {
        page = state.pages().load(root_id).await?.filter(|p| p.live);
    }
    if page.is_none() {
        page = HomePage::first_live(state.db()).await?;
    }
    let page = page.ok_or(AppError::NotFound)?;

    render_home_page(&state, site.as_ref(), &page).await
}

async fn page_by_slug(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let page = HomePage::find_live_by_slug(state.db(), &slug)
        .await?
        .ok_or(AppError::NotFound)?;
    let site = current_site(&state, &headers).await?;

    render_home_page(&state, site.as_ref(), &page).await
}

async fn current_site(state: &AppState, headers: &HeaderMap) -> AppResult<Option<Site>> {
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    Ok(Site::find_for_host(state.db(), host).await?)
}

/// Render a page with its stream, hero slides and site context.
async fn render_home_page(state: &AppState, site: Option<&Site>, page: &HomePage) -> AppResult<Response> {
    let slides = state.pages().slides(page.id).await?;

    let mut image_ids = page.body.image_ids();
    image_ids.extend(slides.iter().filter_map(|s| s.image_id));
    image_ids.sort_unstable();
    image_ids.dedup();
    let images: HashMap<_, _> = Image::find_many(state.db(), &image_ids).await?;

    let body_html = render_stream(state.theme(), &page.body, &images);
    let hero_slides: Vec<SlideView<'_>> = slides
        .iter()
        .map(|slide| SlideView {
            slide,
            image: slide.image_id.and_then(|id| images.get(&id)),
        })
        .collect();

    let mut context = tera::Context::new();
    inject_site_context(state, site, &mut context).await;
    context.insert("body_html", &body_html);
    context.insert("hero_slides", &hero_slides);
    let context = page.get_context(context);

    match state.theme().render_page(PAGE_TEMPLATE, &page.slug, &context) {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            error!(page = %page.id, error = ?e, "failed to render page");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!(
                    "<!DOCTYPE html>\n<html><head><title>{}</title></head>\n<body><h1>{}</h1><p>This page could not be rendered.</p></body></html>",
                    html_escape(&page.title),
                    html_escape(&page.title)
                )),
            )
                .into_response())
        }
    }
}

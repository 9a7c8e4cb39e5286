//! Public JSON API.
//!
//! - `GET /api/home`: the static company payload.
//! - `GET /api/v2/pages/`: live pages, with a selectable field set.
//! - `GET /api/v2/pages/{id}/`: one live page with every field.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::home_api::{HomeApiData, HomeApiResponse};
use crate::models::HomePage;
use crate::models::home_page::PAGE_TYPE;
use crate::state::AppState;

/// Fields a client may request through `?fields=`.
const PAGE_FIELDS: &[&str] = &[
    "title",
    "slug",
    "live",
    "tagline",
    "body",
    "meta_description",
    "show_in_navigation",
    "footer_note",
    "created",
    "changed",
];

/// Create the public API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/home", get(home_data))
        .route("/api/v2/pages", get(list_pages))
        .route("/api/v2/pages/", get(list_pages))
        .route("/api/v2/pages/{id}", get(get_page))
        .route("/api/v2/pages/{id}/", get(get_page))
}

async fn home_data() -> Json<HomeApiData> {
    Json(HomeApiResponse::get_data())
}

#[derive(Debug, Default, Deserialize)]
struct PagesQuery {
    #[serde(rename = "type")]
    page_type: Option<String>,
    fields: Option<String>,
}

async fn list_pages(
    State(state): State<AppState>,
    Query(query): Query<PagesQuery>,
) -> AppResult<Json<Value>> {
    if let Some(page_type) = query.page_type.as_deref() {
        if page_type != PAGE_TYPE {
            return Err(AppError::BadRequest(format!(
                "type '{page_type}' does not exist"
            )));
        }
    }
    let fields = requested_fields(query.fields.as_deref())?;

    let pages = HomePage::list_live(state.db()).await?;
    let items: Vec<Value> = pages
        .iter()
        .map(|page| page_item(page, &fields, state.site_url()))
        .collect();

    Ok(Json(json!({
        "meta": { "total_count": items.len() },
        "items": items,
    })))
}

async fn get_page(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Value>> {
    let page = state
        .pages()
        .load(id)
        .await?
        .filter(|page| page.live)
        .ok_or(AppError::NotFound)?;

    Ok(Json(page_item(&page, PAGE_FIELDS, state.site_url())))
}

/// Parse `?fields=`: a comma list of known field names, or `*` for all.
fn requested_fields(raw: Option<&str>) -> AppResult<Vec<&'static str>> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(Vec::new());
    };
    if raw == "*" {
        return Ok(PAGE_FIELDS.to_vec());
    }

    let mut fields = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let Some(field) = PAGE_FIELDS.iter().find(|f| **f == name) else {
            return Err(AppError::BadRequest(format!(
                "unknown field '{name}'"
            )));
        };
        if !fields.contains(field) {
            fields.push(*field);
        }
    }
    Ok(fields)
}

/// Serialize a page as an API item: id, meta, title, then the requested fields.
fn page_item(page: &HomePage, fields: &[&str], site_url: &str) -> Value {
    let mut item = Map::new();
    item.insert("id".to_string(), json!(page.id));
    item.insert(
        "meta".to_string(),
        json!({
            "type": PAGE_TYPE,
            "slug": page.slug,
            "html_url": format!("{site_url}/{}", page.slug),
        }),
    );
    item.insert("title".to_string(), json!(page.title));

    for field in fields {
        let value = match *field {
            "title" => continue,
            "slug" => json!(page.slug),
            "live" => json!(page.live),
            "tagline" => json!(page.tagline),
            "body" => json!(page.body),
            "meta_description" => json!(page.meta_description),
            "show_in_navigation" => json!(page.show_in_navigation),
            "footer_note" => json!(page.footer_note),
            "created" => json!(page.created),
            "changed" => json!(page.changed),
            _ => continue,
        };
        item.insert((*field).to_string(), value);
    }
    Value::Object(item)
}

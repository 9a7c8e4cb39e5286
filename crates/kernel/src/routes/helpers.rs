//! Shared route helpers for page rendering.

use serde::Serialize;
use tracing::warn;

use crate::models::{HomePage, Image, Site, SiteSettings};
use crate::state::AppState;

/// A navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub title: String,
    pub url: String,
}

/// Public URL of a page: `/` for the site's root page, `/{slug}` otherwise.
pub fn page_url(site: Option<&Site>, page: &HomePage) -> String {
    if site.and_then(|s| s.root_page_id) == Some(page.id) {
        "/".to_string()
    } else {
        format!("/{}", page.slug)
    }
}

/// Inject site-wide context variables into a Tera context.
///
/// Adds: `site_name`, `settings`, `site_logo`, `social_links`, `navigation`.
/// Lookup failures are logged and the keys fall back to empty values so a
/// page still renders.
pub async fn inject_site_context(state: &AppState, site: Option<&Site>, context: &mut tera::Context) {
    let site_name = site
        .map(|s| s.site_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(crate::models::home_page::COMPANY_NAME);
    context.insert("site_name", site_name);

    let settings = match site {
        Some(site) => SiteSettings::for_site(state.db(), site.id)
            .await
            .inspect_err(|e| warn!(site = %site.id, error = ?e, "failed to load site settings"))
            .ok(),
        None => None,
    };

    let site_logo = match settings.as_ref().and_then(|s| s.site_logo_id) {
        Some(id) => Image::find_by_id(state.db(), id)
            .await
            .inspect_err(|e| warn!(image = %id, error = ?e, "failed to load site logo"))
            .ok()
            .flatten(),
        None => None,
    };

    let social_links = settings
        .as_ref()
        .map(SiteSettings::social_links)
        .unwrap_or_default();
    context.insert("settings", &settings);
    context.insert("site_logo", &site_logo);
    context.insert("social_links", &social_links);

    let navigation: Vec<NavLink> = HomePage::list_in_navigation(state.db())
        .await
        .inspect_err(|e| warn!(error = ?e, "failed to load navigation"))
        .unwrap_or_default()
        .iter()
        .map(|page| NavLink {
            title: page.title.clone(),
            url: page_url(site, page),
        })
        .collect();
    context.insert("navigation", &navigation);
}

/// HTML-escape a string for safe output.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

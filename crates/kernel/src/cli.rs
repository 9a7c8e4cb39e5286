//! Command-line interface for the `virtusys` binary.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing::info;

use crate::config::Config;
use crate::content::PageService;
use crate::db;
use crate::home_api::HomeApiResponse;
use crate::models::{Site, SiteInput, SiteSettings, SiteSettingsInput};
use crate::routes;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about = "VirtuSys marketing site server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Create a default site and a demo homepage if none exist
    Seed,
}

impl Cli {
    /// Run the selected command.
    pub async fn run(self, config: Config) -> Result<()> {
        match self.command.unwrap_or(Commands::Serve) {
            Commands::Serve => serve(config).await,
            Commands::Migrate => migrate(&config).await,
            Commands::Seed => seed(&config).await,
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;
    info!("Database connection established");

    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

async fn migrate(config: &Config) -> Result<()> {
    let pool = db::create_pool(config).await?;
    db::run_migrations(&pool).await
}

async fn seed(config: &Config) -> Result<()> {
    let pool = db::create_pool(config).await?;
    db::run_migrations(&pool).await?;

    if !Site::list(&pool).await?.is_empty() {
        info!("sites already exist, nothing to seed");
        return Ok(());
    }

    let pages = PageService::new(pool.clone());
    let page = pages.create_page(&demo_page()).await?;
    for slide in demo_slides() {
        pages.add_slide(page.id, &slide).await?;
    }

    let site_input = SiteInput::clean(&json!({
        "hostname": "localhost",
        "port": config.port,
        "site_name": crate::models::home_page::COMPANY_NAME,
        "root_page": page.id,
        "is_default_site": true,
    }))?;
    let site = Site::create(&pool, &site_input).await?;

    let contact = HomeApiResponse::get_data().contact;
    let settings_input = SiteSettingsInput::clean(&json!({
        "company_email": contact.email,
        "company_phone": contact.phone,
        "company_address": contact.address,
        "theme_color": "#0b5fff",
    }))?;
    SiteSettings::update(&pool, site.id, &settings_input).await?;

    info!(site_id = %site.id, page_id = %page.id, slug = %page.slug, "seeded default site");
    Ok(())
}

/// A homepage with one block of every type.
fn demo_page() -> Value {
    let data = HomeApiResponse::get_data();
    let services: Vec<Value> = data
        .services
        .iter()
        .map(|s| {
            json!({
                "title": s.title,
                "description": s.description,
                "link_text": "Learn more",
            })
        })
        .collect();

    json!({
        "title": "Home",
        "slug": "home",
        "tagline": data.overview,
        "meta_description": data.overview,
        "body": [
            {
                "type": "hero",
                "value": {
                    "headline": data.company,
                    "subheadline": data.overview,
                    "button_text": "Talk to us",
                    "button_link": "https://virtusysglobal.com/contact",
                }
            },
            {
                "type": "services_overview",
                "value": {
                    "section_title": "What we do",
                    "services": services,
                }
            },
            {
                "type": "stats",
                "value": {
                    "section_title": "By the numbers",
                    "stats": [
                        { "label": "Clients", "value": "250+" },
                        { "label": "Countries", "value": "18" },
                        { "label": "Uptime", "value": "99.99%" },
                    ],
                }
            },
            {
                "type": "testimonial_section",
                "value": {
                    "section_title": "What clients say",
                    "testimonials": [
                        {
                            "client_name": "Dana Whitfield",
                            "company": "Northwind Logistics",
                            "quote": "The migration finished a month early and our costs dropped.",
                            "rating": 5,
                        }
                    ],
                }
            },
            {
                "type": "cta",
                "value": {
                    "text": "Ready to modernise your infrastructure?",
                    "button_text": "Get in touch",
                    "button_link": "https://virtusysglobal.com/contact",
                    "style": "primary",
                }
            },
        ],
    })
}

fn demo_slides() -> Vec<Value> {
    vec![
        json!({
            "title": "Cloud without compromise",
            "subtitle": "Migrations planned, run and supported end to end.",
            "button_text": "Our services",
            "button_link": "https://virtusysglobal.com/services",
        }),
        json!({
            "title": "Security that keeps pace",
            "subtitle": "Proactive defence for every layer of your stack.",
        }),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::HeroSlideInput;
    use crate::models::HomePageInput;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["virtusys"]).unwrap();
        assert_eq!(cli.command, None);
        let cli = Cli::try_parse_from(["virtusys", "seed"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Seed));
        assert!(Cli::try_parse_from(["virtusys", "launch"]).is_err());
    }

    #[test]
    fn demo_content_is_valid() {
        let page = HomePageInput::clean(&demo_page()).unwrap();
        assert_eq!(page.body.len(), 5);
        for slide in demo_slides() {
            HeroSlideInput::clean(&slide).unwrap();
        }
    }
}

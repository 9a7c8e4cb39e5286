//! Global site settings.
//!
//! One row per site, keyed by the site id. The row is created with empty
//! values the first time it is read, so rendering never has to handle a
//! missing record.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::content::fields::{FieldReader, FieldSpec, ValidationErrors};

/// Settings record for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SiteSettings {
    pub site_id: Uuid,
    pub site_logo_id: Option<Uuid>,
    pub company_email: String,
    pub company_phone: String,
    pub company_address: String,
    pub linkedin_url: String,
    pub twitter_url: String,
    pub facebook_url: String,
    pub theme_color: String,
    /// Unix timestamp of the last edit.
    pub updated: i64,
}

const SITE_LOGO: FieldSpec = FieldSpec::image("site_logo", "Site logo");
const COMPANY_EMAIL: FieldSpec = FieldSpec::email("company_email", "Company email").max_length(254);
const COMPANY_PHONE: FieldSpec = FieldSpec::char("company_phone", "Company phone").max_length(20);
const COMPANY_ADDRESS: FieldSpec =
    FieldSpec::char("company_address", "Company address").max_length(255);
const LINKEDIN_URL: FieldSpec = FieldSpec::url("linkedin_url", "LinkedIn URL").max_length(200);
const TWITTER_URL: FieldSpec = FieldSpec::url("twitter_url", "Twitter URL").max_length(200);
const FACEBOOK_URL: FieldSpec = FieldSpec::url("facebook_url", "Facebook URL").max_length(200);
const THEME_COLOR: FieldSpec = FieldSpec::char("theme_color", "Theme color")
    .max_length(20)
    .help("Primary brand color (hex).");

/// Validated settings input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteSettingsInput {
    pub site_logo_id: Option<Uuid>,
    pub company_email: String,
    pub company_phone: String,
    pub company_address: String,
    pub linkedin_url: String,
    pub twitter_url: String,
    pub facebook_url: String,
    pub theme_color: String,
}

impl SiteSettingsInput {
    pub const FIELDS: &'static [FieldSpec] = &[
        SITE_LOGO,
        COMPANY_EMAIL,
        COMPANY_PHONE,
        COMPANY_ADDRESS,
        LINKEDIN_URL,
        TWITTER_URL,
        FACEBOOK_URL,
        THEME_COLOR,
    ];

    pub fn clean(data: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(data);
        let input = Self {
            site_logo_id: reader.image(&SITE_LOGO),
            company_email: reader.text(&COMPANY_EMAIL),
            company_phone: reader.text(&COMPANY_PHONE),
            company_address: reader.text(&COMPANY_ADDRESS),
            linkedin_url: reader.text(&LINKEDIN_URL),
            twitter_url: reader.text(&TWITTER_URL),
            facebook_url: reader.text(&FACEBOOK_URL),
            theme_color: reader.text(&THEME_COLOR),
        };
        reader.finish(input)
    }

    pub fn image_refs(&self) -> Vec<(String, Uuid)> {
        self.site_logo_id
            .map(|id| (SITE_LOGO.name.to_string(), id))
            .into_iter()
            .collect()
    }
}

/// A social profile link for templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub network: &'static str,
    pub url: String,
}

const COLUMNS: &str = "site_id, site_logo_id, company_email, company_phone, company_address, linkedin_url, twitter_url, facebook_url, theme_color, updated";

impl SiteSettings {
    /// Settings for a site, creating the empty row on first access.
    pub async fn for_site(pool: &PgPool, site_id: Uuid) -> Result<Self> {
        sqlx::query(
            "INSERT INTO site_settings (site_id, updated) VALUES ($1, $2) ON CONFLICT (site_id) DO NOTHING",
        )
        .bind(site_id)
        .bind(chrono::Utc::now().timestamp())
        .execute(pool)
        .await
        .context("failed to initialise site settings")?;

        let settings = sqlx::query_as::<_, SiteSettings>(&format!(
            "SELECT {COLUMNS} FROM site_settings WHERE site_id = $1"
        ))
        .bind(site_id)
        .fetch_one(pool)
        .await
        .context("failed to fetch site settings")?;

        Ok(settings)
    }

    /// Write every settings field for a site.
    pub async fn update(pool: &PgPool, site_id: Uuid, input: &SiteSettingsInput) -> Result<Self> {
        let settings = sqlx::query_as::<_, SiteSettings>(&format!(
            r#"
            INSERT INTO site_settings (site_id, site_logo_id, company_email, company_phone,
                                       company_address, linkedin_url, twitter_url, facebook_url,
                                       theme_color, updated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (site_id) DO UPDATE SET
                site_logo_id = EXCLUDED.site_logo_id,
                company_email = EXCLUDED.company_email,
                company_phone = EXCLUDED.company_phone,
                company_address = EXCLUDED.company_address,
                linkedin_url = EXCLUDED.linkedin_url,
                twitter_url = EXCLUDED.twitter_url,
                facebook_url = EXCLUDED.facebook_url,
                theme_color = EXCLUDED.theme_color,
                updated = EXCLUDED.updated
            RETURNING {COLUMNS}
            "#
        ))
        .bind(site_id)
        .bind(input.site_logo_id)
        .bind(&input.company_email)
        .bind(&input.company_phone)
        .bind(&input.company_address)
        .bind(&input.linkedin_url)
        .bind(&input.twitter_url)
        .bind(&input.facebook_url)
        .bind(&input.theme_color)
        .bind(chrono::Utc::now().timestamp())
        .fetch_one(pool)
        .await
        .context("failed to update site settings")?;

        Ok(settings)
    }

    /// Configured social links, in display order.
    pub fn social_links(&self) -> Vec<SocialLink> {
        [
            ("linkedin", &self.linkedin_url),
            ("twitter", &self.twitter_url),
            ("facebook", &self.facebook_url),
        ]
        .into_iter()
        .filter(|(_, url)| !url.is_empty())
        .map(|(network, url)| SocialLink {
            network,
            url: url.clone(),
        })
        .collect()
    }
}

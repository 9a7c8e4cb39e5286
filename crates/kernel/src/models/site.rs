//! Site model.
//!
//! A site binds a hostname and port to a root page. Incoming requests are
//! matched by `Host` header; at most one site is the default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::content::fields::{FieldKind, FieldReader, FieldSpec, ValidationErrors};

use super::{UniqueField, write_error};

/// Site record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Site {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,
    pub hostname: String,
    pub port: i32,
    /// Human-readable site name.
    pub site_name: String,
    /// Page served at `/`.
    pub root_page_id: Option<Uuid>,
    /// Fallback when no hostname matches.
    pub is_default_site: bool,
}

const HOSTNAME: FieldSpec = FieldSpec::char("hostname", "Hostname")
    .required()
    .max_length(255);
const PORT: FieldSpec = FieldSpec::integer("port", "Port")
    .help("Set this to something other than 80 if you need a specific port number to appear in URLs.");
const SITE_NAME: FieldSpec = FieldSpec::char("site_name", "Site name")
    .max_length(255)
    .help("Human-readable name for the site.");
const ROOT_PAGE: FieldSpec = FieldSpec::new(
    "root_page",
    "Root page",
    FieldKind::Reference { model: "home_page" },
);
const IS_DEFAULT_SITE: FieldSpec = FieldSpec::boolean("is_default_site", "Is default site")
    .help("If true, this site will handle requests for all other hostnames that do not have a site entry of their own.");

/// Validated input for creating or updating a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInput {
    pub hostname: String,
    pub port: i32,
    pub site_name: String,
    pub root_page_id: Option<Uuid>,
    pub is_default_site: bool,
}

impl SiteInput {
    pub const FIELDS: &'static [FieldSpec] =
        &[HOSTNAME, PORT, SITE_NAME, ROOT_PAGE, IS_DEFAULT_SITE];

    pub fn clean(data: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(data);

        let hostname = reader.text(&HOSTNAME).to_ascii_lowercase();
        if hostname.contains(|c: char| c.is_whitespace() || c == '/' || c == ':') {
            reader.add_error(HOSTNAME.name, "Enter a hostname without scheme, port or path.");
        }

        let port = match reader.integer(&PORT) {
            None => 80,
            Some(port) => match u16::try_from(port) {
                Ok(port) if port > 0 => i32::from(port),
                _ => {
                    reader.add_error(PORT.name, "Enter a port between 1 and 65535.");
                    80
                }
            },
        };

        let input = Self {
            hostname,
            port,
            site_name: reader.text(&SITE_NAME),
            root_page_id: reader.reference(&ROOT_PAGE),
            is_default_site: reader.boolean(&IS_DEFAULT_SITE, false),
        };
        reader.finish(input)
    }
}

/// Split a `Host` header value into hostname and optional port.
pub fn split_host(header: &str) -> (String, Option<u16>) {
    let header = header.trim();
    // Bracketed IPv6 literal, e.g. "[::1]:8080".
    if let Some(rest) = header.strip_prefix('[') {
        if let Some((host, tail)) = rest.split_once(']') {
            let port = tail.strip_prefix(':').and_then(|p| p.parse().ok());
            return (host.to_ascii_lowercase(), port);
        }
    }
    match header.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => match port.parse() {
            Ok(port) => (host.to_ascii_lowercase(), Some(port)),
            Err(_) => (host.to_ascii_lowercase(), None),
        },
        _ => (header.to_ascii_lowercase(), None),
    }
}

const SITE_UNIQUE: &[UniqueField] = &[
    UniqueField {
        constraint: "site_host_port_unique",
        field: "hostname",
        message: "Site with this hostname and port already exists.",
    },
    UniqueField {
        constraint: "site_single_default_idx",
        field: "is_default_site",
        message: "Another site became the default at the same time. Try again.",
    },
];

const COLUMNS: &str = "id, hostname, port, site_name, root_page_id, is_default_site";

impl Site {
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let sites = sqlx::query_as::<_, Site>(&format!(
            "SELECT {COLUMNS} FROM site ORDER BY hostname, port"
        ))
        .fetch_all(pool)
        .await
        .context("failed to list sites")?;

        Ok(sites)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let site = sqlx::query_as::<_, Site>(&format!("SELECT {COLUMNS} FROM site WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("failed to fetch site by id")?;

        Ok(site)
    }

    /// Resolve the site for a request's `Host` header.
    ///
    /// Preference: exact hostname and port, then hostname alone, then the
    /// default site.
    pub async fn find_for_host(pool: &PgPool, host: Option<&str>) -> Result<Option<Self>> {
        let (hostname, port) = host.map(split_host).unwrap_or_default();
        let port = i32::from(port.unwrap_or(80));

        let site = sqlx::query_as::<_, Site>(&format!(
            r#"
            SELECT {COLUMNS} FROM site
            WHERE hostname = $1 OR is_default_site
            ORDER BY (hostname = $1 AND port = $2) DESC, (hostname = $1) DESC, is_default_site DESC, port
            LIMIT 1
            "#
        ))
        .bind(&hostname)
        .bind(port)
        .fetch_optional(pool)
        .await
        .context("failed to resolve site for host")?;

        Ok(site)
    }

    /// Whether another site already uses the hostname and port.
    pub async fn host_taken(
        pool: &PgPool,
        hostname: &str,
        port: i32,
        exclude: Option<Uuid>,
    ) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM site WHERE hostname = $1 AND port = $2 AND ($3::uuid IS NULL OR id <> $3))",
        )
        .bind(hostname)
        .bind(port)
        .bind(exclude)
        .fetch_one(pool)
        .await
        .context("failed to check site hostname")?;

        Ok(taken)
    }

    /// Database checks that cannot run during field cleaning.
    pub async fn check_constraints(
        pool: &PgPool,
        input: &SiteInput,
        exclude: Option<Uuid>,
    ) -> Result<ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if Self::host_taken(pool, &input.hostname, input.port, exclude).await? {
            errors.add(
                HOSTNAME.name,
                "Site with this hostname and port already exists.",
            );
        }
        if let Some(page_id) = input.root_page_id {
            if super::HomePage::find_by_id(pool, page_id).await?.is_none() {
                errors.add(
                    ROOT_PAGE.name,
                    "Select a valid choice. That choice is not one of the available choices.",
                );
            }
        }
        Ok(errors)
    }

    /// Create a site. Becoming the default clears the flag elsewhere.
    pub async fn create(pool: &PgPool, input: &SiteInput) -> Result<Self> {
        let id = Uuid::now_v7();
        let mut tx = pool.begin().await.context("failed to begin transaction")?;

        if input.is_default_site {
            clear_default(&mut tx, id).await?;
        }

        let site = sqlx::query_as::<_, Site>(&format!(
            r#"
            INSERT INTO site (id, hostname, port, site_name, root_page_id, is_default_site)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.hostname)
        .bind(input.port)
        .bind(&input.site_name)
        .bind(input.root_page_id)
        .bind(input.is_default_site)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, SITE_UNIQUE, "failed to create site"))?;

        tx.commit().await.context("failed to commit transaction")?;
        Ok(site)
    }

    /// Replace a site's fields.
    pub async fn update(pool: &PgPool, id: Uuid, input: &SiteInput) -> Result<Option<Self>> {
        let mut tx = pool.begin().await.context("failed to begin transaction")?;

        if input.is_default_site {
            clear_default(&mut tx, id).await?;
        }

        let site = sqlx::query_as::<_, Site>(&format!(
            r#"
            UPDATE site
            SET hostname = $2, port = $3, site_name = $4, root_page_id = $5, is_default_site = $6
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.hostname)
        .bind(input.port)
        .bind(&input.site_name)
        .bind(input.root_page_id)
        .bind(input.is_default_site)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(e, SITE_UNIQUE, "failed to update site"))?;

        if site.is_some() {
            tx.commit().await.context("failed to commit transaction")?;
        }
        Ok(site)
    }
}

async fn clear_default(tx: &mut Transaction<'_, Postgres>, keep: Uuid) -> Result<()> {
    sqlx::query("UPDATE site SET is_default_site = FALSE WHERE is_default_site AND id <> $1")
        .bind(keep)
        .execute(&mut **tx)
        .await
        .context("failed to clear default site")?;

    Ok(())
}

//! Engine configuration.
//!
//! The engine only sees [`ContractConfig`], passed in by the caller. Reading
//! the process environment is limited to [`Settings::from_env`], meant for the
//! outermost layer of a service or tool.

use std::{env, time::Duration};

use chrono::{DateTime, Utc};

use crate::store::BlobLocation;

pub const DEFAULT_COMPANY_NAME: &str = "EcoIA";
pub const DEFAULT_BUCKET: &str = "energy-contracts-pdf-prod";
pub const DEFAULT_LOGO_KEY: &str = "brand/logo.jpg";
pub const DEFAULT_LINK_TTL: Duration = Duration::from_secs(900);

/// Fixed captions printed on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub title: String,
    pub client_section: String,
    pub last_name: String,
    pub first_name: String,
    pub address: String,
    pub email: String,
    pub offer_section: String,
    pub offer_name: String,
    pub unit_price: String,
    /// Appended to the currency after the unit price.
    pub price_unit: String,
    pub details: String,
    pub conditions_section: String,
    pub client_signature: String,
    pub supplier_signature: String,
    pub generated_on: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title: "Contrat d'Énergie".to_owned(),
            client_section: "Informations Client".to_owned(),
            last_name: "Nom".to_owned(),
            first_name: "Prénom".to_owned(),
            address: "Adresse".to_owned(),
            email: "E-mail".to_owned(),
            offer_section: "Offre choisie".to_owned(),
            offer_name: "Nom de l'offre".to_owned(),
            unit_price: "Prix unitaire".to_owned(),
            price_unit: "/kWh".to_owned(),
            details: "Détails".to_owned(),
            conditions_section: "Conditions".to_owned(),
            client_signature: "Signature Client".to_owned(),
            supplier_signature: "Signature Fournisseur".to_owned(),
            generated_on: "Généré le".to_owned(),
        }
    }
}

impl Labels {
    pub fn english() -> Self {
        Self {
            title: "Energy Contract".to_owned(),
            client_section: "Client Information".to_owned(),
            last_name: "Last name".to_owned(),
            first_name: "First name".to_owned(),
            address: "Address".to_owned(),
            email: "E-mail".to_owned(),
            offer_section: "Selected offer".to_owned(),
            offer_name: "Offer".to_owned(),
            unit_price: "Unit price".to_owned(),
            price_unit: "/kWh".to_owned(),
            details: "Details".to_owned(),
            conditions_section: "Conditions".to_owned(),
            client_signature: "Client signature".to_owned(),
            supplier_signature: "Supplier signature".to_owned(),
            generated_on: "Generated on".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContractConfig {
    /// Brand printed in the footer and the document info.
    pub company_name: String,
    pub labels: Labels,
    /// Fixed generation time. `None` uses the current time.
    pub generated_at: Option<DateTime<Utc>>,
    /// Deflate the page content stream.
    pub compress_content: bool,
    /// Width the logo is scaled to, in points.
    pub logo_width: f64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.to_owned(),
            labels: Labels::default(),
            generated_at: None,
            compress_content: false,
            logo_width: 110.0,
        }
    }
}

impl ContractConfig {
    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = name.into();
        self
    }

    pub fn with_clock(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress_content = compress;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.generated_at.unwrap_or_else(Utc::now)
    }
}

/// Settings of the surrounding service: where contracts are archived, which
/// logo to use when the payload has none, how long download links live.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bucket: String,
    pub company_name: String,
    pub link_ttl: Duration,
    pub default_logo: Option<BlobLocation>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_owned(),
            company_name: DEFAULT_COMPANY_NAME.to_owned(),
            link_ttl: DEFAULT_LINK_TTL,
            default_logo: Some(BlobLocation::new(DEFAULT_BUCKET, DEFAULT_LOGO_KEY)),
        }
    }
}

impl Settings {
    /// Read `BUCKET_NAME`, `COMPANY_NAME`, `PRESIGNED_TTL` (seconds),
    /// `LOGO_S3_BUCKET` and `LOGO_S3_KEY`. Unset variables keep their default;
    /// an empty logo bucket or key disables the default logo.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let link_ttl = match lookup("PRESIGNED_TTL") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    log::warn!("Ignoring invalid PRESIGNED_TTL `{}`", raw);
                    defaults.link_ttl
                }
            },
            None => defaults.link_ttl,
        };

        let logo_bucket = lookup("LOGO_S3_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_owned());
        let logo_key = lookup("LOGO_S3_KEY").unwrap_or_else(|| DEFAULT_LOGO_KEY.to_owned());
        let default_logo = if logo_bucket.is_empty() || logo_key.is_empty() {
            None
        } else {
            Some(BlobLocation::new(logo_bucket, logo_key))
        };

        Self {
            bucket: lookup("BUCKET_NAME").unwrap_or(defaults.bucket),
            company_name: lookup("COMPANY_NAME").unwrap_or(defaults.company_name),
            link_ttl,
            default_logo,
        }
    }

    /// Engine configuration matching these settings.
    pub fn contract_config(&self) -> ContractConfig {
        ContractConfig::default().with_company_name(self.company_name.clone())
    }
}

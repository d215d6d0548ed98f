//! Input record of a contract build.
//!
//! Field names on the wire follow the upstream JSON (`contratId`, `offre`,
//! `prixUnitaire`, ...). Every field is optional; the page shows empty values
//! or dashes for what is missing.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PbError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractPayload {
    #[serde(rename = "contratId", alias = "contractId", skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    pub client: Client,
    #[serde(rename = "offre", alias = "offer")]
    pub offer: Offer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Client {
    #[serde(rename = "nom", alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(rename = "prenom", alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "adresse", alias = "address")]
    pub address: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Offer {
    #[serde(rename = "nomOffre")]
    pub name: Option<String>,
    /// Used when `nomOffre` is missing or empty.
    #[serde(rename = "offreChoisie")]
    pub chosen: Option<String>,
    #[serde(rename = "prixUnitaire")]
    pub unit_price: Option<Price>,
    #[serde(rename = "devise")]
    pub currency: Option<String>,
    pub details: Option<String>,
}

/// Unit prices arrive either as JSON numbers or as preformatted strings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Price {
    Number(serde_json::Number),
    Text(String),
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Price::Number(n) => write!(f, "{}", n),
            Price::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Where to find the logo: inline base64 data or a stored blob.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogoRef {
    #[serde(rename = "logoBase64")]
    pub base64: Option<String>,
    #[serde(rename = "s3Bucket")]
    pub bucket: Option<String>,
    #[serde(rename = "s3Key")]
    pub key: Option<String>,
}

impl LogoRef {
    /// Decode the inline data. Bytes outside the base64 alphabet, such as the
    /// line breaks of wrapped output, are skipped.
    pub fn decode_inline(&self) -> Option<Result<Vec<u8>, PbError>> {
        self.base64.as_ref().map(|data| {
            let alphabet: Vec<u8> = data.bytes().filter(|b| is_base64_byte(*b)).collect();
            STANDARD.decode(alphabet).map_err(PbError::from)
        })
    }
}

fn is_base64_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')
}

/// Request envelope as delivered by an HTTP gateway: the payload is the
/// `body` string, optionally base64 encoded.
#[derive(Debug, Deserialize)]
struct Envelope {
    body: Option<String>,
    #[serde(rename = "isBase64Encoded", default)]
    is_base64_encoded: bool,
}

impl ContractPayload {
    /// Parse a payload given either directly or wrapped in a gateway envelope.
    pub fn from_json(input: &[u8]) -> Result<Self, PbError> {
        let value: serde_json::Value = serde_json::from_slice(input)?;
        if value.get("body").is_some() {
            let envelope: Envelope = serde_json::from_value(value)?;
            let body = envelope.body.unwrap_or_default();
            let body = if envelope.is_base64_encoded {
                STANDARD.decode(body.trim())?
            } else {
                body.into_bytes()
            };
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(Self::default());
            }
            log::debug!("unwrapped {} byte request body", body.len());
            return Ok(serde_json::from_slice(&body)?);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// The contract id, or one derived from `now` when the payload has none.
    pub fn contract_id_or_generated(&self, now: DateTime<Utc>) -> String {
        match self.contract_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => format!("CONTRAT-{}", now.format("%Y%m%d%H%M%S")),
        }
    }

    pub fn client_email(&self) -> Option<&str> {
        self.client.email.as_deref().filter(|e| !e.is_empty())
    }
}

impl Offer {
    /// Offer name with the fallback to the chosen-offer field.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.chosen.as_deref().unwrap_or(""),
        }
    }
}

//! Blob storage seen by the engine: where logos come from and where finished
//! contracts go.

use std::{
    fs,
    path::{Component, Path, PathBuf},
    time::Duration,
};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{contract::payload::LogoRef, error::PbError};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobLocation {
    pub bucket: String,
    pub key: String,
}

impl BlobLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for BlobLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Stored next to an archived contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    #[serde(rename = "contratId")]
    pub contract_id: String,
    pub company: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
}

impl ArchiveMetadata {
    pub fn new(contract_id: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            company: company.into(),
            content_type: PDF_CONTENT_TYPE.to_owned(),
        }
    }
}

pub trait BlobStore {
    fn fetch(&self, location: &BlobLocation) -> Result<Vec<u8>, PbError>;
}

pub trait ContractArchive {
    /// Store `bytes` and return an identifier of the stored version.
    fn put(&self, location: &BlobLocation, bytes: &[u8], metadata: &ArchiveMetadata) -> Result<String, PbError>;

    /// A link that gives read access to the blob for `ttl`.
    fn share_link(&self, location: &BlobLocation, ttl: Duration) -> Result<String, PbError>;
}

/// Find the logo bytes: inline data first, then the location named in the
/// payload, then `default`. A failing source is logged and the next one is
/// tried.
pub fn resolve_logo(
    logo: Option<&LogoRef>,
    store: &dyn BlobStore,
    default: Option<&BlobLocation>,
) -> Option<Vec<u8>> {
    if let Some(logo) = logo {
        match logo.decode_inline() {
            Some(Ok(bytes)) => return Some(bytes),
            Some(Err(e)) => log::warn!("Invalid inline logo: {}", e),
            None => {}
        }

        let bucket = logo.bucket.as_deref().filter(|b| !b.is_empty());
        let key = logo.key.as_deref().filter(|k| !k.is_empty());
        if let (Some(bucket), Some(key)) = (bucket, key) {
            let location = BlobLocation::new(bucket, key);
            match store.fetch(&location) {
                Ok(bytes) => return Some(bytes),
                Err(e) => log::warn!("Cannot read logo from {}: {}", location, e),
            }
        }
    }

    let location = default?;
    match store.fetch(location) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("Cannot read default logo from {}: {}", location, e);
            None
        }
    }
}

/// Archive key of a contract: `contracts/{year}/{id}.pdf`.
pub fn archive_location(bucket: &str, contract_id: &str, now: DateTime<Utc>) -> BlobLocation {
    BlobLocation::new(bucket, format!("contracts/{}/{}.pdf", now.year(), contract_id))
}

/// Outcome of [`archive_contract`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveReceipt {
    pub bucket: String,
    pub key: String,
    pub version: String,
    /// Empty when no link could be created.
    #[serde(rename = "downloadUrl")]
    pub download_url: String,
}

/// Store a finished contract and create its download link.
///
/// Failing to store is an error; failing to create the link only leaves
/// `download_url` empty.
pub fn archive_contract(
    archive: &dyn ContractArchive,
    location: &BlobLocation,
    bytes: &[u8],
    metadata: &ArchiveMetadata,
    ttl: Duration,
) -> Result<ArchiveReceipt, PbError> {
    let version = archive.put(location, bytes, metadata)?;
    log::debug!("archived {} bytes at {}", bytes.len(), location);

    let download_url = archive.share_link(location, ttl).unwrap_or_else(|e| {
        log::warn!("Cannot create download link for {}: {}", location, e);
        String::new()
    });

    Ok(ArchiveReceipt {
        bucket: location.bucket.clone(),
        key: location.key.clone(),
        version,
        download_url,
    })
}

/// Blobs as files: `{root}/{bucket}/{key}`, with archive metadata in a
/// `.meta.json` file next to each archived blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirStore {
    root: PathBuf,
}

const METADATA_SUFFIX: &str = ".meta.json";

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a location below the root. Absolute keys and `..` are refused.
    pub fn path_of(&self, location: &BlobLocation) -> Result<PathBuf, PbError> {
        let mut path = self.root.clone();
        for part in [location.bucket.as_str(), location.key.as_str()] {
            let relative = Path::new(part);
            let plain = !part.is_empty() && relative.components().all(|c| matches!(c, Component::Normal(_)));
            if !plain {
                return Err(PbError::InvalidLocation(location.to_string()));
            }
            path.push(relative);
        }
        Ok(path)
    }

    pub fn metadata(&self, location: &BlobLocation) -> Result<ArchiveMetadata, PbError> {
        let raw = fs::read(metadata_path(&self.path_of(location)?))?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

fn metadata_path(blob: &Path) -> PathBuf {
    let mut name = blob.as_os_str().to_owned();
    name.push(METADATA_SUFFIX);
    PathBuf::from(name)
}

impl BlobStore for DirStore {
    fn fetch(&self, location: &BlobLocation) -> Result<Vec<u8>, PbError> {
        Ok(fs::read(self.path_of(location)?)?)
    }
}

impl ContractArchive for DirStore {
    fn put(&self, location: &BlobLocation, bytes: &[u8], metadata: &ArchiveMetadata) -> Result<String, PbError> {
        let path = self.path_of(location)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        fs::write(metadata_path(&path), serde_json::to_vec_pretty(metadata)?)?;
        Ok(format!("{:x}", bytes.len()))
    }

    /// Plain `file://` link. Files do not expire, so `ttl` is ignored.
    fn share_link(&self, location: &BlobLocation, _ttl: Duration) -> Result<String, PbError> {
        let path = self.path_of(location)?;
        if !path.is_file() {
            return Err(PbError::NotFound);
        }
        Ok(format!("file://{}", path.display()))
    }
}

use std::{fs, path::Path};

pub use config::{ContractConfig, Labels, Settings};
pub use contract::{build_contract, build_contract_pdf, compose, ContractPayload};
pub use error::PbError;
pub use parse::{read_structure, Structure};
pub use pdf::Document;
pub use simple_encode::SimpleEncoder;

pub mod config;
pub mod content;
pub mod contract;
mod error;
pub mod jpeg;
pub mod parse;
pub mod pdf;
pub mod simple_encode;
pub mod store;
pub mod text;
pub mod wrap;
pub mod writer;

/// Build the contract described by the JSON payload in `payload_path` and
/// write it to `output`. The logo, if given, is read from `logo_path`.
pub fn render_file(
    payload_path: &Path,
    logo_path: Option<&Path>,
    output: &Path,
    config: &ContractConfig,
) -> Result<(), PbError> {
    let payload = ContractPayload::from_json(&fs::read(payload_path)?)?;
    let logo = logo_path.map(fs::read).transpose()?;

    let bytes = build_contract_pdf(&payload, logo.as_deref(), config)?;
    fs::write(output, &bytes)?;
    log::info!("wrote {} bytes to {}", bytes.len(), output.display());

    Ok(())
}

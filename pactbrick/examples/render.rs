use chrono::{DateTime, Utc};
use pactbrick::{config::Labels, ContractConfig, Settings};
use std::path::PathBuf;
use structopt::StructOpt;

/// Render a contract from a JSON payload.
#[derive(StructOpt, Debug)]
#[structopt(name = "pactbrick-render")]
struct Opt {
    /// Payload file, either the contract record or a gateway request
    #[structopt(short, long, parse(from_os_str))]
    input: PathBuf,

    /// JPEG logo
    #[structopt(short, long, parse(from_os_str))]
    logo: Option<PathBuf>,

    /// Output file
    #[structopt(short, long, parse(from_os_str))]
    output: PathBuf,

    /// Deflate the page content
    #[structopt(short, long)]
    compress: bool,

    /// English captions instead of French
    #[structopt(long)]
    english: bool,

    /// Fixed generation time (RFC 3339), for reproducible output
    #[structopt(long)]
    at: Option<DateTime<Utc>>,
}

pub fn main() {
    env_logger::init();
    let opt = Opt::from_args();

    let mut config: ContractConfig = Settings::from_env().contract_config().with_compression(opt.compress);
    if opt.english {
        config = config.with_labels(Labels::english());
    }
    if let Some(at) = opt.at {
        config = config.with_clock(at);
    }

    if let Err(e) = pactbrick::render_file(&opt.input, opt.logo.as_deref(), &opt.output, &config) {
        log::error!("Error while rendering: {:?}", e);
    }
}

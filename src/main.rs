use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use kv_log_macro as log;
use structopt::StructOpt;

use cli::Cli;
use mpc_callback::api::PackageDataClaim;
use mpc_callback::config::Config;
use mpc_callback::prom;
use mpc_callback::service::CallbackService;

mod cli;

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Read request file {}.", path.display())),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer).context("Read request from stdin.")?;
            Ok(buffer)
        }
    }
}

fn main() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    json_env_logger::init();
    let args: Cli = Cli::from_args();

    let config = Config::load(&args.config).context("Load config.")?;
    let verifier = config.verifier().context("Bind policies.")?;
    log::info!("Callback verifier ready", {
        service: config.service_name.as_str(),
        decode_mode: format!("{:?}", verifier.decode_mode()),
    });
    let service = CallbackService::new(verifier);

    let input = read_input(args.request.as_deref())?;
    let response = if args.claim {
        let claim: PackageDataClaim = serde_json::from_slice(&input).context("Parse package data claim.")?;
        service.handle_claim(&claim)
    } else {
        service.handle_request(&input)
    };
    println!("{}", serde_json::to_string(&response).context("Encode response.")?);

    if args.metrics {
        eprint!("{}", prom::render()?);
    }
    if !response.is_approved() {
        std::process::exit(1);
    }
    Ok(())
}

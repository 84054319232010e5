//! Debstage - packages opennic-up as a Debian archive.
//!
//! Run it from the directory holding the release artifacts:
//! - `opennic-up` (daemon binary)
//! - `opennic-up.conf`
//! - `opennic-up.service` and `opennic-up.timer`

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use debstage::artifact::DpkgDeb;
use debstage::config::Config;
use debstage::descriptor::PackageDescriptor;
use debstage::manifest::default_manifest;
use debstage::pipeline::Pipeline;
use debstage::preflight::SystemTools;

#[derive(Parser)]
#[command(name = "debstage", version)]
#[command(about = "Build the opennic-up Debian package from the current directory")]
#[command(
    after_help = "CONFIGURATION (.env or environment):\n  DEBSTAGE_VERSION          Pin the version (default: dev-<build time>)\n  DEBSTAGE_MAINTAINER       Maintainer field\n  DEBSTAGE_ARCH             Architecture field (default: amd64)\n  DEBSTAGE_BACKEND          Packaging tool (default: dpkg-deb)\n  DEBSTAGE_PACKAGE_MANAGER  Used to install missing tools (default: apt-get)\n  DEBSTAGE_ASSUME_YES       Install missing tools without asking"
)]
struct Cli {}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let Cli {} = Cli::parse();
    init_tracing();

    let base_dir = std::env::current_dir().context("Cannot determine working directory")?;
    let config = Config::load(&base_dir)?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        config.print();
    }

    let descriptor = PackageDescriptor::from_config(&config, Local::now());
    let tools = SystemTools::new(&config.package_manager, config.assume_yes);
    let backend = DpkgDeb::new(&config.backend);

    let pipeline = Pipeline::new(&base_dir, descriptor, default_manifest(), &tools, &backend);
    if let Err(e) = pipeline.run() {
        eprintln!("error[{}]: {}", e.stage(), e);
        std::process::exit(1);
    }

    Ok(())
}

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use protocrap_alias::config::Cli;
use protocrap_alias::{AliasTable, Generator, PluginGenerator, ShimGenerator, alias};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let pool = alias::load_pool(cli.descriptor_set.as_deref())
        .context("loading canonical descriptors")?;
    let table = AliasTable::resolve(&cli.alias_sources(), &pool)?;
    tracing::info!("forwarding {} legacy packages", table.len());

    let generator: Box<dyn Generator> = match &cli.plugin {
        Some(program) => Box::new(PluginGenerator::new(program)),
        None => Box::new(ShimGenerator::default()),
    };

    let config = cli.config();
    let stdout = io::stdout();
    protocrap_alias::run(
        &table,
        generator.as_ref(),
        cli.parameter.as_deref(),
        &config,
        &mut stdout.lock(),
    )?;
    Ok(())
}

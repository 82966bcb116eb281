mod config;
mod errors;
mod files;
mod trace;

#[cfg(test)]
mod tests;

use libslutpris::{prelude::*, sanitize};

use crate::{
  config::Config,
  files::{Report, read_collection, write_report},
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
  let config = Config::from_env()?;
  let _guard = trace::init_tracing(&config, std::io::stderr())?;

  run(&config)
}

fn run(config: &Config) -> anyhow::Result<()> {
  let booli = read_collection(&config.booli_path)?;
  let mut hemnet = read_collection(&config.hemnet_path)?;

  if config.sanitize_hemnet {
    let (complete, dropped) = sanitize::complete_listings(hemnet);

    tracing::info!(dropped, kept = complete.len(), "dropped incomplete hemnet listings");

    hemnet = complete;
  }

  let output = merge_with(&booli, &hemnet, &config.params);
  let summary = summarize(&output.combined);

  tracing::info!(
    slutpris = env!("CARGO_PKG_VERSION"),
    booli = booli.len(),
    hemnet = hemnet.len(),
    groups = output.groups.len(),
    included = summary.included,
    excluded = summary.excluded,
    average = summary.average,
    median = summary.median,
    oldest_sold = summary.oldest_sold.map(tracing::field::display),
    newest_sold = summary.newest_sold.map(tracing::field::display),
    "reconciled listings"
  );

  let report = Report {
    combined: &output.combined,
    groups: &output.groups,
    summary: &summary,
  };

  write_report(config.output_path.as_deref(), &report)?;

  Ok(())
}

//! `sfetch af` / `sfetch esm` – fetch a batch of codes and report what loaded.

use crate::cli::FetchArgs;
use anyhow::{Context, Result};
use sfetch_core::config::SfetchConfig;
use sfetch_core::fetch::{self, BatchReport, FetchOptions, ItemStatus};
use sfetch_core::scene::Scene;
use sfetch_core::transport::CurlFetcher;

/// Runs the batch on the blocking pool and prints the outcome.
/// Fails only when nothing at all could be loaded.
pub async fn run_fetch(cfg: &SfetchConfig, args: &FetchArgs, opts: FetchOptions) -> Result<()> {
    let codes = args.codes.join(" ");
    let fetcher = CurlFetcher::from_config(cfg);

    let (report, scene) = tokio::task::spawn_blocking(move || {
        let mut scene = Scene::new();
        let report = fetch::fetch_batch(&codes, &opts, &fetcher, &mut scene);
        (report, scene)
    })
    .await
    .context("fetch task failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &scene, args.quiet);
    }

    if report.all_failed() {
        anyhow::bail!("no structures loaded");
    }
    Ok(())
}

fn print_report(report: &BatchReport, scene: &Scene, quiet: bool) {
    for item in &report.items {
        if let (Some(entry), false) = (&item.uniprot, quiet) {
            println!("{}", entry.text);
            println!("Saved as {}", entry.saved_to.display());
        }

        match &item.status {
            ItemStatus::Loaded(f) => {
                if quiet {
                    continue;
                }
                for skipped in &f.skipped {
                    eprintln!(" Warning: failed to fetch from {} ({})", skipped.url, skipped.error);
                }
                let from = match (&f.url, &f.file) {
                    (Some(url), _) => url.clone(),
                    (None, Some(file)) => format!("saved {}", file.display()),
                    (None, None) => "-".to_string(),
                };
                println!(
                    " {} -> '{}' state {} ({} atoms) from {}",
                    f.code, f.load.object, f.load.state, f.load.atom_count, from
                );
                if let Some(v) = f.version {
                    println!("   model v{}", v);
                }
                if !f.sha256.is_empty() {
                    println!("   sha256 {}", f.sha256);
                }
            }
            ItemStatus::Failed { error, attempts } => {
                if !quiet {
                    for a in attempts {
                        eprintln!(" Warning: failed to fetch from {} ({})", a.url, a.error);
                    }
                }
                eprintln!(" Error-fetch: {}: {}", item.token, error);
            }
        }
    }

    if !quiet {
        for (name, object) in scene.objects() {
            println!(
                " object {:<24} {} state(s), {}",
                name,
                object.states.len(),
                object.format
            );
        }
    }
}

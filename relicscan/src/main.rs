//! relicscan: turn noisy OCR captures of relic screens into a structured,
//! exportable collection.

mod cli;
mod config;
mod fixtures;
mod session;
mod store;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::session::{CycleOutcome, ScanSession};
use crate::store::Store;

fn main() -> Result<()> {
    // Structured logging. Use `RUST_LOG=info` etc.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    let catalog = catalog::Catalog::load().context("load reference catalogs")?;
    let store_path = match &args.store {
        Some(path) => path.clone(),
        None => Store::default_path()?,
    };

    match args.command {
        Command::Scan {
            text,
            frame,
            color,
            dn,
            threshold,
            save,
        } => cmd_scan(&catalog, &store_path, text, frame, color, dn, threshold, save),
        Command::List => cmd_list(&catalog, &store_path),
        Command::Stats => cmd_stats(&store_path),
        Command::Export { out } => cmd_export(&store_path, out),
        Command::Import { file } => cmd_import(&store_path, file),
        Command::Delete { id } => cmd_delete(&store_path, &id),
        Command::Clear { yes } => cmd_clear(&store_path, yes),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_scan(
    catalog: &catalog::Catalog,
    store_path: &PathBuf,
    text: PathBuf,
    frame: Option<PathBuf>,
    color: Option<catalog::RelicColor>,
    dn: Option<bool>,
    threshold: Option<f32>,
    save: bool,
) -> Result<()> {
    let mut config = Config::load_or_default();
    if let Some(threshold) = threshold {
        config.match_threshold = threshold.clamp(0.0, 1.0);
    }

    let ocr = fixtures::TextFixture::from_file(&text)?;
    let mut frames = fixtures::OfflineFrames::new(frame.as_deref())?;

    let mut session = ScanSession::new(catalog, config);
    if let Some(color) = color {
        session.detected_mut().manual_color = Some(color);
    }
    if dn.is_some() {
        session.detected_mut().deep_night = dn;
    }

    // A collaborator failure is a status line, not a crash.
    match session.scan_once(&mut frames, &ocr) {
        Ok(CycleOutcome::Scanned { accepted }) => {
            let signal = session.last_signal().expect("signal present after a scanned cycle");
            println!("{:.0}% conf | {} match(es), {} accepted", signal.confidence, signal.matched.len(), accepted);
        }
        Ok(CycleOutcome::NoFrame) => {
            println!("No frame available; nothing scanned.");
            return Ok(());
        }
        Ok(CycleOutcome::Busy) => {
            println!("A scan cycle is already running.");
            return Ok(());
        }
        Err(err) => {
            println!("Scan failed: {err:#}");
            return Ok(());
        }
    }

    let detected = session.detected();
    if detected.effects.is_empty() {
        println!("No effects detected.");
    } else {
        println!("Effects:");
        for m in &detected.effects {
            println!("  {:>3.0}%  {}  [{}]", m.score * 100.0, m.name, m.id);
        }
    }

    println!("Color: {}", opt(detected.effective_color()));
    println!("Quality: {}", opt(detected.quality));
    match detected.deep_night {
        Some(v) => println!("Deep night: {v}"),
        None => println!("Deep night: unknown (heuristic says {})", detected.deep_night_display()),
    }
    println!("Name: {}", detected.display_name().unwrap_or_else(|| "--".to_string()));

    if save {
        match session.build_relic() {
            Ok(relic) => {
                let mut store = Store::open(store_path)?;
                store.append(relic);
                store.save()?;
                println!("Relic saved! ({} total)", store.len());
            }
            Err(err) => {
                println!("Not saved: {err}");
            }
        }
    }

    Ok(())
}

fn cmd_list(catalog: &catalog::Catalog, store_path: &PathBuf) -> Result<()> {
    let store = Store::open(store_path)?;
    if store.is_empty() {
        println!("No relics yet.");
        return Ok(());
    }

    for relic in store.relics() {
        let name = relic
            .name
            .clone()
            .unwrap_or_else(|| format!("{} Relic", relic.color));
        let dn = if relic.dn { "  [DN]" } else { "" };
        println!("{}  ({}){dn}", name, relic.id);
        println!("  itemId: {}", relic.item_id);
        for &id in &relic.effects {
            println!("  - {}", catalog.effect_label(id));
        }
    }
    println!("{} relic(s)", store.len());

    Ok(())
}

fn cmd_stats(store_path: &PathBuf) -> Result<()> {
    let store = Store::open(store_path)?;
    let stats = store.stats();

    println!("Total: {}", stats.total);
    println!("Deep night: {} / normal: {}", stats.deep_night, stats.normal);
    for (color, count) in catalog::RelicColor::ALL.iter().zip(stats.by_color) {
        println!("{color}: {count}");
    }

    Ok(())
}

fn cmd_export(store_path: &PathBuf, out: Option<PathBuf>) -> Result<()> {
    let store = Store::open(store_path)?;
    let json = store.export_json()?;

    match out {
        Some(path) => {
            std::fs::write(&path, &json).with_context(|| format!("write export {}", path.display()))?;
            println!("Exported {} relic(s) to {}", store.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn cmd_import(store_path: &PathBuf, file: PathBuf) -> Result<()> {
    let json = std::fs::read_to_string(&file).with_context(|| format!("read import {}", file.display()))?;

    let mut store = Store::open(store_path)?;
    let added = store.import_json(&json)?;
    store.save()?;
    println!("Imported {added} relic(s) ({} total)", store.len());

    Ok(())
}

fn cmd_delete(store_path: &PathBuf, id: &str) -> Result<()> {
    let mut store = Store::open(store_path)?;
    if store.delete(id) {
        store.save()?;
        println!("Relic deleted.");
    } else {
        println!("No relic with id {id:?}.");
    }

    Ok(())
}

fn cmd_clear(store_path: &PathBuf, yes: bool) -> Result<()> {
    if !yes {
        println!("This deletes ALL relics and cannot be undone. Re-run with --yes.");
        return Ok(());
    }

    let mut store = Store::open(store_path)?;
    store.clear();
    store.save()?;
    println!("All relics cleared.");

    Ok(())
}

fn opt(value: Option<impl std::fmt::Display>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "--".to_string(),
    }
}

use anyhow::{Context as _, Result};
use aptlykit::{PublishKey, PublishState, SnapshotState, SystemState};
use colored::Colorize;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::Context;
use crate::cli::StateArgs;
use crate::ui;

/// Selected snapshots and published endpoints
#[derive(Serialize)]
struct Selection {
    snapshots: BTreeMap<String, SnapshotState>,
    publishes: BTreeMap<PublishKey, PublishState>,
}

pub fn run(ctx: &Context, args: &StateArgs) -> Result<()> {
    let reader = ctx.config()?.reader();

    if args.snapshots.is_empty() && args.publishes.is_empty() {
        let state = reader
            .read_system_state()
            .context("Failed to read aptly state")?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&state)?);
        } else {
            show_system_state(&state);
        }
        return Ok(());
    }

    let keys: Vec<PublishKey> = args
        .publishes
        .iter()
        .map(|key| key.parse())
        .collect::<aptlykit::Result<_>>()?;

    let selection = Selection {
        snapshots: reader
            .fetch_snapshot_states(&args.snapshots)
            .context("Failed to read snapshots")?,
        publishes: reader
            .fetch_publish_states(&keys)
            .context("Failed to read published endpoints")?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else {
        show_snapshots(&selection.snapshots);
        show_publishes(&selection.publishes);
        println!();
    }
    Ok(())
}

fn show_system_state(state: &SystemState) {
    ui::header("aptly state");

    show_names("Mirrors", &state.mirrors);
    show_names("Local repos", &state.repos);
    show_snapshots(&state.snapshot_map);
    show_publishes(&state.publish_map);

    let orphans: Vec<&String> = state
        .snapshots
        .iter()
        .filter(|name| state.publishes_using(name).is_empty())
        .collect();
    if !orphans.is_empty() {
        ui::section("Unpublished snapshots");
        for name in orphans {
            ui::dim(name);
        }
    }

    println!();
}

fn show_names(title: &str, names: &BTreeSet<String>) {
    ui::section(title);
    if names.is_empty() {
        ui::dim("(none)");
        return;
    }
    for name in names {
        println!("  • {name}");
    }
}

fn show_snapshots(snapshots: &BTreeMap<String, SnapshotState>) {
    ui::section("Snapshots");
    if snapshots.is_empty() {
        ui::dim("(none)");
        return;
    }
    for snapshot in snapshots.values() {
        println!(
            "  • {} {} {}",
            snapshot.name.bold(),
            "←".dimmed(),
            ui::join_or_dash(&snapshot.sources)
        );
    }
}

fn show_publishes(publishes: &BTreeMap<PublishKey, PublishState>) {
    ui::section("Published");
    if publishes.is_empty() {
        ui::dim("(none)");
        return;
    }
    for publish in publishes.values() {
        ui::kv(
            &publish.key.to_string(),
            &ui::join_or_dash(&publish.sources),
        );
    }
}

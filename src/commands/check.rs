use anyhow::{Context as _, Result};
use aptlykit::{PublishKey, SystemState};
use levelexec::{Dependency, DependencyKind};
use std::collections::BTreeSet;

use crate::Context;
use crate::cli::CheckArgs;
use crate::ui;

/// Report whether the artifact exists. Returns `false` when it does not.
pub fn run(ctx: &Context, args: &CheckArgs) -> Result<bool> {
    // Reject an unknown kind before touching aptly.
    let dependency = Dependency::parse(&args.kind, args.name.as_str())?;
    let reader = ctx.config()?.reader();

    let names: BTreeSet<String> = reader
        .list(dependency.kind)
        .with_context(|| format!("Failed to list {}s", dependency.kind))?
        .into_iter()
        .collect();
    let state = inventory(dependency.kind, names)?;
    let present = state.contains(&dependency);

    if present {
        if !ctx.quiet {
            ui::success(&format!("{dependency} exists"));
        }
    } else {
        ui::error(&format!("{dependency} not found"));
    }
    Ok(present)
}

/// State holding only the inventory of one kind
fn inventory(kind: DependencyKind, names: BTreeSet<String>) -> Result<SystemState> {
    let mut state = SystemState::default();
    match kind {
        DependencyKind::Mirror => state.mirrors = names,
        DependencyKind::Repo => state.repos = names,
        DependencyKind::Snapshot => state.snapshots = names,
        DependencyKind::Publish => {
            state.publishes = names
                .iter()
                .map(|line| line.parse())
                .collect::<aptlykit::Result<BTreeSet<PublishKey>>>()?;
        }
    }
    Ok(state)
}

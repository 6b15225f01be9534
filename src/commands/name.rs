use anyhow::{Context as _, Result};
use aptlykit::timestamp::TIMESTAMP_PLACEHOLDER;
use aptlykit::{
    Precision, Schedule, expand_timestamped_name, format_timestamp_with, round_timestamp,
};
use chrono::{NaiveDateTime, Utc};

use crate::cli::NameArgs;

pub fn run(args: &NameArgs) -> Result<()> {
    let ts = resolve_instant(args)?;
    println!("{}", render_name(&args.template, &ts, args.seconds));
    Ok(())
}

/// The `--at` instant (or now), rounded down to the requested schedule
fn resolve_instant(args: &NameArgs) -> Result<NaiveDateTime> {
    let ts = match &args.at {
        Some(at) => NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M")
            .with_context(|| format!("Invalid --at value '{at}', expected YYYY-MM-DDTHH:MM"))?,
        None => Utc::now().naive_utc(),
    };

    let schedule = match (&args.time, &args.weekday) {
        (Some(time), Some(weekday)) => Some(Schedule::weekly(weekday, time)?),
        (Some(time), None) => Some(Schedule::daily(time)?),
        (None, _) => None,
    };

    Ok(match schedule {
        Some(schedule) => round_timestamp(&ts, &schedule),
        None => ts,
    })
}

fn render_name(template: &str, ts: &NaiveDateTime, seconds: bool) -> String {
    if seconds {
        template.replace(
            TIMESTAMP_PLACEHOLDER,
            &format_timestamp_with(ts, Precision::Second),
        )
    } else {
        expand_timestamped_name(template, ts)
    }
}

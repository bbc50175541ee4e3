use crate::model::{Roster, RosterRequest, Worker};
use anyhow::{bail, Context};
use chrono::Weekday;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Lecture d'une requête JSON (sans validation métier : voir `Scheduler::build`).
pub fn load_request_json<P: AsRef<Path>>(path: P) -> anyhow::Result<RosterRequest> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let request = serde_json::from_slice(&data)
        .with_context(|| format!("parsing request {}", path.display()))?;
    Ok(request)
}

/// Import de membres depuis CSV: header
/// `name,requested_workdays[,date_off][,weekly_off][,special]`.
///
/// `date_off` : numéros de jour base 1 séparés par `;` (ex. `1;5;12`).
/// `weekly_off` : jours de la semaine séparés par `;` (ex. `Sat;Sun`).
pub fn import_workers_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Worker>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid worker row (empty name)");
        }
        let requested: u32 = rec
            .get(1)
            .context("missing requested_workdays")?
            .trim()
            .parse()
            .with_context(|| format!("invalid requested_workdays for {name}"))?;
        let mut worker = Worker::new(name, requested);
        if let Some(raw) = rec.get(2) {
            worker.date_off =
                parse_days(raw).with_context(|| format!("invalid date_off for {name}"))?;
        }
        if let Some(raw) = rec.get(3) {
            worker.weekly_off =
                parse_weekdays(raw).with_context(|| format!("invalid weekly_off for {name}"))?;
        }
        if let Some(flag) = rec.get(4) {
            let flag = flag.trim();
            if !flag.is_empty() {
                worker.special =
                    parse_bool(flag).with_context(|| format!("invalid special for {name}"))?;
            }
        }
        out.push(worker);
    }
    Ok(out)
}

/// `"1;5;12"` → `{0, 4, 11}`. Le jour 0 n'existe pas en base 1.
pub fn parse_days(raw: &str) -> anyhow::Result<BTreeSet<usize>> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let n: usize = s.parse().with_context(|| format!("invalid day number: {s}"))?;
            if n == 0 {
                bail!("day numbers start at 1");
            }
            Ok(n - 1)
        })
        .collect()
}

pub fn parse_weekdays(raw: &str) -> anyhow::Result<Vec<Weekday>> {
    let mut out = Vec::new();
    for s in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let day: Weekday = s
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid weekday: {s}"))?;
        if !out.contains(&day) {
            out.push(day);
        }
    }
    Ok(out)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Export JSON du planning (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

pub fn load_roster_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Roster> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing roster {}", path.display()))
}

/// Export CSV de la grille : header `worker,Day1..DayN,workdays`, une ligne par membre
/// puis une ligne `headcount` (effectif par jour, total général en dernière colonne).
pub fn export_grid_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    let mut num = itoa::Buffer::new();

    let mut header = Vec::with_capacity(roster.num_days() + 2);
    header.push("worker".to_string());
    for day in 1..=roster.num_days() {
        header.push(format!("Day{}", num.format(day)));
    }
    header.push("workdays".to_string());
    w.write_record(&header)?;

    for row in &roster.workers {
        let actual = row.actual.to_string();
        let mut rec: Vec<&str> = Vec::with_capacity(row.cells.len() + 2);
        rec.push(&row.name);
        rec.extend(row.cells.iter().map(|c| c.symbol()));
        rec.push(&actual);
        w.write_record(&rec)?;
    }

    let mut totals = Vec::with_capacity(roster.num_days() + 2);
    totals.push("headcount".to_string());
    totals.extend(roster.daily_headcount.iter().map(|n| num.format(*n).to_owned()));
    totals.push(num.format(roster.grand_total).to_owned());
    w.write_record(&totals)?;

    w.flush()?;
    Ok(())
}

/// Export CSV du récapitulatif: header `worker,requested,actual,delta`
pub fn export_summary_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["worker", "requested", "actual", "delta"])?;
    for row in &roster.workers {
        let requested = row.requested.to_string();
        let actual = row.actual.to_string();
        let delta = row.delta.to_string();
        w.write_record([
            row.name.as_str(),
            requested.as_str(),
            actual.as_str(),
            delta.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_numbers_are_one_based() {
        let days = parse_days("1; 5,12").unwrap();
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![0, 4, 11]);
        assert!(parse_days("0").is_err());
        assert!(parse_days("x").is_err());
        assert!(parse_days("").unwrap().is_empty());
    }

    #[test]
    fn weekdays_accept_short_and_long_names() {
        let days = parse_weekdays("Sat;sunday;Sat").unwrap();
        assert_eq!(days, vec![Weekday::Sat, Weekday::Sun]);
        assert!(parse_weekdays("Someday").is_err());
    }
}

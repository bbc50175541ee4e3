#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use shiftplan::{
    io,
    model::{RosterRequest, WeekdayRequirement},
    report::{RosterRenderer, TextTable},
    scheduler::{RosterError, Scheduler, ViolationKind},
    solver::SolveLimits,
    storage::{JsonStorage, Storage},
};
use std::time::Duration;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération de plannings (requête JSON, sorties CSV/JSON)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de la requête
    #[arg(long, global = true, default_value = "request.json")]
    request: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer une requête avec les valeurs par défaut
    Init {
        #[arg(long, default_value_t = 18, value_parser = clap::value_parser!(u16).range(3..=30))]
        workers: u16,
        #[arg(long, default_value_t = 28, value_parser = clap::value_parser!(u16).range(7..=31))]
        days: u16,
        /// Jour de la semaine du jour 1 (Mon..Sun)
        #[arg(long, value_parser = parse_weekday, default_value = "Mon")]
        first_weekday: Weekday,
        /// Date du jour 1 (AAAA-MM-JJ), prioritaire sur --first-weekday
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long, default_value_t = 15)]
        requested: u32,
        /// Membres spéciaux, numéros base 1 "1,2,3" (vide pour aucun)
        #[arg(long, default_value = "1,2,3")]
        special: String,
        /// Écrase une requête existante
        #[arg(long)]
        force: bool,
    },

    /// Remplacer les membres depuis un CSV
    ImportWorkers {
        #[arg(long)]
        csv: String,
    },

    /// Fixer l'effectif requis d'un ou plusieurs jours de la semaine
    SetRequirement {
        /// liste "Mon,Tue,..." ou "all"
        #[arg(long)]
        weekdays: String,
        #[arg(long)]
        count: u32,
    },

    /// Modifier un membre (nom ou numéro base 1)
    SetWorker {
        #[arg(long)]
        worker: String,
        #[arg(long)]
        requested: Option<u32>,
        /// jours de repos base 1 "1;5;12"
        #[arg(long)]
        date_off: Option<String>,
        /// jours hebdomadaires "Sat;Sun"
        #[arg(long)]
        weekly_off: Option<String>,
        #[arg(long)]
        special: Option<bool>,
    },

    /// Calculer le planning
    Solve {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        summary_csv: Option<String>,
        /// Limite de temps du solveur (secondes)
        #[arg(long)]
        time_limit: Option<u64>,
        #[arg(long)]
        max_in_window: Option<u32>,
        #[arg(long)]
        max_total_workdays: Option<u32>,
    },

    /// Vérifier un planning exporté en JSON contre la requête
    Check {
        #[arg(long)]
        roster_json: String,
        /// Export CSV des violations (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Afficher la requête
    Show,
}

fn parse_weekday(s: &str) -> Result<Weekday, String> {
    s.parse::<Weekday>()
        .map_err(|_| format!("invalid weekday: {s}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.request)?;

    let code = match cli.cmd {
        Commands::Init {
            workers,
            days,
            first_weekday,
            start,
            requested,
            special,
            force,
        } => {
            if storage.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    storage.path().display()
                );
            }
            let workers = usize::from(workers);
            let cap = |n: u32| n.min(workers as u32);
            let requirement =
                WeekdayRequirement::from_counts([9, 9, 9, 9, 9, 11, 12].map(cap));
            let mut request = RosterRequest::new(
                workers,
                usize::from(days),
                first_weekday,
                requirement,
                requested.min(u32::from(days)),
            );
            if let Some(start) = start {
                request = request.starting_on(start);
            }
            let members: Vec<usize> = io::parse_days(&special)?.into_iter().collect();
            if let Some(bad) = members.iter().find(|&&m| m >= workers) {
                bail!("special member {} is out of range (1..={workers})", bad + 1);
            }
            request.set_special_group(&members);
            storage.save(&request)?;
            println!("Request written to {}", storage.path().display());
            0
        }
        Commands::ImportWorkers { csv } => {
            let mut request = load(&storage)?;
            let workers = io::import_workers_csv(csv)?;
            request.num_workers = workers.len();
            request.workers = workers;
            storage.save(&request)?;
            0
        }
        Commands::SetRequirement { weekdays, count } => {
            let mut request = load(&storage)?;
            let days = if weekdays.trim().eq_ignore_ascii_case("all") {
                shiftplan::WEEKDAYS.to_vec()
            } else {
                io::parse_weekdays(&weekdays.replace(',', ";"))?
            };
            for day in days {
                request.requirement.set(day, count);
            }
            storage.save(&request)?;
            0
        }
        Commands::SetWorker {
            worker,
            requested,
            date_off,
            weekly_off,
            special,
        } => {
            let mut request = load(&storage)?;
            let idx = find_worker(&request, &worker)?;
            let w = &mut request.workers[idx];
            if let Some(n) = requested {
                w.requested_workdays = n;
            }
            if let Some(raw) = date_off {
                w.date_off = io::parse_days(&raw)?;
            }
            if let Some(raw) = weekly_off {
                w.weekly_off = io::parse_weekdays(&raw)?;
            }
            if let Some(flag) = special {
                w.special = flag;
            }
            storage.save(&request)?;
            0
        }
        Commands::Solve {
            out_json,
            out_csv,
            summary_csv,
            time_limit,
            max_in_window,
            max_total_workdays,
        } => {
            let mut request = load(&storage)?;
            if let Some(n) = max_in_window {
                request.rules.max_in_window = n;
            }
            if let Some(n) = max_total_workdays {
                request.rules.max_total_workdays = n;
            }
            let limits = SolveLimits {
                time_limit: time_limit.map(Duration::from_secs),
            };
            let scheduler = Scheduler::new().limits(limits);
            match scheduler.solve(&request) {
                Ok(roster) => {
                    if let Some(path) = out_json {
                        io::export_roster_json(path, &roster)?;
                    }
                    if let Some(path) = out_csv {
                        io::export_grid_csv(path, &roster)?;
                    }
                    if let Some(path) = summary_csv {
                        io::export_summary_csv(path, &roster)?;
                    }
                    print!("{}", TextTable.render(&roster));
                    println!("total deviation: {}", roster.total_deviation());
                    0
                }
                Err(RosterError::Infeasible) => {
                    eprintln!("No roster satisfies every rule for this request");
                    // Code 2 = WARNING/INCOMPLETE
                    2
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Check {
            roster_json,
            report,
        } => {
            let request = load(&storage)?;
            let roster = io::load_roster_json(&roster_json)?;
            let violations = Scheduler::new().detect_violations(&request, &roster);
            if violations.is_empty() {
                println!("OK: no violations");
                0
            } else {
                eprintln!("Found {} violation(s)", violations.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["worker", "day", "kind"])?;
                    for v in &violations {
                        let worker = v
                            .worker
                            .and_then(|id| roster.workers.get(id.index()))
                            .map(|row| row.name.as_str())
                            .unwrap_or("");
                        let day = v.day.map(|d| (d + 1).to_string()).unwrap_or_default();
                        w.write_record([worker, day.as_str(), kind_label(&v.kind)])?;
                    }
                    w.flush()?;
                }
                2
            }
        }
        Commands::Show => {
            let request = load(&storage)?;
            println!(
                "{} workers, {} days, first weekday {}",
                request.num_workers, request.num_days, request.first_weekday
            );
            for (day, count) in request.requirement.iter() {
                println!("  {day}: {count}");
            }
            for (i, w) in request.workers.iter().enumerate() {
                println!(
                    "#{} {}{} requested={} off={:?} weekly_off={:?}",
                    i + 1,
                    w.name,
                    if w.special { " (special)" } else { "" },
                    w.requested_workdays,
                    w.date_off.iter().map(|d| d + 1).collect::<Vec<_>>(),
                    w.weekly_off
                );
            }
            0
        }
    };

    std::process::exit(code);
}

fn load(storage: &JsonStorage) -> Result<RosterRequest> {
    storage
        .load()
        .with_context(|| "loading request (run `init` first)")
}

fn find_worker(request: &RosterRequest, key: &str) -> Result<usize> {
    if let Some((id, _)) = request.find_worker_by_name(key) {
        return Ok(id.index());
    }
    match key.parse::<usize>() {
        Ok(n) if n >= 1 && n <= request.workers.len() => Ok(n - 1),
        _ => bail!("unknown worker: {key}"),
    }
}

fn kind_label(kind: &ViolationKind) -> &'static str {
    match kind {
        ViolationKind::Headcount { .. } => "headcount",
        ViolationKind::DateOff => "date_off",
        ViolationKind::WeeklyOff => "weekly_off",
        ViolationKind::ConsecutiveCap { .. } => "consecutive",
        ViolationKind::TotalCap { .. } => "total",
        ViolationKind::SpecialQuota { .. } => "special_quota",
        ViolationKind::Shape { .. } => "shape",
    }
}

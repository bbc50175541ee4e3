#![forbid(unsafe_code)]
//! Shiftplan : génération de plannings de travail par programmation linéaire en nombres entiers.
//!
//! - Une variable binaire par (membre, jour), deux variables d'écart par membre.
//! - Règles : effectif par jour de semaine, repos demandés, indisponibilités
//!   hebdomadaires, fenêtre glissante de jours consécutifs, plafond total,
//!   quota de membres spéciaux.
//! - Objectif : minimiser la somme des écarts au nombre de jours demandé.
//! - La résolution est déléguée à un [`solver::SolverBackend`] (good_lp/microlp par défaut).

pub mod calendar;
#[cfg(feature = "serde")]
pub mod io;
pub mod lp;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod solver;
#[cfg(feature = "serde")]
pub mod storage;

pub use calendar::{day_weekday, first_weekday_from_date, weekday_of, WEEKDAYS};
pub use model::{
    Cell, Roster, RosterRequest, SolveStatus, WeekdayRequirement, Worker, WorkerId, WorkerRow,
};
pub use report::{RosterRenderer, TextTable};
pub use scheduler::{
    RosterError, RosterModel, RuleSet, Scheduler, SoloSpecialPolicy, Violation, ViolationKind,
};
pub use solver::{GoodLpSolver, SolveLimits, SolveOutcome, SolverBackend};
#[cfg(feature = "serde")]
pub use storage::{JsonStorage, Storage};

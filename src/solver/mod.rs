//! Frontière avec le solveur MILP externe.
//!
//! Le cœur ne connaît que [`SolverBackend`] : n'importe quel solveur capable de
//! variables binaires/continues, contraintes linéaires et objectif linéaire
//! à minimiser convient.

mod milp;

pub use milp::GoodLpSolver;

use crate::lp::Model;
use std::time::Duration;
use thiserror::Error;

/// Résultat brut d'une résolution. Les valeurs sont indexées par [`crate::lp::VarId`].
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Optimal(Vec<f64>),
    /// Solution admissible non prouvée optimale (limite atteinte).
    Feasible(Vec<f64>),
    Infeasible,
    Unbounded,
}

/// Limites passées au solveur.
///
/// `time_limit` borne l'attente de l'appelant. Un backend qui ne sait pas
/// s'arrêter en cours de route (c'est le cas de [`GoodLpSolver`]) peut
/// continuer à calculer en arrière-plan après [`BackendError::TimedOut`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveLimits {
    pub time_limit: Option<Duration>,
}

impl SolveLimits {
    pub fn with_time_limit(limit: Duration) -> Self {
        Self {
            time_limit: Some(limit),
        }
    }
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("time limit of {0:?} exceeded")]
    TimedOut(Duration),
    #[error("{0}")]
    Unavailable(String),
}

pub trait SolverBackend {
    /// Résout `model` (minimisation). Une erreur signifie que le solveur n'a pas pu conclure.
    fn solve(&self, model: &Model, limits: &SolveLimits) -> Result<SolveOutcome, BackendError>;
}

impl<T: SolverBackend + ?Sized> SolverBackend for &T {
    fn solve(&self, model: &Model, limits: &SolveLimits) -> Result<SolveOutcome, BackendError> {
        (**self).solve(model, limits)
    }
}

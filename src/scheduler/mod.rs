mod builder;
mod catalog;
mod interpret;
mod types;
mod violations;

pub use builder::RosterModel;
pub use interpret::INTEGRALITY_EPS;
pub use types::{
    ConstraintKind, RosterError, RuleSet, SoloSpecialPolicy, Violation, ViolationKind,
};

use crate::model::{Roster, RosterRequest, SolveStatus};
use crate::solver::{BackendError, GoodLpSolver, SolveLimits, SolveOutcome, SolverBackend};

/// Tolérance utilisée pour revérifier le modèle sur les valeurs du solveur.
const MODEL_CHECK_EPS: f64 = 1e-5;

impl From<BackendError> for RosterError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::TimedOut(limit) => RosterError::TimeLimit(limit),
            BackendError::Unavailable(msg) => RosterError::SolverUnavailable(msg),
        }
    }
}

/// Scheduler : construit le modèle d'une requête et le fait résoudre par un backend.
///
/// Aucun état n'est partagé entre deux appels ; un même `Scheduler` peut servir
/// plusieurs threads si le backend est `Sync`.
#[derive(Debug, Clone, Default)]
pub struct Scheduler<B = GoodLpSolver> {
    backend: B,
    limits: SolveLimits,
}

impl Scheduler<GoodLpSolver> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: SolverBackend> Scheduler<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            limits: SolveLimits::default(),
        }
    }

    pub fn limits(mut self, limits: SolveLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Valide la requête et construit le modèle avec `request.rules`.
    pub fn build(&self, request: &RosterRequest) -> Result<RosterModel, RosterError> {
        builder::build(request, &request.rules)
    }

    pub fn solve_model(&self, rm: &RosterModel) -> Result<Roster, RosterError> {
        let outcome = self.backend.solve(rm.model(), &self.limits)?;
        let (values, status) = match outcome {
            SolveOutcome::Optimal(v) => (v, SolveStatus::Optimal),
            SolveOutcome::Feasible(v) => (v, SolveStatus::Feasible),
            SolveOutcome::Infeasible => {
                tracing::info!("roster model is infeasible");
                return Err(RosterError::Infeasible);
            }
            SolveOutcome::Unbounded => {
                return Err(RosterError::Internal("solver reported an unbounded model"))
            }
        };

        if let Some(broken) = rm.model().unsatisfied(&values, MODEL_CHECK_EPS).next() {
            tracing::error!(kind = ?broken.kind, "solver assignment breaks the model");
            return Err(RosterError::Internal("solver assignment breaks the model"));
        }

        let roster = interpret::interpret(rm, &values, status)?;
        tracing::info!(
            run_id = %roster.run_id,
            status = ?roster.status,
            objective = roster.objective,
            total = roster.grand_total,
            "roster solved"
        );
        Ok(roster)
    }

    /// build + solve en un appel.
    pub fn solve(&self, request: &RosterRequest) -> Result<Roster, RosterError> {
        let rm = self.build(request)?;
        self.solve_model(&rm)
    }

    pub fn detect_violations(&self, request: &RosterRequest, roster: &Roster) -> Vec<Violation> {
        violations::detect_violations(request, &request.rules, roster)
    }
}

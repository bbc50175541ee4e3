use super::{BackendError, SolveLimits, SolveOutcome, SolverBackend};
use crate::lp::{Cmp, LinearExpr, Model, VarDef, VarKind};
use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable, VariableDefinition,
};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;

/// Adaptateur good_lp, backend `microlp` (pur Rust, sans bibliothèque système).
///
/// La limite de temps n'interrompt pas microlp : au-delà, l'appel rend
/// [`BackendError::TimedOut`] mais le thread de calcul continue jusqu'au bout
/// et occupe un cœur tant qu'il tourne.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl SolverBackend for GoodLpSolver {
    fn solve(&self, model: &Model, limits: &SolveLimits) -> Result<SolveOutcome, BackendError> {
        let Some(limit) = limits.time_limit else {
            return run(model);
        };

        // microlp n'a pas de limite de temps : le calcul part sur un thread dédié,
        // abandonné (détaché) si la limite est dépassée.
        let owned = model.clone();
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("shiftplan-solve".into())
            .spawn(move || {
                let _ = tx.send(run(&owned));
            })
            .map_err(|e| BackendError::Unavailable(format!("spawning solver thread: {e}")))?;

        match rx.recv_timeout(limit) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(?limit, "solver detached after time limit, still running");
                Err(BackendError::TimedOut(limit))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(BackendError::Unavailable("solver thread panicked".into()))
            }
        }
    }
}

fn run(model: &Model) -> Result<SolveOutcome, BackendError> {
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .vars()
        .iter()
        .map(|def| vars.add(definition(def)))
        .collect();

    let objective = expression(model.objective(), &handles);
    let mut problem = vars.minimise(objective).using(microlp);
    for c in model.constraints() {
        let lhs = expression(&c.expr, &handles);
        let row = match c.cmp {
            Cmp::Eq => constraint::eq(lhs, c.rhs),
            Cmp::Le => constraint::leq(lhs, c.rhs),
            Cmp::Ge => constraint::geq(lhs, c.rhs),
        };
        problem.add_constraint(row);
    }

    match problem.solve() {
        Ok(solution) => {
            let values = handles.iter().map(|v| solution.value(*v)).collect();
            Ok(SolveOutcome::Optimal(values))
        }
        Err(ResolutionError::Infeasible) => Ok(SolveOutcome::Infeasible),
        Err(ResolutionError::Unbounded) => Ok(SolveOutcome::Unbounded),
        Err(other) => Err(BackendError::Unavailable(other.to_string())),
    }
}

fn definition(def: &VarDef) -> VariableDefinition {
    let base = variable().name(def.name.clone());
    match def.kind {
        VarKind::Binary => base.binary(),
        VarKind::Continuous { lower, upper } => {
            let base = base.min(lower);
            match upper {
                Some(u) => base.max(u),
                None => base,
            }
        }
    }
}

fn expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    expr.terms
        .iter()
        .map(|(var, coef)| *coef * handles[var.index()])
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ConstraintKind;

    #[test]
    fn solves_a_tiny_binary_program() {
        // min a + b  s.c.  a + b >= 1, a <= 0
        let mut m = Model::new();
        let a = m.add_var("a", VarKind::Binary);
        let b = m.add_var("b", VarKind::Binary);
        m.add_constraint(
            ConstraintKind::Headcount { day: 0 },
            LinearExpr::sum([a, b]),
            Cmp::Ge,
            1.0,
        );
        m.add_constraint(
            ConstraintKind::DateOff { worker: 0, day: 0 },
            LinearExpr::sum([a]),
            Cmp::Le,
            0.0,
        );
        m.minimise(LinearExpr::sum([a, b]));

        let SolveOutcome::Optimal(values) = GoodLpSolver.solve(&m, &SolveLimits::default()).unwrap()
        else {
            panic!("expected an optimal solution");
        };
        assert!(values[a.index()].abs() < 1e-6);
        assert!((values[b.index()] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn reports_infeasibility() {
        let mut m = Model::new();
        let a = m.add_var("a", VarKind::Binary);
        m.add_constraint(
            ConstraintKind::Headcount { day: 0 },
            LinearExpr::sum([a]),
            Cmp::Eq,
            2.0,
        );
        m.minimise(LinearExpr::sum([a]));
        let outcome = GoodLpSolver
            .solve(&m, &SolveLimits::with_time_limit(std::time::Duration::from_secs(30)))
            .unwrap();
        assert_eq!(outcome, SolveOutcome::Infeasible);
    }
}

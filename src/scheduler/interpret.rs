use super::builder::RosterModel;
use super::RosterError;
use crate::model::{Cell, Roster, SolveStatus, WorkerRow};
use chrono::Utc;
use uuid::Uuid;

/// Tolérance d'intégralité sur les valeurs rendues par le solveur.
pub const INTEGRALITY_EPS: f64 = 1e-6;

/// Convertit les valeurs résolues en planning symbolique + totaux.
pub(super) fn interpret(
    rm: &RosterModel,
    values: &[f64],
    status: SolveStatus,
) -> Result<Roster, RosterError> {
    let req = &rm.request;
    if values.len() != rm.model.vars().len() {
        return Err(RosterError::Internal("solver returned a wrong number of values"));
    }

    let mut daily_headcount = vec![0u32; req.num_days];
    let mut daily_raw = vec![0.0f64; req.num_days];
    let mut workers = Vec::with_capacity(req.num_workers);

    for (i, w) in req.workers.iter().enumerate() {
        let mut cells = Vec::with_capacity(req.num_days);
        let mut raw_sum = 0.0;
        for (j, head) in daily_headcount.iter_mut().enumerate() {
            let value = values[rm.x[i][j].index()];
            raw_sum += value;
            daily_raw[j] += value;
            let worked = as_bool(value).ok_or(RosterError::NonIntegral {
                worker: i,
                day: j,
                value,
            })?;
            let cell = if worked {
                *head += 1;
                if w.special {
                    Cell::WorkedSpecial
                } else {
                    Cell::WorkedOrdinary
                }
            } else if w.is_off_by_request(j, req.weekday(j)) {
                Cell::OffRequested
            } else {
                Cell::OffUnassigned
            };
            cells.push(cell);
        }

        let actual = cells.iter().filter(|c| c.is_worked()).count() as u32;
        if !matches_raw_sum(raw_sum, actual, req.num_days) {
            return Err(RosterError::Internal("worker total differs from variable sum"));
        }
        workers.push(WorkerRow {
            name: w.name.clone(),
            special: w.special,
            cells,
            requested: w.requested_workdays,
            actual,
            delta: i64::from(actual) - i64::from(w.requested_workdays),
        });
    }

    if daily_headcount
        .iter()
        .zip(&daily_raw)
        .any(|(head, raw)| !matches_raw_sum(*raw, *head, req.num_workers))
    {
        return Err(RosterError::Internal("daily headcount differs from variable sum"));
    }

    let grand_total = daily_headcount.iter().sum();
    let objective = rm.model.objective().eval(values);

    Ok(Roster {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        first_weekday: req.first_weekday,
        status,
        objective,
        workers,
        daily_headcount,
        grand_total,
    })
}

/// Total arrondi contre la somme brute de `terms` valeurs.
fn matches_raw_sum(raw: f64, rounded: u32, terms: usize) -> bool {
    (raw - f64::from(rounded)).abs() <= INTEGRALITY_EPS * terms as f64
}

fn as_bool(value: f64) -> Option<bool> {
    if value.abs() <= INTEGRALITY_EPS {
        Some(false)
    } else if (value - 1.0).abs() <= INTEGRALITY_EPS {
        Some(true)
    } else {
        None
    }
}

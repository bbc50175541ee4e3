//! Catalogue des règles : chaque étape ajoute une famille de contraintes au modèle.
//! Une étape sans donnée (aucun repos demandé, groupe spécial vide) n'émet rien.

use super::builder::RosterModel;
use super::{ConstraintKind, RuleSet};
use crate::lp::{Cmp, LinearExpr};
use crate::model::RosterRequest;

/// (a) effectif exact par jour selon le jour de la semaine.
pub(super) fn daily_headcount(rm: &mut RosterModel, req: &RosterRequest) {
    for day in 0..req.num_days {
        let expr = LinearExpr::sum(rm.x.iter().map(|row| row[day]));
        rm.model.add_constraint(
            ConstraintKind::Headcount { day },
            expr,
            Cmp::Eq,
            f64::from(req.required_on(day)),
        );
    }
}

/// (b) repos demandés à date fixe.
pub(super) fn date_off(rm: &mut RosterModel, req: &RosterRequest) {
    for (worker, w) in req.workers.iter().enumerate() {
        for &day in &w.date_off {
            let expr = LinearExpr::sum([rm.x[worker][day]]);
            rm.model
                .add_constraint(ConstraintKind::DateOff { worker, day }, expr, Cmp::Eq, 0.0);
        }
    }
}

/// (c) indisponibilités hebdomadaires.
pub(super) fn weekly_off(rm: &mut RosterModel, req: &RosterRequest) {
    for (worker, w) in req.workers.iter().enumerate() {
        if w.weekly_off.is_empty() {
            continue;
        }
        for day in 0..req.num_days {
            if !w.weekly_off.contains(&req.weekday(day)) {
                continue;
            }
            let expr = LinearExpr::sum([rm.x[worker][day]]);
            rm.model
                .add_constraint(ConstraintKind::WeeklyOff { worker, day }, expr, Cmp::Eq, 0.0);
        }
    }
}

/// (d) au plus `max_in_window` jours travaillés sur toute fenêtre glissante.
pub(super) fn consecutive_cap(rm: &mut RosterModel, req: &RosterRequest, rules: &RuleSet) {
    let len = rules.window_days;
    if len == 0 || req.num_days < len {
        return;
    }
    for worker in 0..req.num_workers {
        for start in 0..=(req.num_days - len) {
            let expr = LinearExpr::sum(rm.x[worker][start..start + len].iter().copied());
            rm.model.add_constraint(
                ConstraintKind::ConsecutiveCap { worker, start },
                expr,
                Cmp::Le,
                f64::from(rules.max_in_window),
            );
        }
    }
}

/// (e) plafond de jours travaillés sur la période.
pub(super) fn total_cap(rm: &mut RosterModel, req: &RosterRequest, rules: &RuleSet) {
    for worker in 0..req.num_workers {
        let expr = LinearExpr::sum(rm.x[worker].iter().copied());
        rm.model.add_constraint(
            ConstraintKind::TotalCap { worker },
            expr,
            Cmp::Le,
            f64::from(rules.max_total_workdays),
        );
    }
}

/// (f) quota exact de membres spéciaux par jour.
pub(super) fn special_quota(rm: &mut RosterModel, req: &RosterRequest, rules: &RuleSet) {
    let group = req.special_ids();
    let Some(quota) = rules.effective_quota(group.len()) else {
        return;
    };
    for day in 0..req.num_days {
        let expr = LinearExpr::sum(group.iter().map(|id| rm.x[id.index()][day]));
        rm.model.add_constraint(
            ConstraintKind::SpecialQuota { day },
            expr,
            Cmp::Eq,
            f64::from(quota),
        );
    }
}

/// (g) `Σ x[i][·] - over[i] + under[i] = demandé[i]`, et objectif `Σ over + under`.
pub(super) fn deviation_balance(rm: &mut RosterModel, req: &RosterRequest) {
    for (worker, w) in req.workers.iter().enumerate() {
        let expr = LinearExpr::sum(rm.x[worker].iter().copied())
            .term(rm.over[worker], -1.0)
            .term(rm.under[worker], 1.0);
        rm.model.add_constraint(
            ConstraintKind::Deviation { worker },
            expr,
            Cmp::Eq,
            f64::from(w.requested_workdays),
        );
    }
    let objective = LinearExpr::sum(rm.over.iter().chain(rm.under.iter()).copied());
    rm.model.minimise(objective);
}

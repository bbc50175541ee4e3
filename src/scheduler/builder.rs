use super::{catalog, ConstraintKind, RosterError, RuleSet};
use crate::lp::{Model, VarId, VarKind};
use crate::model::RosterRequest;
use std::collections::HashMap;

/// Modèle MILP d'un planning, prêt à être résolu.
#[derive(Debug, Clone)]
pub struct RosterModel {
    pub(crate) model: Model,
    /// `x[i][j]` : le membre `i` travaille le jour `j`.
    pub(crate) x: Vec<Vec<VarId>>,
    pub(crate) over: Vec<VarId>,
    pub(crate) under: Vec<VarId>,
    pub(crate) request: RosterRequest,
}

impl RosterModel {
    pub fn model(&self) -> &Model {
        &self.model
    }
    pub fn request(&self) -> &RosterRequest {
        &self.request
    }
    pub fn assignment_var(&self, worker: usize, day: usize) -> Option<VarId> {
        self.x.get(worker).and_then(|row| row.get(day)).copied()
    }
    pub fn deviation_vars(&self, worker: usize) -> Option<(VarId, VarId)> {
        Some((*self.over.get(worker)?, *self.under.get(worker)?))
    }

    /// Nombre de contraintes par famille (clé : nom de la variante).
    pub fn constraint_counts(&self) -> HashMap<&'static str, usize> {
        let mut out = HashMap::new();
        for c in self.model.constraints() {
            *out.entry(kind_name(&c.kind)).or_insert(0) += 1;
        }
        out
    }
}

pub(crate) fn kind_name(kind: &ConstraintKind) -> &'static str {
    match kind {
        ConstraintKind::Headcount { .. } => "headcount",
        ConstraintKind::DateOff { .. } => "date_off",
        ConstraintKind::WeeklyOff { .. } => "weekly_off",
        ConstraintKind::ConsecutiveCap { .. } => "consecutive_cap",
        ConstraintKind::TotalCap { .. } => "total_cap",
        ConstraintKind::SpecialQuota { .. } => "special_quota",
        ConstraintKind::Deviation { .. } => "deviation",
    }
}

/// Valide la requête puis construit variables, contraintes et objectif.
pub(super) fn build(request: &RosterRequest, rules: &RuleSet) -> Result<RosterModel, RosterError> {
    validate(request, rules)?;

    let mut model = Model::new();
    let x: Vec<Vec<VarId>> = (0..request.num_workers)
        .map(|i| {
            (0..request.num_days)
                .map(|j| model.add_var(format!("x_{i}_{j}"), VarKind::Binary))
                .collect()
        })
        .collect();
    let continuous = VarKind::Continuous {
        lower: 0.0,
        upper: None,
    };
    let over: Vec<VarId> = (0..request.num_workers)
        .map(|i| model.add_var(format!("over_{i}"), continuous))
        .collect();
    let under: Vec<VarId> = (0..request.num_workers)
        .map(|i| model.add_var(format!("under_{i}"), continuous))
        .collect();

    let mut rm = RosterModel {
        model,
        x,
        over,
        under,
        request: request.clone(),
    };

    catalog::daily_headcount(&mut rm, request);
    catalog::date_off(&mut rm, request);
    catalog::weekly_off(&mut rm, request);
    catalog::consecutive_cap(&mut rm, request, rules);
    catalog::total_cap(&mut rm, request, rules);
    catalog::special_quota(&mut rm, request, rules);
    catalog::deviation_balance(&mut rm, request);

    tracing::debug!(
        workers = request.num_workers,
        days = request.num_days,
        vars = rm.model.vars().len(),
        constraints = rm.model.constraints().len(),
        "roster model built"
    );
    Ok(rm)
}

fn validate(req: &RosterRequest, rules: &RuleSet) -> Result<(), RosterError> {
    let mut errors = Vec::new();

    if req.num_workers < 1 {
        errors.push("num_workers must be >= 1".to_string());
    }
    if req.num_days < 1 {
        errors.push("num_days must be >= 1".to_string());
    }
    if req.workers.len() != req.num_workers {
        errors.push(format!(
            "expected {} workers, got {}",
            req.num_workers,
            req.workers.len()
        ));
    }

    for (i, w) in req.workers.iter().enumerate() {
        if w.requested_workdays < 1 {
            errors.push(format!("{}: requested_workdays must be >= 1", w.name));
        }
        if w.requested_workdays as usize > req.num_days {
            errors.push(format!(
                "{}: requested_workdays {} exceeds num_days {}",
                w.name, w.requested_workdays, req.num_days
            ));
        }
        if let Some(day) = w.date_off.iter().find(|d| **d >= req.num_days) {
            errors.push(format!(
                "{} (#{}): date off {day} outside [0, {})",
                w.name,
                i + 1,
                req.num_days
            ));
        }
    }

    if rules.reject_overstaffed {
        for (day, count) in req.requirement.iter() {
            if count as usize > req.num_workers {
                errors.push(format!(
                    "requirement {count} on {day} exceeds num_workers {}",
                    req.num_workers
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(RosterError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{WeekdayRequirement, Worker};
    use chrono::Weekday;

    fn request(workers: usize, days: usize) -> RosterRequest {
        RosterRequest::new(
            workers,
            days,
            Weekday::Mon,
            WeekdayRequirement::uniform(2),
            3,
        )
    }

    #[test]
    fn emits_one_constraint_family_per_rule() {
        let mut req = request(4, 10);
        req.workers[0].date_off.extend([1, 3]);
        req.workers[1].weekly_off.push(Weekday::Sun);
        req.set_special_group(&[2, 3]);

        let rm = build(&req, &RuleSet::default()).unwrap();
        let counts = rm.constraint_counts();
        assert_eq!(counts["headcount"], 10);
        assert_eq!(counts["date_off"], 2);
        // dimanches : jours 6 uniquement sur 10 jours commençant un lundi
        assert_eq!(counts["weekly_off"], 1);
        assert_eq!(counts["consecutive_cap"], 4 * (10 - 4));
        assert_eq!(counts["total_cap"], 4);
        assert_eq!(counts["special_quota"], 10);
        assert_eq!(counts["deviation"], 4);
        assert_eq!(rm.model().vars().len(), 4 * 10 + 2 * 4);
    }

    #[test]
    fn optional_stages_stay_silent_without_input() {
        let rm = build(&request(3, 7), &RuleSet::default()).unwrap();
        let counts = rm.constraint_counts();
        assert!(!counts.contains_key("date_off"));
        assert!(!counts.contains_key("weekly_off"));
        assert!(!counts.contains_key("special_quota"));
    }

    #[test]
    fn short_period_has_no_window() {
        let rm = build(&request(3, 4), &RuleSet::default()).unwrap();
        assert!(!rm.constraint_counts().contains_key("consecutive_cap"));
    }

    #[test]
    fn solo_special_member_follows_policy() {
        let mut req = request(3, 7);
        req.set_special_group(&[0]);

        let rm = build(&req, &RuleSet::default()).unwrap();
        let quota = rm
            .model()
            .constraints()
            .iter()
            .find(|c| matches!(c.kind, ConstraintKind::SpecialQuota { .. }))
            .unwrap();
        assert_eq!(quota.rhs, 1.0);

        let exempt = RuleSet {
            solo_special: crate::scheduler::SoloSpecialPolicy::Exempt,
            ..RuleSet::default()
        };
        let rm = build(&req, &exempt).unwrap();
        assert!(!rm.constraint_counts().contains_key("special_quota"));
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut req = request(3, 7);
        req.workers[0].requested_workdays = 8;
        req.workers[1].date_off.insert(7);
        req.workers.push(Worker::new("extra", 1));
        req.requirement.set(Weekday::Sat, 5);

        let Err(RosterError::Validation(errors)) = build(&req, &RuleSet::default()) else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 4, "{errors:?}");
    }

    #[test]
    fn overstaffing_check_can_be_disabled() {
        let mut req = request(3, 7);
        req.requirement.set(Weekday::Sat, 5);
        let lenient = RuleSet {
            reject_overstaffed: false,
            ..RuleSet::default()
        };
        assert!(build(&req, &lenient).is_ok());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let req = request(0, 0);
        assert!(matches!(
            build(&req, &RuleSet::default()),
            Err(RosterError::Validation(_))
        ));
    }
}

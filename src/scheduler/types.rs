use crate::model::WorkerId;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Règles de planification
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuleSet {
    /// Taille de la fenêtre glissante de jours consécutifs.
    pub window_days: usize,
    /// Jours travaillés max dans une fenêtre.
    pub max_in_window: u32,
    pub max_total_workdays: u32,
    /// Nombre de membres spéciaux présents chaque jour (réduit à la taille du groupe).
    pub special_quota: u32,
    pub solo_special: SoloSpecialPolicy,
    /// Refuse dès la validation un effectif requis supérieur au nombre de membres.
    pub reject_overstaffed: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            window_days: 5,
            max_in_window: 4,
            max_total_workdays: 21,
            special_quota: 2,
            solo_special: SoloSpecialPolicy::WorkEveryDay,
            reject_overstaffed: true,
        }
    }
}

impl RuleSet {
    /// Quota journalier effectif pour un groupe de `group_len` membres, `None` si aucune contrainte.
    pub fn effective_quota(&self, group_len: usize) -> Option<u32> {
        match group_len {
            0 => None,
            1 if self.solo_special == SoloSpecialPolicy::Exempt => None,
            n => Some(self.special_quota.min(n as u32)),
        }
    }
}

/// Traitement d'un groupe spécial réduit à un seul membre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SoloSpecialPolicy {
    /// Quota `min(quota, 1)` : le membre travaille tous les jours.
    WorkEveryDay,
    /// Aucune contrainte de quota n'est émise.
    Exempt,
}

/// Famille d'une contrainte du modèle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Headcount { day: usize },
    DateOff { worker: usize, day: usize },
    WeeklyOff { worker: usize, day: usize },
    ConsecutiveCap { worker: usize, start: usize },
    TotalCap { worker: usize },
    SpecialQuota { day: usize },
    Deviation { worker: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Headcount { expected: u32, actual: u32 },
    DateOff,
    WeeklyOff,
    ConsecutiveCap { start: usize, worked: u32 },
    TotalCap { worked: u32 },
    SpecialQuota { expected: u32, actual: u32 },
    /// Le planning n'a pas la taille de la requête (membres ou jours).
    Shape { expected: usize, actual: usize },
}

/// Règle non respectée par un planning (jour et/ou membre concernés).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub worker: Option<WorkerId>,
    pub day: Option<usize>,
    pub kind: ViolationKind,
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("invalid roster request: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("no assignment satisfies every rule")]
    Infeasible,
    #[error("solver unavailable: {0}")]
    SolverUnavailable(String),
    #[error("solver time limit of {0:?} exceeded")]
    TimeLimit(Duration),
    #[error("non-integral value {value} for worker {worker} on day {day}")]
    NonIntegral {
        worker: usize,
        day: usize,
        value: f64,
    },
    #[error("internal error: {0}")]
    Internal(&'static str),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_shrinks_to_group() {
        let rules = RuleSet::default();
        assert_eq!(rules.effective_quota(0), None);
        assert_eq!(rules.effective_quota(1), Some(1));
        assert_eq!(rules.effective_quota(3), Some(2));

        let exempt = RuleSet {
            solo_special: SoloSpecialPolicy::Exempt,
            ..RuleSet::default()
        };
        assert_eq!(exempt.effective_quota(1), None);
        assert_eq!(exempt.effective_quota(2), Some(2));
    }
}

use crate::calendar;
use crate::scheduler::RuleSet;
use chrono::{DateTime, NaiveDate, Utc, Weekday};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Identifiant fort pour Worker (index dans la requête)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkerId(usize);

impl WorkerId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Personne à planifier
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Worker {
    pub name: String,
    pub requested_workdays: u32,
    /// Jours de repos demandés (index base 0 dans la période).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeSet::is_empty"))]
    pub date_off: BTreeSet<usize>,
    /// Jours de la semaine jamais travaillés.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub weekly_off: Vec<Weekday>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub special: bool,
}

impl Worker {
    pub fn new<N: Into<String>>(name: N, requested_workdays: u32) -> Self {
        Self {
            name: name.into(),
            requested_workdays,
            date_off: BTreeSet::new(),
            weekly_off: Vec::new(),
            special: false,
        }
    }

    /// Nom par défaut du i-ème membre ("Worker1", "Worker2", ...).
    pub fn default_name(index: usize) -> String {
        format!("Worker{}", index + 1)
    }

    pub fn is_off_by_request(&self, day: usize, weekday: Weekday) -> bool {
        self.date_off.contains(&day) || self.weekly_off.contains(&weekday)
    }
}

/// Effectif requis par jour de la semaine, identique sur toute la période.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeekdayRequirement {
    #[cfg_attr(feature = "serde", serde(default))]
    pub mon: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tue: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub wed: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub thu: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fri: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sat: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sun: u32,
}

impl WeekdayRequirement {
    pub fn uniform(count: u32) -> Self {
        Self::from_counts([count; 7])
    }

    /// Compte dans l'ordre lundi..dimanche.
    pub fn from_counts(c: [u32; 7]) -> Self {
        Self {
            mon: c[0],
            tue: c[1],
            wed: c[2],
            thu: c[3],
            fri: c[4],
            sat: c[5],
            sun: c[6],
        }
    }

    pub fn get(&self, day: Weekday) -> u32 {
        match day {
            Weekday::Mon => self.mon,
            Weekday::Tue => self.tue,
            Weekday::Wed => self.wed,
            Weekday::Thu => self.thu,
            Weekday::Fri => self.fri,
            Weekday::Sat => self.sat,
            Weekday::Sun => self.sun,
        }
    }

    pub fn set(&mut self, day: Weekday, count: u32) {
        let slot = match day {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        };
        *slot = count;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, u32)> + '_ {
        calendar::WEEKDAYS.iter().map(move |d| (*d, self.get(*d)))
    }
}

/// Requête complète d'un calcul de planning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RosterRequest {
    pub num_workers: usize,
    pub num_days: usize,
    pub first_weekday: Weekday,
    /// Date réelle du jour 0, si connue (informative).
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub period_start: Option<NaiveDate>,
    pub requirement: WeekdayRequirement,
    #[cfg_attr(feature = "serde", serde(default))]
    pub workers: Vec<Worker>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rules: RuleSet,
}

impl RosterRequest {
    /// Requête avec `num_workers` membres par défaut demandant chacun `requested` jours.
    pub fn new(
        num_workers: usize,
        num_days: usize,
        first_weekday: Weekday,
        requirement: WeekdayRequirement,
        requested: u32,
    ) -> Self {
        let workers = (0..num_workers)
            .map(|i| Worker::new(Worker::default_name(i), requested))
            .collect();
        Self {
            num_workers,
            num_days,
            first_weekday,
            period_start: None,
            requirement,
            workers,
            rules: RuleSet::default(),
        }
    }

    /// Positionne la date de début et aligne `first_weekday` dessus.
    pub fn starting_on(mut self, start: NaiveDate) -> Self {
        self.first_weekday = calendar::first_weekday_from_date(start);
        self.period_start = Some(start);
        self
    }

    pub fn weekday(&self, day: usize) -> Weekday {
        calendar::day_weekday(day, self.first_weekday)
    }

    pub fn required_on(&self, day: usize) -> u32 {
        self.requirement.get(self.weekday(day))
    }

    pub fn special_ids(&self) -> Vec<WorkerId> {
        self.workers
            .iter()
            .enumerate()
            .filter(|(_, w)| w.special)
            .map(|(i, _)| WorkerId::new(i))
            .collect()
    }

    /// Marque exactement les index donnés comme membres du groupe spécial.
    pub fn set_special_group(&mut self, members: &[usize]) {
        for (i, w) in self.workers.iter_mut().enumerate() {
            w.special = members.contains(&i);
        }
    }

    pub fn find_worker_by_name<'a>(&'a self, name: &str) -> Option<(WorkerId, &'a Worker)> {
        self.workers
            .iter()
            .enumerate()
            .find(|(_, w)| w.name == name)
            .map(|(i, w)| (WorkerId::new(i), w))
    }
}

/// Case du planning (symboles de la feuille d'origine)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cell {
    #[cfg_attr(feature = "serde", serde(rename = "◎"))]
    WorkedSpecial,
    #[cfg_attr(feature = "serde", serde(rename = "〇"))]
    WorkedOrdinary,
    #[cfg_attr(feature = "serde", serde(rename = "休"))]
    OffRequested,
    #[cfg_attr(feature = "serde", serde(rename = "×"))]
    OffUnassigned,
}

impl Cell {
    pub fn symbol(&self) -> &'static str {
        match self {
            Cell::WorkedSpecial => "◎",
            Cell::WorkedOrdinary => "〇",
            Cell::OffRequested => "休",
            Cell::OffUnassigned => "×",
        }
    }

    pub fn is_worked(&self) -> bool {
        matches!(self, Cell::WorkedSpecial | Cell::WorkedOrdinary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolveStatus {
    Optimal,
    Feasible,
}

/// Ligne d'un membre dans le planning résolu.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkerRow {
    pub name: String,
    pub special: bool,
    pub cells: Vec<Cell>,
    pub requested: u32,
    pub actual: u32,
    pub delta: i64,
}

/// Planning complet (sortie d'un calcul)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Roster {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub first_weekday: Weekday,
    pub status: SolveStatus,
    /// Somme des écarts |réel - demandé|.
    pub objective: f64,
    pub workers: Vec<WorkerRow>,
    pub daily_headcount: Vec<u32>,
    pub grand_total: u32,
}

impl Roster {
    pub fn num_days(&self) -> usize {
        self.daily_headcount.len()
    }

    pub fn find_worker_by_name<'a>(&'a self, name: &str) -> Option<&'a WorkerRow> {
        self.workers.iter().find(|w| w.name == name)
    }

    pub fn total_deviation(&self) -> u64 {
        self.workers.iter().map(|w| w.delta.unsigned_abs()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirement_reads_back_each_weekday() {
        let req = WeekdayRequirement::from_counts([1, 2, 3, 4, 5, 6, 7]);
        let counts: Vec<u32> = req.iter().map(|(_, c)| c).collect();
        assert_eq!(counts, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(req.get(Weekday::Sun), 7);
    }

    #[test]
    fn request_weekdays_follow_start_date() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(); // dimanche
        let req = RosterRequest::new(3, 7, Weekday::Mon, WeekdayRequirement::uniform(1), 2)
            .starting_on(start);
        assert_eq!(req.first_weekday, Weekday::Sun);
        assert_eq!(req.weekday(1), Weekday::Mon);
    }

    #[test]
    fn special_group_is_replaced() {
        let mut req = RosterRequest::new(4, 7, Weekday::Mon, WeekdayRequirement::uniform(1), 2);
        req.set_special_group(&[0, 2]);
        req.set_special_group(&[3]);
        assert_eq!(req.special_ids(), vec![WorkerId::new(3)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_requirement_defaults_to_zero() {
        let req: WeekdayRequirement = serde_json::from_str(r#"{"sat": 11, "sun": 12}"#).unwrap();
        assert_eq!(req.get(Weekday::Mon), 0);
        assert_eq!(req.get(Weekday::Sat), 11);
    }
}

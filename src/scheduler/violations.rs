use super::{RuleSet, Violation, ViolationKind};
use crate::model::{Roster, RosterRequest, WorkerId};

/// Relit un planning et liste toutes les règles enfreintes.
pub(super) fn detect_violations(
    request: &RosterRequest,
    rules: &RuleSet,
    roster: &Roster,
) -> Vec<Violation> {
    let mut out = shape_mismatches(request, roster);
    let days = request.num_days.min(roster.num_days());

    for day in 0..days {
        let actual = worked_count(roster, day, |_| true);
        let expected = request.required_on(day);
        if actual != expected {
            out.push(Violation {
                worker: None,
                day: Some(day),
                kind: ViolationKind::Headcount { expected, actual },
            });
        }
    }

    let group = request.special_ids();
    if let Some(expected) = rules.effective_quota(group.len()) {
        for day in 0..days {
            let actual = worked_count(roster, day, |i| group.contains(&WorkerId::new(i)));
            if actual != expected {
                out.push(Violation {
                    worker: None,
                    day: Some(day),
                    kind: ViolationKind::SpecialQuota { expected, actual },
                });
            }
        }
    }

    for (i, (worker, row)) in request.workers.iter().zip(&roster.workers).enumerate() {
        let id = WorkerId::new(i);
        let worked: Vec<bool> = row.cells.iter().take(days).map(|c| c.is_worked()).collect();

        for (day, _) in worked.iter().enumerate().filter(|(_, w)| **w) {
            let kind = if worker.date_off.contains(&day) {
                ViolationKind::DateOff
            } else if worker.weekly_off.contains(&request.weekday(day)) {
                ViolationKind::WeeklyOff
            } else {
                continue;
            };
            out.push(Violation {
                worker: Some(id),
                day: Some(day),
                kind,
            });
        }

        if rules.window_days > 0 {
            for (start, window) in worked.windows(rules.window_days).enumerate() {
                let count = window.iter().filter(|w| **w).count() as u32;
                if count > rules.max_in_window {
                    out.push(Violation {
                        worker: Some(id),
                        day: Some(start),
                        kind: ViolationKind::ConsecutiveCap {
                            start,
                            worked: count,
                        },
                    });
                }
            }
        }

        let total = worked.iter().filter(|w| **w).count() as u32;
        if total > rules.max_total_workdays {
            out.push(Violation {
                worker: Some(id),
                day: None,
                kind: ViolationKind::TotalCap { worked: total },
            });
        }
    }

    if !out.is_empty() {
        tracing::warn!(count = out.len(), "roster breaks scheduling rules");
    }
    out
}

/// Nombre de membres, longueur de la période, puis longueur de chaque ligne.
fn shape_mismatches(request: &RosterRequest, roster: &Roster) -> Vec<Violation> {
    let mut out = Vec::new();
    if roster.workers.len() != request.num_workers {
        out.push(Violation {
            worker: None,
            day: None,
            kind: ViolationKind::Shape {
                expected: request.num_workers,
                actual: roster.workers.len(),
            },
        });
    }
    if roster.num_days() != request.num_days {
        out.push(Violation {
            worker: None,
            day: None,
            kind: ViolationKind::Shape {
                expected: request.num_days,
                actual: roster.num_days(),
            },
        });
    }
    for (i, row) in roster.workers.iter().enumerate() {
        if row.cells.len() != request.num_days {
            out.push(Violation {
                worker: Some(WorkerId::new(i)),
                day: None,
                kind: ViolationKind::Shape {
                    expected: request.num_days,
                    actual: row.cells.len(),
                },
            });
        }
    }
    out
}

fn worked_count(roster: &Roster, day: usize, include: impl Fn(usize) -> bool) -> u32 {
    roster
        .workers
        .iter()
        .enumerate()
        .filter(|(i, row)| include(*i) && row.cells.get(day).is_some_and(|c| c.is_worked()))
        .count() as u32
}

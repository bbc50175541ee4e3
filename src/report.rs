use crate::model::Roster;
use std::fmt::Write;

/// Permet de customiser le rendu du planning (terminal, mail, etc.).
pub trait RosterRenderer {
    fn render(&self, roster: &Roster) -> String;
}

/// Tableau texte à largeur fixe, une colonne par jour.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextTable;

const NAME_WIDTH: usize = 10;

impl RosterRenderer for TextTable {
    fn render(&self, roster: &Roster) -> String {
        let mut out = String::new();

        let _ = write!(out, "{:<NAME_WIDTH$}", "worker");
        for day in 1..=roster.num_days() {
            let _ = write!(out, "{day:>3}");
        }
        let _ = writeln!(out, " | {:>4} {:>4} {:>5}", "act", "req", "delta");

        for row in &roster.workers {
            let _ = write!(out, "{:<NAME_WIDTH$}", row.name);
            for cell in &row.cells {
                let _ = write!(out, "{:>3}", cell.symbol());
            }
            let _ = writeln!(
                out,
                " | {:>4} {:>4} {:>+5}",
                row.actual, row.requested, row.delta
            );
        }

        let _ = write!(out, "{:<NAME_WIDTH$}", "headcount");
        for n in &roster.daily_headcount {
            let _ = write!(out, "{n:>3}");
        }
        let _ = writeln!(out, " | {:>4}", roster.grand_total);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, SolveStatus, WorkerRow};
    use chrono::{TimeZone, Utc, Weekday};
    use uuid::Uuid;

    #[test]
    fn renders_grid_and_totals() {
        let roster = Roster {
            run_id: Uuid::nil(),
            generated_at: Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap(),
            first_weekday: Weekday::Mon,
            status: SolveStatus::Optimal,
            objective: 1.0,
            workers: vec![
                WorkerRow {
                    name: "Worker1".into(),
                    special: true,
                    cells: vec![Cell::WorkedSpecial, Cell::WorkedSpecial, Cell::OffRequested],
                    requested: 2,
                    actual: 2,
                    delta: 0,
                },
                WorkerRow {
                    name: "Worker2".into(),
                    special: false,
                    cells: vec![Cell::OffUnassigned, Cell::WorkedOrdinary, Cell::WorkedOrdinary],
                    requested: 3,
                    actual: 2,
                    delta: -1,
                },
            ],
            daily_headcount: vec![1, 2, 1],
            grand_total: 4,
        };

        insta::assert_snapshot!(TextTable.render(&roster), @r"
        worker      1  2  3 |  act  req delta
        Worker1     ◎  ◎  休 |    2    2    +0
        Worker2     ×  〇  〇 |    2    3    -1
        headcount   1  2  1 |    4
        ");
    }
}

use crate::scheduler::RosterError;
use chrono::{Datelike, NaiveDate, Weekday};

/// Ordre fixe des jours de la semaine (lundi en premier).
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Jour de la semaine du jour `day_index` (base 0) d'une période qui commence un `first`.
pub fn weekday_of(day_index: i64, first: Weekday) -> Result<Weekday, RosterError> {
    if day_index < 0 {
        return Err(RosterError::Validation(vec![format!(
            "day index must be >= 0 (got {day_index})"
        )]));
    }
    let offset = (day_index % 7) as usize;
    Ok(day_weekday(offset, first))
}

/// Variante infaillible pour les index déjà validés.
pub fn day_weekday(day_index: usize, first: Weekday) -> Weekday {
    let start = first.num_days_from_monday() as usize;
    WEEKDAYS[(start + day_index) % 7]
}

pub fn first_weekday_from_date(start: NaiveDate) -> Weekday {
    start.weekday()
}

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::session::Session;

/// Cells in a month view: six Monday-first weeks.
pub const GRID_CELLS: usize = 42;

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub sessions: Vec<&'a Session>,
}

/// Buckets `sessions` into the 42-cell grid of the month containing `reference`.
///
/// Filler cells from the neighbouring months never carry sessions. Sessions
/// keep the order they have in `sessions`; the ones without a date land nowhere.
pub fn month_grid<'a>(reference: NaiveDate, sessions: &'a [Session]) -> Vec<CalendarDay<'a>> {
    let first = first_of_month(reference);
    let total_days = days_in_month(first.year(), first.month());

    let mut days = Vec::with_capacity(GRID_CELLS);

    let leading = leading_days(first);
    for offset in (1..=leading).rev() {
        days.push(CalendarDay {
            date: first - Duration::days(offset as i64),
            is_current_month: false,
            sessions: Vec::new(),
        });
    }

    for day in 0..total_days {
        let date = first + Duration::days(day as i64);
        let day_sessions = sessions
            .iter()
            .filter(|s| s.date == Some(date))
            .collect();
        days.push(CalendarDay {
            date,
            is_current_month: true,
            sessions: day_sessions,
        });
    }

    let after = first + Duration::days(total_days as i64);
    let remaining = GRID_CELLS - days.len();
    for offset in 0..remaining {
        days.push(CalendarDay {
            date: after + Duration::days(offset as i64),
            is_current_month: false,
            sessions: Vec::new(),
        });
    }

    days
}

/// Days borrowed from the previous month so the grid starts on a Monday.
pub fn leading_days(first_of_month: NaiveDate) -> u32 {
    match first_of_month.weekday() {
        Weekday::Sun => 6,
        other => other.num_days_from_sunday() - 1,
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(start), Some(end)) => end.signed_duration_since(start).num_days() as u32,
        _ => 30,
    }
}

/// Moves `date` by `delta` months, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + delta;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session(id: i64, on: Option<NaiveDate>) -> Session {
        Session {
            id,
            name: format!("Sesion {id}"),
            date: on,
            start: None,
            end: None,
            parent_id: None,
            parent_name: None,
            location: None,
            description: None,
            tolerance_minutes: None,
            status: None,
        }
    }

    #[test]
    fn february_2024_layout() {
        let grid = month_grid(date(2024, 2, 20), &[]);
        let leading = grid.iter().take_while(|d| !d.is_current_month).count();
        let current = grid.iter().filter(|d| d.is_current_month).count();

        assert_eq!(grid.len(), 42);
        assert_eq!(leading, 3);
        assert_eq!(current, 29);
        assert_eq!(grid.len() - leading - current, 10);
        assert_eq!(grid[0].date, date(2024, 1, 29));
        assert_eq!(grid[41].date, date(2024, 3, 10));
    }

    #[test]
    fn every_month_of_a_decade_is_monday_to_sunday() {
        for year in 2020..2030 {
            for month in 1..=12 {
                let grid = month_grid(date(year, month, 1), &[]);
                assert_eq!(grid.len(), GRID_CELLS);
                assert_eq!(grid[0].date.weekday(), Weekday::Mon);
                assert_eq!(grid[41].date.weekday(), Weekday::Sun);

                let flags: Vec<bool> = grid.iter().map(|d| d.is_current_month).collect();
                let start = flags.iter().position(|f| *f).unwrap();
                let count = flags.iter().filter(|f| **f).count();
                assert!(flags[start..start + count].iter().all(|f| *f));
                assert_eq!(count as u32, days_in_month(year, month));
            }
        }
    }

    #[test]
    fn sunday_start_borrows_six_days() {
        // 2024-09-01 is a Sunday.
        assert_eq!(leading_days(date(2024, 9, 1)), 6);
        // 2024-07-01 is a Monday.
        assert_eq!(leading_days(date(2024, 7, 1)), 0);
    }

    #[test]
    fn sessions_land_on_their_day_in_input_order() {
        let sessions = vec![
            session(1, Some(date(2024, 2, 15))),
            session(2, Some(date(2024, 2, 1))),
            session(3, Some(date(2024, 2, 15))),
            session(4, None),
        ];
        let grid = month_grid(date(2024, 2, 1), &sessions);

        let cells_with: Vec<_> = grid.iter().filter(|d| !d.sessions.is_empty()).collect();
        assert_eq!(cells_with.len(), 2);

        let feb15 = grid.iter().find(|d| d.date == date(2024, 2, 15)).unwrap();
        let ids: Vec<i64> = feb15.sessions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let placed: usize = grid.iter().map(|d| d.sessions.len()).sum();
        assert_eq!(placed, 3);
    }

    #[test]
    fn filler_cells_never_carry_sessions() {
        // Jan 29 is shown as a leading cell of February 2024.
        let sessions = vec![session(1, Some(date(2024, 1, 29)))];
        let grid = month_grid(date(2024, 2, 10), &sessions);

        assert_eq!(grid[0].date, date(2024, 1, 29));
        assert!(grid.iter().all(|d| d.sessions.is_empty()));
    }

    #[test]
    fn shift_month_clamps_day() {
        assert_eq!(shift_month(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_month(date(2024, 1, 15), -1), date(2023, 12, 15));
        assert_eq!(shift_month(date(2023, 12, 31), 2), date(2024, 2, 29));
    }
}

use chrono::{Duration, NaiveDate};

use super::generation::{Generation, Ticket};
use crate::api::endpoints::SESSIONS;
use crate::calendar::grid::shift_month;
use crate::calendar::{month_grid, CalendarDay, Session};
use crate::session::Role;

/// Which sessions the calendar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarSource {
    /// Every session, for administrators.
    All,
    /// Only the sessions the user takes part in.
    Mine,
}

impl CalendarSource {
    pub fn for_role(role: Role) -> Self {
        if role.is_admin() {
            CalendarSource::All
        } else {
            CalendarSource::Mine
        }
    }

    pub fn path(&self) -> String {
        match self {
            CalendarSource::All => format!("/{SESSIONS}"),
            CalendarSource::Mine => format!("/{SESSIONS}/mis-sesiones"),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CalendarSource::All => "Calendario de sesiones",
            CalendarSource::Mine => "Mi calendario",
        }
    }
}

pub struct CalendarState {
    pub source: CalendarSource,
    pub selected: NaiveDate,
    pub sessions: Vec<Session>,
    pub day_scroll: usize,
    pub loading: bool,
    generation: Generation,
}

impl CalendarState {
    pub fn new(today: NaiveDate, source: CalendarSource) -> Self {
        Self {
            source,
            selected: today,
            sessions: Vec::new(),
            day_scroll: 0,
            loading: false,
            generation: Generation::default(),
        }
    }

    /// The 42-cell grid around the selected date.
    pub fn grid(&self) -> Vec<CalendarDay<'_>> {
        month_grid(self.selected, &self.sessions)
    }

    /// Sessions on the selected day, in load order.
    pub fn day_sessions(&self) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|s| s.date == Some(self.selected))
            .collect()
    }

    pub fn move_days(&mut self, days: i64) {
        if let Some(date) = self.selected.checked_add_signed(Duration::days(days)) {
            self.select(date);
        }
    }

    pub fn move_months(&mut self, months: i32) {
        self.select(shift_month(self.selected, months));
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
        self.day_scroll = 0;
    }

    pub fn scroll_down(&mut self) {
        let len = self.day_sessions().len();
        if self.day_scroll + 1 < len {
            self.day_scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.day_scroll = self.day_scroll.saturating_sub(1);
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.loading = true;
        self.generation.advance()
    }

    pub fn finish_load(&mut self, ticket: Ticket, sessions: Vec<Session>) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.sessions = sessions;
        self.loading = false;
        true
    }

    pub fn fail_load(&mut self, ticket: Ticket) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.loading = false;
        true
    }

    pub fn reset(&mut self, today: NaiveDate, source: CalendarSource) {
        self.generation.invalidate();
        self.source = source;
        self.sessions.clear();
        self.select(today);
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(id: i64, date: &str) -> Session {
        serde_json::from_value(json!({
            "idEventoEspecifico": id,
            "nombreSesion": format!("S{id}"),
            "fecha": date
        }))
        .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn source_follows_role() {
        assert_eq!(CalendarSource::for_role(Role::SuperAdmin), CalendarSource::All);
        assert_eq!(CalendarSource::for_role(Role::Leader), CalendarSource::Mine);
        assert_eq!(CalendarSource::Mine.path(), "/eventos-especificos/mis-sesiones");
    }

    #[test]
    fn day_sessions_follow_selection() {
        let mut state = CalendarState::new(day(2024, 2, 15), CalendarSource::All);
        let ticket = state.begin_load();
        state.finish_load(
            ticket,
            vec![session(1, "2024-02-15"), session(2, "2024-02-16"), session(3, "2024-02-15T18:00:00")],
        );
        let ids: Vec<i64> = state.day_sessions().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);

        state.move_days(1);
        assert_eq!(state.day_sessions().len(), 1);
        assert_eq!(state.grid().len(), 42);
    }

    #[test]
    fn month_moves_clamp_the_day() {
        let mut state = CalendarState::new(day(2024, 1, 31), CalendarSource::Mine);
        state.move_months(1);
        assert_eq!(state.selected, day(2024, 2, 29));
        state.move_months(-2);
        assert_eq!(state.selected, day(2023, 12, 29));
    }

    #[test]
    fn reset_discards_in_flight_load() {
        let mut state = CalendarState::new(day(2024, 2, 1), CalendarSource::All);
        let ticket = state.begin_load();
        state.reset(day(2024, 2, 1), CalendarSource::Mine);
        assert!(!state.finish_load(ticket, vec![session(1, "2024-02-01")]));
        assert!(state.sessions.is_empty());
    }
}

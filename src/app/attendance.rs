use std::collections::HashSet;

use chrono::NaiveDate;

use super::form::{Field, FormState};
use super::generation::{Generation, Ticket};
use crate::api::{CheckIn, QrCode};
use crate::calendar::Session;

/// Selectable list of one day's sessions.
#[derive(Default)]
pub struct SessionList {
    pub sessions: Vec<Session>,
    pub selected: usize,
    pub loading: bool,
    generation: Generation,
}

impl SessionList {
    pub fn selected_session(&self) -> Option<&Session> {
        self.sessions.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.sessions.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.loading = true;
        self.generation.advance()
    }

    /// Applies the result, keeping only sessions dated `day`.
    pub fn finish_load(&mut self, ticket: Ticket, sessions: Vec<Session>, day: NaiveDate) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.sessions = sessions
            .into_iter()
            .filter(|s| s.date.is_none_or(|d| d == day))
            .collect();
        self.selected = self.selected.min(self.sessions.len().saturating_sub(1));
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

    pub fn reset(&mut self) {
        self.generation.invalidate();
        self.sessions.clear();
        self.selected = 0;
        self.loading = false;
    }
}

/// QR generated for one of the leader's sessions.
pub struct QrView {
    pub session_id: i64,
    pub session_name: String,
    pub code: Option<QrCode>,
    pub loading: bool,
}

/// Leader view of today's sessions.
#[derive(Default)]
pub struct TodayState {
    pub list: SessionList,
    pub qr: Option<QrView>,
    qr_generation: Generation,
}

impl TodayState {
    pub fn begin_qr(&mut self, session: &Session) -> Ticket {
        self.qr = Some(QrView {
            session_id: session.id,
            session_name: session.name.clone(),
            code: None,
            loading: true,
        });
        self.qr_generation.advance()
    }

    pub fn finish_qr(&mut self, ticket: Ticket, code: QrCode) -> bool {
        if !self.qr_generation.is_current(ticket) {
            return false;
        }
        if let Some(view) = self.qr.as_mut() {
            view.code = Some(code);
            view.loading = false;
        }
        true
    }

    pub fn fail_qr(&mut self, ticket: Ticket) -> bool {
        if !self.qr_generation.is_current(ticket) {
            return false;
        }
        self.qr = None;
        true
    }

    pub fn close_qr(&mut self) {
        self.qr_generation.invalidate();
        self.qr = None;
    }

    pub fn reset(&mut self) {
        self.list.reset();
        self.close_qr();
    }
}

/// Member view: today's sessions and which ones were checked into.
#[derive(Default)]
pub struct CheckInState {
    pub list: SessionList,
    pub registered: HashSet<i64>,
}

impl CheckInState {
    pub fn is_registered(&self, session_id: i64) -> bool {
        self.registered.contains(&session_id)
    }

    pub fn reset(&mut self) {
        self.list.reset();
        self.registered.clear();
    }
}

pub fn check_in_form(session: &Session) -> FormState {
    FormState::new(format!("Registrar asistencia: {}", session.name))
        .editing(Some(session.id))
        .field(Field::decimal("latitud", "Latitud"))
        .field(Field::decimal("longitud", "Longitud"))
}

pub fn check_in_from_form(form: &FormState, persona_id: i64) -> Result<CheckIn, String> {
    let session_id = form
        .editing
        .ok_or_else(|| "Seleccione una sesión".to_string())?;
    let latitude = form.decimal("latitud")?;
    let longitude = form.decimal("longitud")?;
    if latitude.is_some_and(|l| !(-90.0..=90.0).contains(&l)) {
        return Err("Latitud fuera de rango".to_string());
    }
    if longitude.is_some_and(|l| !(-180.0..=180.0).contains(&l)) {
        return Err("Longitud fuera de rango".to_string());
    }
    Ok(CheckIn {
        session_id,
        persona_id,
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(id: i64, date: &str) -> Session {
        serde_json::from_value(json!({
            "idEventoEspecifico": id,
            "nombreSesion": format!("Sesión {id}"),
            "fecha": date
        }))
        .unwrap()
    }

    #[test]
    fn list_keeps_only_the_requested_day() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let mut list = SessionList::default();
        let ticket = list.begin_load();
        list.finish_load(ticket, vec![session(1, "2024-05-06"), session(2, "2024-05-07")], today);
        assert_eq!(list.sessions.len(), 1);
        assert_eq!(list.selected_session().map(|s| s.id), Some(1));
    }

    #[test]
    fn qr_for_a_replaced_session_is_ignored() {
        let mut today = TodayState::default();
        let first = today.begin_qr(&session(1, "2024-05-06"));
        let second = today.begin_qr(&session(2, "2024-05-06"));
        let code: QrCode = serde_json::from_value(json!({"token": "x"})).unwrap();
        assert!(!today.finish_qr(first, code.clone()));
        assert!(today.finish_qr(second, code));
        let view = today.qr.as_ref().unwrap();
        assert_eq!(view.session_id, 2);
        assert!(!view.loading);
    }

    #[test]
    fn check_in_coordinates_are_optional_but_bounded() {
        let mut form = check_in_form(&session(9, "2024-05-06"));
        let check_in = check_in_from_form(&form, 40).unwrap();
        assert_eq!(check_in.session_id, 9);
        assert_eq!(check_in.latitude, None);

        form.set("latitud", "-12.05");
        form.set("longitud", "-77.04");
        let check_in = check_in_from_form(&form, 40).unwrap();
        assert_eq!(check_in.longitude, Some(-77.04));

        form.set("latitud", "123");
        assert!(check_in_from_form(&form, 40).is_err());
    }
}

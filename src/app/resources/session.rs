use reqwest::Method;
use serde_json::json;

use crate::api::endpoints::SESSIONS;
use crate::api::RecurrenceRule;
use crate::app::form::{Choice, Field, FormState};
use crate::app::page::CrudPage;
use crate::app::record::{
    date_value, fmt_date, haystack, or_dash, Editable, Lookups, Record, Submission,
};
use crate::app::Pages;
use crate::calendar::{Session, SessionStatus};
use crate::session::AuthSession;

const DEFAULT_WEEKDAYS: [u8; 3] = [1, 3, 5];
const DEFAULT_TOLERANCE: i64 = 15;

/// Fields that only apply to one of the two creation modes.
const RECURRENCE_FIELDS: [&str; 3] = ["fechaInicioRecurrencia", "fechaFinRecurrencia", "diasSemana"];

impl Record for Session {
    const TITLE: &'static str = "Sesiones";
    const COLUMNS: &'static [(&'static str, u16)] = &[
        ("Sesión", 24),
        ("Evento general", 22),
        ("Fecha", 12),
        ("Horario", 14),
        ("Lugar", 16),
        ("Estado", 12),
    ];
    const FACETS: &'static [&'static str] = &["Evento general", "Estado"];

    fn list_path(_session: &AuthSession) -> String {
        format!("/{SESSIONS}")
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            or_dash(self.parent_name.as_deref()),
            fmt_date(self.date),
            self.time_range_display(),
            or_dash(self.location.as_deref()),
            self.status_or_default().label().to_string(),
        ]
    }

    fn search_text(&self) -> String {
        haystack([
            Some(self.name.as_str()),
            self.parent_name.as_deref(),
            self.location.as_deref(),
            self.description.as_deref(),
        ])
    }

    fn facet(&self, index: usize) -> Option<String> {
        match index {
            0 => self.parent_name.clone(),
            1 => Some(self.status_or_default().label().to_string()),
            _ => None,
        }
    }

    fn delete_path(&self) -> Option<String> {
        Some(format!("/{SESSIONS}/{}", self.id))
    }

    fn page(pages: &Pages) -> &CrudPage<Self> {
        &pages.sessions
    }

    fn page_mut(pages: &mut Pages) -> &mut CrudPage<Self> {
        &mut pages.sessions
    }
}

impl Editable for Session {
    fn form(existing: Option<&Self>, lookups: &Lookups) -> FormState {
        let editing = existing.is_some();
        let time_value = |t: Option<chrono::NaiveTime>| {
            t.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
        };
        let statuses = SessionStatus::ALL
            .iter()
            .map(|s| Choice::new(s.wire_name(), s.label()))
            .collect();

        let mut form = FormState::new(if editing { "Editar sesión" } else { "Nueva sesión" })
            .editing(existing.map(|s| s.id))
            .field(
                Field::choice("idEventoGeneral", "Evento general", lookups.parent_event_choices())
                    .required()
                    .hidden(editing)
                    .value(
                        existing
                            .and_then(|s| s.parent_id)
                            .map(|id| id.to_string())
                            .unwrap_or_default(),
                    ),
            )
            .field(
                Field::text("nombreSesion", "Nombre")
                    .required()
                    .value(existing.map(|s| s.name.clone()).unwrap_or_default()),
            )
            .field(Field::toggle("recurrente", "Recurrente", !editing).hidden(editing))
            .field(
                Field::date("fecha", "Fecha")
                    .required()
                    .value(date_value(existing.and_then(|s| s.date))),
            )
            .field(Field::date("fechaInicioRecurrencia", "Desde").required())
            .field(Field::date("fechaFinRecurrencia", "Hasta").required())
            .field(Field::weekdays("diasSemana", "Días", &DEFAULT_WEEKDAYS).required())
            .field(
                Field::time("horaInicio", "Inicio")
                    .required()
                    .value(time_value(existing.and_then(|s| s.start))),
            )
            .field(
                Field::time("horaFin", "Fin")
                    .required()
                    .value(time_value(existing.and_then(|s| s.end))),
            )
            .field(
                Field::number("toleranciaMinutos", "Tolerancia (min)").value(
                    existing
                        .map_or(DEFAULT_TOLERANCE as u32, |s| s.tolerance_or_default())
                        .to_string(),
                ),
            )
            .field(
                Field::text("lugar", "Lugar")
                    .value(existing.and_then(|s| s.location.clone()).unwrap_or_default()),
            )
            .field(
                Field::text("descripcion", "Descripción")
                    .value(existing.and_then(|s| s.description.clone()).unwrap_or_default()),
            )
            .field(
                Field::choice("estado", "Estado", statuses)
                    .hidden(!editing)
                    .value(existing.map_or(SessionStatus::Scheduled, |s| s.status_or_default()).wire_name()),
            );
        apply_mode(&mut form);
        form
    }

    fn on_change(form: &mut FormState, key: &str, lookups: &Lookups) {
        match key {
            "recurrente" => apply_mode(form),
            "idEventoGeneral" => {
                let parent = form
                    .number("idEventoGeneral")
                    .ok()
                    .flatten()
                    .and_then(|id| lookups.parent_event(id));
                if let Some(parent) = parent {
                    let (from, until) = (date_value(parent.starts_on), date_value(parent.ends_on));
                    form.set("fechaInicioRecurrencia", from);
                    form.set("fechaFinRecurrencia", until);
                }
            }
            _ => {}
        }
    }

    fn submission(form: &FormState) -> Result<Submission, String> {
        let start = form.required_time("horaInicio")?;
        let end = form.required_time("horaFin")?;
        let tolerance = form.number("toleranciaMinutos")?.unwrap_or(DEFAULT_TOLERANCE);
        let hhmm = |t: chrono::NaiveTime| t.format("%H:%M").to_string();

        if let Some(id) = form.editing {
            if start >= end {
                return Err("La hora de inicio debe ser anterior a la hora de fin".to_string());
            }
            let body = json!({
                "nombreSesion": form.get("nombreSesion").trim(),
                "fecha": form.required_date("fecha")?,
                "horaInicio": hhmm(start),
                "horaFin": hhmm(end),
                "lugar": form.text("lugar"),
                "descripcion": form.text("descripcion"),
                "toleranciaMinutos": tolerance,
                "estado": form.text("estado").unwrap_or_else(|| SessionStatus::Scheduled.wire_name().to_string()),
            });
            return Ok(Submission {
                method: Method::PUT,
                path: format!("/{SESSIONS}/{id}"),
                body,
                success: "Sesión actualizada exitosamente".to_string(),
            });
        }

        let parent_id = form.required_id("idEventoGeneral")?;
        if form.is_on("recurrente") {
            let rule = RecurrenceRule {
                parent_id,
                name: form.get("nombreSesion").trim().to_string(),
                from: form.required_date("fechaInicioRecurrencia")?,
                until: form.required_date("fechaFinRecurrencia")?,
                weekdays: form.weekdays("diasSemana"),
                start,
                end,
                tolerance_minutes: tolerance.max(0) as u32,
                location: form.text("lugar"),
            };
            rule.validate()?;
            let body = serde_json::to_value(&rule).map_err(|e| e.to_string())?;
            return Ok(Submission {
                method: Method::POST,
                path: format!("/{SESSIONS}/recurrencia"),
                body,
                success: "Sesiones recurrentes creadas exitosamente".to_string(),
            });
        }

        if start >= end {
            return Err("La hora de inicio debe ser anterior a la hora de fin".to_string());
        }
        let body = json!({
            "idEventoGeneral": parent_id,
            "nombreSesion": form.get("nombreSesion").trim(),
            "fecha": form.required_date("fecha")?,
            "horaInicio": hhmm(start),
            "horaFin": hhmm(end),
            "toleranciaMinutos": tolerance,
            "lugar": form.text("lugar"),
            "descripcion": form.text("descripcion"),
        });
        Ok(Submission {
            method: Method::POST,
            path: format!("/{SESSIONS}"),
            body,
            success: "Sesión creada exitosamente".to_string(),
        })
    }
}

/// Shows either the single date or the recurrence fields.
fn apply_mode(form: &mut FormState) {
    let recurring = !form.is_edit() && form.is_on("recurrente");
    form.set_hidden("fecha", recurring);
    for key in RECURRENCE_FIELDS {
        form.set_hidden(key, !recurring);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn lookups() -> Lookups {
        Lookups {
            parent_events: vec![crate::calendar::ParentEvent {
                id: 5,
                name: "Catequesis".into(),
                description: None,
                location: None,
                starts_on: NaiveDate::from_ymd_opt(2024, 3, 4),
                ends_on: NaiveDate::from_ymd_opt(2024, 6, 28),
                period_id: None,
                period_name: None,
                program_id: None,
                program_name: None,
                status: None,
            }],
            ..Lookups::default()
        }
    }

    fn visible_keys(form: &FormState) -> Vec<&'static str> {
        form.visible().map(|(_, f)| f.key).collect()
    }

    #[test]
    fn new_session_starts_in_recurrence_mode() {
        let form = Session::form(None, &lookups());
        let keys = visible_keys(&form);
        assert!(keys.contains(&"diasSemana"));
        assert!(!keys.contains(&"fecha"));
        assert!(!keys.contains(&"estado"));
        assert_eq!(form.weekdays("diasSemana"), vec![1, 3, 5]);
    }

    #[test]
    fn toggling_recurrence_swaps_date_fields() {
        let lookups = lookups();
        let mut form = Session::form(None, &lookups);
        form.active = 2;
        let changed = form.activate();
        assert_eq!(changed, Some("recurrente"));
        Session::on_change(&mut form, "recurrente", &lookups);
        let keys = visible_keys(&form);
        assert!(keys.contains(&"fecha"));
        assert!(!keys.contains(&"fechaInicioRecurrencia"));
    }

    #[test]
    fn picking_parent_fills_recurrence_range() {
        let lookups = lookups();
        let mut form = Session::form(None, &lookups);
        form.active = 0;
        form.activate();
        Session::on_change(&mut form, "idEventoGeneral", &lookups);
        assert_eq!(form.get("fechaInicioRecurrencia"), "2024-03-04");
        assert_eq!(form.get("fechaFinRecurrencia"), "2024-06-28");
    }

    #[test]
    fn recurrence_submission_targets_expansion_endpoint() {
        let lookups = lookups();
        let mut form = Session::form(None, &lookups);
        form.set("idEventoGeneral", "5");
        Session::on_change(&mut form, "idEventoGeneral", &lookups);
        form.set("nombreSesion", "Clase");
        form.set("horaInicio", "18:00");
        form.set("horaFin", "19:30");

        let submission = Session::submission(&form).unwrap();
        assert_eq!(submission.path, "/eventos-especificos/recurrencia");
        assert_eq!(submission.body["diasSemana"], json!([1, 3, 5]));
        assert_eq!(submission.body["horaFin"], "19:30");
        assert_eq!(submission.body["toleranciaMinutos"], 15);

        form.set("diasSemana", "");
        assert_eq!(
            Session::submission(&form).unwrap_err(),
            "Seleccione al menos un día de la semana"
        );
    }

    #[test]
    fn edit_sends_put_with_status() {
        let session: Session = serde_json::from_value(json!({
            "idEventoEspecifico": 11,
            "nombreSesion": "Clase 3",
            "fecha": "2024-03-08",
            "horaInicio": "18:00:00",
            "horaFin": "19:00:00",
            "eventoGeneralId": 5,
            "estado": "EN_CURSO"
        }))
        .unwrap();
        let mut form = Session::form(Some(&session), &lookups());
        assert!(visible_keys(&form).contains(&"fecha"));
        let submission = Session::submission(&form).unwrap();
        assert_eq!(submission.method, Method::PUT);
        assert_eq!(submission.path, "/eventos-especificos/11");
        assert_eq!(submission.body["estado"], "EN_CURSO");
        assert_eq!(submission.body["fecha"], "2024-03-08");

        form.set("horaFin", "17:00");
        assert!(Session::submission(&form).is_err());
    }
}

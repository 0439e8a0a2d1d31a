use serde_json::json;

use crate::api::endpoints::PARENT_EVENTS;
use crate::app::form::{Field, FormState};
use crate::app::page::CrudPage;
use crate::app::record::{date_value, haystack, or_dash, Editable, Lookups, Record, Submission};
use crate::app::Pages;
use crate::calendar::ParentEvent;
use crate::session::AuthSession;

impl Record for ParentEvent {
    const TITLE: &'static str = "Eventos generales";
    const COLUMNS: &'static [(&'static str, u16)] = &[
        ("Nombre", 26),
        ("Fechas", 24),
        ("Período", 14),
        ("Programa", 16),
        ("Lugar", 12),
        ("Estado", 8),
    ];
    const FACETS: &'static [&'static str] = &["Programa", "Período"];

    fn list_path(_session: &AuthSession) -> String {
        format!("/{PARENT_EVENTS}")
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
            self.range_display(),
            or_dash(self.period_name.as_deref()),
            or_dash(self.program_name.as_deref()),
            or_dash(self.location.as_deref()),
            self.status.clone().unwrap_or_else(|| "ACTIVO".to_string()),
        ]
    }

    fn search_text(&self) -> String {
        haystack([
            Some(self.name.as_str()),
            self.description.as_deref(),
            self.location.as_deref(),
            self.period_name.as_deref(),
            self.program_name.as_deref(),
        ])
    }

    fn facet(&self, index: usize) -> Option<String> {
        match index {
            0 => self.program_name.clone(),
            1 => self.period_name.clone(),
            _ => None,
        }
    }

    fn delete_path(&self) -> Option<String> {
        Some(format!("/{PARENT_EVENTS}/{}", self.id))
    }

    fn share(items: &[Self], lookups: &mut Lookups) {
        lookups.parent_events = items.to_vec();
    }

    fn page(pages: &Pages) -> &CrudPage<Self> {
        &pages.parent_events
    }

    fn page_mut(pages: &mut Pages) -> &mut CrudPage<Self> {
        &mut pages.parent_events
    }
}

impl Editable for ParentEvent {
    fn form(existing: Option<&Self>, lookups: &Lookups) -> FormState {
        let title = if existing.is_some() {
            "Editar evento general"
        } else {
            "Nuevo evento general"
        };
        let id_value = |id: Option<i64>| id.map(|id| id.to_string()).unwrap_or_default();
        FormState::new(title)
            .editing(existing.map(|e| e.id))
            .field(
                Field::text("nombre", "Nombre")
                    .required()
                    .value(existing.map(|e| e.name.clone()).unwrap_or_default()),
            )
            .field(
                Field::text("lugar", "Lugar")
                    .value(existing.and_then(|e| e.location.clone()).unwrap_or_default()),
            )
            .field(
                Field::date("fechaInicio", "Inicio")
                    .required()
                    .value(date_value(existing.and_then(|e| e.starts_on))),
            )
            .field(
                Field::date("fechaFin", "Fin")
                    .required()
                    .value(date_value(existing.and_then(|e| e.ends_on))),
            )
            .field(
                Field::choice("periodoId", "Período", lookups.period_choices())
                    .required()
                    .value(id_value(existing.and_then(|e| e.period_id))),
            )
            .field(
                Field::choice("programaId", "Programa", lookups.program_choices())
                    .required()
                    .value(id_value(existing.and_then(|e| e.program_id))),
            )
            .field(
                Field::text("descripcion", "Descripción")
                    .value(existing.and_then(|e| e.description.clone()).unwrap_or_default()),
            )
            .field(
                Field::text("estado", "Estado")
                    .hidden(true)
                    .value(existing.and_then(|e| e.status.clone()).unwrap_or_else(|| "ACTIVO".to_string())),
            )
    }

    fn submission(form: &FormState) -> Result<Submission, String> {
        let from = form.required_date("fechaInicio")?;
        let until = form.required_date("fechaFin")?;
        if until < from {
            return Err("La fecha de fin no puede ser anterior a la fecha de inicio".to_string());
        }
        let body = json!({
            "nombre": form.get("nombre").trim(),
            "lugar": form.text("lugar"),
            "descripcion": form.text("descripcion"),
            "fechaInicio": from,
            "fechaFin": until,
            "periodoId": form.required_id("periodoId")?,
            "programaId": form.required_id("programaId")?,
            "estado": form.text("estado").unwrap_or_else(|| "ACTIVO".to_string()),
        });
        Ok(Submission::save(PARENT_EVENTS, form.editing, body, "Evento general"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Period, Program};

    fn lookups() -> Lookups {
        Lookups {
            periods: vec![Period {
                id: 3,
                name: "2024-I".into(),
                description: None,
                starts_on: None,
                ends_on: None,
                status: None,
            }],
            programs: vec![Program {
                id: 8,
                name: "Sistemas".into(),
            }],
            ..Lookups::default()
        }
    }

    #[test]
    fn new_event_is_created_active_with_numeric_ids() {
        let mut form = ParentEvent::form(None, &lookups());
        form.set("nombre", "Retiro");
        form.set("fechaInicio", "2024-03-01");
        form.set("fechaFin", "2024-03-03");
        assert!(ParentEvent::submission(&form).is_err());

        form.active = 4;
        form.activate();
        form.active = 5;
        form.activate();
        assert_eq!(form.missing_required(), None);

        let submission = ParentEvent::submission(&form).unwrap();
        assert_eq!(submission.path, "/eventos-generales");
        assert_eq!(submission.body["periodoId"], 3);
        assert_eq!(submission.body["programaId"], 8);
        assert_eq!(submission.body["estado"], "ACTIVO");
    }
}

use serde_json::json;

use crate::api::endpoints::PERIODS;
use crate::api::Period;
use crate::app::form::{Field, FormState};
use crate::app::page::CrudPage;
use crate::app::record::{
    date_value, fmt_date, haystack, or_dash, status_choices, Editable, Lookups, Record, Submission,
};
use crate::app::Pages;
use crate::session::AuthSession;

impl Record for Period {
    const TITLE: &'static str = "Periodos";
    const COLUMNS: &'static [(&'static str, u16)] = &[
        ("Nombre", 28),
        ("Inicio", 14),
        ("Fin", 14),
        ("Estado", 12),
        ("Descripción", 32),
    ];

    fn list_path(_session: &AuthSession) -> String {
        format!("/{PERIODS}")
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
            fmt_date(self.starts_on),
            fmt_date(self.ends_on),
            or_dash(self.status.as_deref()),
            or_dash(self.description.as_deref()),
        ]
    }

    fn search_text(&self) -> String {
        haystack([
            Some(self.name.as_str()),
            self.description.as_deref(),
            self.status.as_deref(),
        ])
    }

    fn delete_path(&self) -> Option<String> {
        Some(format!("/{PERIODS}/{}", self.id))
    }

    fn share(items: &[Self], lookups: &mut Lookups) {
        lookups.periods = items.to_vec();
    }

    fn page(pages: &Pages) -> &CrudPage<Self> {
        &pages.periods
    }

    fn page_mut(pages: &mut Pages) -> &mut CrudPage<Self> {
        &mut pages.periods
    }
}

impl Editable for Period {
    fn form(existing: Option<&Self>, _lookups: &Lookups) -> FormState {
        let title = if existing.is_some() {
            "Editar período"
        } else {
            "Nuevo período"
        };
        FormState::new(title)
            .editing(existing.map(|p| p.id))
            .field(
                Field::text("nombre", "Nombre")
                    .required()
                    .value(existing.map(|p| p.name.clone()).unwrap_or_default()),
            )
            .field(
                Field::date("fechaInicio", "Inicio")
                    .required()
                    .value(date_value(existing.and_then(|p| p.starts_on))),
            )
            .field(
                Field::date("fechaFin", "Fin")
                    .required()
                    .value(date_value(existing.and_then(|p| p.ends_on))),
            )
            .field(
                Field::choice("estado", "Estado", status_choices()).value(
                    existing
                        .and_then(|p| p.status.clone())
                        .unwrap_or_else(|| "ACTIVO".to_string()),
                ),
            )
            .field(
                Field::text("descripcion", "Descripción")
                    .value(existing.and_then(|p| p.description.clone()).unwrap_or_default()),
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
            "descripcion": form.text("descripcion"),
            "fechaInicio": from,
            "fechaFin": until,
            "estado": form.text("estado").unwrap_or_else(|| "ACTIVO".to_string()),
        });
        Ok(Submission::save(PERIODS, form.editing, body, "Período"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    #[test]
    fn rejects_inverted_range() {
        let mut form = Period::form(None, &Lookups::default());
        form.set("nombre", "2024-I");
        form.set("fechaInicio", "2024-07-01");
        form.set("fechaFin", "2024-03-01");
        assert!(Period::submission(&form).is_err());

        form.set("fechaFin", "2024-07-31");
        let submission = Period::submission(&form).unwrap();
        assert_eq!(submission.method, Method::POST);
        assert_eq!(submission.body["fechaFin"], "2024-07-31");
        assert_eq!(submission.body["estado"], "ACTIVO");
        assert!(submission.body["descripcion"].is_null());
    }
}

use serde_json::json;

use crate::api::endpoints::GENERAL_GROUPS;
use crate::api::GeneralGroup;
use crate::app::form::{Field, FormState};
use crate::app::page::CrudPage;
use crate::app::record::{haystack, or_dash, Editable, Lookups, Record, Submission};
use crate::app::Pages;
use crate::session::AuthSession;

impl Record for GeneralGroup {
    const TITLE: &'static str = "Grupos generales";
    const COLUMNS: &'static [(&'static str, u16)] = &[
        ("Nombre", 26),
        ("Evento general", 26),
        ("Período", 14),
        ("Grupos", 8),
        ("Participantes", 12),
        ("Descripción", 14),
    ];
    const FACETS: &'static [&'static str] = &["Evento general"];

    fn list_path(_session: &AuthSession) -> String {
        format!("/{GENERAL_GROUPS}")
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
            or_dash(self.period_name.as_deref()),
            self.small_group_count.unwrap_or_default().to_string(),
            self.member_count.unwrap_or_default().to_string(),
            or_dash(self.description.as_deref()),
        ]
    }

    fn search_text(&self) -> String {
        haystack([
            Some(self.name.as_str()),
            self.description.as_deref(),
            self.parent_name.as_deref(),
        ])
    }

    fn facet(&self, index: usize) -> Option<String> {
        match index {
            0 => self.parent_name.clone(),
            _ => None,
        }
    }

    fn delete_path(&self) -> Option<String> {
        Some(format!("/{GENERAL_GROUPS}/{}", self.id))
    }

    fn share(items: &[Self], lookups: &mut Lookups) {
        lookups.general_groups = items.to_vec();
    }

    fn page(pages: &Pages) -> &CrudPage<Self> {
        &pages.general_groups
    }

    fn page_mut(pages: &mut Pages) -> &mut CrudPage<Self> {
        &mut pages.general_groups
    }
}

impl Editable for GeneralGroup {
    fn form(existing: Option<&Self>, lookups: &Lookups) -> FormState {
        let title = if existing.is_some() {
            "Editar grupo general"
        } else {
            "Nuevo grupo general"
        };
        FormState::new(title)
            .editing(existing.map(|g| g.id))
            .field(
                Field::choice("eventoGeneralId", "Evento general", lookups.parent_event_choices())
                    .required()
                    .value(
                        existing
                            .and_then(|g| g.parent_id)
                            .map(|id| id.to_string())
                            .unwrap_or_default(),
                    ),
            )
            .field(
                Field::text("nombre", "Nombre")
                    .required()
                    .value(existing.map(|g| g.name.clone()).unwrap_or_default()),
            )
            .field(
                Field::text("descripcion", "Descripción")
                    .value(existing.and_then(|g| g.description.clone()).unwrap_or_default()),
            )
    }

    fn submission(form: &FormState) -> Result<Submission, String> {
        let body = json!({
            "eventoGeneralId": form.required_id("eventoGeneralId")?,
            "nombre": form.get("nombre").trim(),
            "descripcion": form.text("descripcion"),
        });
        Ok(Submission::save(GENERAL_GROUPS, form.editing, body, "Grupo general"))
    }
}

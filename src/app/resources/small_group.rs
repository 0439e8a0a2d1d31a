use serde_json::json;

use crate::api::endpoints::SMALL_GROUPS;
use crate::api::{SmallGroup, DEFAULT_CAPACITY};
use crate::app::form::{Choice, Field, FormState};
use crate::app::page::CrudPage;
use crate::app::record::{haystack, or_dash, Editable, Lookups, Record, Submission};
use crate::app::Pages;
use crate::session::{AuthSession, Role};

/// Academic cycles offered by the candidate filter.
pub const CYCLES: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"];

impl Record for SmallGroup {
    const TITLE: &'static str = "Grupos pequeños";
    const COLUMNS: &'static [(&'static str, u16)] = &[
        ("Nombre", 24),
        ("Grupo general", 22),
        ("Líder", 24),
        ("Capacidad", 10),
        ("Descripción", 20),
    ];
    const FACETS: &'static [&'static str] = &["Grupo general"];

    /// Leaders only see the groups they lead.
    fn list_path(session: &AuthSession) -> String {
        match (session.role, session.persona_id) {
            (Role::Leader, Some(persona_id)) => format!("/{SMALL_GROUPS}/lider/{persona_id}"),
            _ => format!("/{SMALL_GROUPS}"),
        }
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn row(&self) -> Vec<String> {
        let leader = match (&self.leader_name, &self.leader_code) {
            (Some(name), Some(code)) if !code.is_empty() => format!("{name} ({code})"),
            (Some(name), _) => name.clone(),
            _ => "Sin líder".to_string(),
        };
        let full = if self.is_full() { " lleno" } else { "" };
        vec![
            self.name.clone(),
            or_dash(self.general_group_name.as_deref()),
            leader,
            format!("{}/{}{full}", self.member_count, self.capacity),
            or_dash(self.description.as_deref()),
        ]
    }

    fn search_text(&self) -> String {
        haystack([
            Some(self.name.as_str()),
            self.description.as_deref(),
            self.general_group_name.as_deref(),
            self.leader_name.as_deref(),
        ])
    }

    fn facet(&self, index: usize) -> Option<String> {
        match index {
            0 => self.general_group_name.clone(),
            _ => None,
        }
    }

    fn delete_path(&self) -> Option<String> {
        Some(format!("/{SMALL_GROUPS}/{}", self.id))
    }

    fn page(pages: &Pages) -> &CrudPage<Self> {
        &pages.small_groups
    }

    fn page_mut(pages: &mut Pages) -> &mut CrudPage<Self> {
        &mut pages.small_groups
    }
}

impl Editable for SmallGroup {
    fn form(existing: Option<&Self>, lookups: &Lookups) -> FormState {
        let title = if existing.is_some() {
            "Editar grupo pequeño"
        } else {
            "Nuevo grupo pequeño"
        };

        // The current leader is already assigned, so the backend leaves them out of
        // the available list.
        let mut leaders = lookups.leader_choices();
        if let Some((id, name)) = existing.and_then(|g| Some((g.leader_id?, g.leader_name.clone()?))) {
            if !leaders.iter().any(|c| c.value == id.to_string()) {
                leaders.insert(0, Choice::new(id, name));
            }
        }

        FormState::new(title)
            .editing(existing.map(|g| g.id))
            .field(
                Field::text("nombre", "Nombre")
                    .required()
                    .value(existing.map(|g| g.name.clone()).unwrap_or_default()),
            )
            .field(
                Field::choice("grupoGeneralId", "Grupo general", lookups.general_group_choices())
                    .required()
                    .value(
                        existing
                            .and_then(|g| g.general_group_id)
                            .map(|id| id.to_string())
                            .unwrap_or_default(),
                    ),
            )
            .field(
                Field::choice("liderId", "Líder", leaders).value(
                    existing
                        .and_then(|g| g.leader_id)
                        .map(|id| id.to_string())
                        .unwrap_or_default(),
                ),
            )
            .field(
                Field::number("capacidadMaxima", "Capacidad")
                    .required()
                    .value(existing.map_or(DEFAULT_CAPACITY, |g| g.capacity).to_string()),
            )
            .field(
                Field::text("descripcion", "Descripción")
                    .value(existing.and_then(|g| g.description.clone()).unwrap_or_default()),
            )
    }

    fn submission(form: &FormState) -> Result<Submission, String> {
        let capacity = form.number("capacidadMaxima")?.unwrap_or(DEFAULT_CAPACITY as i64);
        if capacity < 1 {
            return Err("La capacidad debe ser al menos 1".to_string());
        }
        let body = json!({
            "nombre": form.get("nombre").trim(),
            "grupoGeneralId": form.required_id("grupoGeneralId")?,
            "liderId": form.number("liderId")?,
            "capacidadMaxima": capacity,
            "descripcion": form.text("descripcion"),
        });
        Ok(Submission::save(SMALL_GROUPS, form.editing, body, "Grupo pequeño"))
    }
}

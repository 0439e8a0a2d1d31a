use chrono::NaiveDate;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::form::{Choice, FormState};
use super::generation::{Generation, Ticket};
use super::page::CrudPage;
use super::Pages;
use crate::api::{Candidate, GeneralGroup, Period, Program, RoleInfo};
use crate::calendar::ParentEvent;
use crate::session::AuthSession;

/// Reference lists that forms pick from. Filled as pages load.
#[derive(Debug, Default, Clone)]
pub struct Lookups {
    pub parent_events: Vec<ParentEvent>,
    pub periods: Vec<Period>,
    pub programs: Vec<Program>,
    pub general_groups: Vec<GeneralGroup>,
    pub roles: Vec<RoleInfo>,
    pub leaders: Vec<Candidate>,
    pub(crate) generation: Generation,
}

impl Lookups {
    /// Ticket for lookup requests; valid until [`Lookups::clear`].
    pub fn ticket(&self) -> Ticket {
        self.generation.ticket()
    }

    pub fn accepts(&self, ticket: Ticket) -> bool {
        self.generation.is_current(ticket)
    }

    /// Empties every list and drops lookup requests still in flight.
    pub fn clear(&mut self) {
        let mut generation = std::mem::take(&mut self.generation);
        generation.invalidate();
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    pub fn parent_event(&self, id: i64) -> Option<&ParentEvent> {
        self.parent_events.iter().find(|e| e.id == id)
    }

    pub fn parent_event_choices(&self) -> Vec<Choice> {
        self.parent_events
            .iter()
            .map(|e| Choice::new(e.id, e.name.clone()))
            .collect()
    }

    pub fn period_choices(&self) -> Vec<Choice> {
        self.periods
            .iter()
            .map(|p| Choice::new(p.id, p.name.clone()))
            .collect()
    }

    pub fn program_choices(&self) -> Vec<Choice> {
        self.programs
            .iter()
            .map(|p| Choice::new(p.id, p.name.clone()))
            .collect()
    }

    pub fn general_group_choices(&self) -> Vec<Choice> {
        self.general_groups
            .iter()
            .map(|g| Choice::new(g.id, g.name.clone()))
            .collect()
    }

    pub fn role_choices(&self) -> Vec<Choice> {
        self.roles
            .iter()
            .map(|r| Choice::new(&r.name, r.name.clone()))
            .collect()
    }

    pub fn leader_choices(&self) -> Vec<Choice> {
        leader_choices(&self.leaders)
    }
}

pub fn leader_choices(leaders: &[Candidate]) -> Vec<Choice> {
    leaders
        .iter()
        .map(|l| {
            let label = match &l.student_code {
                Some(code) if !code.is_empty() => format!("{} ({code})", l.full_name),
                _ => l.full_name.clone(),
            };
            Choice::new(l.persona_id, label)
        })
        .collect()
}

/// A row type listed by a management page.
pub trait Record: DeserializeOwned + Clone + Send + 'static {
    /// Page title, also used in banners.
    const TITLE: &'static str;
    const COLUMNS: &'static [(&'static str, u16)];
    const FACETS: &'static [&'static str] = &[];

    fn list_path(session: &AuthSession) -> String;

    fn id(&self) -> i64;

    /// Short name used in confirmations.
    fn label(&self) -> String;

    fn row(&self) -> Vec<String>;

    /// Lower-cased text the search box matches against.
    fn search_text(&self) -> String;

    fn facet(&self, _index: usize) -> Option<String> {
        None
    }

    /// `None` if this row may not be deleted at all.
    fn delete_path(&self) -> Option<String>;

    fn check_delete(&self, session: &AuthSession) -> Result<(), String> {
        if session.role.is_admin() {
            Ok(())
        } else {
            Err("No tienes permisos para eliminar".to_string())
        }
    }

    /// Publishes freshly loaded items to the shared lookups.
    fn share(_items: &[Self], _lookups: &mut Lookups) {}

    fn page(pages: &Pages) -> &CrudPage<Self>;

    fn page_mut(pages: &mut Pages) -> &mut CrudPage<Self>;
}

/// A request built from a submitted form.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub method: Method,
    pub path: String,
    pub body: Value,
    pub success: String,
}

impl Submission {
    /// POST to the collection or PUT to the item, depending on `editing`.
    pub fn save(endpoint: &str, editing: Option<i64>, body: Value, noun: &str) -> Self {
        match editing {
            Some(id) => Self {
                method: Method::PUT,
                path: format!("/{endpoint}/{id}"),
                body,
                success: format!("{noun} actualizado exitosamente"),
            },
            None => Self {
                method: Method::POST,
                path: format!("/{endpoint}"),
                body,
                success: format!("{noun} creado exitosamente"),
            },
        }
    }
}

/// Records the admin can create and edit through a form.
pub trait Editable: Record {
    fn form(existing: Option<&Self>, lookups: &Lookups) -> FormState;

    /// Runs after the field `key` changed.
    fn on_change(_form: &mut FormState, _key: &str, _lookups: &Lookups) {}

    fn submission(form: &FormState) -> Result<Submission, String>;

    fn can_edit(session: &AuthSession) -> bool {
        session.role.is_admin()
    }
}

/// Helper for search text: joins the non-empty parts, lower-cased.
pub fn haystack<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    parts
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

pub fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Form value for a date field.
pub fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn status_choices() -> Vec<Choice> {
    vec![
        Choice::new("ACTIVO", "Activo"),
        Choice::new("INACTIVO", "Inactivo"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_picks_method_from_editing() {
        let create = Submission::save("periodos", None, json!({}), "Período");
        assert_eq!(create.method, Method::POST);
        assert_eq!(create.path, "/periodos");

        let update = Submission::save("periodos", Some(4), json!({}), "Período");
        assert_eq!(update.method, Method::PUT);
        assert_eq!(update.path, "/periodos/4");
        assert_eq!(update.success, "Período actualizado exitosamente");
    }

    #[test]
    fn clearing_lookups_rejects_older_tickets() {
        let mut lookups = Lookups::default();
        let ticket = lookups.ticket();
        lookups.roles.push(RoleInfo {
            id: Some(1),
            name: "ADMIN".into(),
        });
        assert!(lookups.accepts(ticket));

        lookups.clear();
        assert!(lookups.roles.is_empty());
        assert!(!lookups.accepts(ticket));
        assert!(lookups.accepts(lookups.ticket()));
    }

    #[test]
    fn haystack_skips_missing_parts() {
        assert_eq!(haystack([Some("Ana"), None, Some(""), Some("A-12")]), "ana a-12");
    }

    #[test]
    fn leader_labels_carry_code() {
        let leaders = vec![Candidate {
            persona_id: 9,
            full_name: "Luis Paz".into(),
            student_code: Some("2020-1".into()),
            email: None,
        }];
        assert_eq!(leader_choices(&leaders), vec![Choice::new(9, "Luis Paz (2020-1)")]);
    }
}

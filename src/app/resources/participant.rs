use crate::api::endpoints::USERS;
use crate::api::Participant;
use crate::app::page::CrudPage;
use crate::app::record::{haystack, or_dash, Record};
use crate::app::Pages;
use crate::session::AuthSession;

// Read-only listing: no Editable impl and no delete path.
impl Record for Participant {
    const TITLE: &'static str = "Participantes";
    const COLUMNS: &'static [(&'static str, u16)] = &[
        ("Nombre", 26),
        ("Código", 12),
        ("Documento", 12),
        ("Correo", 22),
        ("Período", 10),
        ("Tipo", 10),
        ("Estado", 8),
    ];
    const FACETS: &'static [&'static str] = &["Estado", "Tipo", "Período"];

    fn list_path(_session: &AuthSession) -> String {
        format!("/{USERS}/integrantes")
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> String {
        self.full_name.clone().unwrap_or_default()
    }

    fn row(&self) -> Vec<String> {
        vec![
            or_dash(self.full_name.as_deref()),
            or_dash(self.student_code.as_deref()),
            or_dash(self.document.as_deref()),
            or_dash(self.email.as_deref()),
            or_dash(self.period.as_deref()),
            or_dash(self.person_type.as_deref()),
            or_dash(self.status.as_deref()),
        ]
    }

    fn search_text(&self) -> String {
        haystack([
            self.full_name.as_deref(),
            self.student_code.as_deref(),
            self.document.as_deref(),
            self.email.as_deref(),
        ])
    }

    fn facet(&self, index: usize) -> Option<String> {
        match index {
            0 => self.status.clone(),
            1 => self.person_type.clone(),
            2 => self.period.clone(),
            _ => None,
        }
    }

    fn delete_path(&self) -> Option<String> {
        None
    }

    fn page(pages: &Pages) -> &CrudPage<Self> {
        &pages.participants
    }

    fn page_mut(pages: &mut Pages) -> &mut CrudPage<Self> {
        &mut pages.participants
    }
}

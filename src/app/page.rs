use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use super::generation::{Generation, Ticket};
use super::record::Record;

/// How long a success banner stays up.
pub const SUCCESS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Dismissible message shown above the status bar.
#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    shown_at: Instant,
}

impl Banner {
    pub fn success(text: impl Into<String>) -> Self {
        Self::at(BannerKind::Success, text, Instant::now())
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::at(BannerKind::Error, text, Instant::now())
    }

    pub fn at(kind: BannerKind, text: impl Into<String>, shown_at: Instant) -> Self {
        Self {
            kind,
            text: text.into(),
            shown_at,
        }
    }

    /// Errors stay until dismissed; successes fade after [`SUCCESS_TTL`].
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.kind == BannerKind::Success && now.duration_since(self.shown_at) >= SUCCESS_TTL
    }
}

/// List state for one management page.
pub struct CrudPage<R> {
    pub items: Vec<R>,
    pub search: String,
    /// Active value per facet in `R::FACETS`, `None` meaning "all".
    pub filters: Vec<Option<String>>,
    pub active_facet: usize,
    pub selected: usize,
    pub loading: bool,
    pub loaded: bool,
    generation: Generation,
}

impl<R: Record> Default for CrudPage<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            search: String::new(),
            filters: vec![None; R::FACETS.len()],
            active_facet: 0,
            selected: 0,
            loading: false,
            loaded: false,
            generation: Generation::default(),
        }
    }
}

impl<R: Record> CrudPage<R> {
    /// Items matching the search term and every active facet, in load order.
    pub fn visible(&self) -> Vec<&R> {
        let term = self.search.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| term.is_empty() || item.search_text().contains(&term))
            .filter(|item| {
                self.filters.iter().enumerate().all(|(i, wanted)| match wanted {
                    Some(value) => item.facet(i).as_deref() == Some(value.as_str()),
                    None => true,
                })
            })
            .collect()
    }

    pub fn selected_item(&self) -> Option<&R> {
        self.visible().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.loading = true;
        self.generation.advance()
    }

    /// Applies a finished load. Returns false when the ticket is stale.
    pub fn finish_load(&mut self, ticket: Ticket, items: Vec<R>) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.items = items;
        self.loading = false;
        self.loaded = true;
        self.clamp_selection();
        true
    }

    pub fn fail_load(&mut self, ticket: Ticket) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.loading = false;
        true
    }

    /// Forgets in-flight loads, e.g. on logout.
    pub fn reset(&mut self) {
        self.generation.invalidate();
        self.items.clear();
        self.search.clear();
        self.filters = vec![None; R::FACETS.len()];
        self.selected = 0;
        self.loading = false;
        self.loaded = false;
    }

    pub fn push_search(&mut self, c: char) {
        self.search.push(c);
        self.selected = 0;
    }

    pub fn pop_search(&mut self) {
        self.search.pop();
        self.selected = 0;
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.selected = 0;
    }

    /// Distinct values of facet `index` among the loaded items.
    pub fn facet_values(&self, index: usize) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| item.facet(index))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn next_facet(&mut self) {
        if !R::FACETS.is_empty() {
            self.active_facet = (self.active_facet + 1) % R::FACETS.len();
        }
    }

    /// Steps the active facet through "all" and then each known value.
    pub fn cycle_filter(&mut self) {
        let Some(current) = self.filters.get(self.active_facet) else {
            return;
        };
        let values = self.facet_values(self.active_facet);
        let next = match current {
            None => values.first().cloned(),
            Some(value) => values
                .iter()
                .position(|v| v == value)
                .and_then(|i| values.get(i + 1))
                .cloned(),
        };
        self.filters[self.active_facet] = next;
        self.selected = 0;
    }

    pub fn clear_filters(&mut self) {
        self.filters = vec![None; R::FACETS.len()];
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Participant;

    fn participant(id: i64, name: &str, status: &str, kind: &str) -> Participant {
        Participant {
            id,
            full_name: Some(name.to_string()),
            student_code: Some(format!("C{id}")),
            document: None,
            email: None,
            period: Some("2024-I".into()),
            person_type: Some(kind.to_string()),
            status: Some(status.to_string()),
        }
    }

    fn page() -> CrudPage<Participant> {
        let mut page = CrudPage::<Participant>::default();
        let ticket = page.begin_load();
        page.finish_load(
            ticket,
            vec![
                participant(1, "Ana Ruiz", "ACTIVO", "ESTUDIANTE"),
                participant(2, "Bruno Díaz", "INACTIVO", "ESTUDIANTE"),
                participant(3, "Carla Ana Soto", "ACTIVO", "INVITADO"),
            ],
        );
        page
    }

    #[test]
    fn search_is_case_insensitive_and_keeps_order() {
        let mut page = page();
        for c in "ANA".chars() {
            page.push_search(c);
        }
        let ids: Vec<i64> = page.visible().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn facets_cycle_through_values_then_all() {
        let mut page = page();
        page.cycle_filter();
        assert_eq!(page.filters[0].as_deref(), Some("ACTIVO"));
        assert_eq!(page.visible().len(), 2);
        page.cycle_filter();
        assert_eq!(page.filters[0].as_deref(), Some("INACTIVO"));
        page.cycle_filter();
        assert_eq!(page.filters[0], None);
        assert_eq!(page.visible().len(), 3);

        page.next_facet();
        page.cycle_filter();
        page.cycle_filter();
        assert_eq!(page.filters[1].as_deref(), Some("INVITADO"));
        assert_eq!(page.selected_item().map(|p| p.id), Some(3));
    }

    #[test]
    fn stale_load_is_ignored() {
        let mut page = page();
        let stale = page.begin_load();
        let fresh = page.begin_load();
        assert!(page.finish_load(fresh, vec![participant(9, "Zoe", "ACTIVO", "INVITADO")]));
        assert!(!page.finish_load(stale, Vec::new()));
        assert_eq!(page.items.len(), 1);
        assert!(!page.loading);
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut page = page();
        page.select_next();
        page.select_next();
        page.select_next();
        assert_eq!(page.selected, 2);
        let ticket = page.begin_load();
        page.finish_load(ticket, vec![participant(1, "Ana", "ACTIVO", "INVITADO")]);
        assert_eq!(page.selected, 0);
    }

    #[test]
    fn success_banner_expires_error_does_not() {
        let start = Instant::now();
        let ok = Banner::at(BannerKind::Success, "Guardado", start);
        let err = Banner::at(BannerKind::Error, "Falló", start);
        assert!(!ok.is_expired_at(start + Duration::from_secs(2)));
        assert!(ok.is_expired_at(start + SUCCESS_TTL));
        assert!(!err.is_expired_at(start + Duration::from_secs(60)));
    }
}

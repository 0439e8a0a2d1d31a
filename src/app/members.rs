use super::generation::{Generation, Ticket};
use super::resources::CYCLES;
use crate::api::{Candidate, GroupMember, SmallGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembersFocus {
    Members,
    Candidates,
}

/// Roster editor for one small group: current members on the left, eligible
/// people on the right.
pub struct MembersPanel {
    pub group: SmallGroup,
    pub members: Vec<GroupMember>,
    pub candidates: Vec<Candidate>,
    pub focus: MembersFocus,
    pub selected_member: usize,
    pub selected_candidate: usize,
    pub cycle: Option<&'static str>,
    pub loading: bool,
    members_generation: Generation,
    candidates_generation: Generation,
}

impl MembersPanel {
    pub fn new(group: SmallGroup) -> Self {
        Self {
            group,
            members: Vec::new(),
            candidates: Vec::new(),
            focus: MembersFocus::Members,
            selected_member: 0,
            selected_candidate: 0,
            cycle: None,
            loading: false,
            members_generation: Generation::default(),
            candidates_generation: Generation::default(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.members.len() as u32 >= self.group.capacity
    }

    pub fn capacity_label(&self) -> String {
        let full = if self.is_full() { " ¡Capacidad máxima!" } else { "" };
        format!("Capacidad: {} / {}{full}", self.members.len(), self.group.capacity)
    }

    pub fn cycle_label(&self) -> String {
        match self.cycle {
            Some(cycle) => format!("Ciclo {cycle}"),
            None => "Todos los ciclos".to_string(),
        }
    }

    /// Steps the cycle filter: all, 1, 2, ..., 10, all.
    pub fn next_cycle(&mut self) {
        self.cycle = match self.cycle {
            None => CYCLES.first().copied(),
            Some(current) => CYCLES
                .iter()
                .position(|c| *c == current)
                .and_then(|i| CYCLES.get(i + 1))
                .copied(),
        };
        self.selected_candidate = 0;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            MembersFocus::Members => MembersFocus::Candidates,
            MembersFocus::Candidates => MembersFocus::Members,
        };
    }

    pub fn select_next(&mut self) {
        match self.focus {
            MembersFocus::Members => {
                if self.selected_member + 1 < self.members.len() {
                    self.selected_member += 1;
                }
            }
            MembersFocus::Candidates => {
                if self.selected_candidate + 1 < self.candidates.len() {
                    self.selected_candidate += 1;
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            MembersFocus::Members => self.selected_member = self.selected_member.saturating_sub(1),
            MembersFocus::Candidates => {
                self.selected_candidate = self.selected_candidate.saturating_sub(1)
            }
        }
    }

    pub fn selected_member(&self) -> Option<&GroupMember> {
        self.members.get(self.selected_member)
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.candidates.get(self.selected_candidate)
    }

    /// The candidate to enroll, unless the group is already full.
    pub fn candidate_to_add(&self) -> Result<&Candidate, String> {
        if self.is_full() {
            return Err("El grupo ha alcanzado su capacidad máxima".to_string());
        }
        self.selected_candidate()
            .ok_or_else(|| "Seleccione un participante disponible".to_string())
    }

    pub fn begin_members_load(&mut self) -> Ticket {
        self.loading = true;
        self.members_generation.advance()
    }

    /// Keeps only active enrollments.
    pub fn finish_members(&mut self, ticket: Ticket, members: Vec<GroupMember>) -> bool {
        if !self.members_generation.is_current(ticket) {
            return false;
        }
        self.members = members.into_iter().filter(GroupMember::is_active).collect();
        self.selected_member = self.selected_member.min(self.members.len().saturating_sub(1));
        self.loading = false;
        let candidates = std::mem::take(&mut self.candidates);
        self.set_candidates(candidates);
        true
    }

    pub fn fail_members(&mut self, ticket: Ticket) -> bool {
        if !self.members_generation.is_current(ticket) {
            return false;
        }
        self.loading = false;
        true
    }

    pub fn begin_candidates_load(&mut self) -> Ticket {
        self.candidates_generation.advance()
    }

    pub fn finish_candidates(&mut self, ticket: Ticket, candidates: Vec<Candidate>) -> bool {
        if !self.candidates_generation.is_current(ticket) {
            return false;
        }
        self.set_candidates(candidates);
        true
    }

    pub fn fail_candidates(&mut self, ticket: Ticket) -> bool {
        self.candidates_generation.is_current(ticket)
    }

    /// People already active in the group are never offered again.
    fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        let enrolled: Vec<i64> = self.members.iter().filter_map(|m| m.persona_id).collect();
        self.candidates = candidates
            .into_iter()
            .filter(|c| !enrolled.contains(&c.persona_id))
            .collect();
        self.selected_candidate = self
            .selected_candidate
            .min(self.candidates.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn panel(capacity: u32) -> MembersPanel {
        let group: SmallGroup = serde_json::from_value(json!({
            "idGrupoPequeno": 1,
            "nombre": "Betania",
            "grupoGeneralId": 2,
            "capacidadMaxima": capacity
        }))
        .unwrap();
        MembersPanel::new(group)
    }

    fn member(id: i64, status: &str) -> GroupMember {
        serde_json::from_value(json!({
            "idGrupoParticipante": id,
            "personaId": id * 10,
            "nombreCompleto": format!("P{id}"),
            "estado": status
        }))
        .unwrap()
    }

    fn candidate(id: i64) -> Candidate {
        Candidate {
            persona_id: id,
            full_name: format!("C{id}"),
            student_code: None,
            email: None,
        }
    }

    #[test]
    fn only_active_members_count_toward_capacity() {
        let mut panel = panel(2);
        let ticket = panel.begin_members_load();
        panel.finish_members(ticket, vec![member(1, "ACTIVO"), member(2, "RETIRADO"), member(3, "ACTIVO")]);
        assert_eq!(panel.members.len(), 2);
        assert!(panel.is_full());
        assert_eq!(panel.capacity_label(), "Capacidad: 2 / 2 ¡Capacidad máxima!");

        let ticket = panel.begin_candidates_load();
        panel.finish_candidates(ticket, vec![candidate(7)]);
        assert!(panel.candidate_to_add().is_err());
    }

    #[test]
    fn cycle_filter_wraps_back_to_all() {
        let mut panel = panel(20);
        panel.next_cycle();
        assert_eq!(panel.cycle_label(), "Ciclo 1");
        for _ in 0..9 {
            panel.next_cycle();
        }
        assert_eq!(panel.cycle, Some("10"));
        panel.next_cycle();
        assert_eq!(panel.cycle, None);
    }

    #[test]
    fn stale_candidate_list_is_dropped() {
        let mut panel = panel(20);
        let old = panel.begin_candidates_load();
        panel.next_cycle();
        let new = panel.begin_candidates_load();
        assert!(panel.finish_candidates(new, vec![candidate(1)]));
        assert!(!panel.finish_candidates(old, vec![candidate(2), candidate(3)]));
        panel.toggle_focus();
        assert_eq!(panel.candidate_to_add().map(|c| c.persona_id), Ok(1));
    }

    #[test]
    fn active_members_are_not_offered_as_candidates() {
        let mut panel = panel(20);
        let candidates = panel.begin_candidates_load();
        panel.finish_candidates(candidates, vec![candidate(10), candidate(20), candidate(70)]);
        assert_eq!(panel.candidates.len(), 3);

        let members = panel.begin_members_load();
        panel.finish_members(members, vec![member(1, "ACTIVO"), member(2, "RETIRADO")]);
        let offered: Vec<i64> = panel.candidates.iter().map(|c| c.persona_id).collect();
        assert_eq!(offered, vec![20, 70]);

        let candidates = panel.begin_candidates_load();
        panel.finish_candidates(candidates, vec![candidate(10), candidate(20)]);
        assert_eq!(panel.candidates.len(), 1);
        assert_eq!(panel.candidates[0].persona_id, 20);
    }

    #[test]
    fn stale_load_failures_are_ignored() {
        let mut panel = panel(20);
        let old = panel.begin_members_load();
        let new = panel.begin_members_load();
        assert!(!panel.fail_members(old));
        assert!(panel.loading);
        assert!(panel.fail_members(new));
        assert!(!panel.loading);

        let old = panel.begin_candidates_load();
        panel.begin_candidates_load();
        assert!(!panel.fail_candidates(old));
    }
}

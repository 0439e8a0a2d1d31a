/// Tag carried by an in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Request counter for one piece of state.
///
/// Every load takes a fresh [`Ticket`]; a result is applied only if its ticket
/// is still the latest one, so a slow response never overwrites newer data.
#[derive(Debug, Default, Clone)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn advance(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    /// Ticket shared by several requests; they all stay valid until the next
    /// `advance` or `invalidate`.
    pub fn ticket(&self) -> Ticket {
        Ticket(self.current)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }

    /// Drops whatever is in flight without starting a new request.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut generation = Generation::default();
        let first = generation.advance();
        let second = generation.advance();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn invalidate_discards_in_flight() {
        let mut generation = Generation::default();
        let ticket = generation.advance();
        generation.invalidate();
        assert!(!generation.is_current(ticket));
    }

    #[test]
    fn shared_ticket_lives_until_invalidate() {
        let mut generation = Generation::default();
        let first = generation.ticket();
        let second = generation.ticket();
        assert_eq!(first, second);
        assert!(generation.is_current(first));
        generation.invalidate();
        assert!(!generation.is_current(second));
    }
}

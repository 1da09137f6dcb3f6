/// Orders overlapping fetches of the same collection. Each fetch takes a
/// ticket before it starts; when it completes, its result is applied only if
/// no newer result has been applied already.
#[derive(Debug, Default, Clone)]
pub struct FetchSequence {
    issued: u64,
    applied: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Returns `true` if the caller should apply the response for `ticket`.
    pub fn try_apply(&mut self, ticket: FetchTicket) -> bool {
        if ticket.0 > self.applied {
            self.applied = ticket.0;
            true
        } else {
            false
        }
    }

    /// Whether `ticket` is the most recent fetch started.
    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_response_is_discarded() {
        let mut seq = FetchSequence::new();
        let first = seq.begin();
        let second = seq.begin();

        assert!(seq.try_apply(second));
        assert!(!seq.try_apply(first));
    }

    #[test]
    fn in_order_responses_all_apply() {
        let mut seq = FetchSequence::new();
        let first = seq.begin();
        assert!(seq.try_apply(first));
        let second = seq.begin();
        assert!(seq.is_latest(second));
        assert!(!seq.is_latest(first));
        assert!(seq.try_apply(second));
    }

    #[test]
    fn a_ticket_applies_once() {
        let mut seq = FetchSequence::new();
        let ticket = seq.begin();
        assert!(seq.try_apply(ticket));
        assert!(!seq.try_apply(ticket));
    }
}

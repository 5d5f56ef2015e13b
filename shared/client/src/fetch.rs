//! Loading state for list and detail views.
//!
//! Every fetch is started with [`FetchState::begin`], which hands out a
//! ticket. Only the ticket of the most recent fetch can complete it, so a
//! response that arrives after the view moved on is dropped.

/// Proof that a fetch was started; redeemed by [`FetchState::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<T>,
    generation: u64,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
            generation: 0,
        }
    }
}

impl<T> FetchState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        FetchTicket(self.generation)
    }

    /// Applies a fetch result. Returns `false`, leaving the state as is,
    /// when the ticket is stale.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<T, String>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "Dropping stale fetch result"
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(message) => self.error = Some(message),
        }
        true
    }

    /// Forgets any fetch in flight, e.g. when leaving the view.
    pub fn abandon(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    pub fn clear(&mut self) {
        self.abandon();
        self.error = None;
        self.data = None;
    }
}

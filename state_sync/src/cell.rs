use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;

use crate::observable::Observable;
use crate::view_state::ViewState;

/// State holder for one controller instance. Commits are gated twice:
///
/// - liveness: a disposed cell discards every commit, so a late arriving
///   result from a disposed controller is never applied;
/// - generation: each `begin()` supersedes earlier attempts, so when calls
///   overlap the newest one wins regardless of completion order. In-flight
///   work is not cancelled; its commits simply miss the gate.
pub struct StateCell<T> {
    state: Observable<ViewState<T>>,
    alive: AtomicBool,
    generation: AtomicU64,
}

/// Proof of which attempt a commit belongs to. Obtained before the first
/// suspension point of a load/refresh and handed back on every commit.
pub struct CommitTicket {
    generation: u64,
}

impl<T: Clone> StateCell<T> {
    pub fn new() -> Self {
        StateCell {
            state: Observable::new(ViewState::Idle),
            alive: AtomicBool::new(true),
            generation: AtomicU64::new(0),
        }
    }

    pub fn current(&self) -> ViewState<T> {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.state.subscribe()
    }

    /// Starts a new attempt, superseding any in-flight one.
    pub fn begin(&self) -> CommitTicket {
        CommitTicket {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    /// Applies `next` if the cell is still alive and `ticket` still belongs
    /// to the newest attempt. Returns whether the commit was applied.
    pub fn commit(&self, ticket: &CommitTicket, next: ViewState<T>) -> bool {
        if !self.alive.load(Ordering::SeqCst) {
            return false;
        }
        if self.generation.load(Ordering::SeqCst) != ticket.generation {
            return false;
        }
        self.state.set(next);
        true
    }

    pub fn dispose(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn is_disposed(&self) -> bool {
        !self.alive.load(Ordering::SeqCst)
    }
}

impl<T: Clone> Default for StateCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use shared_kernel::failure::Failure;

    use super::{StateCell, ViewState};

    #[test]
    fn starts_idle_and_walks_through_loading_to_success() {
        let cell = StateCell::<u32>::new();
        assert!(cell.current().is_idle());

        let ticket = cell.begin();
        assert!(cell.commit(&ticket, ViewState::Loading));
        assert!(cell.current().is_loading());
        assert!(cell.commit(&ticket, ViewState::Success(7)));
        assert_eq!(cell.current().value(), Some(&7));
    }

    #[test]
    fn a_disposed_cell_discards_late_commits_silently() {
        let cell = StateCell::<u32>::new();
        let ticket = cell.begin();
        cell.commit(&ticket, ViewState::Loading);

        cell.dispose();
        assert!(!cell.commit(&ticket, ViewState::Success(7)));
        assert!(cell.current().is_loading());
    }

    #[test]
    fn a_superseded_attempt_cannot_commit() {
        let cell = StateCell::<u32>::new();
        let first = cell.begin();
        cell.commit(&first, ViewState::Loading);

        let second = cell.begin();
        cell.commit(&second, ViewState::Loading);
        assert!(cell.commit(&second, ViewState::Success(2)));

        // The slower, older attempt completes afterwards and is discarded.
        assert!(!cell.commit(&first, ViewState::Error(Failure::unknown())));
        assert_eq!(cell.current().value(), Some(&2));
    }
}

use std::sync::Mutex;

/// Outcome of applying a fetch result to a [`SnapshotCell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotApply {
    /// The fetch was current and its value is now the snapshot.
    Applied,
    /// A newer refresh superseded this fetch; its result was discarded.
    DiscardedStale,
    /// The fetch failed; the last-known-good snapshot was kept.
    KeptLastKnownGood,
}

/// Last-known-good holder for catalog fetches.
///
/// Selection surfaces refresh their registry/ledger view asynchronously. A
/// refresh that resolves after its triggering context was superseded must not
/// clobber newer state, and a failed refresh must not reset the view to
/// empty. Each refresh takes a generation token; only the newest token may
/// publish its value.
#[derive(Debug, Default)]
pub struct SnapshotCell<T> {
    inner: Mutex<State<T>>,
}

#[derive(Debug)]
struct State<T> {
    value: Option<T>,
    generation: u64,
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self {
            value: None,
            generation: 0,
        }
    }
}

impl<T: Clone> SnapshotCell<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(State::default()),
        }
    }

    /// Start a refresh, superseding any in-flight one.
    pub fn begin_refresh(&self) -> u64 {
        let mut state = self.inner.lock().expect("snapshot mutex poisoned");
        state.generation += 1;
        state.generation
    }

    /// Publish a fetch result obtained under `token`.
    pub fn apply<E>(&self, token: u64, result: Result<T, E>) -> SnapshotApply {
        let mut state = self.inner.lock().expect("snapshot mutex poisoned");
        if token != state.generation {
            return SnapshotApply::DiscardedStale;
        }
        match result {
            Ok(value) => {
                state.value = Some(value);
                SnapshotApply::Applied
            }
            Err(_) => SnapshotApply::KeptLastKnownGood,
        }
    }

    /// Current snapshot, if any fetch ever succeeded.
    pub fn latest(&self) -> Option<T> {
        self.inner
            .lock()
            .expect("snapshot mutex poisoned")
            .value
            .clone()
    }
}

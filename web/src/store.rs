use leptos::prelude::*;
use leptos::task::spawn_local;
use shared_types::stats::district_ratings;
use shared_types::{
    DistrictRating, FetchSequence, FetchTicket, HealthBreakdown, Pool, PoolDraft, PoolId,
    PoolStats,
};

use crate::server::{create_pool, fetch_pools, set_pool_active, update_pool};
use crate::utils::auth::{server_error_message, stored_access_token};

/// What a finished fetch does to the directory.
#[derive(Debug, PartialEq)]
enum FetchOutcome {
    /// Newest response so far; it replaces the collection.
    Replace(Vec<Pool>),
    /// The fetch failed. The current collection stays and the message is shown.
    Keep(String),
    /// A newer response was already applied.
    Stale,
}

#[derive(Debug, PartialEq)]
struct SettledFetch {
    outcome: FetchOutcome,
    /// No fetch started after this one, so the loading flag can drop.
    finished: bool,
}

fn settle_fetch(
    sequence: &mut FetchSequence,
    ticket: FetchTicket,
    result: Result<Vec<Pool>, String>,
) -> SettledFetch {
    let outcome = if sequence.try_apply(ticket) {
        match result {
            Ok(pools) => FetchOutcome::Replace(pools),
            Err(message) => FetchOutcome::Keep(message),
        }
    } else {
        FetchOutcome::Stale
    };
    SettledFetch {
        outcome,
        finished: sequence.is_latest(ticket),
    }
}

/// The pool collection fetched from the API plus everything derived from it.
///
/// The collection is only ever replaced whole. Overlapping refetches are
/// ordered with a [`FetchSequence`] so a slow, older response can never
/// overwrite a newer one.
#[derive(Clone, Copy)]
pub struct PoolDirectory {
    pub pools: RwSignal<Vec<Pool>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    sequence: StoredValue<FetchSequence>,
    pub stats: Memo<PoolStats>,
    pub district_ratings: Memo<Vec<DistrictRating>>,
    pub health: Memo<HealthBreakdown>,
}

impl PoolDirectory {
    pub fn new() -> Self {
        let pools = RwSignal::new(Vec::<Pool>::new());

        Self {
            pools,
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            sequence: StoredValue::new(FetchSequence::new()),
            stats: Memo::new(move |_| pools.with(|pools| PoolStats::from_pools(pools))),
            district_ratings: Memo::new(move |_| pools.with(|pools| district_ratings(pools))),
            health: Memo::new(move |_| pools.with(|pools| HealthBreakdown::from_pools(pools))),
        }
    }

    /// Starts a refetch of the whole collection. On failure the previous
    /// collection stays in place and the error is exposed.
    pub fn refresh(&self) {
        let directory = *self;
        spawn_local(async move {
            directory.reload().await;
        });
    }

    async fn reload(self) {
        // The directory's owner is gone.
        let Some(ticket) = self.sequence.try_update_value(FetchSequence::begin) else {
            return;
        };
        self.loading.set(true);

        let result = fetch_pools(stored_access_token())
            .await
            .map_err(|err| server_error_message(&err));

        let Some(settled) = self
            .sequence
            .try_update_value(|sequence| settle_fetch(sequence, ticket, result))
        else {
            return;
        };

        match settled.outcome {
            FetchOutcome::Replace(pools) => {
                leptos::logging::log!("Loaded {} pools", pools.len());
                self.error.set(None);
                self.pools.set(pools);
            }
            FetchOutcome::Keep(message) => {
                leptos::logging::error!("Failed to load pools: {}", message);
                self.error.set(Some(message));
            }
            FetchOutcome::Stale => {
                leptos::logging::log!("Discarding stale pool response");
            }
        }
        if settled.finished {
            self.loading.set(false);
        }
    }

    pub async fn create(self, draft: PoolDraft) -> Result<Pool, String> {
        let result = create_pool(draft, stored_access_token()).await;
        self.after_mutation(result)
    }

    pub async fn update(self, id: PoolId, draft: PoolDraft) -> Result<Pool, String> {
        let result = update_pool(id.0, draft, stored_access_token()).await;
        self.after_mutation(result)
    }

    pub async fn toggle_active(self, id: PoolId) -> Result<Pool, String> {
        let is_active = self
            .find_untracked(id)
            .map(|pool| !pool.is_active)
            .unwrap_or(true);
        let result = set_pool_active(id.0, is_active, stored_access_token()).await;
        self.after_mutation(result)
    }

    // Mutations never patch the local list; the collection is refetched.
    fn after_mutation(self, result: Result<Pool, ServerFnError>) -> Result<Pool, String> {
        match result {
            Ok(pool) => {
                self.refresh();
                Ok(pool)
            }
            Err(err) => Err(server_error_message(&err)),
        }
    }

    pub fn find(&self, id: PoolId) -> Option<Pool> {
        self.pools
            .with(|pools| pools.iter().find(|pool| pool.id == id).cloned())
    }

    fn find_untracked(&self, id: PoolId) -> Option<Pool> {
        self.pools
            .with_untracked(|pools| pools.iter().find(|pool| pool.id == id).cloned())
    }
}

impl Default for PoolDirectory {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a directory owned by the calling view and fetches the collection
/// once the view is mounted in the browser.
pub fn use_pool_directory() -> PoolDirectory {
    let directory = PoolDirectory::new();

    Effect::new(move |_| {
        directory.refresh();
    });

    directory
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pools(ids: &[i64]) -> Vec<Pool> {
        ids.iter()
            .map(|id| Pool {
                id: PoolId(*id),
                ..Pool::default()
            })
            .collect()
    }

    // Mirrors how `reload` applies a settled fetch to the directory signals.
    fn apply(settled: SettledFetch, current: &mut Vec<Pool>, error: &mut Option<String>) {
        match settled.outcome {
            FetchOutcome::Replace(next) => {
                *error = None;
                *current = next;
            }
            FetchOutcome::Keep(message) => *error = Some(message),
            FetchOutcome::Stale => {}
        }
    }

    #[test]
    fn failed_refetch_keeps_the_loaded_collection() {
        let mut sequence = FetchSequence::new();
        let mut current = Vec::new();
        let mut error = None;

        let first = sequence.begin();
        let settled = settle_fetch(&mut sequence, first, Ok(pools(&[1, 2])));
        assert!(settled.finished);
        apply(settled, &mut current, &mut error);

        let second = sequence.begin();
        let settled = settle_fetch(&mut sequence, second, Err("Network error".to_string()));
        assert_eq!(settled.outcome, FetchOutcome::Keep("Network error".to_string()));
        assert!(settled.finished);
        apply(settled, &mut current, &mut error);

        assert_eq!(current, pools(&[1, 2]));
        assert_eq!(error.as_deref(), Some("Network error"));
    }

    #[test]
    fn older_response_arriving_late_is_dropped() {
        let mut sequence = FetchSequence::new();
        let mut current = Vec::new();
        let mut error = None;

        let older = sequence.begin();
        let newer = sequence.begin();

        let settled = settle_fetch(&mut sequence, newer, Ok(pools(&[1, 2, 3])));
        assert!(settled.finished);
        apply(settled, &mut current, &mut error);

        let settled = settle_fetch(&mut sequence, older, Ok(pools(&[1])));
        assert_eq!(settled.outcome, FetchOutcome::Stale);
        assert!(!settled.finished);
        apply(settled, &mut current, &mut error);

        assert_eq!(current, pools(&[1, 2, 3]));
        assert_eq!(error, None);
    }

    #[test]
    fn loading_stays_on_until_the_latest_fetch_settles() {
        let mut sequence = FetchSequence::new();
        let older = sequence.begin();
        let newer = sequence.begin();

        let settled = settle_fetch(&mut sequence, older, Ok(pools(&[1])));
        assert_eq!(settled.outcome, FetchOutcome::Replace(pools(&[1])));
        assert!(!settled.finished);

        let settled = settle_fetch(&mut sequence, newer, Err("timeout".to_string()));
        assert_eq!(settled.outcome, FetchOutcome::Keep("timeout".to_string()));
        assert!(settled.finished);
    }
}

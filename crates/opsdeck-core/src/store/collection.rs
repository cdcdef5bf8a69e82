// ── Environment-keyed collection store ──
//
// One store per record type. Fetched collections are cached per
// environment and published through a `watch` channel as a tri-state
// (loading / success / error). Every fetch takes a ticket; starting a new
// fetch bumps the generation and cancels the previous ticket, and a
// completion carrying an outdated ticket is discarded. That is what keeps
// a slow development response from overwriting staging data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tracing::{debug, warn};

use opsdeck_api::Environment;

use crate::error::CoreError;

/// Status of the collection for the environment last asked for.
#[derive(Debug, Clone)]
pub enum FetchState<T> {
    Loading,
    Success(Arc<Vec<T>>),
    Error(String),
}

impl<T> FetchState<T> {
    pub fn rows(&self) -> Option<&Arc<Vec<T>>> {
        match self {
            Self::Success(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// What subscribers receive.
#[derive(Debug, Clone)]
pub struct CollectionSnapshot<T> {
    pub env: Environment,
    pub state: FetchState<T>,
    /// Showing cached rows while a fresh fetch is in flight.
    pub revalidating: bool,
    pub generation: u64,
}

/// Proof of which fetch a result belongs to.
#[derive(Debug)]
pub struct FetchTicket {
    pub env: Environment,
    pub generation: u64,
    cancel: CancellationToken,
}

impl FetchTicket {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }
}

pub struct CollectionStore<T: Clone + Send + Sync + 'static> {
    name: &'static str,
    cache: DashMap<Environment, Arc<Vec<T>>>,
    generation: AtomicU64,
    in_flight: Mutex<CancellationToken>,
    state: watch::Sender<CollectionSnapshot<T>>,
}

impl<T: Clone + Send + Sync + 'static> CollectionStore<T> {
    pub fn new(name: &'static str) -> Self {
        let (state, _) = watch::channel(CollectionSnapshot {
            env: Environment::default(),
            state: FetchState::Loading,
            revalidating: false,
            generation: 0,
        });
        Self {
            name,
            cache: DashMap::new(),
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(CancellationToken::new()),
            state,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether any fetch has ever been started.
    pub fn has_started(&self) -> bool {
        self.generation.load(Ordering::Acquire) > 0
    }

    pub fn snapshot(&self) -> CollectionSnapshot<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionSnapshot<T>> {
        self.state.subscribe()
    }

    pub fn cached(&self, env: Environment) -> Option<Arc<Vec<T>>> {
        self.cache.get(&env).map(|r| Arc::clone(r.value()))
    }

    /// Start a fetch for `env`, superseding whatever was in flight.
    ///
    /// Publishes cached rows (marked revalidating) if there are any,
    /// otherwise `Loading`.
    pub fn begin(&self, env: Environment) -> FetchTicket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let cancel = CancellationToken::new();
        {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            in_flight.cancel();
            *in_flight = cancel.clone();
        }

        let (state, revalidating) = match self.cached(env) {
            Some(rows) => (FetchState::Success(rows), true),
            None => (FetchState::Loading, false),
        };
        debug!(store = self.name, %env, generation, revalidating, "fetch started");
        self.state.send_replace(CollectionSnapshot {
            env,
            state,
            revalidating,
            generation,
        });

        FetchTicket {
            env,
            generation,
            cancel,
        }
    }

    /// Record a fetch result. Returns `false` (and changes nothing) when the
    /// ticket has been superseded or cancelled.
    pub fn complete(&self, ticket: &FetchTicket, result: Result<Vec<T>, CoreError>) -> bool {
        let current = self.generation.load(Ordering::Acquire);
        if ticket.is_cancelled() || ticket.generation != current {
            debug!(
                store = self.name,
                env = %ticket.env,
                generation = ticket.generation,
                current,
                "discarding stale response"
            );
            return false;
        }

        let state = match result {
            Ok(rows) => {
                debug!(store = self.name, env = %ticket.env, count = rows.len(), "fetch complete");
                let rows = Arc::new(rows);
                self.cache.insert(ticket.env, Arc::clone(&rows));
                FetchState::Success(rows)
            }
            Err(e) => {
                warn!(store = self.name, env = %ticket.env, error = %e, "fetch failed");
                FetchState::Error(e.to_string())
            }
        };
        self.state.send_replace(CollectionSnapshot {
            env: ticket.env,
            state,
            revalidating: false,
            generation: ticket.generation,
        });
        true
    }

    /// Cancel the in-flight fetch, if any.
    pub fn cancel_in_flight(&self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    /// Back to the never-fetched state: in-flight fetch cancelled, cache
    /// emptied, `Loading` published for `env`.
    pub fn reset(&self, env: Environment) {
        self.cancel_in_flight();
        self.cache.clear();
        self.generation.store(0, Ordering::Release);
        debug!(store = self.name, "store reset");
        self.state.send_replace(CollectionSnapshot {
            env,
            state: FetchState::Loading,
            revalidating: false,
            generation: 0,
        });
    }
}

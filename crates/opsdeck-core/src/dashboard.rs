// ── Dashboard controller ──
//
// Owns the application state objects (session, environment, collection
// stores) and the API client. Login runs login + identity lookup and
// stores the session; collection fetches run as spawned tasks keyed by the
// environment active when they started.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use secrecy::SecretString;
use strum::{Display, EnumIter};
use tokio::task::{AbortHandle, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use opsdeck_api::{ApiClient, CronJob, Environment, Module, TransportConfig, User};

use crate::config::DashboardConfig;
use crate::credentials;
use crate::environment::EnvironmentSelector;
use crate::error::CoreError;
use crate::session::{Session, SessionStore};
use crate::store::{CollectionStore, FetchState};

/// The two environment-keyed collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum CollectionKind {
    #[strum(to_string = "cron jobs")]
    CronJobs,
    #[strum(to_string = "users")]
    Users,
}

impl CollectionKind {
    /// Module that grants access to this collection.
    pub fn module(self) -> Module {
        match self {
            Self::CronJobs => Module::Scheduler,
            Self::Users => Module::UserManagement,
        }
    }
}

/// Cheaply cloneable handle to the dashboard state.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    client: ApiClient,
    session: SessionStore,
    environment: EnvironmentSelector,
    cron_jobs: Arc<CollectionStore<CronJob>>,
    users: Arc<CollectionStore<User>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<AbortHandle>>,
}

impl Dashboard {
    /// Build the client and load the persisted session. Starts at development.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = ApiClient::new(config.api_url.clone(), &transport)?;
        let session = SessionStore::open(&config.session_path);

        Ok(Self {
            inner: Arc::new(DashboardInner {
                config,
                client,
                session,
                environment: EnvironmentSelector::default(),
                cron_jobs: Arc::new(CollectionStore::new("cron-jobs")),
                users: Arc::new(CollectionStore::new("users")),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn environment(&self) -> &EnvironmentSelector {
        &self.inner.environment
    }

    pub fn cron_jobs(&self) -> &Arc<CollectionStore<CronJob>> {
        &self.inner.cron_jobs
    }

    pub fn users(&self) -> &Arc<CollectionStore<User>> {
        &self.inner.users
    }

    // ── Auth ─────────────────────────────────────────────────────

    /// Validate, log in, look up the identity and persist the session.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, CoreError> {
        credentials::validate(email, password)?;
        let email = email.trim();

        let token = self.inner.client.login(email, password).await?;
        let identity = self.inner.client.me(&token).await?;
        let session = Session::new(token, identity);
        self.inner.session.set(session.clone())?;

        info!(email, modules = session.modules.len(), "logged in");
        Ok(session)
    }

    /// Clear the session, drop in-flight fetches and forget cached rows.
    pub fn logout(&self) -> Result<(), CoreError> {
        let env = self.inner.environment.current();
        self.inner.cron_jobs.reset(env);
        self.inner.users.reset(env);
        self.inner.session.clear()
    }

    // ── Environment ──────────────────────────────────────────────

    /// Switch environments and refetch every collection that has been
    /// fetched before. Returns `true` if the environment changed.
    pub fn set_environment(&self, env: Environment) -> bool {
        if !self.inner.environment.set(env) {
            return false;
        }
        self.refresh_started();
        true
    }

    /// Advance to the next environment, refetching like `set_environment`.
    pub fn cycle_environment(&self) -> Environment {
        let env = self.inner.environment.cycle();
        self.refresh_started();
        env
    }

    fn refresh_started(&self) {
        for kind in [CollectionKind::CronJobs, CollectionKind::Users] {
            if self.has_started(kind) {
                self.refresh(kind);
            }
        }
    }

    // ── Fetching ─────────────────────────────────────────────────

    fn has_started(&self, kind: CollectionKind) -> bool {
        match kind {
            CollectionKind::CronJobs => self.inner.cron_jobs.has_started(),
            CollectionKind::Users => self.inner.users.has_started(),
        }
    }

    /// Fetch `kind` unless the current environment's data is already shown
    /// or on its way. Used when a view is mounted.
    pub fn ensure(&self, kind: CollectionKind) -> Option<JoinHandle<()>> {
        let env = self.inner.environment.current();
        let (snap_env, failed) = match kind {
            CollectionKind::CronJobs => {
                let snap = self.inner.cron_jobs.snapshot();
                (snap.env, matches!(snap.state, FetchState::Error(_)))
            }
            CollectionKind::Users => {
                let snap = self.inner.users.snapshot();
                (snap.env, matches!(snap.state, FetchState::Error(_)))
            }
        };
        if self.has_started(kind) && snap_env == env && !failed {
            return None;
        }
        Some(self.refresh(kind))
    }

    /// Fetch `kind` for the current environment, superseding any fetch in flight.
    pub fn refresh(&self, kind: CollectionKind) -> JoinHandle<()> {
        match kind {
            CollectionKind::CronJobs => self.spawn_fetch(&self.inner.cron_jobs, |client, env| {
                async move { client.cron_jobs(env).await }
            }),
            CollectionKind::Users => self.spawn_fetch(&self.inner.users, |client, env| {
                async move { client.users(env).await }
            }),
        }
    }

    fn spawn_fetch<T, F, Fut>(&self, store: &Arc<CollectionStore<T>>, fetch: F) -> JoinHandle<()>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce(ApiClient, Environment) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<T>, opsdeck_api::Error>> + Send + 'static,
    {
        let env = self.inner.environment.current();
        let ticket = store.begin(env);
        let store = Arc::clone(store);
        let client = self.inner.client.clone();
        let shutdown = self.inner.cancel.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {}
                () = ticket.cancelled() => {
                    debug!(store = store.name(), %env, "fetch cancelled");
                }
                result = fetch(client, env) => {
                    store.complete(&ticket, result.map_err(CoreError::from));
                }
            }
        });

        let mut handles = self
            .inner
            .task_handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        handles.retain(|h| !h.is_finished());
        handles.push(handle.abort_handle());
        handle
    }

    /// Cancel background fetches. The dashboard stays usable for reads.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        let handles = std::mem::take(
            &mut *self
                .inner
                .task_handles
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for handle in handles {
            handle.abort();
        }
        debug!("dashboard shut down");
    }
}

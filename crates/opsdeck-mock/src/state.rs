use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use opsdeck_api::{CronJob, Environment, Identity, Module, User};

use crate::fixtures::{self, FixtureOptions};

/// Runtime knobs for the mock server.
#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Delay applied before answering login and collection requests.
    pub latency: Duration,
    /// Logins succeed only for `*@{accepted_domain}` addresses.
    pub accepted_domain: String,
    pub fixtures: FixtureOptions,
}

/// Collections served for one environment. Shared with every response.
#[derive(Debug, Clone)]
pub struct EnvData {
    pub users: Arc<Vec<User>>,
    pub cron_jobs: Arc<Vec<CronJob>>,
}

/// Most tokens remembered at once; the oldest is forgotten first.
pub const MAX_SESSIONS: usize = 256;

struct IssuedToken {
    identity: Identity,
    serial: u64,
}

/// Central shared state, passed as `Arc<MockState>` to all handlers.
pub struct MockState {
    pub options: MockOptions,
    data: HashMap<Environment, EnvData>,
    /// Issued bearer tokens -> identity.
    sessions: DashMap<String, IssuedToken>,
    next_serial: AtomicU64,
    session_cap: usize,
}

impl MockState {
    /// Generate fixtures for every environment up front.
    pub fn new(options: MockOptions) -> Self {
        let data = Environment::ALL
            .into_iter()
            .map(|env| {
                let set = fixtures::generate(env, &options.fixtures);
                let data = EnvData {
                    users: Arc::new(set.users),
                    cron_jobs: Arc::new(set.cron_jobs),
                };
                (env, data)
            })
            .collect();

        Self {
            options,
            data,
            sessions: DashMap::new(),
            next_serial: AtomicU64::new(0),
            session_cap: MAX_SESSIONS,
        }
    }

    pub fn env_data(&self, env: Environment) -> Option<&EnvData> {
        self.data.get(&env)
    }

    /// Whether an address may log in.
    pub fn accepts(&self, email: &str) -> bool {
        email
            .rsplit_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && domain.eq_ignore_ascii_case(&self.options.accepted_domain)
            })
    }

    /// Mint a token for `email` and remember who it belongs to.
    pub fn issue_token(&self, email: &str) -> String {
        while self.sessions.len() >= self.session_cap {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.value().serial)
                .map(|entry| entry.key().clone());
            let Some(oldest) = oldest else { break };
            self.sessions.remove(&oldest);
            debug!("evicted oldest mock session");
        }

        let token = format!("mock-{}", Uuid::new_v4().simple());
        let serial = self.next_serial.fetch_add(1, Ordering::Relaxed);
        self.sessions.insert(
            token.clone(),
            IssuedToken {
                identity: identity_for(email),
                serial,
            },
        );
        token
    }

    pub fn identity(&self, token: &str) -> Option<Identity> {
        self.sessions
            .get(token)
            .map(|entry| entry.value().identity.clone())
    }
}

/// Derive a display identity from an address: `olive.ops@x` -> "Olive Ops", "OO".
fn identity_for(email: &str) -> Identity {
    let local = email.split('@').next().unwrap_or(email);
    let words: Vec<String> = local
        .split(['.', '_', '-'])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();

    let name = if words.is_empty() {
        local.to_owned()
    } else {
        words.join(" ")
    };
    let initials = words
        .iter()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect();

    Identity {
        name,
        initials,
        email: email.to_owned(),
        modules: vec![Module::Scheduler, Module::UserManagement],
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

// ── Environment selector ──
//
// Process-wide single choice of environment. Every fresh start begins at
// development; a deep link may override it. Subscribers are woken on change
// and are expected to refetch environment-keyed collections.

use tokio::sync::watch;
use tracing::info;

use opsdeck_api::Environment;

use crate::table::address::{Location, keys};
use crate::table::{AddressChange, HistoryMode};

pub struct EnvironmentSelector {
    current: watch::Sender<Environment>,
}

impl Default for EnvironmentSelector {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

impl EnvironmentSelector {
    pub fn new(initial: Environment) -> Self {
        let (current, _) = watch::channel(initial);
        Self { current }
    }

    pub fn current(&self) -> Environment {
        *self.current.borrow()
    }

    /// Switch environments. Returns `true` if the value changed.
    pub fn set(&self, env: Environment) -> bool {
        let changed = self.current.send_if_modified(|cur| {
            if *cur == env {
                false
            } else {
                *cur = env;
                true
            }
        });
        if changed {
            info!(%env, "environment switched");
        }
        changed
    }

    /// Advance to the next environment and return it.
    pub fn cycle(&self) -> Environment {
        let next = self.current().next();
        self.set(next);
        next
    }

    pub fn subscribe(&self) -> watch::Receiver<Environment> {
        self.current.subscribe()
    }
}

/// Address change recording the active environment (replace mode).
pub fn address_change(env: Environment) -> AddressChange {
    AddressChange::new(HistoryMode::Replace).set(keys::ENV, Some(env.to_string()))
}

/// Environment named by an address, if any and valid.
pub fn from_location(location: &Location) -> Option<Environment> {
    location.get(keys::ENV).and_then(|raw| raw.parse().ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_development() {
        assert_eq!(
            EnvironmentSelector::default().current(),
            Environment::Development
        );
    }

    #[test]
    fn set_reports_changes_and_notifies() {
        let selector = EnvironmentSelector::default();
        let mut rx = selector.subscribe();
        assert!(!selector.set(Environment::Development));
        assert!(!rx.has_changed().unwrap());
        assert!(selector.set(Environment::Staging));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Environment::Staging);
    }

    #[test]
    fn cycle_wraps() {
        let selector = EnvironmentSelector::new(Environment::Production);
        assert_eq!(selector.cycle(), Environment::Development);
    }

    #[test]
    fn location_round_trip() {
        let loc = address_change(Environment::Staging).apply_to(&Location::parse("/dashboard"));
        assert_eq!(loc.to_string(), "/dashboard?env=staging");
        assert_eq!(from_location(&loc), Some(Environment::Staging));
        assert_eq!(from_location(&Location::parse("/x?env=qa")), None);
    }
}

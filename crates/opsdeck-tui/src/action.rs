//! All possible UI actions. Actions are the sole mechanism for state mutation.

use opsdeck_core::{AddressChange, CollectionSnapshot, CronJob, Location, Session, User};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    /// Apply a view's address change to the history.
    Navigate(AddressChange),
    HistoryBack,
    HistoryForward,
    /// Re-read view state from an address (back/forward, deep link).
    Hydrate(Location),
    ToggleHelp,

    // ── Session ───────────────────────────────────────────────────
    SessionChanged(Option<Session>),
    /// `field` names the form field at fault, if any.
    LoginFailed {
        field: Option<&'static str>,
        message: String,
    },
    Logout,

    // ── Data ──────────────────────────────────────────────────────
    CycleEnvironment,
    Refresh,
    CronJobsUpdated(CollectionSnapshot<CronJob>),
    UsersUpdated(CollectionSnapshot<User>),

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}

//! Screen identifiers and the address paths they live at.

use std::fmt;

use opsdeck_core::{CollectionKind, Module, Session};

pub const LOGIN_PATH: &str = "/";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Login,
    /// Dashboard index, shown when no module tab applies.
    Home,
    Scheduler,
    Users,
}

impl ScreenId {
    /// Module screens in tab-bar order.
    pub const TABS: [ScreenId; 2] = [Self::Scheduler, Self::Users];

    pub fn path(self) -> &'static str {
        match self {
            Self::Login => LOGIN_PATH,
            Self::Home => DASHBOARD_PATH,
            Self::Scheduler => "/dashboard/scheduler",
            Self::Users => "/dashboard/user-management",
        }
    }

    /// Screen living at `path`. Trailing slashes are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { LOGIN_PATH } else { trimmed };
        [Self::Login, Self::Home, Self::Scheduler, Self::Users]
            .into_iter()
            .find(|s| s.path() == path)
    }

    /// Module a session needs to see this screen.
    pub fn module(self) -> Option<Module> {
        self.collection().map(CollectionKind::module)
    }

    /// Collection the screen displays.
    pub fn collection(self) -> Option<CollectionKind> {
        match self {
            Self::Scheduler => Some(CollectionKind::CronJobs),
            Self::Users => Some(CollectionKind::Users),
            Self::Login | Self::Home => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Home => "Dashboard",
            Self::Scheduler => "Scheduler",
            Self::Users => "User Management",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Module tabs `session` may open, in tab order.
pub fn visible_tabs(session: Option<&Session>) -> Vec<ScreenId> {
    let Some(session) = session else {
        return Vec::new();
    };
    ScreenId::TABS
        .into_iter()
        .filter(|s| s.module().is_some_and(|m| session.has_module(m)))
        .collect()
}

/// Screen to show for `path`.
///
/// Logged out, everything is the login screen. Logged in, the login path
/// and any screen the session may not open fall through to the first
/// permitted tab, or the dashboard index when there is none.
pub fn resolve(path: &str, session: Option<&Session>) -> ScreenId {
    if session.is_none() {
        return ScreenId::Login;
    }
    let tabs = visible_tabs(session);
    match ScreenId::from_path(path) {
        Some(screen) if tabs.contains(&screen) => screen,
        _ => tabs.first().copied().unwrap_or(ScreenId::Home),
    }
}

/// Tab after (or before, when `forward` is false) `current`, wrapping.
pub fn cycle_tab(tabs: &[ScreenId], current: ScreenId, forward: bool) -> Option<ScreenId> {
    if tabs.is_empty() {
        return None;
    }
    let len = tabs.len();
    let idx = tabs.iter().position(|&s| s == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    tabs.get(next).copied()
}

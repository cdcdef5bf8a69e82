//! Application core: event loop, routing, action dispatch.
//!
//! The app owns the navigation [`History`]. Every screen switch, view
//! change and environment switch lands there as a location, and back/forward
//! re-open whatever location they arrive at.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use opsdeck_config::UiSettings;
use opsdeck_core::table::address::keys;
use opsdeck_core::{Dashboard, Environment, History, Location, Session, environment};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::{self, DASHBOARD_PATH, LOGIN_PATH, ScreenId};
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::{centered, sub_tabs};

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    dashboard: Dashboard,
    tick_rate: Duration,
    render_rate: Duration,
    /// Current active screen.
    active_screen: ScreenId,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Visited locations; the current one is what's on screen.
    history: History,
    /// Location asked for while logged out, opened after login.
    pending: Option<Location>,
    session: Option<Session>,
    /// Whether the app should keep running.
    running: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Action sender; components can dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver, drained by the main loop.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
}

impl App {
    /// Create the app at `initial`. An `env` in the location wins over the
    /// dashboard's default environment.
    pub fn new(dashboard: Dashboard, initial: Location, ui: &UiSettings) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        if let Some(env) = environment::from_location(&initial) {
            dashboard.set_environment(env);
        }

        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(&dashboard).into_iter().collect();
        let session = dashboard.session().current();
        let frame_rate = f64::from(ui.frame_rate.max(1));

        Self {
            tick_rate: Duration::from_millis(ui.tick_rate_ms.max(1)),
            render_rate: Duration::from_secs_f64(1.0 / frame_rate),
            active_screen: ScreenId::default(),
            screens,
            history: History::new(initial),
            pending: None,
            session,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
            notification: None,
            dashboard,
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        let dashboard = self.dashboard.clone();
        tokio::spawn(async move {
            crate::data_bridge::spawn_data_bridge(dashboard, tx, cancel).await;
        });

        self.open_current()?;

        let mut events = EventReader::new(self.tick_rate, self.render_rate);

        let (cols, rows) = tui.size()?;
        info!(cols, rows, location = %self.history.current(), "TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Routing ──────────────────────────────────────────────────────

    /// Show whatever the current history entry points at, redirecting
    /// when the session may not see it.
    fn open_current(&mut self) -> Result<()> {
        let location = self.history.current().clone();
        let target = screen::resolve(&location.path, self.session.as_ref());
        let requested = ScreenId::from_path(&location.path);

        if target == ScreenId::Login {
            if requested != Some(ScreenId::Login) {
                debug!(%location, "not logged in, holding location for later");
                self.pending = Some(location);
                self.history.replace(Location::new(LOGIN_PATH));
            }
        } else if requested != Some(target) {
            debug!(%location, to = %target, "redirecting");
            let mut redirect = Location::new(target.path());
            if let Some(env) = location.get(keys::ENV) {
                redirect.query.insert(keys::ENV.to_owned(), env.to_owned());
            }
            self.history.replace(redirect);
        }

        self.activate(target)
    }

    fn activate(&mut self, target: ScreenId) -> Result<()> {
        if target != self.active_screen {
            debug!("switching screen: {} → {}", self.active_screen, target);
            if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                screen.set_focused(false);
            }
            self.active_screen = target;
            if let Some(screen) = self.screens.get_mut(&target) {
                screen.set_focused(true);
            }
        }

        if target != ScreenId::Login {
            // The address and the selector agree on the environment
            match environment::from_location(self.history.current()) {
                Some(env) => {
                    self.dashboard.set_environment(env);
                }
                None => {
                    let env = self.dashboard.environment().current();
                    self.history.apply(&environment::address_change(env));
                }
            }
        }

        let location = self.history.current().clone();
        if let Some(screen) = self.screens.get_mut(&target) {
            if let Some(follow_up) = screen.update(&Action::Hydrate(location))? {
                self.action_tx.send(follow_up)?;
            }
        }

        if let Some(kind) = target.collection() {
            self.dashboard.ensure(kind);
        }
        Ok(())
    }

    fn visible_tabs(&self) -> Vec<ScreenId> {
        screen::visible_tabs(self.session.as_ref())
    }

    fn current_environment(&self) -> Environment {
        self.dashboard.environment().current()
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            // In help mode, Esc or ? closes help
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        // Forms and search boxes take every key
        let captured = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input());
        if captured {
            return self.delegate_key(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            // History
            (KeyModifiers::NONE, KeyCode::Char('[')) | (KeyModifiers::ALT, KeyCode::Left) => {
                return Ok(Some(Action::HistoryBack));
            }
            (KeyModifiers::NONE, KeyCode::Char(']')) | (KeyModifiers::ALT, KeyCode::Right) => {
                return Ok(Some(Action::HistoryForward));
            }

            // Data
            (KeyModifiers::NONE, KeyCode::Char('e')) => {
                return Ok(Some(Action::CycleEnvironment));
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::Refresh)),
            (_, KeyCode::Char('L')) => return Ok(Some(Action::Logout)),

            // Tabs by number
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let idx = c.to_digit(10).and_then(|d| usize::try_from(d).ok());
                if let Some(tab) = idx.and_then(|n| self.visible_tabs().get(n - 1).copied()) {
                    return Ok(Some(Action::SwitchScreen(tab)));
                }
                return Ok(None);
            }

            // Tab / Shift+Tab for screen cycling
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(screen::cycle_tab(&self.visible_tabs(), self.active_screen, true)
                    .map(Action::SwitchScreen));
            }
            (_, KeyCode::BackTab) => {
                return Ok(screen::cycle_tab(&self.visible_tabs(), self.active_screen, false)
                    .map(Action::SwitchScreen));
            }

            _ => {}
        }

        self.delegate_key(key)
    }

    fn delegate_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Process a single action: update app state and propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                debug!(w, h, "terminal resized");
            }

            Action::Render => {}

            Action::Tick => {
                // Auto-dismiss notifications
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    screen.update(action)?;
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            // ── Navigation ───────────────────────────────────────────
            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    let location = environment::address_change(self.current_environment())
                        .apply_to(&Location::new(target.path()));
                    self.history.push(location);
                    self.open_current()?;
                }
            }

            Action::Navigate(change) => {
                let location = self.history.apply(change);
                debug!(%location, "address updated");
            }

            Action::HistoryBack => {
                if self.history.back().is_some() {
                    self.open_current()?;
                }
            }

            Action::HistoryForward => {
                if self.history.forward().is_some() {
                    self.open_current()?;
                }
            }

            // ── Session ──────────────────────────────────────────────
            Action::SessionChanged(session) => {
                let was_logged_in = self.session.is_some();
                self.session.clone_from(session);
                for screen in self.screens.values_mut() {
                    screen.update(action)?;
                }

                match (was_logged_in, session) {
                    (false, Some(session)) => {
                        info!(email = %session.email, "signed in");
                        let next = self
                            .pending
                            .take()
                            .unwrap_or_else(|| Location::new(DASHBOARD_PATH));
                        self.history.push(next);
                        self.open_current()?;
                        self.action_tx.send(Action::Notify(Notification::success(
                            format!("Signed in as {}", session.name),
                        )))?;
                    }
                    (true, None) => {
                        info!("signed out");
                        self.history.push(Location::new(LOGIN_PATH));
                        self.open_current()?;
                    }
                    (true, Some(_)) if self.active_screen != ScreenId::Login => {
                        // Modules may have changed
                        self.open_current()?;
                    }
                    _ => {}
                }
            }

            Action::Logout => {
                if let Err(e) = self.dashboard.logout() {
                    self.action_tx
                        .send(Action::Notify(Notification::error(e.to_string())))?;
                }
            }

            Action::LoginFailed { .. } => {
                if let Some(screen) = self.screens.get_mut(&ScreenId::Login) {
                    screen.update(action)?;
                }
            }

            // ── Data ─────────────────────────────────────────────────
            Action::CycleEnvironment => {
                if self.active_screen != ScreenId::Login {
                    let env = self.dashboard.cycle_environment();
                    self.history.apply(&environment::address_change(env));
                    self.action_tx.send(Action::Notify(Notification::info(format!(
                        "Environment: {}",
                        env.label()
                    ))))?;
                }
            }

            Action::Refresh => {
                if let Some(kind) = self.active_screen.collection() {
                    debug!(%kind, "manual refresh");
                    self.dashboard.refresh(kind);
                }
            }

            // Data updates go to ALL screens so they stay in sync
            Action::CronJobsUpdated(_) | Action::UsersUpdated(_) => {
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            // Notifications
            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }

            // Everything else goes to the active screen only
            other => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }

        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Login gets the full frame
        if self.active_screen == ScreenId::Login {
            if let Some(screen) = self.screens.get(&ScreenId::Login) {
                screen.render(frame, area);
            }
            if let Some((ref notif, _)) = self.notification {
                self.render_notification(frame, area, notif);
            }
            return;
        }

        // Layout: [header] [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.render_header(frame, layout[0]);
        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[1]);
        }
        self.render_tab_bar(frame, layout[2]);
        self.render_status_bar(frame, layout[3]);

        // Overlays on top (last = topmost)
        if let Some((ref notif, _)) = self.notification {
            self.render_notification(frame, area, notif);
        }
        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    /// Environment picker on the left, signed-in identity on the right.
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let env = self.current_environment();
        let labels: Vec<&str> = Environment::ALL.iter().map(|e| e.label()).collect();
        let active = Environment::ALL
            .iter()
            .position(|&e| e == env)
            .unwrap_or(0);
        let accent = Style::default().fg(theme::environment_color(env));

        let mut left = vec![Span::styled(" env ", theme::key_hint())];
        left.extend(sub_tabs::render_sub_tabs(&labels, active, accent).spans);
        frame.render_widget(Paragraph::new(Line::from(left)), area);

        if let Some(session) = &self.session {
            let right = Line::from(vec![
                Span::styled(
                    format!(" {} ", session.initials),
                    Style::default()
                        .fg(theme::BG_DARK)
                        .bg(theme::ELECTRIC_PURPLE)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {} ", session.name),
                    Style::default().fg(theme::DIM_WHITE),
                ),
                Span::styled(format!("{} ", session.email), theme::key_hint()),
            ])
            .right_aligned();
            frame.render_widget(Paragraph::new(right), area);
        }
    }

    /// Bottom tab bar: the module screens this session may open.
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let tabs = self.visible_tabs();
        if tabs.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" no modules", theme::key_hint())),
                area,
            );
            return;
        }

        let titles: Vec<Line> = tabs
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", i + 1, id.label()), style))
            })
            .collect();

        let tabs = Tabs::new(titles).divider(Span::styled(" ", theme::key_hint()));
        let tabs = match self.visible_tabs().iter().position(|&s| s == self.active_screen) {
            Some(selected) => tabs.select(selected),
            // Home has no tab of its own
            None => tabs.highlight_style(Style::default()),
        };

        frame.render_widget(tabs, area);
    }

    /// Bottom status bar with the current address and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut nav = String::new();
        if self.history.can_go_back() {
            nav.push('‹');
        }
        if self.history.can_go_forward() {
            nav.push('›');
        }

        let line = Line::from(vec![
            Span::styled(format!(" {nav:<2}"), theme::key_hint_key()),
            Span::styled(
                self.history.current().to_string(),
                Style::default().fg(theme::NEON_CYAN),
            ),
            Span::styled(
                " │ ? help  e env  r refresh  [ ] back/fwd  L logout  q quit",
                theme::key_hint(),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    /// Render the help overlay centered on screen.
    #[allow(clippy::unused_self)]
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let help_area = centered(area, 60, 26);
        frame.render_widget(Clear, help_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            [
                Line::from(Span::styled(
                    format!("  {title}"),
                    Style::default().fg(theme::NEON_CYAN),
                )),
                Line::from(Span::styled(
                    format!("  {}", "─".repeat(title.chars().count())),
                    theme::key_hint(),
                )),
            ]
        };
        let entry = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<12}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let mut help_text = vec![Line::from("")];
        help_text.extend(section("Navigation"));
        help_text.extend([
            entry("1-9 Tab", "Jump to / cycle module"),
            entry("[ ]", "History back / forward"),
            entry("e", "Next environment"),
            entry("r", "Refresh data"),
            entry("L", "Log out"),
        ]);
        help_text.push(Line::from(""));
        help_text.extend(section("Tables"));
        help_text.extend([
            entry("j/k ↑/↓", "Move up/down"),
            entry("g/G", "Top / bottom"),
            entry("Ctrl+d/u", "Page down / up"),
            entry("h/l", "Focus column"),
            entry("s A D", "Toggle / asc / desc sort"),
            entry("/", "Search"),
            entry("f", "Facet filter"),
            entry("x", "Reset sort and filters"),
            entry("Enter Esc", "Open / close details"),
        ]);
        help_text.push(Line::from(""));
        help_text.push(Line::from(Span::styled(
            "                         Esc or ? to close",
            theme::key_hint(),
        )));

        frame.render_widget(Paragraph::new(help_text), inner);
    }

    /// Render a notification toast in the bottom-right corner.
    #[allow(clippy::unused_self)]
    fn render_notification(&self, frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2); // above status bar
        let toast_area = Rect::new(area.x + x, area.y + y, width.min(area.width), height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
            NotificationLevel::Info => (theme::NEON_CYAN, "·"),
        };

        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            toast_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(&notif.message, Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use opsdeck_core::{DashboardConfig, Identity, Module};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn app(initial: &str) -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = Dashboard::new(DashboardConfig {
            api_url: url::Url::parse("http://127.0.0.1:9/").unwrap(),
            timeout: Duration::from_millis(200),
            session_path: dir.path().join("session.json"),
        })
        .unwrap();
        let app = App::new(dashboard, Location::parse(initial), &UiSettings::default());
        (app, dir)
    }

    fn session(modules: Vec<Module>) -> Session {
        Session::new(
            "token".into(),
            Identity {
                name: "Olive Park".into(),
                initials: "OP".into(),
                email: "olive@opsdeck.dev".into(),
                modules,
            },
        )
    }

    fn log_in(app: &mut App, modules: Vec<Module>) {
        app.process_action(&Action::SessionChanged(Some(session(modules))))
            .unwrap();
    }

    fn current(app: &App) -> String {
        app.history.current().to_string()
    }

    #[tokio::test]
    async fn deep_link_survives_login() {
        let (mut app, _dir) = app("/dashboard/user-management?env=staging&id=u-7");
        app.open_current().unwrap();
        assert_eq!(app.active_screen, ScreenId::Login);
        assert_eq!(app.history.current().path, "/");

        log_in(&mut app, vec![Module::Scheduler, Module::UserManagement]);
        assert_eq!(app.active_screen, ScreenId::Users);
        let location = app.history.current();
        assert_eq!(location.path, "/dashboard/user-management");
        assert_eq!(location.get("id"), Some("u-7"));
        assert_eq!(location.get("env"), Some("staging"));
        assert_eq!(app.current_environment(), Environment::Staging);
    }

    #[tokio::test]
    async fn forbidden_screen_redirects_to_first_permitted_tab() {
        let (mut app, _dir) = app("/dashboard/scheduler");
        app.open_current().unwrap();
        log_in(&mut app, vec![Module::UserManagement]);

        assert_eq!(app.active_screen, ScreenId::Users);
        assert_eq!(current(&app), "/dashboard/user-management?env=development");
    }

    #[tokio::test]
    async fn no_modules_lands_on_home() {
        let (mut app, _dir) = app("/");
        app.open_current().unwrap();
        log_in(&mut app, Vec::new());
        assert_eq!(app.active_screen, ScreenId::Home);
        assert!(app.visible_tabs().is_empty());
    }

    #[tokio::test]
    async fn switching_screens_is_undoable() {
        let (mut app, _dir) = app("/");
        app.open_current().unwrap();
        log_in(&mut app, vec![Module::Scheduler, Module::UserManagement]);
        assert_eq!(app.active_screen, ScreenId::Scheduler);

        app.process_action(&Action::SwitchScreen(ScreenId::Users))
            .unwrap();
        assert_eq!(app.active_screen, ScreenId::Users);

        app.process_action(&Action::HistoryBack).unwrap();
        assert_eq!(app.active_screen, ScreenId::Scheduler);
        assert_eq!(app.history.current().path, "/dashboard/scheduler");

        app.process_action(&Action::HistoryForward).unwrap();
        assert_eq!(app.active_screen, ScreenId::Users);
    }

    #[tokio::test]
    async fn environment_cycle_is_written_to_the_address() {
        let (mut app, _dir) = app("/dashboard/scheduler");
        app.open_current().unwrap();
        log_in(&mut app, vec![Module::Scheduler]);
        let entries = app.history.entry_count();

        app.process_action(&Action::CycleEnvironment).unwrap();
        assert_eq!(app.current_environment(), Environment::Staging);
        assert_eq!(app.history.current().get("env"), Some("staging"));
        // replace, not push
        assert_eq!(app.history.entry_count(), entries);
    }

    #[tokio::test]
    async fn logging_out_returns_to_login() {
        let (mut app, _dir) = app("/");
        app.open_current().unwrap();
        log_in(&mut app, vec![Module::Scheduler]);

        app.process_action(&Action::SessionChanged(None)).unwrap();
        assert_eq!(app.active_screen, ScreenId::Login);
        assert_eq!(app.history.current().path, "/");
        assert!(app.visible_tabs().is_empty());
    }

    #[tokio::test]
    async fn captured_keys_skip_global_bindings() {
        let (mut app, _dir) = app("/");
        app.open_current().unwrap();

        // 'q' on the login form is a character, not quit
        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE))
            .unwrap();
        assert!(action.is_none());

        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(matches!(action, Some(Action::Quit)));
    }
}

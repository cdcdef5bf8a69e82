//! Login screen: email and password form, shown while logged out.
//!
//! The form is checked locally first; only a well-formed submission reaches
//! the API. A successful login lands through the session watch as
//! `SessionChanged`, so this screen only ever reports failures.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use secrecy::SecretString;
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use tui_input::Input;

use opsdeck_core::{CoreError, Dashboard, credentials};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{centered, input};

const SUBMIT_LABEL: &str = "Sign in";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginState {
    Editing,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginField {
    Email,
    Password,
    Submit,
}

impl LoginField {
    const ALL: [LoginField; 3] = [Self::Email, Self::Password, Self::Submit];

    fn step(self, forward: bool) -> Self {
        let pos = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        let len = Self::ALL.len();
        let next = if forward { pos + 1 } else { pos + len - 1 };
        Self::ALL[next % len]
    }
}

pub struct LoginScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    dashboard: Dashboard,
    state: LoginState,
    field: LoginField,
    email: Input,
    password: Input,
    email_error: Option<String>,
    password_error: Option<String>,
    /// Failure not tied to a field (wrong credentials, network).
    form_error: Option<String>,
    throbber_state: ThrobberState,
}

impl LoginScreen {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            focused: false,
            action_tx: None,
            dashboard,
            state: LoginState::Editing,
            field: LoginField::Email,
            email: Input::default(),
            password: Input::default(),
            email_error: None,
            password_error: None,
            form_error: None,
            throbber_state: ThrobberState::default(),
        }
    }

    fn reset(&mut self) {
        self.state = LoginState::Editing;
        self.field = LoginField::Email;
        self.password = Input::default();
        self.clear_errors();
    }

    fn clear_errors(&mut self) {
        self.email_error = None;
        self.password_error = None;
        self.form_error = None;
    }

    fn show_error(&mut self, field: Option<&str>, message: String) {
        match field {
            Some("email") => {
                self.email_error = Some(message);
                self.field = LoginField::Email;
            }
            Some("password") => {
                self.password_error = Some(message);
                self.field = LoginField::Password;
            }
            _ => self.form_error = Some(message),
        }
    }

    fn submit(&mut self) {
        self.clear_errors();
        let email = self.email.value().to_owned();
        let password = SecretString::from(self.password.value().to_owned());

        if let Err(CoreError::ValidationFailed { field, message }) =
            credentials::validate(&email, &password)
        {
            self.show_error(Some(field), message);
            return;
        }

        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        self.state = LoginState::Submitting;
        let dashboard = self.dashboard.clone();

        tokio::spawn(async move {
            if let Err(e) = dashboard.login(&email, &password).await {
                debug!(error = %e, "login rejected");
                let (field, message) = match e {
                    CoreError::ValidationFailed { field, message } => (Some(field), message),
                    CoreError::AuthFailure { .. } => {
                        (None, "Invalid email or password".to_owned())
                    }
                    other => (None, other.to_string()),
                };
                let _ = tx.send(Action::LoginFailed { field, message });
            }
        });
    }

    fn active_input(&mut self) -> Option<&mut Input> {
        match self.field {
            LoginField::Email => Some(&mut self.email),
            LoginField::Password => Some(&mut self.password),
            LoginField::Submit => None,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        field: LoginField,
        error: Option<&str>,
    ) {
        let active = self.field == field && self.state == LoginState::Editing;
        let (label, value, masked, placeholder) = match field {
            LoginField::Email => ("Email", &self.email, false, "you@example.com"),
            _ => ("Password", &self.password, true, ""),
        };

        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

        let label_style = if active {
            Style::default().fg(theme::NEON_CYAN)
        } else {
            Style::default().fg(theme::DIM_WHITE)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!("  {label}"), label_style)),
            layout[0],
        );

        let border_color = if error.is_some() {
            theme::ERROR_RED
        } else if active {
            theme::ELECTRIC_PURPLE
        } else {
            theme::BORDER_GRAY
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(layout[1]);
        frame.render_widget(block, layout[1]);
        input::render_input(frame, inner, value, active, masked, placeholder);

        if let Some(error) = error {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {error}"), theme::error_text())),
                layout[2],
            );
        }
    }

    fn render_submit(&self, frame: &mut Frame, area: Rect) {
        if self.state == LoginState::Submitting {
            let throbber = Throbber::default()
                .label(" Signing in…")
                .style(Style::default().fg(theme::NEON_CYAN));
            frame.render_stateful_widget(throbber, area, &mut self.throbber_state.clone());
            return;
        }

        let active = self.field == LoginField::Submit;
        let style = if active {
            Style::default()
                .fg(theme::BG_DARK)
                .bg(theme::ELECTRIC_PURPLE)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::ELECTRIC_PURPLE)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!("  {SUBMIT_LABEL}  "), style))
                .alignment(Alignment::Center),
            area,
        );
    }
}

impl Component for LoginScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.state == LoginState::Submitting {
            return Ok(None);
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.field = self.field.step(true),
            KeyCode::BackTab | KeyCode::Up => self.field = self.field.step(false),
            KeyCode::Enter => match self.field {
                LoginField::Email => self.field = LoginField::Password,
                LoginField::Password | LoginField::Submit => self.submit(),
            },
            _ => {
                let field = self.field;
                if let Some(active) = self.active_input() {
                    if input::edit(active, &key) {
                        match field {
                            LoginField::Email => self.email_error = None,
                            _ => self.password_error = None,
                        }
                    }
                }
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LoginFailed { field, message } => {
                self.state = LoginState::Editing;
                self.show_error(*field, message.clone());
            }
            Action::SessionChanged(Some(_)) => self.reset(),
            Action::Tick if self.state == LoginState::Submitting => {
                self.throbber_state.calc_next();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let panel = centered(area, 52, 19);
        frame.render_widget(Clear, panel);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            panel,
        );

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    "opsdeck",
                    Style::default()
                        .fg(theme::NEON_CYAN)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let layout = Layout::vertical([
            Constraint::Length(1), // spacer
            Constraint::Length(5), // email
            Constraint::Length(5), // password
            Constraint::Length(1), // form error
            Constraint::Length(1), // spacer
            Constraint::Length(1), // submit
            Constraint::Min(0),
            Constraint::Length(1), // hints
        ])
        .horizontal_margin(1)
        .split(inner);

        self.render_field(frame, layout[1], LoginField::Email, self.email_error.as_deref());
        self.render_field(
            frame,
            layout[2],
            LoginField::Password,
            self.password_error.as_deref(),
        );
        if let Some(error) = &self.form_error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.as_str(), theme::error_text()))
                    .alignment(Alignment::Center),
                layout[3],
            );
        }
        self.render_submit(frame, layout[5]);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("tab ", theme::key_hint_key()),
                Span::styled("next field  ", theme::key_hint()),
                Span::styled("enter ", theme::key_hint_key()),
                Span::styled("submit  ", theme::key_hint()),
                Span::styled("ctrl-c ", theme::key_hint_key()),
                Span::styled("quit", theme::key_hint()),
            ]))
            .alignment(Alignment::Center),
            layout[7],
        );
    }

    fn captures_input(&self) -> bool {
        true
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Login"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use crossterm::event::KeyModifiers;
    use opsdeck_core::DashboardConfig;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn screen() -> (LoginScreen, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = Dashboard::new(DashboardConfig {
            api_url: "http://127.0.0.1:9/".parse().unwrap(),
            timeout: Duration::from_secs(1),
            session_path: dir.path().join("session.json"),
        })
        .unwrap();
        (LoginScreen::new(dashboard), dir)
    }

    fn press(screen: &mut LoginScreen, code: KeyCode) {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    fn type_text(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    #[test]
    fn tab_cycles_through_fields() {
        let (mut screen, _dir) = screen();
        assert_eq!(screen.field, LoginField::Email);
        press(&mut screen, KeyCode::Tab);
        press(&mut screen, KeyCode::Tab);
        assert_eq!(screen.field, LoginField::Submit);
        press(&mut screen, KeyCode::Tab);
        assert_eq!(screen.field, LoginField::Email);
        press(&mut screen, KeyCode::BackTab);
        assert_eq!(screen.field, LoginField::Submit);
    }

    #[test]
    fn malformed_email_is_reported_inline() {
        let (mut screen, _dir) = screen();
        type_text(&mut screen, "not-an-email");
        press(&mut screen, KeyCode::Enter);
        type_text(&mut screen, "secret");
        press(&mut screen, KeyCode::Enter);

        assert_eq!(screen.state, LoginState::Editing);
        assert!(screen.email_error.is_some());
        assert_eq!(screen.field, LoginField::Email);
    }

    #[test]
    fn short_password_is_reported_inline() {
        let (mut screen, _dir) = screen();
        type_text(&mut screen, "olive@opsdeck.dev");
        press(&mut screen, KeyCode::Enter);
        type_text(&mut screen, "x");
        press(&mut screen, KeyCode::Enter);

        assert!(screen.email_error.is_none());
        assert!(screen.password_error.is_some());
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let (mut screen, _dir) = screen();
        press(&mut screen, KeyCode::Enter);
        press(&mut screen, KeyCode::Enter);
        assert!(screen.email_error.is_some());
        type_text(&mut screen, "a");
        assert!(screen.email_error.is_none());
    }

    #[test]
    fn login_failure_returns_to_editing() {
        let (mut screen, _dir) = screen();
        screen.state = LoginState::Submitting;
        screen
            .update(&Action::LoginFailed {
                field: None,
                message: "Invalid email or password".into(),
            })
            .unwrap();
        assert_eq!(screen.state, LoginState::Editing);
        assert_eq!(
            screen.form_error.as_deref(),
            Some("Invalid email or password")
        );
    }
}

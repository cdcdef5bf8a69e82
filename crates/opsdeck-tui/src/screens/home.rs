//! Dashboard index: who is signed in and which modules they can open.

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use opsdeck_core::Session;

use crate::action::Action;
use crate::component::Component;
use crate::screen::{self, ScreenId};
use crate::theme;

#[derive(Default)]
pub struct HomeScreen {
    focused: bool,
    session: Option<Session>,
}

impl HomeScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for HomeScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SessionChanged(session) = action {
            self.session.clone_from(session);
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Dashboard ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![Line::from("")];
        if let Some(session) = &self.session {
            lines.push(Line::from(vec![
                Span::styled("  Welcome, ", theme::key_hint()),
                Span::styled(
                    session.name.clone(),
                    Style::default()
                        .fg(theme::NEON_CYAN)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(""));
        }

        let tabs = screen::visible_tabs(self.session.as_ref());
        if tabs.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No modules are enabled for this account.",
                Style::default().fg(theme::DIM_WHITE),
            )));
        } else {
            for (i, tab) in tabs.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {}  ", i + 1), theme::key_hint_key()),
                    Span::styled(tab.label(), Style::default().fg(theme::DIM_WHITE)),
                    Span::styled(format!("  {}", tab.path()), theme::key_hint()),
                ]));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        ScreenId::Home.label()
    }
}

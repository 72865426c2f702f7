//! The "User List" screen: a heading, one chip input over the catalog, the
//! current selection and a help line.

use chippy_core::{terminal_events, Command, Component, Model, Subscription, TerminalEvent};
use chippy_widgets::catalog::Catalog;
use chippy_widgets::chip_input::{self, ChipInput};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Startup data for [`UserList`].
#[derive(Debug, Clone)]
pub struct Flags {
    pub catalog: Catalog,
    pub placeholder: String,
    /// Whether the program starts with mouse capture on.
    pub mouse: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            catalog: Catalog::builtin(),
            placeholder: "Type to search...".to_string(),
            mouse: true,
        }
    }
}

#[derive(Debug)]
pub enum Msg {
    People(chip_input::Message),
    /// Turn mouse capture on or off.
    ToggleMouse,
    Quit,
}

pub struct UserList {
    people: ChipInput,
    mouse: bool,
}

impl UserList {
    pub fn people(&self) -> &ChipInput {
        &self.people
    }

    pub fn mouse_enabled(&self) -> bool {
        self.mouse
    }

    /// Labels of the chosen people, in selection order.
    pub fn selected(&self) -> Vec<String> {
        self.people.chips().labels().map(str::to_owned).collect()
    }
}

impl Model for UserList {
    type Message = Msg;
    type Flags = Flags;

    fn init(flags: Flags) -> (Self, Command<Msg>) {
        let mut people = ChipInput::new(flags.catalog)
            .with_placeholder(flags.placeholder)
            .with_key("user-list");
        people.mount();
        people.focus();
        let list = UserList {
            people,
            mouse: flags.mouse,
        };
        (list, Command::none())
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::People(msg) => {
                match &msg {
                    chip_input::Message::Selected(id) => {
                        if let Some(chip) = self.people.chips().get(*id) {
                            tracing::info!(chip = %id, label = %chip.label, "person added");
                        }
                    }
                    chip_input::Message::Removed(id) => {
                        tracing::info!(chip = %id, "person removed");
                    }
                    _ => {}
                }
                self.people.update(msg).map(Msg::People)
            }
            Msg::ToggleMouse => {
                self.mouse = !self.mouse;
                tracing::debug!(enabled = self.mouse, "mouse capture toggled");
                if self.mouse {
                    Command::enable_mouse_capture()
                } else {
                    Command::disable_mouse()
                }
            }
            Msg::Quit => {
                tracing::debug!(selected = self.people.chips().len(), "quitting");
                self.people.unmount();
                Command::quit()
            }
        }
    }

    fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let people_height = self.people.desired_height(area.width);

        let [heading_area, people_area, status_area, _, help_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(people_height),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let heading = Paragraph::new(Line::from(Span::styled(
            "User List",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(heading, heading_area);

        let selected = self.selected();
        let status = if selected.is_empty() {
            Line::from(Span::styled(
                "Nobody selected",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(vec![
                Span::raw(format!("{} selected: ", selected.len())),
                Span::styled(
                    selected.join(", "),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        };
        frame.render_widget(Paragraph::new(status), status_area);

        let key = Style::default().fg(Color::DarkGray);
        let help = Paragraph::new(Line::from(vec![
            Span::styled("Type", key),
            Span::raw(" to search  "),
            Span::styled("Click", key),
            Span::raw(" pick / × remove  "),
            Span::styled("Backspace", key),
            Span::raw(" ×2 remove last  "),
            Span::styled("F2", key),
            Span::raw(if self.mouse { " mouse off  " } else { " mouse on  " }),
            Span::styled("Esc", key),
            Span::raw(" quit"),
        ]));
        frame.render_widget(help, help_area);

        // Last, so the dropdown overlays the rows below the field.
        self.people.view(frame, people_area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs = vec![terminal_events(|event| match event {
            TerminalEvent::Paste(text) => Some(Msg::People(chip_input::Message::Paste(text))),
            event => {
                let key = event.key_press()?;
                match (key.code, key.modifiers) {
                    (KeyCode::Esc, _) => Some(Msg::Quit),
                    (KeyCode::F(2), _) => Some(Msg::ToggleMouse),
                    (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Msg::Quit),
                    _ => Some(Msg::People(chip_input::Message::KeyPress(key))),
                }
            }
        })];
        subs.extend(
            self.people
                .subscriptions()
                .into_iter()
                .map(|sub| sub.map(Msg::People)),
        );
        subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chippy_core::testing::TestProgram;
    use chippy_core::{MouseMode, TerminalCommand};
    use crossterm::event::{KeyEvent, KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn press(code: KeyCode) -> Msg {
        Msg::People(chip_input::Message::KeyPress(key(code)))
    }

    #[test]
    fn starts_with_heading_and_placeholder() {
        let prog = TestProgram::<UserList>::new(Flags::default());
        let screen = prog.render_string(60, 12);
        assert!(screen.contains("User List"));
        assert!(screen.contains("Type to search..."));
        assert!(screen.contains("Nobody selected"));
    }

    #[test]
    fn custom_placeholder_is_shown() {
        let flags = Flags {
            placeholder: "Add people".into(),
            ..Flags::default()
        };
        let prog = TestProgram::<UserList>::new(flags);
        assert!(prog.render_string(60, 12).contains("Add people"));
    }

    #[test]
    fn declares_keyboard_and_pointer_listeners() {
        let prog = TestProgram::<UserList>::new(Flags::default());
        let active = prog.active_subscriptions();
        assert_eq!(active.len(), 2);
        assert!(active.contains(&prog.model().people().listener_id()));
    }

    #[test]
    fn quit_releases_pointer_listener() {
        let mut prog = TestProgram::<UserList>::new(Flags::default());
        prog.dispatch(Msg::Quit);
        assert!(prog.quit_requested());
        assert_eq!(prog.active_subscriptions().len(), 1);
    }

    #[test]
    fn f2_toggles_mouse_capture() {
        let mut prog = TestProgram::<UserList>::new(Flags::default());
        assert!(prog.model().mouse_enabled());
        assert!(prog.render_string(80, 12).contains("F2 mouse off"));

        prog.dispatch(Msg::ToggleMouse);
        prog.dispatch(Msg::ToggleMouse);
        assert!(prog.model().mouse_enabled());
        assert_eq!(
            prog.terminal_commands(),
            &[
                TerminalCommand::DisableMouse,
                TerminalCommand::EnableMouseCapture(MouseMode::CellMotion),
            ]
        );
    }

    #[test]
    fn starts_without_mouse_when_asked() {
        let flags = Flags {
            mouse: false,
            ..Flags::default()
        };
        let mut prog = TestProgram::<UserList>::new(flags);
        assert!(prog.render_string(80, 12).contains("F2 mouse on"));
        prog.dispatch(Msg::ToggleMouse);
        assert!(prog.model().mouse_enabled());
    }

    #[test]
    fn status_lists_selection() {
        let mut prog = TestProgram::<UserList>::new(Flags::default());
        for c in "mil".chars() {
            prog.dispatch(press(KeyCode::Char(c)));
        }
        // Heading 2 rows, field 3 rows, dropdown starts on row 5.
        prog.render(60, 12);
        prog.dispatch(Msg::People(chip_input::Message::Pointer { column: 3, row: 5 }));

        assert_eq!(prog.model().selected(), vec!["Miles"]);
        assert!(prog.render_string(60, 12).contains("1 selected: Miles"));
    }
}

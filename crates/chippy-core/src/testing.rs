use crate::command::{Action, Command, CommandInner, TerminalCommand};
use crate::model::Model;
use crate::subscription::{diff_ids, SubscriptionId};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// A change in the set of live subscriptions, as recorded by [`TestProgram`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionChange {
    /// The model started declaring this subscription.
    Started(SubscriptionId),
    /// The model stopped declaring it, or the program shut down.
    Stopped(SubscriptionId),
}

/// A headless test harness that drives a [`Model`] without a real terminal.
///
/// `TestProgram` runs the init/update/view cycle in a plain `#[test]`:
/// synchronous commands ([`Command::message`]) are queued and flushed with
/// [`drain_messages`](TestProgram::drain_messages), async commands are
/// ignored, terminal commands are recorded, and subscriptions are reconciled by id exactly like
/// the real runtime does but never spawned. The reconciliation history is
/// available through [`subscription_log`](TestProgram::subscription_log), so
/// tests can check that a listener is acquired and released exactly once.
///
/// # Example
///
/// ```rust,ignore
/// use chippy_core::testing::TestProgram;
///
/// let mut prog = TestProgram::<UserList>::new(flags);
/// prog.send(Msg::People(chip_input::Message::SetValue("terr".into())));
/// prog.drain_messages();
/// assert!(prog.render_string(60, 12).contains("Terrill"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    active: Vec<SubscriptionId>,
    log: Vec<SubscriptionChange>,
    terminal: Vec<TerminalCommand>,
    quit_requested: bool,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    ///
    /// Synchronous commands returned by `init` are queued; the initial
    /// subscriptions are reconciled immediately.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            active: Vec::new(),
            log: Vec::new(),
            terminal: Vec::new(),
            quit_requested: false,
        };
        program.collect_sync_messages(init_cmd);
        program.reconcile();
        program
    }

    /// Send a message, triggering a single update cycle.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect_sync_messages(cmd);
        self.reconcile();
    }

    /// Process pending synchronous messages until none are left.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                self.send(msg);
            }
        }
    }

    /// Send a message and process everything it chains into.
    pub fn dispatch(&mut self, msg: M::Message) {
        self.send(msg);
        self.drain_messages();
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    ///
    /// Bypasses update, so subscriptions are not reconciled until the next
    /// message.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Whether any update so far returned [`Command::quit`].
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Ids of the subscriptions the model currently declares.
    pub fn active_subscriptions(&self) -> &[SubscriptionId] {
        &self.active
    }

    /// Every start and stop since the program was created, in order.
    pub fn subscription_log(&self) -> &[SubscriptionChange] {
        &self.log
    }

    /// Terminal commands the model issued, in order.
    pub fn terminal_commands(&self) -> &[TerminalCommand] {
        &self.terminal
    }

    /// Stop every live subscription, as the runtime does on exit.
    pub fn shutdown(&mut self) {
        for id in self.active.drain(..) {
            self.log.push(SubscriptionChange::Stopped(id));
        }
    }

    /// Render the model to a ratatui [`Buffer`] of the given dimensions.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("test backend never fails");
        terminal
            .draw(|frame| {
                self.model.view(frame);
            })
            .expect("test backend never fails");
        terminal.backend().buffer().clone()
    }

    /// Render the model and return the visible content as a plain string,
    /// one line per row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn reconcile(&mut self) {
        let next: Vec<SubscriptionId> = self
            .model
            .subscriptions()
            .iter()
            .map(|sub| sub.id().clone())
            .collect();
        let (started, stopped) = diff_ids(&self.active, &next);
        for id in stopped {
            self.active.retain(|active| active != &id);
            self.log.push(SubscriptionChange::Stopped(id));
        }
        for id in started {
            self.active.push(id.clone());
            self.log.push(SubscriptionChange::Started(id));
        }
    }

    fn collect_sync_messages(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                self.pending_messages.push(msg);
            }
            CommandInner::Action(Action::Quit) => {
                self.quit_requested = true;
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect_sync_messages(cmd);
                }
            }
            // Async commands can't be executed synchronously in tests
            CommandInner::Future(_) => {}
            CommandInner::Terminal(tcmd) => self.terminal.push(tcmd),
        }
    }
}

/// Flatten a buffer into rows of symbols separated by newlines.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area: Rect = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}

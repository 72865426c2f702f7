use crate::command::{Action, Command, CommandInner, MouseMode, TerminalCommand};
use crate::model::Model;
use crate::subscription::SubscriptionManager;
use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stderr, stdout, Stderr, Stdout, Write};
use std::sync::Once;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Longest time spent draining queued messages before the next frame.
const BURST_WINDOW: Duration = Duration::from_micros(100);
const BURST_LIMIT: usize = 100;

/// Where the UI is drawn. Use [`Stderr`](OutputTarget::Stderr) when stdout
/// carries the program's result, as `user-list` does with the picked names.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
}

enum Output {
    Stdout(Stdout),
    Stderr(Stderr),
}

impl Output {
    fn new(target: OutputTarget) -> Self {
        match target {
            OutputTarget::Stdout => Output::Stdout(stdout()),
            OutputTarget::Stderr => Output::Stderr(stderr()),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(w) => w.write(buf),
            Output::Stderr(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(w) => w.flush(),
            Output::Stderr(w) => w.flush(),
        }
    }
}

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration options for a [`Program`].
///
/// Override only what you need with struct update syntax:
///
/// ```rust,ignore
/// use chippy_core::{MouseMode, ProgramOptions};
///
/// let opts = ProgramOptions {
///     fps: 30,
///     mouse_mode: Some(MouseMode::CellMotion),
///     title: Some("User List".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Target frames per second (default: 60, clamped to 1..=120).
    pub fps: u32,
    /// Draw on the alternate screen (default: true).
    pub alt_screen: bool,
    /// Mouse capture. Clicks only reach pointer subscriptions when set.
    pub mouse_mode: Option<MouseMode>,
    /// Deliver pastes as one event (default: true).
    pub bracketed_paste: bool,
    pub title: Option<String>,
    /// Restore the terminal from a panic hook (default: true).
    pub catch_panics: bool,
    /// End the program on SIGINT (default: true). In raw mode Ctrl+C
    /// arrives as a key event instead, which the model handles itself.
    pub handle_signals: bool,
    pub output: OutputTarget,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse_mode: None,
            bracketed_paste: true,
            title: None,
            catch_panics: true,
            handle_signals: true,
            output: OutputTarget::default(),
        }
    }
}

impl ProgramOptions {
    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.clamp(1, 120)))
    }
}

/// The terminal while a program owns it: raw mode, screen, paste and mouse
/// modes, title and a hidden cursor, all undone by [`close`](Self::close).
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Output>>,
    alt_screen: bool,
    output: OutputTarget,
}

impl TerminalSession {
    fn open(options: &ProgramOptions) -> Result<Self, ProgramError> {
        if options.catch_panics {
            install_panic_hook(options.alt_screen, options.output);
        }

        enable_raw_mode()?;
        let mut writer = Output::new(options.output);
        if options.alt_screen {
            execute!(writer, EnterAlternateScreen)?;
        }
        if options.bracketed_paste {
            execute!(writer, EnableBracketedPaste)?;
        }
        if let Some(mode) = options.mouse_mode {
            tracing::debug!(?mode, "mouse capture enabled");
            execute!(writer, EnableMouseCapture)?;
        }
        if let Some(title) = &options.title {
            execute!(writer, SetTitle(title))?;
        }
        execute!(writer, cursor::Hide)?;

        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(writer))?,
            alt_screen: options.alt_screen,
            output: options.output,
        })
    }

    fn apply(&mut self, cmd: &TerminalCommand) -> io::Result<()> {
        let writer = self.terminal.backend_mut();
        match cmd {
            TerminalCommand::EnableMouseCapture(_) => execute!(writer, EnableMouseCapture),
            TerminalCommand::DisableMouse => execute!(writer, DisableMouseCapture),
        }
    }

    fn close(&self) -> io::Result<()> {
        restore_terminal(self.alt_screen, self.output)
    }
}

/// Installed once per process; later programs reuse it.
fn install_panic_hook(alt_screen: bool, output: OutputTarget) {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_terminal(alt_screen, output);
            previous(info);
        }));
    });
}

/// Undo every terminal mode a session may have set. Keeps going when a step
/// fails; returns the raw-mode result.
fn restore_terminal(alt_screen: bool, output: OutputTarget) -> io::Result<()> {
    let raw = disable_raw_mode();
    let mut writer = Output::new(output);
    execute!(writer, DisableBracketedPaste).ok();
    execute!(writer, DisableMouseCapture).ok();
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw
}

/// Owns the terminal, the message queue and the subscriptions of a
/// [`Model`], and drives its update/view cycle.
///
/// Messages are handled one at a time: each `update` runs to completion
/// before the next message is taken from the queue, and subscriptions are
/// reconciled after every update.
///
/// # Example
///
/// ```rust,ignore
/// use chippy_core::{Program, ProgramError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let list = Program::<UserList>::new(flags)?.run().await?;
///     println!("{:?}", list.selected());
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    session: TerminalSession,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    subscriptions: SubscriptionManager<M::Message>,
    options: ProgramOptions,
    dirty: bool,
    quit: bool,
}

impl<M: Model> Program<M> {
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Take over the terminal and initialize the model.
    ///
    /// Must be called from inside a tokio runtime: the model's initial
    /// subscriptions are started here.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (model, init_cmd) = M::init(flags);
        let session = TerminalSession::open(&options)?;

        let mut program = Self {
            model,
            session,
            subscriptions: SubscriptionManager::new(msg_tx.clone()),
            msg_tx,
            msg_rx,
            options,
            dirty: true,
            quit: false,
        };
        tracing::debug!(fps = program.options.fps, "program initialized");

        program.execute(init_cmd);
        program.subscriptions.reconcile(program.model.subscriptions());
        Ok(program)
    }

    /// Run until the model quits and return it.
    ///
    /// Subscriptions are aborted and the terminal restored on every exit
    /// path, including errors from the loop itself.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let result = self.event_loop().await;

        tracing::debug!("shutting down");
        self.subscriptions.shutdown();
        let restored = self.session.close();

        result?;
        restored?;
        Ok(self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.draw()?;

        let mut frames = tokio::time::interval(self.options.frame_interval());
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let handle_signals = self.options.handle_signals;

        while !self.quit {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    tracing::debug!("received SIGINT");
                    break;
                }

                Some(msg) = self.msg_rx.recv() => {
                    self.process(msg);
                    self.drain_burst();
                }

                _ = frames.tick() => {
                    if self.dirty {
                        self.draw()?;
                        self.dirty = false;
                    }
                }
            }
        }
        Ok(())
    }

    /// Handle messages that are already queued, e.g. the `Changed` a key
    /// press emits, so they land in the same frame.
    fn drain_burst(&mut self) {
        let deadline = Instant::now() + BURST_WINDOW;
        for _ in 0..BURST_LIMIT {
            if self.quit || Instant::now() >= deadline {
                break;
            }
            match self.msg_rx.try_recv() {
                Ok(msg) => self.process(msg),
                Err(_) => break,
            }
        }
    }

    fn process(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute(cmd);
        self.subscriptions.reconcile(self.model.subscriptions());
        self.dirty = true;
    }

    fn execute(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Future(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(fut.await);
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute(cmd);
                }
            }
            CommandInner::Terminal(tcmd) => {
                if let Err(err) = self.session.apply(&tcmd) {
                    tracing::warn!(command = ?tcmd, error = %err, "terminal command failed");
                }
            }
        }
    }

    fn draw(&mut self) -> Result<(), ProgramError> {
        let model = &self.model;
        self.session.terminal.draw(|frame| model.view(frame))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = ProgramOptions::default();
        assert_eq!(opts.fps, 60);
        assert!(opts.alt_screen);
        assert!(opts.mouse_mode.is_none());
        assert!(opts.bracketed_paste);
        assert_eq!(opts.output, OutputTarget::Stdout);
    }

    #[test]
    fn frame_interval_clamps_fps() {
        let at = |fps| ProgramOptions { fps, ..ProgramOptions::default() }.frame_interval();
        assert_eq!(at(0), Duration::from_secs(1));
        assert_eq!(at(1000), at(120));
        assert!(at(60) < at(30));
    }

    #[test]
    fn program_error_mentions_terminal() {
        let err = ProgramError::from(io::Error::new(io::ErrorKind::Other, "no tty"));
        assert_eq!(err.to_string(), "terminal I/O error: no tty");
    }
}

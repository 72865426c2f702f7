use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level application trait, following the [Elm Architecture].
///
/// A chippy application owns its whole state in one `Model`. The runtime
/// drives the cycle:
///
/// 1. [`init`](Model::init) builds the initial state from the startup
///    [`Flags`](Model::Flags) and may return a [`Command`].
/// 2. [`view`](Model::view) draws the state into a [`ratatui::Frame`].
/// 3. Terminal input reaches the model as messages through the
///    [`Subscription`]s it declares.
/// 4. [`update`](Model::update) handles one message at a time and may return
///    a further [`Command`].
///
/// Messages are processed strictly one after another, so `update` never has
/// to guard its state against concurrent access.
///
/// # Example
///
/// ```rust,ignore
/// use chippy_core::{Command, Model};
/// use ratatui::widgets::Paragraph;
/// use ratatui::Frame;
///
/// struct Picked {
///     names: Vec<String>,
/// }
///
/// enum Msg {
///     Pick(String),
///     Clear,
/// }
///
/// impl Model for Picked {
///     type Message = Msg;
///     type Flags = ();
///
///     fn init(_: ()) -> (Self, Command<Msg>) {
///         (Picked { names: Vec::new() }, Command::none())
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Pick(name) => self.names.push(name),
///             Msg::Clear => self.names.clear(),
///         }
///         Command::none()
///     }
///
///     fn view(&self, frame: &mut Frame) {
///         frame.render_widget(Paragraph::new(self.names.join(", ")), frame.area());
///     }
/// }
/// ```
///
/// [Elm Architecture]: https://guide.elm-lang.org/architecture/
pub trait Model: Sized + Send + 'static {
    /// Every event that can change the application state.
    type Message: Send + 'static;

    /// Startup data handed to [`Model::init`], e.g. a loaded catalog.
    type Flags: Send + 'static;

    /// Create the initial state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Handle one message, mutate state, and return any follow-up side effect.
    ///
    /// After `update` returns the runtime re-renders and reconciles
    /// [`subscriptions`](Model::subscriptions).
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the current state. Called after every update.
    fn view(&self, frame: &mut Frame);

    /// Subscriptions that should be live for the current state.
    ///
    /// The runtime diffs the returned list against the previously active set
    /// by [`SubscriptionId`](crate::SubscriptionId): new ids are started,
    /// missing ids are aborted, unchanged ids keep running.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}

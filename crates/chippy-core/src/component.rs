use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`].
///
/// `Component` mirrors [`Model`](crate::Model) except that
/// [`view`](Component::view) receives the area to draw into, so a parent can
/// place children inside its own layout.
///
/// # Composition pattern
///
/// The parent wraps the child's message type in one of its own variants and
/// lifts commands and subscriptions with `map`:
///
/// ```rust,ignore
/// use chippy_core::{Command, Component, Model, Subscription};
/// use chippy_widgets::chip_input::{self, ChipInput};
///
/// struct App {
///     people: ChipInput,
/// }
///
/// enum Msg {
///     People(chip_input::Message),
/// }
///
/// impl Model for App {
///     // ...
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::People(m) => self.people.update(m).map(Msg::People),
///         }
///     }
///
///     fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///         self.people
///             .subscriptions()
///             .into_iter()
///             .map(|sub| sub.map(Msg::People))
///             .collect()
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message and return a [`Command`] in the component's own
    /// message type. The parent lifts it with [`Command::map`].
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations must stay inside it.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Subscriptions owned by this component.
    ///
    /// The parent collects these into its own
    /// [`Model::subscriptions`](crate::Model::subscriptions), mapping
    /// messages. A component that holds a listener only while it is mounted
    /// returns it from here only while mounted; the runtime then starts and
    /// stops it exactly once per transition.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently has keyboard focus.
    fn focused(&self) -> bool {
        false
    }
}

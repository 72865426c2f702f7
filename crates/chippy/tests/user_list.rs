//! Drives the `user-list` screen end to end through the headless harness.

use chippy::app::{Flags, Msg, UserList};
use chippy::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use chippy::testing::{SubscriptionChange, TestProgram};
use chippy::widgets::chip_input::Message;
use chippy::widgets::Catalog;

fn press(code: KeyCode) -> Msg {
    Msg::People(Message::KeyPress(KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }))
}

fn type_text(prog: &mut TestProgram<UserList>, text: &str) {
    for c in text.chars() {
        prog.dispatch(press(KeyCode::Char(c)));
    }
}

fn click(prog: &mut TestProgram<UserList>, column: u16, row: u16) {
    prog.dispatch(Msg::People(Message::Pointer { column, row }));
}

const WIDTH: u16 = 60;
const HEIGHT: u16 = 20;

#[test]
fn pick_two_then_backspace_twice() {
    let mut prog = TestProgram::<UserList>::new(Flags::default());

    type_text(&mut prog, "Terr");
    let screen = prog.render_string(WIDTH, HEIGHT);
    assert!(screen.contains("Terry Doe"));
    assert!(screen.contains("Terrill"));

    // Heading takes rows 0-1 and the empty field rows 2-4; first row at 5.
    click(&mut prog, 4, 5);
    assert_eq!(prog.model().selected(), vec!["Terry Doe"]);

    type_text(&mut prog, "Terr");
    let screen = prog.render_string(WIDTH, HEIGHT);
    assert!(screen.contains("Terrill  terrill@abc.com"));
    assert!(!screen.contains("terry@abc.com"));

    // One chip row now: the field spans rows 2-5, dropdown starts at 6.
    click(&mut prog, 4, 6);
    assert_eq!(prog.model().selected(), vec!["Terry Doe", "Terrill"]);

    prog.dispatch(press(KeyCode::Backspace));
    assert_eq!(prog.model().selected().len(), 2);
    assert!(prog.model().people().highlighted().is_some());

    prog.dispatch(press(KeyCode::Backspace));
    assert_eq!(prog.model().selected(), vec!["Terry Doe"]);
    assert!(prog.model().people().highlighted().is_none());
}

#[test]
fn click_outside_dismisses_dropdown() {
    let mut prog = TestProgram::<UserList>::new(Flags::default());
    type_text(&mut prog, "o");
    prog.render(WIDTH, HEIGHT);
    assert!(prog.model().people().is_dropdown_visible());

    // The help line on the last row is outside the field.
    click(&mut prog, 1, HEIGHT - 1);
    assert!(!prog.model().people().is_dropdown_visible());
    assert_eq!(prog.model().people().value(), "");
    assert!(!prog.render_string(WIDTH, HEIGHT).contains("oleta@abc.com"));
}

#[test]
fn custom_catalog_drives_the_dropdown() {
    let catalog = Catalog::from_toml_str(
        r#"
        [[entry]]
        name = "Ada Lovelace"
        email = "ada@example.com"

        [[entry]]
        name = "Alan Turing"
        email = "alan@example.com"
        "#,
    )
    .unwrap();
    let flags = Flags {
        catalog,
        ..Flags::default()
    };
    let mut prog = TestProgram::<UserList>::new(flags);

    type_text(&mut prog, "a");
    let screen = prog.render_string(WIDTH, HEIGHT);
    assert!(screen.contains("Ada Lovelace"));
    assert!(screen.contains("alan@example.com"));
    assert!(!screen.contains("Terry Doe"));
}

#[test]
fn pointer_listener_is_released_on_quit_and_shutdown() {
    let mut prog = TestProgram::<UserList>::new(Flags::default());
    let listener = prog.model().people().listener_id();

    prog.dispatch(Msg::Quit);
    assert!(prog.quit_requested());
    prog.shutdown();

    let listener_events: Vec<_> = prog
        .subscription_log()
        .iter()
        .filter(|change| match change {
            SubscriptionChange::Started(id) | SubscriptionChange::Stopped(id) => id == &listener,
        })
        .cloned()
        .collect();
    assert_eq!(
        listener_events,
        vec![
            SubscriptionChange::Started(listener.clone()),
            SubscriptionChange::Stopped(listener),
        ]
    );
    assert!(prog.active_subscriptions().is_empty());
}

#[test]
fn click_wins_over_notifications_still_queued() {
    let mut prog = TestProgram::<UserList>::new(Flags::default());
    for c in "mil".chars() {
        prog.send(press(KeyCode::Char(c)));
    }
    prog.render(WIDTH, HEIGHT);

    // Heading 2 rows, empty field 3 rows, dropdown starts on row 5.
    click(&mut prog, 3, 5);
    assert_eq!(prog.model().selected(), vec!["Miles"]);
    assert_eq!(prog.model().people().value(), "");
    assert!(!prog.model().people().is_dropdown_visible());
}

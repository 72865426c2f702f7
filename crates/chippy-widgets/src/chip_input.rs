//! Chip input: a search field that turns picked catalog entries into
//! removable chips.
//!
//! The user types into the field and a dropdown below it lists every catalog
//! entry whose name contains the text (case-insensitive) and that is not
//! already a chip. Clicking a row turns it into a chip; clicking a chip's `×`
//! removes it. With an empty field, Backspace first highlights the last chip
//! and a second Backspace removes it.
//!
//! Clicks are delivered by a pointer listener the component declares from
//! [`subscriptions`](Component::subscriptions) while it is mounted. Every
//! click is hit-tested against the regions recorded during the last render;
//! a click anywhere except the text field also counts as a click outside,
//! which clears the text and closes the dropdown.
//!
//! # Example
//!
//! ```ignore
//! use chippy_widgets::catalog::Catalog;
//! use chippy_widgets::chip_input::ChipInput;
//!
//! let mut people = ChipInput::new(Catalog::builtin()).with_title(" People ");
//! people.mount();
//! people.focus();
//!
//! // parent update: self.people.update(msg).map(Msg::People)
//! // parent view:   self.people.view(frame, area)
//! // parent subscriptions: self.people.subscriptions() mapped into Msg
//! ```

use std::cell::RefCell;
use std::ops::Range;

use chippy_core::command::Command;
use chippy_core::component::Component;
use chippy_core::subscription::{Subscription, SubscriptionId};
use chippy_core::subscriptions::pointer_events;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::catalog::{initial_of, Catalog, CatalogEntry};
use crate::chips::{Chip, ChipId, ChipSet};
use crate::filter::filter;
use crate::text_edit::TextEditState;

const REMOVE_GLYPH: &str = "×";

/// Messages for the chip input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A keyboard event to process.
    KeyPress(KeyEvent),
    /// Paste text at the cursor.
    Paste(String),
    /// The field's text changed. Emitted after every edit; the input itself
    /// ignores it.
    Changed(String),
    /// Replace the search text from outside and re-run the filter.
    SetValue(String),
    /// A left-button press at terminal coordinates.
    Pointer { column: u16, row: u16 },
    /// Emitted when a chip was added.
    Selected(ChipId),
    /// Emitted when a chip was removed.
    Removed(ChipId),
}

/// Style configuration for the chip input.
#[derive(Debug, Clone)]
pub struct ChipInputStyle {
    /// Border when the field has focus.
    pub border_focused: Style,
    /// Border without focus.
    pub border: Style,
    /// Chip body.
    pub chip: Style,
    /// The chip marked for deletion by Backspace.
    pub chip_highlighted: Style,
    /// The `×` remove glyph.
    pub chip_remove: Style,
    /// The `(X)` avatar badge on chips and dropdown rows.
    pub badge: Style,
    /// Text typed into the field.
    pub text: Style,
    /// Placeholder shown while the field is empty.
    pub placeholder: Style,
    /// Cursor cell.
    pub cursor: Style,
    /// Name column of a dropdown row.
    pub item_name: Style,
    /// Email column of a dropdown row.
    pub item_email: Style,
    /// Dropdown background.
    pub dropdown: Style,
}

impl Default for ChipInputStyle {
    fn default() -> Self {
        Self {
            border_focused: Style::default().fg(Color::Cyan),
            border: Style::default().fg(Color::DarkGray),
            chip: Style::default().fg(Color::Black).bg(Color::Gray),
            chip_highlighted: Style::default()
                .fg(Color::Gray)
                .bg(Color::Black)
                .add_modifier(Modifier::REVERSED | Modifier::BOLD),
            chip_remove: Style::default().fg(Color::Red).bg(Color::Gray),
            badge: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            text: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            item_name: Style::default().add_modifier(Modifier::BOLD),
            item_email: Style::default().fg(Color::DarkGray),
            dropdown: Style::default(),
        }
    }
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Input,
    Chip(ChipId),
    Remove(ChipId),
    Item(usize),
}

/// Clickable regions recorded by the last render. Later regions sit on top.
#[derive(Debug, Default)]
struct HitMap {
    regions: Vec<(Rect, Target)>,
}

impl HitMap {
    fn push(&mut self, area: Rect, target: Target) {
        if !area.is_empty() {
            self.regions.push((area, target));
        }
    }

    fn hit(&self, column: u16, row: u16) -> Option<Target> {
        let point = Position::new(column, row);
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(point))
            .map(|(_, target)| *target)
    }
}

/// Marker type for the click-outside listener's identity.
struct OutsideClick;

/// One chip's position in the wrapped chip rows.
struct ChipSlot {
    id: ChipId,
    row: u16,
    x: u16,
    label: String,
    initial: char,
    highlighted: bool,
}

impl ChipSlot {
    /// `(X) label ×`
    fn width(&self) -> u16 {
        chip_width(&self.label)
    }
}

fn chip_width(label: &str) -> u16 {
    (4 + label.width() + 1 + REMOVE_GLYPH.width()) as u16
}

/// Cut `s` to at most `max` columns, marking the cut with `…`.
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    if max > 0 {
        out.push('…');
    }
    out
}

/// The slice of `chars` to draw in `width` columns so the cursor cell stays
/// on screen. Widths are display cells, not chars.
fn visible_window(chars: &[char], cursor: usize, width: usize) -> Range<usize> {
    let cell = |c: &char| c.width().unwrap_or(0);
    let cursor_width = chars.get(cursor).map(cell).unwrap_or(1).max(1);

    let mut offset = 0;
    let mut used = chars[..cursor].iter().map(cell).sum::<usize>() + cursor_width;
    while used > width && offset < cursor {
        used -= cell(&chars[offset]);
        offset += 1;
    }

    let mut end = offset;
    let mut used = 0;
    while let Some(c) = chars.get(end) {
        let w = cell(c);
        if used + w > width {
            break;
        }
        used += w;
        end += 1;
    }
    offset..end
}

/// A multi-select field that turns catalog entries into removable chips.
pub struct ChipInput {
    catalog: Catalog,
    chips: ChipSet,
    text: TextEditState,
    results: Vec<CatalogEntry>,
    open: bool,
    highlighted: Option<ChipId>,
    focus: bool,
    mounted: bool,
    listener_key: String,
    placeholder: String,
    title: String,
    max_visible: Option<usize>,
    style: ChipInputStyle,
    hits: RefCell<HitMap>,
}

impl ChipInput {
    /// Create an unmounted, unfocused chip input over `catalog`.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            chips: ChipSet::new(),
            text: TextEditState::new(),
            results: Vec::new(),
            open: false,
            highlighted: None,
            focus: false,
            mounted: false,
            listener_key: "chip-input".to_string(),
            placeholder: "Type to search...".to_string(),
            title: String::new(),
            max_visible: None,
            style: ChipInputStyle::default(),
            hits: RefCell::new(HitMap::default()),
        }
    }

    /// Placeholder shown while the field is empty.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Title drawn in the border.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Cap the number of dropdown rows. Without a cap the dropdown uses the
    /// space left below the field.
    pub fn with_max_visible(mut self, max: usize) -> Self {
        self.max_visible = Some(max.max(1));
        self
    }

    /// Override the default colors.
    pub fn with_style(mut self, style: ChipInputStyle) -> Self {
        self.style = style;
        self
    }

    /// Distinguishes this input's click listener from other chip inputs in
    /// the same program.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.listener_key = key.into();
        self
    }

    // --- lifecycle ---

    /// Start declaring the click listener.
    pub fn mount(&mut self) {
        if !self.mounted {
            tracing::debug!(key = %self.listener_key, "chip input mounted");
            self.mounted = true;
        }
    }

    /// Stop declaring the click listener and drop transient state (text,
    /// dropdown, highlight, focus). Chips are kept.
    pub fn unmount(&mut self) {
        if self.mounted {
            tracing::debug!(key = %self.listener_key, "chip input unmounted");
            self.mounted = false;
            self.dismiss();
            self.focus = false;
        }
    }

    /// Whether the click listener is declared.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Give the field keyboard focus.
    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Drop keyboard focus. Keys and paste are ignored until refocused.
    pub fn blur(&mut self) {
        self.focus = false;
    }

    // --- state access ---

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn chips(&self) -> &ChipSet {
        &self.chips
    }

    /// Current search text.
    pub fn value(&self) -> String {
        self.text.value()
    }

    /// Entries the dropdown currently lists.
    pub fn results(&self) -> &[CatalogEntry] {
        &self.results
    }

    pub fn highlighted(&self) -> Option<ChipId> {
        self.highlighted
    }

    /// Whether the dropdown is drawn: it is open and has rows.
    pub fn is_dropdown_visible(&self) -> bool {
        self.open && !self.results.is_empty()
    }

    /// The identity of this input's click listener.
    pub fn listener_id(&self) -> SubscriptionId {
        SubscriptionId::with_str::<OutsideClick>(&self.listener_key)
    }

    /// Rows needed to draw the field (border, chip rows, input line) at
    /// `width` columns. The dropdown is an overlay and not included.
    pub fn desired_height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(2);
        let chip_rows = self
            .layout_chips(inner)
            .last()
            .map(|slot| slot.row + 1)
            .unwrap_or(0);
        chip_rows + 3
    }

    // --- operations ---

    /// Recompute the dropdown from the catalog and open it.
    pub fn refresh(&mut self) {
        self.results = filter(&self.catalog, &self.text.value(), &self.chips)
            .into_iter()
            .cloned()
            .collect();
        self.open = true;
    }

    /// Turn `entry` into a chip: clears the text, closes the dropdown,
    /// drops any highlight and focuses the field.
    pub fn select(&mut self, entry: &CatalogEntry) -> ChipId {
        let id = self.chips.select(entry);
        tracing::debug!(chip = %id, label = %entry.name, "chip selected");
        self.text.clear();
        self.results.clear();
        self.open = false;
        self.highlighted = None;
        self.focus = true;
        id
    }

    /// Replace the search text. A different value re-runs the filter and
    /// opens the dropdown; a non-empty one drops the highlight.
    pub fn set_value(&mut self, value: &str) {
        if value != self.text.value() {
            self.text.set_value(value);
            self.refresh();
        }
        if !value.is_empty() {
            self.highlight(None);
        }
    }

    /// Select the catalog entry called `name`, if there is one.
    pub fn select_name(&mut self, name: &str) -> Option<ChipId> {
        let entry = self.catalog.get(name)?.clone();
        Some(self.select(&entry))
    }

    /// Remove a chip. Unknown ids are a no-op. An open dropdown is
    /// recomputed so the removed name is offered again.
    pub fn remove(&mut self, id: ChipId) -> Option<Chip> {
        let Some(chip) = self.chips.remove(id) else {
            tracing::trace!(chip = %id, "remove of unknown chip ignored");
            return None;
        };
        tracing::debug!(chip = %id, label = %chip.label, "chip removed");
        if self.highlighted == Some(id) {
            self.highlighted = None;
        }
        if self.open {
            self.refresh();
        }
        Some(chip)
    }

    /// Mark a chip as the next Backspace target, or clear the mark.
    /// Ids that are not live are ignored.
    pub fn highlight(&mut self, id: Option<ChipId>) {
        match id {
            Some(id) if !self.chips.contains(id) => {
                tracing::trace!(chip = %id, "highlight of unknown chip ignored");
            }
            _ => {
                if self.highlighted != id {
                    tracing::debug!(chip = ?id.map(ChipId::get), "highlight changed");
                }
                self.highlighted = id;
            }
        }
    }

    /// Click outside the field: clear the text, close the dropdown and
    /// drop the highlight.
    pub fn dismiss(&mut self) {
        self.text.clear();
        self.results.clear();
        self.open = false;
        self.highlighted = None;
    }

    // --- event handling ---

    /// Empty field + Backspace: highlight the last chip, or remove the
    /// highlighted one.
    fn backspace_on_empty(&mut self) -> Command<Message> {
        match self.highlighted {
            None => {
                let last = self.chips.last().map(|chip| chip.id);
                self.highlight(last);
                Command::none()
            }
            Some(id) => {
                self.highlighted = None;
                match self.remove(id) {
                    Some(_) => Command::message(Message::Removed(id)),
                    None => Command::none(),
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        if key.code == KeyCode::Backspace
            && key.modifiers == KeyModifiers::NONE
            && self.text.is_empty()
        {
            if self.chips.is_empty() {
                return Command::none();
            }
            return self.backspace_on_empty();
        }

        // Any other key leaves the highlighted state.
        self.highlight(None);

        let changed = match (key.code, key.modifiers) {
            (KeyCode::Char('w'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.text.delete_word_back()
            }
            (KeyCode::Char('u'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.text.delete_to_start()
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.text.insert_char(c)
            }
            (KeyCode::Backspace, KeyModifiers::NONE) => self.text.delete_back(),
            (KeyCode::Backspace, m) if m.contains(KeyModifiers::ALT) => {
                self.text.delete_word_back()
            }
            (KeyCode::Delete, _) => self.text.delete_forward(),
            (KeyCode::Left, _) => {
                self.text.move_left();
                false
            }
            (KeyCode::Right, _) => {
                self.text.move_right();
                false
            }
            (KeyCode::Home, _) => {
                self.text.move_home();
                false
            }
            (KeyCode::End, _) => {
                self.text.move_end();
                false
            }
            _ => false,
        };

        if changed {
            self.refresh();
            Command::message(Message::Changed(self.text.value()))
        } else {
            Command::none()
        }
    }

    fn handle_pointer(&mut self, column: u16, row: u16) -> Command<Message> {
        let target = self.hits.borrow().hit(column, row);
        let cmd = match target {
            Some(Target::Input) => {
                self.focus = true;
                self.highlight(None);
                self.refresh();
                return Command::none();
            }
            Some(Target::Item(index)) => match self.results.get(index).cloned() {
                Some(entry) => Command::message(Message::Selected(self.select(&entry))),
                None => Command::none(),
            },
            Some(Target::Remove(id)) => match self.remove(id) {
                Some(_) => Command::message(Message::Removed(id)),
                None => Command::none(),
            },
            Some(Target::Chip(_)) | None => Command::none(),
        };
        self.dismiss();
        cmd
    }

    // --- rendering ---

    fn layout_chips(&self, width: u16) -> Vec<ChipSlot> {
        let mut slots = Vec::with_capacity(self.chips.len());
        let (mut row, mut x) = (0u16, 0u16);
        let min_width = chip_width("");
        for chip in &self.chips {
            let max_label = width.saturating_sub(min_width) as usize;
            let label = truncate(&chip.label, max_label);
            let w = chip_width(&label);
            if x > 0 && x + w > width {
                row += 1;
                x = 0;
            }
            slots.push(ChipSlot {
                id: chip.id,
                row,
                x,
                initial: initial_of(&chip.label),
                highlighted: self.highlighted == Some(chip.id),
                label,
            });
            x += w + 1;
        }
        slots
    }

    fn render_chips(&self, frame: &mut Frame, inner: Rect, hits: &mut HitMap) -> u16 {
        let slots = self.layout_chips(inner.width);
        let mut rows = 0;
        for slot in &slots {
            let y = inner.y + slot.row;
            if y >= inner.bottom() {
                break;
            }
            rows = slot.row + 1;
            let body = if slot.highlighted {
                self.style.chip_highlighted
            } else {
                self.style.chip
            };
            let chip_area =
                Rect::new(inner.x + slot.x, y, slot.width(), 1).intersection(inner);
            let line = Line::from(vec![
                Span::styled(format!("({})", slot.initial), self.style.badge.patch(body)),
                Span::styled(format!(" {} ", slot.label), body),
                Span::styled(REMOVE_GLYPH, self.style.chip_remove),
            ]);
            frame.render_widget(Paragraph::new(line), chip_area);

            hits.push(chip_area, Target::Chip(slot.id));
            let glyph_x = inner.x + slot.x + slot.width() - REMOVE_GLYPH.width() as u16;
            hits.push(
                Rect::new(glyph_x, y, REMOVE_GLYPH.width() as u16, 1).intersection(inner),
                Target::Remove(slot.id),
            );
        }
        rows
    }

    fn render_text(&self, frame: &mut Frame, area: Rect) {
        let width = area.width as usize;
        let chars = self.text.chars();
        let mut spans = Vec::new();

        if chars.is_empty() {
            if self.focus {
                spans.push(Span::styled(" ", self.style.cursor));
            }
            spans.push(Span::styled(self.placeholder.as_str(), self.style.placeholder));
        } else {
            let cursor = self.text.cursor();
            let window = visible_window(chars, cursor, width);
            let at = cursor - window.start;
            let visible = &chars[window];
            if self.focus {
                let before: String = visible[..at.min(visible.len())].iter().collect();
                spans.push(Span::styled(before, self.style.text));
                match visible.get(at) {
                    Some(c) => {
                        spans.push(Span::styled(c.to_string(), self.style.cursor));
                        let after: String = visible[at + 1..].iter().collect();
                        spans.push(Span::styled(after, self.style.text));
                    }
                    None => spans.push(Span::styled(" ", self.style.cursor)),
                }
            } else {
                spans.push(Span::styled(visible.iter().collect::<String>(), self.style.text));
            }
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_dropdown(&self, frame: &mut Frame, anchor: Rect, hits: &mut HitMap) {
        if !self.is_dropdown_visible() {
            return;
        }
        let screen = frame.area();
        let top = anchor.bottom();
        let space = screen.bottom().saturating_sub(top) as usize;
        let rows = self
            .results
            .len()
            .min(self.max_visible.unwrap_or(usize::MAX))
            .min(space);
        if rows == 0 || anchor.width < 4 {
            return;
        }

        let dropdown_area = Rect::new(anchor.x, top, anchor.width, rows as u16);
        frame.render_widget(Clear, dropdown_area);
        frame.render_widget(Block::new().style(self.style.dropdown), dropdown_area);

        for (i, entry) in self.results.iter().take(rows).enumerate() {
            let row_area = Rect {
                y: top + i as u16,
                height: 1,
                ..dropdown_area
            };
            let name_width = (row_area.width as usize).saturating_sub(5);
            let line = Line::from(vec![
                Span::styled(format!(" ({}) ", entry.initial()), self.style.badge),
                Span::styled(truncate(&entry.name, name_width), self.style.item_name),
                Span::raw("  "),
                Span::styled(entry.email.as_str(), self.style.item_email),
            ]);
            frame.render_widget(Paragraph::new(line), row_area);
            hits.push(row_area, Target::Item(i));
        }
    }
}

impl Component for ChipInput {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => {
                if !self.focus {
                    return Command::none();
                }
                self.handle_key(key)
            }
            Message::Paste(text) => {
                if !self.focus {
                    return Command::none();
                }
                self.highlight(None);
                if self.text.insert_str(&text) {
                    self.refresh();
                    Command::message(Message::Changed(self.text.value()))
                } else {
                    Command::none()
                }
            }
            Message::SetValue(value) => {
                self.set_value(&value);
                Command::none()
            }
            Message::Pointer { column, row } => {
                if !self.mounted {
                    return Command::none();
                }
                self.handle_pointer(column, row)
            }
            Message::Changed(_) | Message::Selected(_) | Message::Removed(_) => {
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let mut hits = HitMap::default();

        let border = if self.focus {
            self.style.border_focused
        } else {
            self.style.border
        };
        let block = Block::new()
            .borders(Borders::ALL)
            .title(self.title.as_str())
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chip_rows = self.render_chips(frame, inner, &mut hits);

        let input_area = Rect {
            y: inner.y + chip_rows,
            height: 1,
            ..inner
        }
        .intersection(inner);
        if !input_area.is_empty() {
            self.render_text(frame, input_area);
            hits.push(input_area, Target::Input);
        }

        self.render_dropdown(frame, area, &mut hits);

        *self.hits.borrow_mut() = hits;
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if !self.mounted {
            return vec![];
        }
        vec![pointer_events(self.listener_id(), |column, row| {
            Some(Message::Pointer { column, row })
        })]
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

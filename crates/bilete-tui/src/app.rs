use std::collections::VecDeque;

use bilete_core::{parse_filter, CoreError, PriceTable, TicketId, TicketListView, TicketSummary};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::actions::Action;

const LIST_EMPTY: &str = "No tickets. Press 'r' to reload.";
const NO_MATCHES: &str = "No tickets match the filter. Press 'c' to clear it.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    FilterEditing,
}

#[derive(Debug, Clone)]
pub struct App {
    pub mode: Mode,
    pub show_help: bool,
    pub should_quit: bool,
    pub view: TicketListView,
    pub prices: PriceTable,
    pub filter_input: String,
    pub filter_error: Option<String>,
    /// Row within the current page.
    pub selected: usize,
    pub status: Option<String>,
    pub error: Option<String>,
    actions: VecDeque<Action>,
}

impl App {
    pub fn new(items_per_page: usize, prices: PriceTable) -> Result<Self, CoreError> {
        let mut app = Self {
            mode: Mode::List,
            show_help: false,
            should_quit: false,
            view: TicketListView::new(items_per_page)?,
            prices,
            filter_input: String::new(),
            filter_error: None,
            selected: 0,
            status: None,
            error: None,
            actions: VecDeque::new(),
        };
        app.enqueue(Action::Reload);
        Ok(app)
    }

    pub fn enqueue(&mut self, action: Action) {
        self.actions.push_back(action);
    }

    pub fn next_action(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn summary(&self) -> TicketSummary {
        self.view.summary(&self.prices)
    }

    pub fn page_len(&self) -> usize {
        self.view.snapshot().items.len()
    }

    pub fn selected_ticket_id(&self) -> Option<TicketId> {
        self.view
            .snapshot()
            .items
            .get(self.selected)
            .map(|ticket| ticket.id.clone())
    }

    pub fn empty_hint(&self) -> &'static str {
        if self.view.tickets().is_empty() {
            LIST_EMPTY
        } else {
            NO_MATCHES
        }
    }

    /// Keeps the cursor on a row that exists after the page contents changed.
    pub fn clamp_selection(&mut self) {
        let len = self.page_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        if matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
        ) {
            self.should_quit = true;
            return;
        }

        let mode = match self.mode {
            Mode::List => self.handle_list_key(key),
            Mode::FilterEditing => self.handle_filter_key(key),
        };
        if let Some(next) = mode {
            self.mode = next;
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => self.selected = self.page_len().saturating_sub(1),
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') => {
                if self.view.next_page() {
                    self.selected = 0;
                }
            }
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('p') => {
                if self.view.prev_page() {
                    self.selected = 0;
                }
            }
            KeyCode::Char('/') => {
                self.filter_input = self.view.criteria().to_query();
                self.filter_error = None;
                return Some(Mode::FilterEditing);
            }
            KeyCode::Char('c') => {
                self.filter_input.clear();
                self.filter_error = None;
                self.view.clear_criteria();
                self.selected = 0;
            }
            KeyCode::Char('r') => self.enqueue(Action::Reload),
            KeyCode::Char('s') => {
                if let Some(id) = self.selected_ticket_id() {
                    self.enqueue(Action::ToggleSent(id));
                }
            }
            KeyCode::Char('v') => {
                if let Some(id) = self.selected_ticket_id() {
                    self.enqueue(Action::Verify(id));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Option<Mode> {
        match key.code {
            KeyCode::Esc => {
                self.filter_error = None;
                return Some(Mode::List);
            }
            KeyCode::Enter => match parse_filter(&self.filter_input) {
                Ok(criteria) => {
                    self.view.set_criteria(criteria);
                    self.selected = 0;
                    self.filter_error = None;
                    return Some(Mode::List);
                }
                Err(err) => {
                    self.filter_error = Some(err.to_string());
                }
            },
            _ => {
                apply_text_input(&mut self.filter_input, key);
            }
        }
        None
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.page_len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as i64 + i64::from(delta)).clamp(0, len as i64 - 1);
        self.selected = next as usize;
    }
}

fn apply_text_input(target: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            target.clear();
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            delete_last_word(target);
        }
        KeyCode::Char(ch) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                target.push(ch);
            }
        }
        KeyCode::Backspace => {
            target.pop();
        }
        _ => {}
    }
}

fn delete_last_word(value: &mut String) {
    while value.ends_with(char::is_whitespace) {
        value.pop();
    }
    while value.ends_with(|ch: char| !ch.is_whitespace()) {
        value.pop();
    }
}

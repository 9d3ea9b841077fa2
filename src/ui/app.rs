use std::mem;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::db::CustomerStore;
use crate::models::{Customer, CustomerFields};

use super::forms::{ConfirmDelete, CustomerField, CustomerForm, FormPurpose};
use super::helpers::{centered_rect, detail_lines, surface_error};
use super::screens::CustomerList;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown in the record list.
const PAGE_STEP: isize = 5;

/// Fine-grained modes layered over the record list.
enum Mode {
    Normal,
    Editing(CustomerForm),
    ConfirmDelete(ConfirmDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state: the store, the list on screen, and whichever
/// dialog is open.
pub struct App {
    store: CustomerStore,
    list: CustomerList,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: CustomerStore, customers: Vec<Customer>) -> Self {
        Self {
            store,
            list: CustomerList::new(customers),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Feed one key press through the current mode. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Editing(form) => self.handle_form(code, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.list.move_selection(-1),
            KeyCode::Down => self.list.move_selection(1),
            KeyCode::PageUp => self.list.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.list.move_selection(PAGE_STEP),
            KeyCode::Home => self.list.select_first(),
            KeyCode::End => self.list.select_last(),
            KeyCode::Char('v') | KeyCode::Char('V') => match self.reload(None) {
                Ok(()) => {
                    let count = self.list.customers.len();
                    self.set_status(format!("Showing all {count} customers."), StatusKind::Info);
                }
                Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            },
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.clear_status();
                let mut form = CustomerForm::new(FormPurpose::Search);
                if let Some(filter) = &self.list.filter {
                    form.fields = filter.clone();
                }
                return Ok(Mode::Editing(form));
            }
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                return Ok(Mode::Editing(CustomerForm::new(FormPurpose::Insert)));
            }
            KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                if let Some(customer) = self.list.current() {
                    let form = CustomerForm::from_customer(customer);
                    self.clear_status();
                    return Ok(Mode::Editing(form));
                }
                self.set_status("No customer selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                if let Some(customer) = self.list.current().cloned() {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmDelete { customer }));
                }
                self.set_status("No customer selected to delete.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_form(&mut self, code: KeyCode, mut form: CustomerForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                let message = match form.purpose {
                    FormPurpose::Search => "Search cancelled.",
                    FormPurpose::Insert => "Add customer cancelled.",
                    FormPurpose::Update { .. } => "Edit cancelled.",
                };
                self.set_status(message, StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.submit(&form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::Editing(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(()) => Ok(Mode::Normal),
                    Err(err) => {
                        self.set_status(surface_error(&err), StatusKind::Error);
                        Ok(Mode::ConfirmDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn submit(&mut self, form: &CustomerForm) -> Result<()> {
        let fields = form.parse_inputs()?;
        match form.purpose {
            FormPurpose::Insert => self.save_new_customer(&fields),
            FormPurpose::Update { id } => self.save_existing_customer(id, &fields),
            FormPurpose::Search => self.run_search(fields),
        }
    }

    fn save_new_customer(&mut self, fields: &CustomerFields) -> Result<()> {
        let customer = self
            .store
            .insert(fields)
            .context("failed to insert customer")?;
        self.reload(Some(customer.id))?;
        self.set_status(
            format!("Added customer #{} ({}).", customer.id, customer.name),
            StatusKind::Info,
        );
        Ok(())
    }

    fn save_existing_customer(&mut self, id: i64, fields: &CustomerFields) -> Result<()> {
        self.store
            .update(id, fields)
            .context("failed to update customer")?;
        self.reload(Some(id))?;
        self.set_status(format!("Updated customer #{id}."), StatusKind::Info);
        Ok(())
    }

    fn run_search(&mut self, filter: CustomerFields) -> Result<()> {
        let matches = self
            .store
            .search(&filter)
            .context("failed to search customers")?;
        let count = matches.len();
        self.list.set_customers(matches, Some(filter), None);
        self.list.select_first();
        let message = match count {
            0 => "No customers match.".to_string(),
            1 => "1 customer matches.".to_string(),
            n => format!("{n} customers match."),
        };
        self.set_status(message, StatusKind::Info);
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) -> Result<()> {
        self.store
            .delete(confirm.customer.id)
            .context("failed to delete customer")?;
        self.reload(None)?;
        self.set_status(
            format!("Deleted customer #{}.", confirm.customer.id),
            StatusKind::Info,
        );
        Ok(())
    }

    /// Re-read every row and drop any active search filter.
    fn reload(&mut self, focus_id: Option<i64>) -> Result<()> {
        let customers = self.store.view().context("failed to load customers")?;
        self.list.set_customers(customers, None, focus_id);
        Ok(())
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(content_area);
        self.draw_customer_list(frame, panes[0]);
        self.draw_details(frame, panes[1]);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Editing(form) => self.draw_form(frame, area, form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_customer_list(&self, frame: &mut Frame, area: Rect) {
        let title = if self.list.is_filtered() {
            format!("Search Results ({})", self.list.customers.len())
        } else {
            format!("Customers ({})", self.list.customers.len())
        };
        let block = Block::default().title(title).borders(Borders::ALL);

        if self.list.customers.is_empty() {
            let text = if self.list.is_filtered() {
                "No customers match. Press 'v' to show all."
            } else {
                "No customers yet. Press '+' to add one."
            };
            let message = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = self
            .list
            .customers
            .iter()
            .map(|customer| ListItem::new(customer.to_string()))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.list.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_details(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title("Details").borders(Borders::ALL);
        let paragraph = match self.list.current() {
            Some(customer) => Paragraph::new(detail_lines(customer)),
            None => Paragraph::new(Line::from(Span::styled(
                "No customer selected.",
                Style::default().fg(Color::DarkGray),
            ))),
        };
        frame.render_widget(paragraph.block(block).wrap(Wrap { trim: true }), area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match &self.mode {
            Mode::Normal => &[
                ("[Up/Down]", " Navigate   "),
                ("[v]", " View All   "),
                ("[f]", " Search   "),
                ("[+]", " Add   "),
                ("[e]", " Edit   "),
                ("[-]", " Delete   "),
                ("[q]", " Quit"),
            ],
            Mode::Editing(_) => &[
                ("[Tab]", " Next Field   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[y]", " Delete   "), ("[n]", " Keep")],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, label)| [Span::styled(*key, key_style), Span::raw(*label)])
            .collect();
        Line::from(spans)
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &CustomerForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(form.purpose.title())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = CustomerField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            let hint = match form.purpose {
                FormPurpose::Search => "Rows matching ANY field are shown. Enter to search.",
                _ => "Enter to save. Tab to switch. Esc to cancel.",
            };
            lines.push(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let row = CustomerField::ALL
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0) as u16;
        let prefix = format!("{}: ", form.active.label()).len() as u16;
        let typed = u16::try_from(form.value_len(form.active)).unwrap_or(u16::MAX);
        frame.set_cursor_position((
            inner.x.saturating_add(prefix).saturating_add(typed),
            inner.y.saturating_add(row),
        ));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let customer = &confirm.customer;
        let lines = vec![
            Line::from(format!(
                "Delete customer #{} ({} {})?",
                customer.id, customer.name, customer.surname
            )),
            Line::from("This cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

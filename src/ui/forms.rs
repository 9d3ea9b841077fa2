use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Customer, CustomerFields};

/// What submitting a customer form will do.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum FormPurpose {
    Insert,
    Update { id: i64 },
    Search,
}

impl FormPurpose {
    pub(crate) fn title(&self) -> &'static str {
        match self {
            FormPurpose::Insert => "New Customer",
            FormPurpose::Update { .. } => "Edit Customer",
            FormPurpose::Search => "Search Customers",
        }
    }
}

/// Fields available within the customer form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum CustomerField {
    #[default]
    Name,
    Surname,
    Email,
    NationalId,
}

impl CustomerField {
    pub(crate) const ALL: [CustomerField; 4] = [
        CustomerField::Name,
        CustomerField::Surname,
        CustomerField::Email,
        CustomerField::NationalId,
    ];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            CustomerField::Name => "Name",
            CustomerField::Surname => "Surname",
            CustomerField::Email => "Email",
            CustomerField::NationalId => "CPF",
        }
    }

    fn next(self) -> Self {
        match self {
            CustomerField::Name => CustomerField::Surname,
            CustomerField::Surname => CustomerField::Email,
            CustomerField::Email => CustomerField::NationalId,
            CustomerField::NationalId => CustomerField::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            CustomerField::Name => CustomerField::NationalId,
            CustomerField::Surname => CustomerField::Name,
            CustomerField::Email => CustomerField::Surname,
            CustomerField::NationalId => CustomerField::Email,
        }
    }
}

/// Editable state behind the insert, edit, and search dialogs.
#[derive(Clone, Debug)]
pub(crate) struct CustomerForm {
    pub(crate) purpose: FormPurpose,
    pub(crate) fields: CustomerFields,
    pub(crate) active: CustomerField,
    pub(crate) error: Option<String>,
}

impl CustomerForm {
    pub(crate) fn new(purpose: FormPurpose) -> Self {
        Self {
            purpose,
            fields: CustomerFields::default(),
            active: CustomerField::default(),
            error: None,
        }
    }

    /// Populate the form from an existing customer when editing.
    pub(crate) fn from_customer(customer: &Customer) -> Self {
        Self {
            purpose: FormPurpose::Update { id: customer.id },
            fields: customer.fields(),
            active: CustomerField::Name,
            error: None,
        }
    }

    /// Switch focus to a particular field.
    pub(crate) fn focus(&mut self, field: CustomerField) {
        self.active = field;
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.previous();
    }

    fn value(&self, field: CustomerField) -> &String {
        match field {
            CustomerField::Name => &self.fields.name,
            CustomerField::Surname => &self.fields.surname,
            CustomerField::Email => &self.fields.email,
            CustomerField::NationalId => &self.fields.national_id,
        }
    }

    fn value_mut(&mut self, field: CustomerField) -> &mut String {
        match field {
            CustomerField::Name => &mut self.fields.name,
            CustomerField::Surname => &mut self.fields.surname,
            CustomerField::Email => &mut self.fields.email,
            CustomerField::NationalId => &mut self.fields.national_id,
        }
    }

    /// Insert a character into the active field. Control characters are
    /// ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active;
        self.value_mut(field).push(ch);
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Return the values exactly as typed. Inserts and edits need a
    /// non-blank name; searches pass every field through, empty or not.
    pub(crate) fn parse_inputs(&self) -> Result<CustomerFields> {
        if self.purpose != FormPurpose::Search && self.fields.name.trim().is_empty() {
            return Err(anyhow!("Customer name is required."));
        }
        Ok(self.fields.clone())
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: CustomerField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let placeholder = match (self.purpose, field) {
            (FormPurpose::Search, _) => "<any>",
            (_, CustomerField::Name) => "<required>",
            _ => "<optional>",
        };

        let display = if value.is_empty() {
            placeholder.to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Character count of the requested field, used to place the cursor.
    pub(crate) fn value_len(&self, field: CustomerField) -> usize {
        self.value(field).chars().count()
    }
}

/// State for confirming a permanent delete.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmDelete {
    pub(crate) customer: Customer,
}

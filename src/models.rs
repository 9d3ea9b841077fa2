//! Domain models that mirror the `clientes` table. They stay plain data
//! holders so the persistence and presentation layers can pass them around
//! freely.

use std::fmt;

/// The four editable text columns of a customer row. Used as the input for
/// inserts, updates, and searches; `Default` yields four empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFields {
    pub name: String,
    pub surname: String,
    pub email: String,
    /// Brazilian CPF, kept verbatim without checksum validation.
    pub national_id: String,
}

impl CustomerFields {
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        email: impl Into<String>,
        national_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            email: email.into(),
            national_id: national_id.into(),
        }
    }
}

/// A stored customer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Primary key assigned by SQLite. Never reused once a row is deleted.
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub national_id: String,
}

impl Customer {
    /// Attach a store-assigned id to a set of fields.
    pub fn from_fields(id: i64, fields: &CustomerFields) -> Self {
        Self {
            id,
            name: fields.name.clone(),
            surname: fields.surname.clone(),
            email: fields.email.clone(),
            national_id: fields.national_id.clone(),
        }
    }

    /// Copy the editable columns out, e.g. to seed an edit form.
    pub fn fields(&self) -> CustomerFields {
        CustomerFields {
            name: self.name.clone(),
            surname: self.surname.clone(),
            email: self.email.clone(),
            national_id: self.national_id.clone(),
        }
    }
}

impl fmt::Display for Customer {
    /// One line per row, the way the record list renders it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.id, self.name, self.surname, self.email, self.national_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_column_in_table_order() {
        let customer = Customer::from_fields(
            7,
            &CustomerFields::new("Ana", "Silva", "ana@x.com", "11122233344"),
        );
        assert_eq!(customer.to_string(), "7 Ana Silva ana@x.com 11122233344");
    }

    #[test]
    fn fields_drop_only_the_id() {
        let fields = CustomerFields::new("Ana", "Silva", "ana@x.com", "11122233344");
        let customer = Customer::from_fields(3, &fields);
        assert_eq!(customer.fields(), fields);
    }
}

use crate::models::{Customer, CustomerFields};

/// Rows currently shown in the record list plus the cursor into them.
pub(crate) struct CustomerList {
    pub(crate) customers: Vec<Customer>,
    /// The filter that produced `customers`, or `None` when showing every row.
    pub(crate) filter: Option<CustomerFields>,
    pub(crate) selected: usize,
}

impl CustomerList {
    pub(crate) fn new(customers: Vec<Customer>) -> Self {
        Self {
            customers,
            filter: None,
            selected: 0,
        }
    }

    /// Swap in freshly loaded rows, keeping `focus_id` selected when present.
    pub(crate) fn set_customers(
        &mut self,
        customers: Vec<Customer>,
        filter: Option<CustomerFields>,
        focus_id: Option<i64>,
    ) {
        self.customers = customers;
        self.filter = filter;

        if let Some(id) = focus_id {
            if let Some(idx) = self.customers.iter().position(|c| c.id == id) {
                self.selected = idx;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    pub(crate) fn current(&self) -> Option<&Customer> {
        self.customers.get(self.selected)
    }

    pub(crate) fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.customers.is_empty() {
            return;
        }
        let len = self.customers.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.customers.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.customers.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.customers.len() {
            self.selected = self.customers.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customers(ids: &[i64]) -> Vec<Customer> {
        ids.iter()
            .map(|&id| Customer::from_fields(id, &CustomerFields::new(format!("c{id}"), "", "", "")))
            .collect()
    }

    #[test]
    fn selection_is_clamped_to_the_list() {
        let mut list = CustomerList::new(customers(&[1, 2, 3]));
        list.move_selection(10);
        assert_eq!(list.current().map(|c| c.id), Some(3));
        list.move_selection(-10);
        assert_eq!(list.current().map(|c| c.id), Some(1));
        list.select_last();
        assert_eq!(list.selected, 2);
        list.select_first();
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn reload_keeps_focus_on_the_requested_row() {
        let mut list = CustomerList::new(customers(&[1, 2, 3]));
        list.set_customers(customers(&[1, 2, 3, 4]), None, Some(4));
        assert_eq!(list.current().map(|c| c.id), Some(4));
    }

    #[test]
    fn reload_after_shrinking_clamps_the_cursor() {
        let mut list = CustomerList::new(customers(&[1, 2, 3]));
        list.select_last();
        list.set_customers(customers(&[1, 2]), None, Some(3));
        assert_eq!(list.current().map(|c| c.id), Some(2));

        list.set_customers(Vec::new(), Some(CustomerFields::default()), None);
        assert!(list.current().is_none());
        assert!(list.is_filtered());
        list.move_selection(1);
        assert_eq!(list.selected, 0);
    }
}

use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Customer;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Label/value rows shown in the details panel for the selected customer.
pub(crate) fn detail_lines(customer: &Customer) -> Vec<Line<'static>> {
    let label_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    [
        ("Id", customer.id.to_string()),
        ("Name", customer.name.clone()),
        ("Surname", customer.surname.clone()),
        ("Email", customer.email.clone()),
        ("CPF", customer.national_id.clone()),
    ]
    .into_iter()
    .map(|(label, value)| {
        Line::from(vec![
            Span::styled(format!("{label:<8}"), label_style),
            Span::raw(value),
        ])
    })
    .collect()
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Context};

    use super::*;
    use crate::models::CustomerFields;

    #[test]
    fn surface_error_prefers_the_root_cause() {
        let err = Err::<(), _>(anyhow!("disk full"))
            .context("failed to insert customer")
            .unwrap_err();
        assert_eq!(surface_error(&err), "disk full");
    }

    #[test]
    fn centered_rect_stays_inside_the_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
    }

    #[test]
    fn detail_lines_cover_every_column() {
        let customer = Customer::from_fields(
            1,
            &CustomerFields::new("Ana", "Silva", "ana@x.com", "11122233344"),
        );
        let lines = detail_lines(&customer);
        assert_eq!(lines.len(), 5);
        let last: String = lines[4].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(last, "CPF     11122233344");
    }
}

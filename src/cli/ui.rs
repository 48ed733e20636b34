use crate::core::{Entry, EntryValue};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Rates are right-aligned, names are left as-is.
pub fn value_cell(value: &EntryValue) -> Cell {
    match value {
        EntryValue::Number(n) => Cell::new(n).set_alignment(CellAlignment::Right),
        EntryValue::Label(s) => Cell::new(s),
    }
}

/// Renders entries as a two column table.
pub fn entries_table(entries: &[Entry], value_header: &str) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![header_cell("Code"), header_cell(value_header)]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.code).add_attribute(Attribute::Bold),
            value_cell(&entry.value),
        ]);
    }
    table
}

/// Creates a spinner shown while a request is outstanding.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_table_contains_rows() {
        let table = entries_table(
            &[Entry::number("EUR", 1.0), Entry::label("USD", "United States Dollar")],
            "Rate",
        );
        let rendered = table.to_string();
        assert!(rendered.contains("Code"));
        assert!(rendered.contains("EUR"));
        assert!(rendered.contains("USD"));
        assert!(rendered.contains("Rate"));
    }

    #[test]
    fn test_style_text_keeps_content() {
        console::set_colors_enabled(false);
        assert_eq!(style_text("Rates", StyleType::Title), "Rates");
    }
}

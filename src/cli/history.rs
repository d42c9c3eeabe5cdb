use super::ui;
use crate::core::ConversionRecord;
use comfy_table::Cell;

pub fn display_history_table(records: &[ConversionRecord]) -> String {
    if records.is_empty() {
        return ui::style_text("No conversions yet", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("When"),
        ui::header_cell("Amount"),
        ui::header_cell("From"),
        ui::header_cell("Converted"),
        ui::header_cell("To"),
        ui::header_cell("Rate"),
        ui::header_cell("Source"),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            ui::number_cell(record.amount.to_string()),
            Cell::new(&record.from_currency),
            ui::number_cell(format!("{:.2}", record.converted_amount)),
            Cell::new(&record.to_currency),
            ui::number_cell(record.exchange_rate.to_string()),
            ui::source_cell(record.source),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Conversion History", ui::StyleType::Title),
        table
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateSource;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_history_table_lists_records() {
        console::set_colors_enabled(false);
        let records = vec![ConversionRecord {
            amount: 100.0,
            from_currency: "USD".to_string(),
            to_currency: "EUR".to_string(),
            converted_amount: 92.0,
            exchange_rate: 0.92,
            source: RateSource::Cached,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        }];

        let output = display_history_table(&records);
        assert!(output.contains("2024-05-01 10:00:00"));
        assert!(output.contains("92.00"));
        assert!(output.contains("cached"));
    }

    #[test]
    fn test_empty_history() {
        console::set_colors_enabled(false);
        assert_eq!(display_history_table(&[]), "No conversions yet");
    }
}

use super::ui;
use crate::core::{ConversionRecord, Converter, RateSource};
use anyhow::{Result, anyhow};

impl ConversionRecord {
    pub fn display_line(&self) -> String {
        let converted = format!("{:.2} {}", self.converted_amount, self.to_currency);
        let mut line = format!(
            "{} {} = {}",
            self.amount,
            self.from_currency,
            ui::style_text(&converted, ui::StyleType::Value)
        );
        if self.source != RateSource::Same {
            let detail = format!("(rate {}, {})", self.exchange_rate, self.source);
            line.push(' ');
            line.push_str(&ui::style_text(&detail, ui::StyleType::Subtle));
        }
        line
    }
}

/// Converts once from the command line; the result is added to the history.
pub async fn run(converter: &Converter, amount: &str, from: &str, to: &str) -> Result<()> {
    let from = from.trim().to_uppercase();
    let to = to.trim().to_uppercase();

    match converter.convert(amount, &from, &to).await {
        Ok(record) => {
            println!("{}", record.display_line());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            Err(anyhow!(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(source: RateSource) -> ConversionRecord {
        ConversionRecord {
            amount: 50.0,
            from_currency: "USD".to_string(),
            to_currency: "GBP".to_string(),
            converted_amount: 39.5,
            exchange_rate: 0.79,
            source,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_display_line() {
        console::set_colors_enabled(false);

        assert_eq!(
            record(RateSource::Live).display_line(),
            "50 USD = 39.50 GBP (rate 0.79, live)"
        );
        assert_eq!(
            record(RateSource::Same).display_line(),
            "50 USD = 39.50 GBP"
        );
    }
}

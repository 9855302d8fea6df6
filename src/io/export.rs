use std::io::Write;

use anyhow::Result;

use crate::domain::{DATE_FORMAT, Ledger, format_cents};

/// Exporter for writing a ledger to CSV or JSON.
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Export expenses to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "description", "amount"])?;

        let mut count = 0;
        for expense in self.ledger {
            csv_writer.write_record([
                expense.id.to_string(),
                expense.date.format(DATE_FORMAT).to_string(),
                expense.description.clone(),
                format_cents(expense.amount),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export expenses as a pretty-printed JSON array, same shape as the store file.
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        serde_json::to_writer_pretty(&mut writer, self.ledger)?;
        writeln!(writer)?;
        Ok(self.ledger.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Expense;

    fn sample_ledger() -> Ledger {
        Ledger::from_expenses(vec![
            Expense::new(2, "book", 2000, "2024-03-05").unwrap(),
            Expense::new(3, "pen, blue", 250, "2024-03-06").unwrap(),
        ])
    }

    #[test]
    fn test_export_csv() {
        let ledger = sample_ledger();
        let mut out = Vec::new();
        let count = Exporter::new(&ledger).export_csv(&mut out).unwrap();

        assert_eq!(count, 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "id,date,description,amount");
        assert_eq!(lines[1], "2,2024-03-05,book,20.00");
        assert_eq!(lines[2], "3,2024-03-06,\"pen, blue\",2.50");
    }

    #[test]
    fn test_export_csv_empty_has_header_only() {
        let ledger = Ledger::new();
        let mut out = Vec::new();
        assert_eq!(Exporter::new(&ledger).export_csv(&mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "id,date,description,amount\n");
    }

    #[test]
    fn test_export_json_matches_store_shape() {
        let ledger = sample_ledger();
        let mut out = Vec::new();
        Exporter::new(&ledger).export_json(&mut out).unwrap();

        let parsed: Ledger = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, ledger);
    }
}

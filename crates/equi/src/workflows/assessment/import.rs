use std::io::Read;

use chrono::NaiveDate;
use serde::Deserialize;

use super::domain::{Transaction, TransactionKind};

#[derive(Debug, Deserialize)]
struct TransactionRow {
    date: String,
    description: String,
    amount: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Read a `date,description,amount,type` statement export.
///
/// Amounts may carry thousands separators (`1,250.00`); `type` accepts
/// `Income`/`Expense` in any case.
pub fn read_transactions_csv<R: Read>(reader: R) -> Result<Vec<Transaction>, TransactionImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut transactions = Vec::new();
    for (index, row) in csv_reader.deserialize::<TransactionRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let row = row?;
        transactions.push(parse_row(row, line)?);
    }

    Ok(transactions)
}

fn parse_row(row: TransactionRow, line: usize) -> Result<Transaction, TransactionImportError> {
    let invalid = |reason: String| TransactionImportError::InvalidRow { line, reason };

    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
        .map_err(|err| invalid(format!("date '{}' is not YYYY-MM-DD ({err})", row.date)))?;

    let amount: f64 = row
        .amount
        .replace(',', "")
        .parse()
        .map_err(|_| invalid(format!("amount '{}' is not a number", row.amount)))?;

    let kind = match row.kind.to_ascii_lowercase().as_str() {
        "income" => TransactionKind::Income,
        "expense" => TransactionKind::Expense,
        other => return Err(invalid(format!("type '{other}' must be Income or Expense"))),
    };

    let transaction = Transaction {
        date,
        description: row.description,
        amount,
        kind,
    };
    transaction
        .validate()
        .map_err(|err| invalid(err.to_string()))?;

    Ok(transaction)
}

#[derive(Debug, thiserror::Error)]
pub enum TransactionImportError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },
}

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::Amount;
use crate::footprint::round_half_up;
use crate::model::{Category, Scenario, SequenceId, Transaction};
use crate::simulator::CompletionSummary;

/// Errors that can occur when reading scenario files
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: scenario {sequence_id} has invalid amount {amount}")]
    InvalidAmount {
        line: usize,
        sequence_id: SequenceId,
        amount: f64,
    },

    #[error("line {line}: scenario {sequence_id} amount {amount} is out of range")]
    AmountOutOfRange {
        line: usize,
        sequence_id: SequenceId,
        amount: f64,
    },
}

#[derive(Debug, Deserialize)]
struct ScenarioRow {
    sequence_id: SequenceId,
    name: String,
    amount: f64,
    category: String,
    time: String,
}

#[derive(Debug, Serialize)]
struct TransactionRow<'a> {
    sequence_id: SequenceId,
    name: &'a str,
    category: &'a str,
    amount: String,
    carbon_kg: String,
    round_off: String,
    offset_kg: String,
    offset_pct: String,
    net_kg: String,
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    spent: String,
    remaining: String,
    total_carbon_kg: String,
    total_offset_kg: String,
    offset_pct: String,
    net_impact_kg: String,
    streak: u32,
}

/// Read scenarios from a csv file with header `sequence_id,name,amount,category,time`
pub fn read_scenarios(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Scenario, CsvError>>, CsvError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })?;

    Ok(reader
        .into_deserialize::<ScenarioRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;

            if !row.amount.is_finite() || row.amount <= 0.0 {
                return Err(CsvError::InvalidAmount {
                    line,
                    sequence_id: row.sequence_id,
                    amount: row.amount,
                });
            }

            let amount =
                Amount::try_from_float(row.amount).ok_or(CsvError::AmountOutOfRange {
                    line,
                    sequence_id: row.sequence_id,
                    amount: row.amount,
                })?;

            if Category::from_key(&row.category).is_none() {
                warn!(
                    line,
                    category = %row.category,
                    fallback = %Category::DEFAULT,
                    "unknown category, using default emission factor"
                );
            }

            Ok(Scenario::new(
                row.sequence_id,
                row.name,
                amount,
                row.category,
                row.time,
            ))
        }))
}

/// Format kg with 2 decimals, rounding ties up.
fn kg(value: f64) -> String {
    format!("{:.2}", round_half_up(value, 2))
}

/// Format a percentage with 1 decimal, rounding ties up.
fn pct(value: f64) -> String {
    format!("{:.1}", round_half_up(value, 1))
}

/// Write committed transactions, a blank line, then the completion summary
pub fn write_report<W: Write>(
    out: &mut W,
    transactions: &[Transaction],
    summary: &CompletionSummary,
) -> csv::Result<()> {
    {
        let mut writer = csv::Writer::from_writer(&mut *out);
        for tx in transactions {
            let result = &tx.result;
            writer.serialize(TransactionRow {
                sequence_id: tx.scenario.sequence_id,
                name: &tx.scenario.display_name,
                category: &tx.scenario.category,
                amount: result.amount.to_string(),
                carbon_kg: kg(result.carbon_generated_kg),
                round_off: result.round_off_amount.to_string(),
                offset_kg: kg(result.carbon_offset_kg),
                offset_pct: pct(result.offset_percentage),
                net_kg: kg(result.net_carbon_kg),
            })?;
        }
        if transactions.is_empty() {
            writer.write_record([
                "sequence_id",
                "name",
                "category",
                "amount",
                "carbon_kg",
                "round_off",
                "offset_kg",
                "offset_pct",
                "net_kg",
            ])?;
        }
        writer.flush()?;
    }

    out.write_all(b"\n")?;

    let totals = &summary.totals;
    let mut writer = csv::Writer::from_writer(&mut *out);
    writer.serialize(SummaryRow {
        spent: summary.spent.to_string(),
        remaining: summary.remaining.to_string(),
        total_carbon_kg: kg(totals.total_carbon_generated),
        total_offset_kg: kg(totals.total_offset),
        offset_pct: pct(totals.offset_percentage),
        net_impact_kg: kg(totals.net_impact),
        streak: summary.streak,
    })?;
    writer.flush()?;

    Ok(())
}

/// Write the report to stdout
pub fn write_report_to_stdout(
    transactions: &[Transaction],
    summary: &CompletionSummary,
) -> csv::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_report(&mut lock, transactions, summary)
}

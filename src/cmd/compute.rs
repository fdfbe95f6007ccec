//! Compute command - per-document tax lines, dispatched by effective date

use crate::cmd::read_documents;
use clap::Args;
use reforma::engine::{RegimeDispatcher, TaxBreakdown, TaxError};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ComputeCommand {
    /// CSV or JSON file containing fiscal documents ("-" for JSON on stdin)
    #[arg(short, long)]
    documents: PathBuf,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

/// Row for the tax lines table output
#[derive(Debug, Clone, Tabled, Serialize)]
struct LineRow {
    #[tabled(rename = "Document")]
    document_id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Regime")]
    regime: String,
    #[tabled(rename = "Tax")]
    tax: String,
    #[tabled(rename = "Base")]
    base: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// A document that could not be computed
#[derive(Debug, Clone, Serialize)]
struct Rejection {
    row: usize,
    document_id: String,
    date: String,
    reason: String,
}

/// Running batch totals
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    total: Decimal,
    test_total: Decimal,
}

impl Totals {
    /// `None` when adding the breakdown overflows either total
    fn add(self, breakdown: &TaxBreakdown) -> Option<Totals> {
        Some(Totals {
            total: self.total.checked_add(breakdown.total())?,
            test_total: self.test_total.checked_add(breakdown.test_total())?,
        })
    }
}

#[derive(Debug, Serialize)]
struct ComputeOutput {
    breakdowns: Vec<DatedBreakdown>,
    rejected: Vec<Rejection>,
    total: Decimal,
    test_total: Decimal,
}

#[derive(Debug, Serialize)]
struct DatedBreakdown {
    date: String,
    #[serde(flatten)]
    breakdown: TaxBreakdown,
    total: Decimal,
}

impl ComputeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rows = read_documents(&self.documents)?;
        let dispatcher = RegimeDispatcher::new();

        let mut breakdowns = Vec::new();
        let mut rejected = Vec::new();
        let mut totals = Totals::default();
        for (i, row) in rows.into_iter().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    log::warn!("Skipping malformed row {}: {}", i + 1, err);
                    rejected.push(Rejection {
                        row: i + 1,
                        document_id: err.id.clone().unwrap_or_default(),
                        date: err.date.clone().unwrap_or_default(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let document_id = row.id.clone();
            let raw_date = row.date.clone();
            let result = row
                .into_document()
                .map_err(TaxError::from)
                .and_then(|(date, doc)| dispatcher.compute(&doc, date).map(|b| (date, b)))
                .and_then(|(date, b)| match totals.add(&b) {
                    Some(next) => Ok((date, b, next)),
                    None => Err(TaxError::Overflow {
                        document_id: document_id.clone(),
                    }),
                });

            match result {
                Ok((date, breakdown, next)) => {
                    totals = next;
                    breakdowns.push(DatedBreakdown {
                        date: date.format("%Y-%m-%d").to_string(),
                        total: breakdown.total(),
                        breakdown,
                    });
                }
                Err(err) => {
                    log::warn!("Skipping document {} (row {}): {}", document_id, i + 1, err);
                    rejected.push(Rejection {
                        row: i + 1,
                        document_id,
                        date: raw_date,
                        reason: err.to_string(),
                    });
                }
            }
        }
        log::info!(
            "Computed {} documents, {} rejected, engines used: {:?}",
            breakdowns.len(),
            rejected.len(),
            dispatcher.cached_regimes()
        );

        let output = ComputeOutput {
            total: totals.total,
            test_total: totals.test_total,
            breakdowns,
            rejected,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if self.csv {
            write_csv(&line_rows(&output))?;
        } else {
            print_table(&output);
        }

        // Exit with code 1 if any document was rejected
        if !output.rejected.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn line_rows(output: &ComputeOutput) -> Vec<LineRow> {
    output
        .breakdowns
        .iter()
        .flat_map(|dated| {
            dated.breakdown.lines.iter().map(|line| LineRow {
                document_id: dated.breakdown.document_id.clone(),
                date: dated.date.clone(),
                regime: dated.breakdown.regime.to_string(),
                tax: line.tax.to_string(),
                base: format!("{:.2}", line.base),
                rate: format_rate(line.rate),
                amount: format!("{:.2}", line.amount),
            })
        })
        .collect()
}

fn print_table(output: &ComputeOutput) {
    let rows = line_rows(output);
    if rows.is_empty() {
        println!("No tax lines computed");
    } else {
        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(4..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    println!();
    println!("Documents computed: {}", output.breakdowns.len());
    println!("Total owed:         {:.2}", output.total);
    if !output.test_total.is_zero() {
        println!("Test-year (offset): {:.2}", output.test_total);
    }

    if !output.rejected.is_empty() {
        println!();
        println!("\u{26A0} {} document(s) rejected:", output.rejected.len());
        for r in &output.rejected {
            println!("  Row {}. {} '{}': {}", r.row, r.document_id, r.date, r.reason);
        }
    }
}

fn write_csv(rows: &[LineRow]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Rate as a percentage, trailing zeros trimmed (0.0165 -> "1.65%")
fn format_rate(rate: Decimal) -> String {
    let pct = (rate * Decimal::ONE_HUNDRED).normalize();
    format!("{}%", pct)
}

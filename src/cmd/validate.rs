//! Validate command - reject effective dates outside the supported range
//! without computing anything

use clap::Args;
use reforma::regime::{determine_regime_type, is_date_supported, UnsupportedDateError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// CSV file with a `date` column (other columns are ignored)
    #[arg(short, long)]
    dates: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct DateRecord {
    date: String,
}

/// A rejected row for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    /// 1-based data row number (header excluded)
    row: usize,
    date: String,
    #[serde(rename = "type")]
    issue_type: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ValidationOutput {
    row_count: usize,
    valid_count: usize,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let reader = BufReader::new(File::open(&self.dates)?);
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut row_count = 0;
        let mut issues = Vec::new();
        for (i, record) in rdr.deserialize::<DateRecord>().enumerate() {
            row_count += 1;
            let record = match record {
                Ok(record) => record,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    log::warn!("Row {}: {}", i + 1, err);
                    issues.push(ValidationIssue {
                        row: i + 1,
                        date: String::new(),
                        issue_type: "MalformedRow",
                        message: err.to_string(),
                    });
                    continue;
                }
            };
            match is_date_supported(&record.date) {
                Ok(date) => {
                    log::debug!("Row {}: {} -> {}", i + 1, date, determine_regime_type(date));
                }
                Err(err) => {
                    log::warn!("Row {}: {}", i + 1, err);
                    issues.push(ValidationIssue {
                        row: i + 1,
                        date: record.date,
                        issue_type: issue_type_name(&err),
                        message: err.to_string(),
                    });
                }
            }
        }
        log::info!("Validated {} dates, {} rejected", row_count, issues.len());

        let output = ValidationOutput {
            row_count,
            valid_count: row_count - issues.len(),
            issue_count: issues.len(),
            issues,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&output);
        }

        // Exit with code 1 if issues found
        if output.issue_count > 0 {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(output: &ValidationOutput) {
    println!();
    println!("VALIDATION RESULTS ({} dates)", output.row_count);
    println!();

    if output.issues.is_empty() {
        println!("\u{2713} All dates supported.");
        return;
    }

    println!("\u{26A0} {} date(s) rejected:", output.issue_count);
    println!();
    for issue in &output.issues {
        println!("  Row {}. [{}] '{}'", issue.row, issue.issue_type, issue.date);
        println!("     {}", issue.message);
        println!();
    }
}

fn issue_type_name(err: &UnsupportedDateError) -> &'static str {
    match err {
        UnsupportedDateError::InvalidDate { .. } => "InvalidDate",
        UnsupportedDateError::BeforeSupportedRange { .. } => "BeforeSupportedRange",
        UnsupportedDateError::AfterSupportedRange { .. } => "AfterSupportedRange",
    }
}

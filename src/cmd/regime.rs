//! Regime command - classification and applicable taxes for one date

use clap::Args;
use reforma::regime::{
    is_date_supported, milestones_in_year, period_info, RegimePeriodInfo, RegimeType,
};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct RegimeCommand {
    /// Effective date (YYYY-MM-DD)
    #[arg(short, long)]
    date: String,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct RegimeOutput {
    date: String,
    #[serde(flatten)]
    info: RegimePeriodInfo,
    /// Calendar years the regime covers
    years: String,
    tax_codes: Vec<String>,
    milestones: Vec<&'static str>,
}

impl RegimeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let date = is_date_supported(&self.date)?;
        let info = period_info(date)?;
        let milestones = milestones_in_year(info.year)
            .map(|m| m.description)
            .collect();

        let output = RegimeOutput {
            date: date.format("%Y-%m-%d").to_string(),
            years: year_span(info.regime),
            tax_codes: info.tax_codes(),
            info,
            milestones,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&output);
        }
        Ok(())
    }
}

fn print_text(output: &RegimeOutput) {
    println!();
    println!("REGIME FOR {}", output.date);
    println!();
    println!("  Regime:      {}", output.info.regime);
    println!("  Year:        {} (regime covers {})", output.info.year, output.years);
    println!("  Description: {}", output.info.description);
    println!("  Taxes:       {}", output.tax_codes.join(", "));
    for milestone in &output.milestones {
        println!("  Milestone:   {}", milestone);
    }
    println!();
}

fn year_span(regime: RegimeType) -> String {
    match regime.years() {
        (Some(from), Some(to)) => format!("{}-{}", from, to),
        (Some(from), None) => format!("{} onwards", from),
        (None, Some(to)) => format!("up to {}", to),
        (None, None) => "all years".to_string(),
    }
}

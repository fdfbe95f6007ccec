//! Milestones command - the reform timeline

use clap::Args;
use reforma::regime::{milestones_in_year, reform_milestones, Milestone};
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct MilestonesCommand {
    /// Only milestones taking effect in this year
    #[arg(short, long)]
    year: Option<i32>,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled)]
struct MilestoneRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Milestone")]
    description: &'static str,
    #[tabled(rename = "Changes")]
    changes: String,
}

impl From<&Milestone> for MilestoneRow {
    fn from(m: &Milestone) -> Self {
        MilestoneRow {
            date: m.date.format("%Y-%m-%d").to_string(),
            description: m.description,
            changes: m
                .changes
                .iter()
                .map(|c| format!("- {c}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl MilestonesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let milestones: Vec<&Milestone> = match self.year {
            Some(year) => milestones_in_year(year).collect(),
            None => reform_milestones().iter().collect(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&milestones)?);
            return Ok(());
        }

        if milestones.is_empty() {
            println!("No milestones found matching filters");
            return Ok(());
        }

        let rows: Vec<MilestoneRow> = milestones.into_iter().map(MilestoneRow::from).collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .to_string();
        println!("{}", table);
        Ok(())
    }
}

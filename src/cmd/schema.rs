//! Schema command - print expected input formats

use clap::Args;
use reforma::document::DocumentInput;
use reforma::regime::{max_supported_date, min_supported_date};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or csv-header
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the document input
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(DocumentInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => {
                let columns: Vec<_> = CSV_FIELDS.iter().map(|(name, _, _)| *name).collect();
                println!("{}", columns.join(","));
            }
            SchemaFormat::CsvFields => print_csv_fields(),
        }
        Ok(())
    }
}

fn print_csv_fields() {
    println!("CSV Input Format");
    println!("================");
    println!();
    for (name, required, description) in CSV_FIELDS {
        let req = if *required { "required" } else { "optional" };
        println!("{:16} ({:8})  {}", name, req, description);
    }
    println!();
    println!(
        "Supported dates: {} to {}",
        min_supported_date(),
        max_supported_date()
    );
}

const CSV_FIELDS: &[(&str, bool, &str)] = &[
    ("id", true, "Document identifier (e.g. NF-e access key)"),
    ("date", true, "Effective date (YYYY-MM-DD)"),
    ("kind", true, "Goods or Services"),
    ("amount", true, "Operation value in BRL"),
    ("ipi_rate", false, "IPI rate for goods, pre-2027 only (e.g. 0.10)"),
    ("selective_rate", false, "Selective tax (IS) rate, 2027 onwards"),
    ("description", false, "Optional description"),
];

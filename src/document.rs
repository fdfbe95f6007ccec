//! Fiscal document input (CSV or JSON)

use crate::regime::{is_date_supported, UnsupportedDateError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An input row that could not be read as a document.
///
/// `id` and `date` are recovered from the raw row when present so the row can
/// still be reported.
#[derive(Debug, thiserror::Error)]
#[error("malformed row: {source}")]
pub struct MalformedRow {
    pub id: Option<String>,
    pub date: Option<String>,
    pub source: DocumentError,
}

/// Rows in input order, each read independently
pub type DocumentRows = Vec<Result<DocumentRow, MalformedRow>>;

/// What the document supplies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum DocumentKind {
    /// Supply of goods (ICMS/IPI side of the legacy system)
    #[default]
    Goods,
    /// Supply of services (ISS side of the legacy system)
    Services,
}

/// A fiscal document ready for tax computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FiscalDocument {
    pub id: String,
    pub kind: DocumentKind,
    /// Operation value in BRL, the base for every tax line
    #[schemars(with = "f64")]
    pub amount: Decimal,
    /// IPI rate for goods under the current regime (e.g. 0.10)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub ipi_rate: Option<Decimal>,
    /// Selective tax (IS) rate, set only for goods subject to IS
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub selective_rate: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One input row: a document plus its (unvalidated) effective date
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocumentRow {
    pub id: String,
    /// Effective date, YYYY-MM-DD. Kept as text so bad rows can be rejected individually.
    pub date: String,
    pub kind: DocumentKind,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub ipi_rate: Option<Decimal>,
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub selective_rate: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

impl DocumentRow {
    /// Validate the effective date and split the row into date and document
    pub fn into_document(self) -> Result<(NaiveDate, FiscalDocument), UnsupportedDateError> {
        let date = is_date_supported(&self.date)?;
        Ok((
            date,
            FiscalDocument {
                id: self.id,
                kind: self.kind,
                amount: self.amount,
                ipi_rate: self.ipi_rate,
                selective_rate: self.selective_rate,
                description: self.description,
            },
        ))
    }
}

/// JSON input root
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocumentInput {
    pub documents: Vec<DocumentRow>,
}

/// Read CSV rows; a row that fails to parse does not stop the rest.
///
/// Only a missing header row or an I/O failure fails the whole read.
pub fn read_csv<R: Read>(reader: R) -> Result<DocumentRows, DocumentError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let (id_column, date_column) = (column("id"), column("date"));

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                rows.push(Err(MalformedRow {
                    id: None,
                    date: None,
                    source: err.into(),
                }));
                continue;
            }
        };
        let field = |i: Option<usize>| i.and_then(|i| record.get(i)).map(str::to_string);
        let row = record
            .deserialize::<DocumentRow>(Some(&headers))
            .map_err(|err| MalformedRow {
                id: field(id_column),
                date: field(date_column),
                source: err.into(),
            });
        rows.push(row);
    }
    log::info!("Read {} csv records", rows.len());
    Ok(rows)
}

/// JSON root with documents left undecoded, so each converts on its own
#[derive(Deserialize)]
struct RawDocumentInput {
    documents: Vec<serde_json::Value>,
}

/// Read JSON documents; the root must parse, individual documents may not.
pub fn read_json<R: Read>(reader: R) -> Result<DocumentRows, DocumentError> {
    let input: RawDocumentInput = serde_json::from_reader(reader)?;
    let rows: DocumentRows = input
        .documents
        .into_iter()
        .map(|value| {
            let id = value.get("id").and_then(|v| v.as_str()).map(str::to_string);
            let date = value.get("date").and_then(|v| v.as_str()).map(str::to_string);
            serde_json::from_value::<DocumentRow>(value).map_err(|err| MalformedRow {
                id,
                date,
                source: err.into(),
            })
        })
        .collect();
    log::info!("Read {} json documents", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn reads_csv_with_optional_columns() {
        let data = "\
id,date,kind,amount,ipi_rate,selective_rate,description
nf-1,2025-03-10,Goods,1000.00,0.10,,Steel beams
nf-2,2030-06-15,Services,250,,,
";
        let rows: Vec<_> = read_csv(data.as_bytes())
            .unwrap()
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ipi_rate, Some(dec!(0.10)));
        assert_eq!(rows[0].description.as_deref(), Some("Steel beams"));
        assert_eq!(rows[1].kind, DocumentKind::Services);
        assert_eq!(rows[1].ipi_rate, None);
        assert_eq!(rows[1].description, None);
    }

    #[test]
    fn reads_json_documents() {
        let data = r#"{"documents": [
            {"id": "nf-9", "date": "2034-01-02", "kind": "Goods", "amount": "99.90", "selective_rate": "0.25"}
        ]}"#;
        let rows = read_json(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_ref().unwrap().selective_rate, Some(dec!(0.25)));
    }

    #[test]
    fn malformed_csv_rows_do_not_stop_the_batch() {
        let data = "\
id,date,kind,amount,ipi_rate,selective_rate,description
nf-ok,2030-06-15,Goods,100,,,
nf-bad,2030-06-15,goods,100,,,
nf-short,2030-06-15
nf-last,2033-01-01,Services,5,,,
";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].as_ref().unwrap().id, "nf-ok");

        let bad = rows[1].as_ref().unwrap_err();
        assert_eq!(bad.id.as_deref(), Some("nf-bad"));
        assert_eq!(bad.date.as_deref(), Some("2030-06-15"));
        assert!(bad.to_string().contains("malformed row"));

        assert!(rows[2].is_err());
        assert_eq!(rows[3].as_ref().unwrap().id, "nf-last");
    }

    #[test]
    fn malformed_json_document_keeps_its_id() {
        let data = r#"{"documents": [
            {"id": "nf-1", "date": "2034-01-02", "kind": "Goods", "amount": "10"},
            {"id": "nf-2", "date": "2034-01-02", "kind": "Goods", "amount": "lots"}
        ]}"#;
        let rows = read_json(data.as_bytes()).unwrap();
        assert!(rows[0].is_ok());
        let bad = rows[1].as_ref().unwrap_err();
        assert_eq!(bad.id.as_deref(), Some("nf-2"));
        assert!(matches!(bad.source, DocumentError::Json(_)));
    }

    #[test]
    fn unreadable_json_root_fails_the_read() {
        assert!(read_json("not json".as_bytes()).is_err());
    }

    #[test]
    fn invalid_date_rejects_row() {
        let row = DocumentRow {
            id: "nf-x".to_string(),
            date: "2019-12-31".to_string(),
            kind: DocumentKind::Goods,
            amount: dec!(10),
            ipi_rate: None,
            selective_rate: None,
            description: None,
        };
        assert!(matches!(
            row.into_document(),
            Err(UnsupportedDateError::BeforeSupportedRange { .. })
        ));
    }

    #[test]
    fn valid_row_splits_into_document() {
        let row = DocumentRow {
            id: "nf-1".to_string(),
            date: "2026-06-15".to_string(),
            kind: DocumentKind::Services,
            amount: dec!(500),
            ipi_rate: None,
            selective_rate: None,
            description: Some("Consulting".to_string()),
        };
        let (date, doc) = row.into_document().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 6, 15).unwrap());
        assert_eq!(doc.id, "nf-1");
        assert_eq!(doc.amount, dec!(500));
    }
}

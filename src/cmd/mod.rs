pub mod compute;
pub mod milestones;
pub mod regime;
pub mod schema;
pub mod validate;

use reforma::document::{self, DocumentRows};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read document rows from CSV or JSON (by extension), or JSON on stdin with "-"
pub fn read_documents(path: &Path) -> anyhow::Result<DocumentRows> {
    if path.as_os_str() == "-" {
        return read_from_stdin();
    }

    let reader = BufReader::new(File::open(path)?);
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let rows = if is_json {
        document::read_json(reader)?
    } else {
        document::read_csv(reader)?
    };
    Ok(rows)
}

fn read_from_stdin() -> anyhow::Result<DocumentRows> {
    let mut buffer = Vec::new();
    io::stdin().lock().read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    Ok(document::read_json(io::Cursor::new(buffer))?)
}

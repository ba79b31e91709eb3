use std::{collections::HashSet, fs::File, path::Path};

use csv::{ReaderBuilder, Trim, Writer};

use crate::{
    error::{Error, Result},
    posting::{Posting, RawPosting, Schema},
};

/// A raw export: its header plus every row, in file order.
#[derive(Debug)]
pub struct RawTable {
    pub schema: Schema,
    pub rows: Vec<RawPosting>,
}

/// Reads a raw CSV export. Cells are trimmed; short rows are padded and long
/// rows truncated to the header width.
pub fn read_raw(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(Error::io(path))?;
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(Error::csv(path))?
        .iter()
        .map(String::from)
        .collect::<Vec<_>>();
    let schema = Schema::new(headers).map_err(|column| Error::MissingColumn {
        path: path.to_path_buf(),
        column,
    })?;
    log::info!("Columns: {:?}", schema.headers);

    let width = schema.headers.len();
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(Error::csv(path))?;
        let mut values = record.iter().map(String::from).collect::<Vec<_>>();
        if values.len() != width {
            log::warn!(
                "Row {} has {} fields, expected {}",
                idx + 1,
                values.len(),
                width,
            );
            values.resize(width, String::new());
        }
        rows.push(RawPosting { values });
    }

    Ok(RawTable { schema, rows })
}

/// Keeps the first of each set of identical rows.
pub fn drop_duplicates(rows: Vec<RawPosting>) -> Vec<RawPosting> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect()
}

/// Drops postings whose title normalizes to nothing.
pub fn drop_untitled(postings: Vec<Posting>) -> Vec<Posting> {
    postings
        .into_iter()
        .filter(|posting| !posting.job_title_norm.is_empty())
        .collect()
}

/// Writes the clean table: the original columns followed by the derived ones.
/// Creates the parent directory and overwrites any existing file.
pub fn write_clean(path: &Path, headers: &[String], postings: &[Posting]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(Error::io(dir))?;
    }

    let mut writer = Writer::from_path(path).map_err(Error::csv(path))?;
    writer
        .write_record(headers.iter().cloned().chain(Posting::derived_headers()))
        .map_err(Error::csv(path))?;
    for posting in postings {
        writer
            .write_record(
                posting
                    .raw
                    .values
                    .iter()
                    .cloned()
                    .chain(posting.derived_values()),
            )
            .map_err(Error::csv(path))?;
    }
    writer.flush().map_err(Error::io(path))?;

    Ok(())
}

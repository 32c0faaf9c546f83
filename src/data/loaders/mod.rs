// mod.rs - Input table loaders

pub mod genome_table;
pub mod reads;

pub use genome_table::load_genome_table;
pub use reads::{load_reads, ReadTableReader};

use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

use crate::error::{Result, SspError};

/// Tab-delimited reader shared by the loaders: no header, `#` comments,
/// variable column counts
fn tab_reader(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| SspError::io(path, e))?;
    Ok(ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file))
}

fn record_line(record: &csv::StringRecord, fallback: usize) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(fallback)
}

fn csv_error(path: &Path, line: usize, err: csv::Error) -> SspError {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => SspError::io(path, e),
        kind => SspError::Parse {
            path: path.to_path_buf(),
            line,
            message: format!("{:?}", kind),
        },
    }
}

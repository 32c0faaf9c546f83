// reads.rs - Plain read table loader
//
// Format: chrom<TAB>start<TAB>strand[<TAB>read_length[<TAB>duplicate]]
// `start` is the 0-based 5' position of the sequenced end.

use super::{csv_error, record_line, tab_reader};
use crate::data::genome::GenomeReads;
use crate::data::read::{Fragment, Strand};
use crate::error::{Result, SspError};
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

const DEFAULT_READ_LENGTH: u32 = 36;

/// Streaming reader yielding one fragment per table line
pub struct ReadTableReader {
    records: csv::StringRecordsIntoIter<File>,
    path: PathBuf,
    count: usize,
}

impl ReadTableReader {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            records: tab_reader(path)?.into_records(),
            path: path.to_path_buf(),
            count: 0,
        })
    }

    fn parse(&self, record: &csv::StringRecord) -> Result<Fragment> {
        let line = record_line(record, self.count);
        let parse_err = |message: String| SspError::Parse {
            path: self.path.clone(),
            line,
            message,
        };

        if record.len() < 3 {
            return Err(parse_err(format!(
                "expected at least 3 columns, found {}",
                record.len()
            )));
        }

        let f3 = record[1]
            .parse::<u32>()
            .map_err(|_| parse_err(format!("invalid start position '{}'", &record[1])))?;
        let strand = record[2].parse::<Strand>().map_err(parse_err)?;
        let readlen = match record.get(3).filter(|s| !s.is_empty()) {
            Some(s) => s
                .parse::<u32>()
                .map_err(|_| parse_err(format!("invalid read length '{}'", s)))?,
            None => DEFAULT_READ_LENGTH,
        };
        let duplicate = match record.get(4).filter(|s| !s.is_empty()) {
            Some("1") | Some("true") | Some("dup") => true,
            Some("0") | Some("false") | None => false,
            Some(other) => {
                return Err(parse_err(format!("invalid duplicate flag '{}'", other)));
            }
        };

        let mut frag = Fragment::single_end(&record[0], strand, f3, readlen);
        frag.duplicate = duplicate;
        Ok(frag)
    }
}

impl Iterator for ReadTableReader {
    type Item = Result<Fragment>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        self.count += 1;
        Some(
            record
                .map_err(|e| csv_error(&self.path, self.count, e))
                .and_then(|r| self.parse(&r)),
        )
    }
}

/// Load a read table into `genome`. Reads on unknown chromosomes are
/// dropped with a warning; malformed lines abort loading.
pub fn load_reads(path: &Path, genome: &mut GenomeReads) -> Result<u64> {
    let mut parse_error = None;
    let fragments = ReadTableReader::open(path)?.map_while(|r| match r {
        Ok(frag) => Some(frag),
        Err(e) => {
            parse_error = Some(e);
            None
        }
    });
    let kept = genome.ingest(fragments);

    if let Some(e) = parse_error {
        return Err(e);
    }
    info!("Loaded {} reads from {}", kept, path.display());
    Ok(kept)
}

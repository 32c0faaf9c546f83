// genome_table.rs - Genome table loader (chromosome registry)

use super::{csv_error, record_line, tab_reader};
use crate::data::genome::{ChromosomeClass, ChromosomeInfo, ChromosomeRegistry};
use crate::error::{Result, SspError};
use log::info;
use std::path::Path;

/// Load `name<TAB>length[<TAB>autosome|allosome]` lines into a registry.
/// Without a class column the class is inferred from the name.
pub fn load_genome_table(path: &Path) -> Result<ChromosomeRegistry> {
    let mut reader = tab_reader(path)?;
    let mut registry = ChromosomeRegistry::new();

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(path, i + 1, e))?;
        let line = record_line(&record, i + 1);
        let parse_err = |message: String| SspError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        };

        if record.len() < 2 {
            return Err(parse_err(format!(
                "expected at least 2 columns, found {}",
                record.len()
            )));
        }

        let name = &record[0];
        let len = record[1]
            .parse::<u64>()
            .map_err(|_| parse_err(format!("invalid chromosome length '{}'", &record[1])))?;
        if len == 0 {
            return Err(parse_err(format!("chromosome '{}' has zero length", name)));
        }

        let chrom = match record.get(2).filter(|s| !s.is_empty()) {
            Some(class) => {
                ChromosomeInfo::with_class(name, len, ChromosomeClass::parse(class).map_err(parse_err)?)
            }
            None => ChromosomeInfo::new(name, len),
        };
        registry.register(chrom)?;
    }

    if registry.is_empty() {
        return Err(SspError::Configuration(format!(
            "Genome table '{}' lists no chromosomes",
            path.display()
        )));
    }

    info!(
        "Loaded {} chromosomes from genome table {}",
        registry.len(),
        path.display()
    );
    Ok(registry)
}

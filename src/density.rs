// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Reading of whitespace-delimited lipid density tables. Each line carries the
//! per-bin densities of the full-length system and the TMD system at fixed
//! column offsets; the remaining columns are metadata and ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::Path;

use anyhow::Result;

use crate::errors;

/// Columns holding the full-length system densities.
pub(crate) const FULL_LENGTH_COLUMNS: Range<usize> = 2..7;
/// Columns holding the TMD system densities.
pub(crate) const TMD_COLUMNS: Range<usize> = 9..15;

/// Densities of one bin, for both compared systems.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityRow {
    pub full_length: Vec<f64>,
    pub tmd: Vec<f64>,
}

fn parse_block(fields: &[&str], columns: Range<usize>, line: usize) -> Result<Vec<f64>> {
    fields[columns]
        .iter()
        .map(|field| {
            field.parse::<f64>().map_err(|_| {
                errors::Error::InvalidField {
                    line,
                    field: (*field).to_owned(),
                }
                .into()
            })
        })
        .collect()
}

/// Read a density file into per-bin rows. Blank lines are skipped; lines with
/// fewer columns than the highest used offset are an error.
pub fn read_density_file<P: AsRef<Path>>(path: P) -> Result<Vec<DensityRow>> {
    info!("Reading density file {}...", path.as_ref().display());

    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut rows = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < TMD_COLUMNS.end {
            return Err(errors::Error::TruncatedLine {
                line: i + 1,
                expected: TMD_COLUMNS.end,
                found: fields.len(),
            }
            .into());
        }

        rows.push(DensityRow {
            full_length: parse_block(&fields, FULL_LENGTH_COLUMNS, i + 1)?,
            tmd: parse_block(&fields, TMD_COLUMNS, i + 1)?,
        });
    }

    if rows.is_empty() {
        return Err(errors::Error::NoRecordsFound {
            path: path.as_ref().to_owned(),
        }
        .into());
    }
    debug!("{} density rows read.", rows.len());

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn density_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_density_file() {
        let file = density_file(
            "bin0 0.0 1.0 2.0 3.0 4.0 5.0 x y 6.0 7.0 8.0 9.0 10.0 11.0 trailing\n\
             \n\
             bin1 0.0 1.5 2.5 3.5 4.5 5.5 x y 6.5 7.5 8.5 9.5 10.5 11.5\n",
        );
        let rows = read_density_file(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].full_length, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(rows[0].tmd, vec![6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
        assert_eq!(rows[1].full_length, vec![1.5, 2.5, 3.5, 4.5, 5.5]);
        assert_eq!(rows[1].tmd, vec![6.5, 7.5, 8.5, 9.5, 10.5, 11.5]);
    }

    #[test]
    fn test_truncated_line() {
        let file = density_file("bin0 0.0 1.0 2.0 3.0\n");
        let err = read_density_file(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<crate::errors::Error>(),
            Some(&crate::errors::Error::TruncatedLine {
                line: 1,
                expected: 15,
                found: 5,
            })
        );
    }

    #[test]
    fn test_invalid_field() {
        let file =
            density_file("bin0 0.0 1.0 2.0 3.0 4.0 5.0 x y 6.0 7.0 oops 9.0 10.0 11.0\n");
        let err = read_density_file(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<crate::errors::Error>(),
            Some(&crate::errors::Error::InvalidField {
                line: 1,
                field: "oops".to_owned(),
            })
        );
    }

    #[test]
    fn test_empty_file() {
        let file = density_file("");
        assert!(read_density_file(file.path()).is_err());
    }
}

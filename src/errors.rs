use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub(crate) enum Error {
    #[error("invalid alpha {alpha}, must lie in the interval (0, 1]")]
    InvalidAlpha { alpha: f64 },
    #[error("truncated line {line} in density file: expected at least {expected} columns, found {found}")]
    TruncatedLine {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid numeric field '{field}' in line {line} of density file")]
    InvalidField { line: usize, field: String },
    #[error("no density rows found in {path}")]
    NoRecordsFound { path: PathBuf },
}

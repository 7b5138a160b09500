use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoorageError {
    #[error("Invalid stay detection parameter: {0}")]
    InvalidStayParameter(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV reader error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON configuration error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid value for field `{field}`: {value:?}")]
    InvalidNumericField { field: &'static str, value: String },

    #[error("AIS batch column `{column}` has {found} values, expected {expected}")]
    BatchLengthMismatch {
        column: &'static str,
        expected: usize,
        found: usize,
    },
}

impl PartialEq for MoorageError {
    fn eq(&self, other: &Self) -> bool {
        use MoorageError::*;
        match (self, other) {
            (InvalidStayParameter(a), InvalidStayParameter(b)) => a == b,

            // Not comparable: equal when the variant matches
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (JsonError(_), JsonError(_)) => true,

            (Utf8PathError(a), Utf8PathError(b)) => a == b,
            (InvalidTimestamp(a), InvalidTimestamp(b)) => a == b,
            (
                InvalidNumericField { field: fa, value: va },
                InvalidNumericField { field: fb, value: vb },
            ) => fa == fb && va == vb,
            (
                BatchLengthMismatch {
                    column: ca,
                    expected: ea,
                    found: fa,
                },
                BatchLengthMismatch {
                    column: cb,
                    expected: eb,
                    found: fb,
                },
            ) => ca == cb && ea == eb && fa == fb,

            _ => false,
        }
    }
}

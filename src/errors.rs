use thiserror::Error;

/// Failures that invalidate the whole digest. None of these are recoverable
/// mid-run: a partial report would misstate the aggregate numbers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    #[error("malformed card identifier \"{0}\": expected an 8 hex character timestamp prefix")]
    MalformedIdentifier(String),
    #[error("unsupported action type \"{0}\"")]
    UnsupportedActionType(String),
    #[error("no list found for id \"{0}\"")]
    UnknownListId(String),
}

use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The inference endpoint could not be reached.
    Unavailable,
    /// The endpoint answered, but refused or failed the request.
    Rejected,
    /// Any other errors, such as a malformed response.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Unavailable => write!(f, "Model endpoint unavailable"),
            ErrorKind::Rejected => write!(f, "Request rejected by model"),
            ErrorKind::Other => write!(f, "Model error"),
        }
    }
}

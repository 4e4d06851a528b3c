//! Operation outcomes reported to the workload driver

use std::fmt;

/// Result of one adapter operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// The operation failed; carries a human-readable reason
    Error(String),
    /// The operation is not offered by this store
    NotImplemented,
}

impl Status {
    pub fn error(reason: impl fmt::Display) -> Self {
        Status::Error(reason.to_string())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }

    /// Short label for metrics and summaries
    pub fn label(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Error(_) => "error",
            Status::NotImplemented => "not_implemented",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Error(reason) => write!(f, "ERROR: {}", reason),
            Status::NotImplemented => write!(f, "NOT_IMPLEMENTED"),
        }
    }
}

/// Operations of the workload contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Read,
    Insert,
    Update,
    Delete,
    Scan,
}

impl Operation {
    pub const ALL: [Operation; 5] =
        [Operation::Read, Operation::Insert, Operation::Update, Operation::Delete, Operation::Scan];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Scan => "scan",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

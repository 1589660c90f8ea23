use thiserror::Error;

/// Result alias for `clustermap`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by parsing, preprocessing, and clustering.
///
/// Every failure is a deterministic function of the input: nothing is
/// retried, and no operation substitutes a default on bad input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Structurally invalid text (too few lines, ragged rows, unparsable numbers).
    #[error("malformed input{}: {message}", line_suffix(.line))]
    MalformedInput {
        /// 1-based line number, when the failure is tied to one line.
        line: Option<usize>,
        /// Human-readable description.
        message: String,
    },

    /// Data that cannot be transformed or measured (non-finite, out of log domain).
    #[error("invalid value: {message}")]
    InvalidValue {
        /// Human-readable description naming the offending row/column.
        message: String,
    },

    /// Too few items to cluster, or an unknown/incompatible metric or method.
    #[error("degenerate input: {message}")]
    DegenerateInput {
        /// Human-readable description.
        message: String,
    },

    /// A linkage tree that references missing ids or revisits a cluster.
    ///
    /// Never produced from [`crate::cluster::cluster`] output; seeing it means
    /// a tree was built or edited elsewhere.
    #[error("corrupt linkage tree: {message}")]
    CorruptTree {
        /// Human-readable description.
        message: String,
    },
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(l) => format!(" at line {l}"),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn malformed(line: Option<usize>, message: impl Into<String>) -> Self {
        Error::MalformedInput {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_value(message: impl Into<String>) -> Self {
        Error::InvalidValue {
            message: message.into(),
        }
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        Error::DegenerateInput {
            message: message.into(),
        }
    }

    pub(crate) fn corrupt_tree(message: impl Into<String>) -> Self {
        Error::CorruptTree {
            message: message.into(),
        }
    }

    /// True for internal invariant violations, as opposed to bad user input.
    ///
    /// Callers should log these on a separate channel from input errors.
    pub fn is_defect(&self) -> bool {
        matches!(self, Error::CorruptTree { .. })
    }
}

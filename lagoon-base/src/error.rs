// We want a few things here:
// 1. A way to create a new error with a backtrace
// 2. A way to centralize setting a breakpoint to trap any error in the system fairly soon
//    after it's created
// 3. Same but for logging / emitting error messages into the tracing/logging system
// 4. A kind tag, so callers can tell the handful of failure classes apart
//    without parsing messages

use backtrace_error::DynBacktraceError;
use std::borrow::Cow;
use tracing::error;

#[cfg(test)]
use test_log::test;

// The failure classes the engine distinguishes. Broken internal contracts
// (out-of-range indexing and the like) are bugs and panic instead; the one
// exception is InvariantViolation, used where a contract check sits on an
// already-fallible path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvariantViolation,
    InvalidArgument,
    TypeMismatch,
    NullDereference,
    NameExists,
    NoSuchName,
    CapacityExceeded,
    NotNullable,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    inner: DynBacktraceError,
}
pub type Result<T> = std::result::Result<T, Error>;

struct KindErr(Cow<'static, str>);
impl std::fmt::Debug for KindErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for KindErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for KindErr {}

impl Error {
    pub fn new<E: std::error::Error + Send + Sync + 'static>(kind: ErrorKind, err: E) -> Error {
        error!(target: "lagoon", "{:?}: {:?}", kind, err);
        let inner = DynBacktraceError::from(err);
        Error { kind, inner }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn backtrace(&self) -> &DynBacktraceError {
        &self.inner
    }
}

pub fn err(kind: ErrorKind, msg: impl Into<Cow<'static, str>>) -> Error {
    let err = KindErr(msg.into());
    Error::new(kind, err)
}

#[test]
fn test_error() {
    let err = err(ErrorKind::TypeMismatch, "test error");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

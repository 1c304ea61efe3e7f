use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;

/// Outcome of a command handler or of the dispatcher itself.
///
/// Mirrors the `CMDLINE_RETCODE_*` constants of the system this crate's
/// command table is modelled on. Negative values are failures, `0` is
/// success, and the two positive values ask the pipeline to wait.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RetCode {
    Success,
    ExecutingContinue,
    Busy,
    Fail,
    InvalidParameters,
    NotImplemented,
    HandlerMissing,
    NotFound,
    CommandNotFound,
}

impl RetCode {
    pub fn code(self) -> i32 {
        match self {
            RetCode::Success => 0,
            RetCode::ExecutingContinue => 1,
            RetCode::Busy => 2,
            RetCode::Fail => -1,
            RetCode::InvalidParameters => -2,
            RetCode::NotImplemented => -3,
            RetCode::HandlerMissing => -4,
            RetCode::NotFound => -5,
            RetCode::CommandNotFound => -6,
        }
    }

    pub fn from_code(code: i32) -> RetCode {
        match code {
            0 => RetCode::Success,
            1 => RetCode::ExecutingContinue,
            2 => RetCode::Busy,
            -2 => RetCode::InvalidParameters,
            -3 => RetCode::NotImplemented,
            -4 => RetCode::HandlerMissing,
            -5 => RetCode::NotFound,
            -6 => RetCode::CommandNotFound,
            _ => RetCode::Fail,
        }
    }

    pub fn is_failure(self) -> bool {
        self.code() < 0
    }
}

impl Display for RetCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Setup-time failure. Handler outcomes use [`RetCode`] instead; this type
/// is reserved for the small number of ways constructing or configuring
/// an `Interpreter` can go wrong.
#[derive(Debug)]
pub enum ShellError {
    ZeroCapacity(&'static str),
    Io(io::Error),
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            ShellError::ZeroCapacity(what) => write!(f, "{} capacity must be nonzero", what),
            ShellError::Io(ref e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ShellError::Io(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ShellError {
    fn from(e: io::Error) -> ShellError {
        ShellError::Io(e)
    }
}

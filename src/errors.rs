use std::io;
use std::str;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("fail to do I/O operations, {0}.")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Format(#[from] FormatError),
}

impl Error {
    /// The format failure, if this is not an I/O error.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            Error::Format(err) => Some(err),
            Error::Io(_) => None,
        }
    }
}

/// Why a file or a slice could not be decoded.
///
/// Every variant records the absolute file offset where the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("not a Mach-O file, magic 0x{magic:08x} at offset {offset}.")]
    NotMachO { magic: u32, offset: u64 },

    #[error("truncated {what} at offset {offset}, {needed} bytes needed but {available} available.")]
    Truncated {
        what: &'static str,
        offset: u64,
        needed: u64,
        available: u64,
    },

    #[error("malformed load command #{index} at offset {offset}, {reason}.")]
    MalformedCommand { index: u32, offset: u64, reason: String },

    #[error("strict mode rejected {0}")]
    Anomaly(Anomaly),
}

impl From<Anomaly> for FormatError {
    fn from(anomaly: Anomaly) -> Self {
        FormatError::Anomaly(anomaly)
    }
}

/// A non-fatal oddity; the slice model that carries it is still usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (offset {offset})")]
pub struct Anomaly {
    pub offset: u64,
    pub kind: AnomalyKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnomalyKind {
    #[error("load commands occupy {consumed} bytes but sizeofcmds declares {declared}")]
    SizeMismatch { declared: u32, consumed: u64 },

    #[error("duplicate entry point command {cmd:#x} ignored")]
    DuplicateEntryPoint { cmd: u32 },

    #[error("duplicate load command {cmd:#x} ignored")]
    DuplicateCommand { cmd: u32 },

    #[error("unknown load command {cmd:#x} with {cmdsize} bytes")]
    UnknownCommand { cmd: u32, cmdsize: u32 },

    #[error("load command {cmd:#x} could not be decoded, {reason}")]
    UndecodableCommand { cmd: u32, reason: String },

    #[error("dylib list is limited to {capacity} entries")]
    DylibLimitExceeded { capacity: usize },

    #[error("code signature [{dataoff}, +{datasize}) is outside the slice")]
    CodeSignatureOutOfBounds { dataoff: u32, datasize: u32 },

    #[error("string table [{stroff}, +{strsize}) is outside the slice")]
    SymbolTableOutOfBounds { stroff: u32, strsize: u32 },

    #[error("fat arch declares cputype {expected} but the slice header has {found}")]
    ArchMismatch { expected: i32, found: i32 },

    #[error("slice offset is not aligned to 2^{align}")]
    MisalignedSlice { align: u32 },
}

/// Why a single load command could not be interpreted.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("invalid UTF-8 string, {0}")]
    Utf8(#[from] str::Utf8Error),

    #[error("{0}")]
    Invalid(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

//! Mach-O inspection and hardening audit.
//!
//! ```no_run
//! let result = machound::parse_file("/bin/ls").unwrap();
//!
//! for slice in result.successes() {
//!     println!("{} pie={}", slice.arch_name(), slice.security().pie);
//! }
//! ```
#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;

mod commands;
mod consts;
#[cfg(feature = "display")]
mod display;
mod errors;
mod loader;
mod security;

pub use crate::commands::{
    BoundedVec, CodeSignatureSpan, CommandModel, CommandStats, DylibKind, DylibRef, EncryptionInfo, EntryPoint,
    FixedName, LinkEditData, LoadCommand, LoadCommandRecord, LoadCommands, OpaqueCommand, ReadNameExt, SegmentInfo,
    SymtabInfo, VersionTag,
};
pub use crate::consts::*;
pub use crate::errors::{Anomaly, AnomalyKind, DecodeError, Error, FormatError, Result};
pub use crate::loader::{
    parse_file, parse_file_with, sniff, Arch32, Arch64, BinaryFormat, ByteOrder, FatArch, FatHeader, MachArch,
    MachHeader, MachHeaderFlags, MachSlice, ParseOptions, ParseResult, SliceOutcome,
};
pub use crate::security::{BlobIndex, SecurityReport, SignatureDirectory};

use std::fmt;
use std::io::{Cursor, Read};
use std::marker::PhantomData;
use std::ops::Deref;
use std::str;

use byteorder::{ByteOrder, ReadBytesExt};
use memchr::memmem;
use uuid::Uuid;

use crate::consts::*;
use crate::errors::{Anomaly, AnomalyKind, DecodeError, FormatError};
use crate::loader::MachHeader;
use crate::security::SignatureDirectory;

/// The encoded version.
///
///  X.Y.Z is encoded in nibbles xxxx.yy.zz
///
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct VersionTag(pub u32);

impl VersionTag {
    pub fn major(self) -> u32 {
        self.0 >> 16
    }

    pub fn minor(self) -> u32 {
        (self.0 >> 8) & 0xFF
    }

    pub fn release(self) -> u32 {
        self.0 & 0xFF
    }
}

impl From<VersionTag> for u32 {
    fn from(tag: VersionTag) -> u32 {
        tag.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.release() == 0 {
            write!(f, "{}.{}", self.major(), self.minor())
        } else {
            write!(f, "{}.{}.{}", self.major(), self.minor(), self.release())
        }
    }
}

/// A fixed-width name field such as `segname`.
///
/// The field is NUL padded, but a name that uses every byte has no terminator at all,
/// so the width is authoritative and `is_terminated` reports which case was seen.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FixedName {
    name: String,
    terminated: bool,
}

impl FixedName {
    pub fn decode(raw: &[u8]) -> Result<FixedName, str::Utf8Error> {
        let (bytes, terminated) = match memchr::memchr(0, raw) {
            Some(end) => (&raw[..end], true),
            None => (raw, false),
        };

        Ok(FixedName {
            name: str::from_utf8(bytes)?.to_owned(),
            terminated,
        })
    }

    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl Deref for FixedName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.name.as_str()
    }
}

impl fmt::Display for FixedName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An owned sequence with an explicit capacity.
///
/// Pushing past the capacity keeps the existing items, counts the rejected ones,
/// and flips `is_truncated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedVec<T> {
    items: Vec<T>,
    capacity: usize,
    dropped: usize,
}

impl<T> BoundedVec<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        BoundedVec {
            items: Vec::new(),
            capacity,
            dropped: 0,
        }
    }

    /// Returns `false` if the item was rejected.
    pub fn push(&mut self, item: T) -> bool {
        if self.items.len() < self.capacity {
            self.items.push(item);
            true
        } else {
            self.dropped += 1;
            false
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }
}

impl<T> Deref for BoundedVec<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.items.as_slice()
    }
}

/// A segment of the file mapped into the task's address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentInfo {
    /// segment name
    pub name: FixedName,
    /// memory address of this segment
    pub vmaddr: u64,
    /// memory size of this segment
    pub vmsize: u64,
    /// file offset of this segment, relative to the slice
    pub fileoff: u64,
    /// amount to map from the file
    pub filesize: u64,
    /// maximum VM protection
    pub maxprot: vm_prot_t,
    /// initial VM protection
    pub initprot: vm_prot_t,
    /// number of sections in segment
    pub nsects: u32,
    /// flags
    pub flags: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DylibKind {
    Load,
    Weak,
    Reexport,
    Upward,
    Lazy,
}

/// A dynamically linked shared library, in load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DylibRef {
    pub kind: DylibKind,
    /// library's path name
    pub path: String,
    /// library's build time stamp
    pub timestamp: u32,
    /// library's current version number
    pub current_version: VersionTag,
    /// library's compatibility vers number
    pub compatibility_version: VersionTag,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// `LC_MAIN`, the file (__TEXT) offset of main()
    Main { entryoff: u64, stacksize: u64 },
    /// `LC_UNIXTHREAD`, the initial program counter (a virtual address)
    /// when the thread state flavor of the slice's cpu is understood
    UnixThread { flavor: u32, pc: Option<u64> },
}

impl EntryPoint {
    pub fn file_offset(&self) -> Option<u64> {
        match *self {
            EntryPoint::Main { entryoff, .. } => Some(entryoff),
            EntryPoint::UnixThread { .. } => None,
        }
    }
}

/// The offsets and sizes of a blob of data in the __LINKEDIT segment.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct LinkEditData {
    /// file offset of data in __LINKEDIT segment
    pub off: u32,
    /// file size of data in __LINKEDIT segment
    pub size: u32,
}

/// Where the code signature of a slice lives.
///
/// A span is only ever reported when `[file_offset, file_offset + datasize)` lies inside the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSignatureSpan {
    /// offset relative to the slice start, as stored in the command
    pub dataoff: u32,
    pub datasize: u32,
    /// absolute offset in the file
    pub file_offset: u64,
    /// the super-blob index, if the blob is an embedded signature
    pub directory: Option<SignatureDirectory>,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SymtabInfo {
    /// symbol table offset
    pub symoff: u32,
    /// number of symbol table entries
    pub nsyms: u32,
    /// string table offset
    pub stroff: u32,
    /// string table size in bytes
    pub strsize: u32,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct EncryptionInfo {
    /// file offset of encrypted range
    pub cryptoff: u32,
    /// file size of encrypted range
    pub cryptsize: u32,
    /// which enryption system, 0 means not-encrypted yet
    pub cryptid: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OpaqueCommand {
    pub cmd: u32,
    pub cmdsize: u32,
}

impl OpaqueCommand {
    pub fn name(&self) -> &'static str {
        LoadCommand::cmd_name(self.cmd).unwrap_or("LC_COMMAND")
    }
}

/// One load command record as found by the walker, before interpretation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadCommandRecord<'a> {
    pub index: u32,
    /// absolute file offset of the record
    pub offset: u64,
    pub cmd: u32,
    pub cmdsize: u32,
    /// the whole record, header included
    pub data: &'a [u8],
}

impl<'a> LoadCommandRecord<'a> {
    pub fn payload(&self) -> &'a [u8] {
        &self.data[LOAD_COMMAND_HEADER_SIZE..]
    }
}

/// Walks the `ncmds` load commands that follow a mach header.
///
/// The walk is driven by offsets only, so a clone (or `restart`) replays it from the first record.
/// After the first error the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct LoadCommands<'a, O> {
    data: &'a [u8],
    base: u64,
    start: usize,
    ncmds: u32,
    sizeofcmds: u32,
    index: u32,
    consumed: u64,
    failed: bool,
    order: PhantomData<O>,
}

impl<'a, O: ByteOrder> LoadCommands<'a, O> {
    /// `data` is the whole slice and `base` its offset in the file.
    pub fn new(
        data: &'a [u8],
        base: u64,
        header: &MachHeader,
        header_size: usize,
        max_commands: usize,
    ) -> Result<Self, FormatError> {
        if header.ncmds as usize > max_commands {
            return Err(FormatError::MalformedCommand {
                index: 0,
                offset: base + header_size as u64,
                reason: format!(
                    "{} load commands exceed the limit of {}",
                    header.ncmds, max_commands
                ),
            });
        }

        Ok(LoadCommands {
            data,
            base,
            start: header_size,
            ncmds: header.ncmds,
            sizeofcmds: header.sizeofcmds,
            index: 0,
            consumed: 0,
            failed: false,
            order: PhantomData,
        })
    }

    pub fn restart(&self) -> Self {
        LoadCommands {
            index: 0,
            consumed: 0,
            failed: false,
            ..self.clone()
        }
    }

    /// Bytes covered by the records yielded so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    fn read_record(&self) -> Result<LoadCommandRecord<'a>, FormatError> {
        let pos = self.start as u64 + self.consumed;
        let offset = self.base + pos;
        let available = (self.data.len() as u64).saturating_sub(pos);
        let malformed = |reason: String| FormatError::MalformedCommand {
            index: self.index,
            offset,
            reason,
        };

        if available < LOAD_COMMAND_HEADER_SIZE as u64 {
            return Err(FormatError::Truncated {
                what: "load command",
                offset,
                needed: LOAD_COMMAND_HEADER_SIZE as u64,
                available,
            });
        }

        let pos = pos as usize;
        let cmd = O::read_u32(&self.data[pos..]);
        let cmdsize = O::read_u32(&self.data[pos + 4..]);

        if (cmdsize as usize) < LOAD_COMMAND_HEADER_SIZE {
            return Err(malformed(format!(
                "cmdsize {} is smaller than the {} bytes command header",
                cmdsize, LOAD_COMMAND_HEADER_SIZE
            )));
        }

        let end = self.consumed + u64::from(cmdsize);

        if end > u64::from(self.sizeofcmds) {
            // the final record may spill over a short sizeofcmds, but never by a whole record
            let overrun = end - u64::from(self.sizeofcmds);
            let is_last = self.index + 1 == self.ncmds;

            if !is_last || overrun >= LOAD_COMMAND_HEADER_SIZE as u64 {
                return Err(malformed(format!(
                    "{} command with {} bytes overruns sizeofcmds {} by {} bytes",
                    LoadCommand::cmd_name(cmd).unwrap_or("LC_COMMAND"),
                    cmdsize,
                    self.sizeofcmds,
                    overrun
                )));
            }
        }

        if u64::from(cmdsize) > available {
            return Err(FormatError::Truncated {
                what: "load command",
                offset,
                needed: u64::from(cmdsize),
                available,
            });
        }

        Ok(LoadCommandRecord {
            index: self.index,
            offset,
            cmd,
            cmdsize,
            data: &self.data[pos..pos + cmdsize as usize],
        })
    }
}

impl<'a, O: ByteOrder> Iterator for LoadCommands<'a, O> {
    type Item = Result<LoadCommandRecord<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.index >= self.ncmds {
            return None;
        }

        match self.read_record() {
            Ok(record) => {
                trace!(
                    "load command #{} {} with {} bytes at 0x{:x}",
                    record.index,
                    LoadCommand::cmd_name(record.cmd).unwrap_or("LC_COMMAND"),
                    record.cmdsize,
                    record.offset
                );

                self.index += 1;
                self.consumed += u64::from(record.cmdsize);

                Some(Ok(record))
            }
            Err(err) => {
                self.failed = true;

                Some(Err(err))
            }
        }
    }
}

/// The interpreted form of a load command.
///
/// Commands without an interpreter are kept as `Opaque`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadCommand {
    Segment(SegmentInfo),
    Segment64(SegmentInfo),
    /// dynamically linked shared lib ident
    IdDyLib(DylibRef),
    /// any of the dylib load variants, see `DylibRef::kind`
    DyLib(DylibRef),
    /// load a dynamic linker
    LoadDyLinker(String),
    /// add a runtime search path for shared libraries
    Rpath(String),
    EntryPoint {
        /// file (__TEXT) offset of main()
        entryoff: u64,
        /// if not zero, initial stack size
        stacksize: u64,
    },
    UnixThread {
        /// flavor of thread state
        flavor: u32,
        /// count of longs in thread state
        count: u32,
        pc: Option<u64>,
    },
    CodeSignature(LinkEditData),
    SymTab(SymtabInfo),
    Uuid(Uuid),
    EncryptionInfo(EncryptionInfo),
    Opaque(OpaqueCommand),
}

/// Read a fixed size name
pub trait ReadNameExt: Read {
    fn read_fixed_name(&mut self, len: usize) -> Result<FixedName, DecodeError> {
        let mut buf = vec![0u8; len];

        self.read_exact(&mut buf)?;

        Ok(FixedName::decode(&buf)?)
    }
}

impl<R: Read + ?Sized> ReadNameExt for R {}

const SECTION_SIZE: u64 = 68;
const SECTION_64_SIZE: u64 = 80;

impl LoadCommand {
    /// Decode one record; reads never leave the record itself.
    pub fn parse<O: ByteOrder>(header: &MachHeader, record: &LoadCommandRecord) -> Result<LoadCommand, DecodeError> {
        let mut buf = Cursor::new(record.data);

        buf.set_position(LOAD_COMMAND_HEADER_SIZE as u64);

        let cmd = match record.cmd {
            LC_SEGMENT => LoadCommand::Segment(Self::read_segment::<O>(&mut buf, false)?),
            LC_SEGMENT_64 => LoadCommand::Segment64(Self::read_segment::<O>(&mut buf, true)?),
            LC_ID_DYLIB => LoadCommand::IdDyLib(Self::read_dylib::<O>(&mut buf, DylibKind::Load)?),
            LC_LOAD_DYLIB => LoadCommand::DyLib(Self::read_dylib::<O>(&mut buf, DylibKind::Load)?),
            LC_LOAD_WEAK_DYLIB => LoadCommand::DyLib(Self::read_dylib::<O>(&mut buf, DylibKind::Weak)?),
            LC_REEXPORT_DYLIB => LoadCommand::DyLib(Self::read_dylib::<O>(&mut buf, DylibKind::Reexport)?),
            LC_LOAD_UPWARD_DYLIB => LoadCommand::DyLib(Self::read_dylib::<O>(&mut buf, DylibKind::Upward)?),
            LC_LAZY_LOAD_DYLIB => LoadCommand::DyLib(Self::read_dylib::<O>(&mut buf, DylibKind::Lazy)?),
            LC_LOAD_DYLINKER => LoadCommand::LoadDyLinker(Self::read_lc_str::<O>(&mut buf)?),
            LC_RPATH => LoadCommand::Rpath(Self::read_lc_str::<O>(&mut buf)?),
            LC_MAIN => LoadCommand::EntryPoint {
                entryoff: buf.read_u64::<O>()?,
                stacksize: buf.read_u64::<O>()?,
            },
            LC_UNIXTHREAD => {
                let flavor = buf.read_u32::<O>()?;
                let count = buf.read_u32::<O>()?;
                let state = &record.data[buf.position() as usize..];
                let state = &state[..state.len().min(count as usize * 4)];

                LoadCommand::UnixThread {
                    flavor,
                    count,
                    pc: Self::thread_pc::<O>(header.cputype, flavor, state),
                }
            }
            LC_CODE_SIGNATURE => LoadCommand::CodeSignature(LinkEditData {
                off: buf.read_u32::<O>()?,
                size: buf.read_u32::<O>()?,
            }),
            LC_SYMTAB => LoadCommand::SymTab(SymtabInfo {
                symoff: buf.read_u32::<O>()?,
                nsyms: buf.read_u32::<O>()?,
                stroff: buf.read_u32::<O>()?,
                strsize: buf.read_u32::<O>()?,
            }),
            LC_UUID => {
                let mut uuid = [0; 16];

                buf.read_exact(&mut uuid[..])?;

                LoadCommand::Uuid(Uuid::from_bytes(uuid))
            }
            LC_ENCRYPTION_INFO | LC_ENCRYPTION_INFO_64 => LoadCommand::EncryptionInfo(EncryptionInfo {
                cryptoff: buf.read_u32::<O>()?,
                cryptsize: buf.read_u32::<O>()?,
                cryptid: buf.read_u32::<O>()?,
            }),
            _ => LoadCommand::Opaque(OpaqueCommand {
                cmd: record.cmd,
                cmdsize: record.cmdsize,
            }),
        };

        Ok(cmd)
    }

    fn read_segment<O: ByteOrder>(buf: &mut Cursor<&[u8]>, is_64bit: bool) -> Result<SegmentInfo, DecodeError> {
        let name = buf.read_fixed_name(16)?;
        let (vmaddr, vmsize, fileoff, filesize) = if is_64bit {
            (
                buf.read_u64::<O>()?,
                buf.read_u64::<O>()?,
                buf.read_u64::<O>()?,
                buf.read_u64::<O>()?,
            )
        } else {
            (
                u64::from(buf.read_u32::<O>()?),
                u64::from(buf.read_u32::<O>()?),
                u64::from(buf.read_u32::<O>()?),
                u64::from(buf.read_u32::<O>()?),
            )
        };
        let maxprot = buf.read_i32::<O>()?;
        let initprot = buf.read_i32::<O>()?;
        let nsects = buf.read_u32::<O>()?;
        let flags = buf.read_u32::<O>()?;

        let section_size = if is_64bit { SECTION_64_SIZE } else { SECTION_SIZE };
        let remaining = buf.get_ref().len() as u64 - buf.position();

        if u64::from(nsects) * section_size > remaining {
            return Err(DecodeError::Invalid(format!(
                "{} sections do not fit in the remaining {} bytes",
                nsects, remaining
            )));
        }

        Ok(SegmentInfo {
            name,
            vmaddr,
            vmsize,
            fileoff,
            filesize,
            maxprot,
            initprot,
            nsects,
            flags,
        })
    }

    fn read_dylib<O: ByteOrder>(buf: &mut Cursor<&[u8]>, kind: DylibKind) -> Result<DylibRef, DecodeError> {
        let off = buf.read_u32::<O>()?;
        let timestamp = buf.read_u32::<O>()?;
        let current_version = buf.read_u32::<O>()?;
        let compatibility_version = buf.read_u32::<O>()?;

        Ok(DylibRef {
            kind,
            path: Self::lc_str(buf, off)?,
            timestamp,
            current_version: VersionTag(current_version),
            compatibility_version: VersionTag(compatibility_version),
        })
    }

    fn read_lc_str<O: ByteOrder>(buf: &mut Cursor<&[u8]>) -> Result<String, DecodeError> {
        let off = buf.read_u32::<O>()?;

        Self::lc_str(buf, off)
    }

    /// A variable length string stored after the fixed fields, at `off` from the command start.
    fn lc_str(buf: &Cursor<&[u8]>, off: u32) -> Result<String, DecodeError> {
        let data = *buf.get_ref();
        let off = off as usize;

        if off < buf.position() as usize || off >= data.len() {
            return Err(DecodeError::Invalid(format!(
                "string offset {} is outside [{}, {})",
                off,
                buf.position(),
                data.len()
            )));
        }

        let bytes = &data[off..];

        match memchr::memchr(0, bytes) {
            Some(end) => Ok(str::from_utf8(&bytes[..end])?.to_owned()),
            None => Err(DecodeError::Invalid(String::from("string is not NUL terminated"))),
        }
    }

    /// The program counter of a thread state, for the flavors we know the layout of.
    fn thread_pc<O: ByteOrder>(cputype: cpu_type_t, flavor: u32, state: &[u8]) -> Option<u64> {
        let (off, wide) = match (cputype, flavor) {
            // rax .. r15, rip
            (CPU_TYPE_X86_64, X86_THREAD_STATE64) => (16 * 8, true),
            // x0 .. x28, fp, lr, sp, pc
            (CPU_TYPE_ARM64, ARM_THREAD_STATE64) => (32 * 8, true),
            // eax, ebx, ecx, edx, edi, esi, ebp, esp, ss, eflags, eip
            (CPU_TYPE_I386, X86_THREAD_STATE32) => (10 * 4, false),
            // r0 .. r12, sp, lr, pc
            (CPU_TYPE_ARM, ARM_THREAD_STATE) => (15 * 4, false),
            // srr0
            (CPU_TYPE_POWERPC, PPC_THREAD_STATE) => (0, false),
            _ => return None,
        };

        if wide {
            state.get(off..off + 8).map(O::read_u64)
        } else {
            state.get(off..off + 4).map(|b| u64::from(O::read_u32(b)))
        }
    }

    pub fn cmd(&self) -> u32 {
        match *self {
            LoadCommand::Segment(_) => LC_SEGMENT,
            LoadCommand::Segment64(_) => LC_SEGMENT_64,
            LoadCommand::IdDyLib(_) => LC_ID_DYLIB,
            LoadCommand::DyLib(ref dylib) => match dylib.kind {
                DylibKind::Load => LC_LOAD_DYLIB,
                DylibKind::Weak => LC_LOAD_WEAK_DYLIB,
                DylibKind::Reexport => LC_REEXPORT_DYLIB,
                DylibKind::Upward => LC_LOAD_UPWARD_DYLIB,
                DylibKind::Lazy => LC_LAZY_LOAD_DYLIB,
            },
            LoadCommand::LoadDyLinker(_) => LC_LOAD_DYLINKER,
            LoadCommand::Rpath(_) => LC_RPATH,
            LoadCommand::EntryPoint { .. } => LC_MAIN,
            LoadCommand::UnixThread { .. } => LC_UNIXTHREAD,
            LoadCommand::CodeSignature(_) => LC_CODE_SIGNATURE,
            LoadCommand::SymTab(_) => LC_SYMTAB,
            LoadCommand::Uuid(_) => LC_UUID,
            LoadCommand::EncryptionInfo(_) => LC_ENCRYPTION_INFO,
            LoadCommand::Opaque(OpaqueCommand { cmd, .. }) => cmd,
        }
    }

    pub fn name(&self) -> &'static str {
        Self::cmd_name(self.cmd()).unwrap_or("LC_COMMAND")
    }

    /// The symbolic name of a load command tag, `None` for tags no toolchain emits.
    pub fn cmd_name(cmd: u32) -> Option<&'static str> {
        let name = match cmd {
            LC_SEGMENT => "LC_SEGMENT",
            LC_SYMTAB => "LC_SYMTAB",
            LC_SYMSEG => "LC_SYMSEG",
            LC_THREAD => "LC_THREAD",
            LC_UNIXTHREAD => "LC_UNIXTHREAD",
            LC_LOADFVMLIB => "LC_LOADFVMLIB",
            LC_IDFVMLIB => "LC_IDFVMLIB",
            LC_IDENT => "LC_IDENT",
            LC_FVMFILE => "LC_FVMFILE",
            LC_PREPAGE => "LC_PREPAGE",
            LC_DYSYMTAB => "LC_DYSYMTAB",
            LC_LOAD_DYLIB => "LC_LOAD_DYLIB",
            LC_ID_DYLIB => "LC_ID_DYLIB",
            LC_LOAD_DYLINKER => "LC_LOAD_DYLINKER",
            LC_ID_DYLINKER => "LC_ID_DYLINKER",
            LC_PREBOUND_DYLIB => "LC_PREBOUND_DYLIB",
            LC_ROUTINES => "LC_ROUTINES",
            LC_SUB_FRAMEWORK => "LC_SUB_FRAMEWORK",
            LC_SUB_UMBRELLA => "LC_SUB_UMBRELLA",
            LC_SUB_CLIENT => "LC_SUB_CLIENT",
            LC_SUB_LIBRARY => "LC_SUB_LIBRARY",
            LC_TWOLEVEL_HINTS => "LC_TWOLEVEL_HINTS",
            LC_PREBIND_CKSUM => "LC_PREBIND_CKSUM",
            LC_LOAD_WEAK_DYLIB => "LC_LOAD_WEAK_DYLIB",
            LC_SEGMENT_64 => "LC_SEGMENT_64",
            LC_ROUTINES_64 => "LC_ROUTINES_64",
            LC_UUID => "LC_UUID",
            LC_RPATH => "LC_RPATH",
            LC_CODE_SIGNATURE => "LC_CODE_SIGNATURE",
            LC_SEGMENT_SPLIT_INFO => "LC_SEGMENT_SPLIT_INFO",
            LC_REEXPORT_DYLIB => "LC_REEXPORT_DYLIB",
            LC_LAZY_LOAD_DYLIB => "LC_LAZY_LOAD_DYLIB",
            LC_ENCRYPTION_INFO => "LC_ENCRYPTION_INFO",
            LC_DYLD_INFO => "LC_DYLD_INFO",
            LC_DYLD_INFO_ONLY => "LC_DYLD_INFO_ONLY",
            LC_LOAD_UPWARD_DYLIB => "LC_LOAD_UPWARD_DYLIB",
            LC_VERSION_MIN_MACOSX => "LC_VERSION_MIN_MACOSX",
            LC_VERSION_MIN_IPHONEOS => "LC_VERSION_MIN_IPHONEOS",
            LC_FUNCTION_STARTS => "LC_FUNCTION_STARTS",
            LC_DYLD_ENVIRONMENT => "LC_DYLD_ENVIRONMENT",
            LC_MAIN => "LC_MAIN",
            LC_DATA_IN_CODE => "LC_DATA_IN_CODE",
            LC_SOURCE_VERSION => "LC_SOURCE_VERSION",
            LC_DYLIB_CODE_SIGN_DRS => "LC_DYLIB_CODE_SIGN_DRS",
            LC_ENCRYPTION_INFO_64 => "LC_ENCRYPTION_INFO_64",
            LC_LINKER_OPTION => "LC_LINKER_OPTION",
            LC_LINKER_OPTIMIZATION_HINT => "LC_LINKER_OPTIMIZATION_HINT",
            LC_VERSION_MIN_TVOS => "LC_VERSION_MIN_TVOS",
            LC_VERSION_MIN_WATCHOS => "LC_VERSION_MIN_WATCHOS",
            LC_NOTE => "LC_NOTE",
            LC_BUILD_VERSION => "LC_BUILD_VERSION",
            LC_DYLD_EXPORTS_TRIE => "LC_DYLD_EXPORTS_TRIE",
            LC_DYLD_CHAINED_FIXUPS => "LC_DYLD_CHAINED_FIXUPS",
            LC_FILESET_ENTRY => "LC_FILESET_ENTRY",
            _ => return None,
        };

        Some(name)
    }
}

/// How many records were seen and how many of them were interpreted.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CommandStats {
    pub observed: u32,
    pub interpreted: u32,
    pub opaque: u32,
}

/// Everything the interpreters extracted from one slice's load commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandModel {
    pub segments: Vec<SegmentInfo>,
    pub dylibs: BoundedVec<DylibRef>,
    /// `LC_ID_DYLIB` of a library
    pub install_name: Option<DylibRef>,
    pub dylinker: Option<String>,
    pub rpaths: Vec<String>,
    pub uuid: Option<Uuid>,
    pub entry_point: Option<EntryPoint>,
    pub code_signature: Option<CodeSignatureSpan>,
    pub symtab: Option<SymtabInfo>,
    pub encryption: Option<EncryptionInfo>,
    /// the string table mentions `___stack_chk_fail` or `___stack_chk_guard`
    pub stack_guard_referenced: bool,
    pub opaque: Vec<OpaqueCommand>,
    pub stats: CommandStats,
}

impl CommandModel {
    pub fn new(max_dylibs: usize) -> Self {
        CommandModel {
            segments: Vec::new(),
            dylibs: BoundedVec::with_capacity(max_dylibs),
            install_name: None,
            dylinker: None,
            rpaths: Vec::new(),
            uuid: None,
            entry_point: None,
            code_signature: None,
            symtab: None,
            encryption: None,
            stack_guard_referenced: false,
            opaque: Vec::new(),
            stats: CommandStats::default(),
        }
    }

    pub fn segment(&self, name: &str) -> Option<&SegmentInfo> {
        self.segments.iter().find(|seg| seg.name.as_str() == name)
    }
}

/// Accumulates interpreted records into a `CommandModel`.
pub(crate) struct ModelBuilder<'h> {
    header: &'h MachHeader,
    model: CommandModel,
    signature: Option<(u64, LinkEditData)>,
    anomalies: Vec<Anomaly>,
}

impl<'h> ModelBuilder<'h> {
    pub fn new(header: &'h MachHeader, max_dylibs: usize) -> Self {
        ModelBuilder {
            header,
            model: CommandModel::new(max_dylibs),
            signature: None,
            anomalies: Vec::new(),
        }
    }

    pub fn note(&mut self, anomaly: Anomaly) {
        warn!("{}", anomaly);

        self.anomalies.push(anomaly);
    }

    pub fn interpret<O: ByteOrder>(&mut self, record: &LoadCommandRecord) {
        self.model.stats.observed += 1;

        if LoadCommand::cmd_name(record.cmd).is_none() {
            self.note(Anomaly {
                offset: record.offset,
                kind: AnomalyKind::UnknownCommand {
                    cmd: record.cmd,
                    cmdsize: record.cmdsize,
                },
            });
        }

        let cmd = match LoadCommand::parse::<O>(self.header, record) {
            Ok(cmd) => cmd,
            Err(err) => {
                self.note(Anomaly {
                    offset: record.offset,
                    kind: AnomalyKind::UndecodableCommand {
                        cmd: record.cmd,
                        reason: err.to_string(),
                    },
                });

                LoadCommand::Opaque(OpaqueCommand {
                    cmd: record.cmd,
                    cmdsize: record.cmdsize,
                })
            }
        };

        self.apply(record, cmd);
    }

    fn apply(&mut self, record: &LoadCommandRecord, cmd: LoadCommand) {
        if let LoadCommand::Opaque(_) = cmd {
            self.model.stats.opaque += 1;
        } else {
            self.model.stats.interpreted += 1;
        }

        match cmd {
            LoadCommand::Segment(segment) | LoadCommand::Segment64(segment) => self.model.segments.push(segment),
            LoadCommand::IdDyLib(dylib) => {
                if !set_once(&mut self.model.install_name, dylib) {
                    self.duplicate(record)
                }
            }
            LoadCommand::DyLib(dylib) => {
                let first_dropped = !self.model.dylibs.is_truncated();

                if !self.model.dylibs.push(dylib) && first_dropped {
                    self.note(Anomaly {
                        offset: record.offset,
                        kind: AnomalyKind::DylibLimitExceeded {
                            capacity: self.model.dylibs.capacity(),
                        },
                    });
                }
            }
            LoadCommand::LoadDyLinker(name) => {
                if !set_once(&mut self.model.dylinker, name) {
                    self.duplicate(record)
                }
            }
            LoadCommand::Rpath(path) => self.model.rpaths.push(path),
            LoadCommand::EntryPoint { entryoff, stacksize } => {
                self.set_entry_point(record, EntryPoint::Main { entryoff, stacksize })
            }
            LoadCommand::UnixThread { flavor, pc, .. } => {
                self.set_entry_point(record, EntryPoint::UnixThread { flavor, pc })
            }
            LoadCommand::CodeSignature(data) => {
                if !set_once(&mut self.signature, (record.offset, data)) {
                    self.duplicate(record)
                }
            }
            LoadCommand::SymTab(symtab) => {
                if !set_once(&mut self.model.symtab, symtab) {
                    self.duplicate(record)
                }
            }
            LoadCommand::Uuid(uuid) => {
                if !set_once(&mut self.model.uuid, uuid) {
                    self.duplicate(record)
                }
            }
            LoadCommand::EncryptionInfo(info) => {
                if !set_once(&mut self.model.encryption, info) {
                    self.duplicate(record)
                }
            }
            LoadCommand::Opaque(opaque) => self.model.opaque.push(opaque),
        }
    }

    fn duplicate(&mut self, record: &LoadCommandRecord) {
        self.note(Anomaly {
            offset: record.offset,
            kind: AnomalyKind::DuplicateCommand { cmd: record.cmd },
        });
    }

    fn set_entry_point(&mut self, record: &LoadCommandRecord, entry: EntryPoint) {
        if self.model.entry_point.is_some() {
            self.note(Anomaly {
                offset: record.offset,
                kind: AnomalyKind::DuplicateEntryPoint { cmd: record.cmd },
            });
        } else {
            self.model.entry_point = Some(entry);
        }
    }

    /// Resolve the linkedit spans against the slice bytes and hand over the model.
    pub fn finish(mut self, data: &[u8], base: u64) -> (CommandModel, Vec<Anomaly>) {
        if let Some((offset, LinkEditData { off, size })) = self.signature.take() {
            match span(data, off, size) {
                Some(blob) => {
                    self.model.code_signature = Some(CodeSignatureSpan {
                        dataoff: off,
                        datasize: size,
                        file_offset: base + u64::from(off),
                        directory: SignatureDirectory::parse(blob),
                    })
                }
                None => self.note(Anomaly {
                    offset,
                    kind: AnomalyKind::CodeSignatureOutOfBounds {
                        dataoff: off,
                        datasize: size,
                    },
                }),
            }
        }

        if let Some(symtab) = self.model.symtab {
            match span(data, symtab.stroff, symtab.strsize) {
                Some(strtab) => {
                    self.model.stack_guard_referenced = memmem::find(strtab, STACK_CHK_FAIL).is_some()
                        || memmem::find(strtab, STACK_CHK_GUARD).is_some()
                }
                None => self.note(Anomaly {
                    offset: base,
                    kind: AnomalyKind::SymbolTableOutOfBounds {
                        stroff: symtab.stroff,
                        strsize: symtab.strsize,
                    },
                }),
            }
        }

        (self.model, self.anomalies)
    }
}

/// Fill an empty slot; an occupied one keeps its first value.
fn set_once<T>(slot: &mut Option<T>, value: T) -> bool {
    if slot.is_some() {
        false
    } else {
        *slot = Some(value);
        true
    }
}

fn span(data: &[u8], off: u32, size: u32) -> Option<&[u8]> {
    let start = off as usize;
    let end = start.checked_add(size as usize)?;

    data.get(start..end)
}

#[cfg(test)]
pub mod tests {
    use byteorder::{BigEndian, LittleEndian};

    use super::*;
    use crate::security::SecurityReport;

    include!("testdata.rs");

    fn record(data: &[u8]) -> LoadCommandRecord {
        LoadCommandRecord {
            index: 0,
            offset: 0,
            cmd: LittleEndian::read_u32(data),
            cmdsize: LittleEndian::read_u32(&data[4..]),
            data,
        }
    }

    macro_rules! parse_command {
        ($buf:expr) => {{
            let header = MachHeader::default();

            LoadCommand::parse::<LittleEndian>(&header, &record(&$buf[..])).unwrap()
        }};
    }

    /// A zeroed 64-bit header area followed by the given commands.
    fn image(cmds: &[&[u8]], sizeofcmds: Option<u32>) -> (Vec<u8>, MachHeader) {
        let mut data = vec![0u8; MACH_HEADER_64_SIZE];

        for cmd in cmds {
            data.extend_from_slice(cmd);
        }

        let header = MachHeader {
            ncmds: cmds.len() as u32,
            sizeofcmds: sizeofcmds.unwrap_or((data.len() - MACH_HEADER_64_SIZE) as u32),
            ..MachHeader::default()
        };

        (data, header)
    }

    fn walk<'a>(data: &'a [u8], header: &MachHeader) -> Vec<Result<LoadCommandRecord<'a>, FormatError>> {
        LoadCommands::<LittleEndian>::new(data, 0, header, MACH_HEADER_64_SIZE, 4096)
            .unwrap()
            .collect()
    }

    #[test]
    fn test_parse_segment() {
        if let LoadCommand::Segment64(segment) = parse_command!(LC_SEGMENT_64_PAGEZERO_DATA) {
            assert_eq!(segment.name.as_str(), SEG_PAGEZERO);
            assert!(segment.name.is_terminated());
            assert_eq!(segment.vmaddr, 0);
            assert_eq!(segment.vmsize, 0x0000000100000000);
            assert_eq!(segment.fileoff, 0);
            assert_eq!(segment.filesize, 0);
            assert_eq!(segment.maxprot, 0);
            assert_eq!(segment.nsects, 0);
        } else {
            panic!();
        }
    }

    #[test]
    fn test_parse_segment_full_width_name() {
        let mut data = LC_SEGMENT_64_PAGEZERO_DATA.to_vec();

        data[8..24].copy_from_slice(b"__0123456789ABCD");

        if let LoadCommand::Segment64(segment) = parse_command!(data) {
            assert_eq!(segment.name.as_str(), "__0123456789ABCD");
            assert!(!segment.name.is_terminated());
        } else {
            panic!();
        }
    }

    #[test]
    fn test_parse_segment_bad_name() {
        let mut data = LC_SEGMENT_64_PAGEZERO_DATA.to_vec();

        data[8] = 0xff;

        let header = MachHeader::default();

        assert!(LoadCommand::parse::<LittleEndian>(&header, &record(&data)).is_err());
    }

    #[test]
    fn test_parse_segment_sections_overflow() {
        let mut data = LC_SEGMENT_64_PAGEZERO_DATA.to_vec();

        // nsects = 1, but no room for a section_64
        data[64] = 1;

        let header = MachHeader::default();

        assert!(LoadCommand::parse::<LittleEndian>(&header, &record(&data)).is_err());
    }

    #[test]
    fn test_load_dylib_command() {
        if let LoadCommand::DyLib(ref dylib) = parse_command!(LC_LOAD_DYLIB_DATA) {
            assert_eq!(dylib.kind, DylibKind::Load);
            assert_eq!(dylib.path, "/usr/lib/libSystem.B.dylib");
            assert_eq!(dylib.timestamp, 2);
            assert_eq!(dylib.current_version.to_string(), "1226.10.1");
            assert_eq!(dylib.compatibility_version.to_string(), "1.0");
        } else {
            panic!();
        }
    }

    #[test]
    fn test_dylib_command_kinds() {
        for &(tag, kind, name) in &[
            (LC_LOAD_DYLIB, DylibKind::Load, "LC_LOAD_DYLIB"),
            (LC_LOAD_WEAK_DYLIB, DylibKind::Weak, "LC_LOAD_WEAK_DYLIB"),
            (LC_REEXPORT_DYLIB, DylibKind::Reexport, "LC_REEXPORT_DYLIB"),
            (LC_LOAD_UPWARD_DYLIB, DylibKind::Upward, "LC_LOAD_UPWARD_DYLIB"),
            (LC_LAZY_LOAD_DYLIB, DylibKind::Lazy, "LC_LAZY_LOAD_DYLIB"),
        ] {
            let mut data = LC_LOAD_DYLIB_DATA.to_vec();

            LittleEndian::write_u32(&mut data[..4], tag);

            let cmd = parse_command!(data);

            assert_eq!(cmd.cmd(), tag);
            assert_eq!(cmd.name(), name);

            if let LoadCommand::DyLib(ref dylib) = cmd {
                assert_eq!(dylib.kind, kind);
                assert_eq!(dylib.path, "/usr/lib/libSystem.B.dylib");
            } else {
                panic!();
            }
        }
    }

    #[test]
    fn test_dylib_path_out_of_record() {
        let mut data = LC_LOAD_DYLIB_DATA.to_vec();

        LittleEndian::write_u32(&mut data[8..12], 200);

        let header = MachHeader::default();

        assert!(LoadCommand::parse::<LittleEndian>(&header, &record(&data)).is_err());
    }

    #[test]
    fn test_parse_main_command() {
        assert_eq!(
            parse_command!(LC_MAIN_DATA),
            LoadCommand::EntryPoint {
                entryoff: 0x11400,
                stacksize: 0
            }
        );
    }

    #[test]
    fn test_parse_unixthread_command() {
        let mut data = vec![];

        data.extend_from_slice(&LC_UNIXTHREAD.to_le_bytes());
        data.extend_from_slice(&(16u32 + 21 * 8).to_le_bytes());
        data.extend_from_slice(&X86_THREAD_STATE64.to_le_bytes());
        data.extend_from_slice(&42u32.to_le_bytes());
        for i in 0..21u64 {
            data.extend_from_slice(&(if i == 16 { 0x100000f40 } else { i }).to_le_bytes());
        }

        let header = MachHeader {
            cputype: CPU_TYPE_X86_64,
            ..MachHeader::default()
        };

        assert_eq!(
            LoadCommand::parse::<LittleEndian>(&header, &record(&data)).unwrap(),
            LoadCommand::UnixThread {
                flavor: X86_THREAD_STATE64,
                count: 42,
                pc: Some(0x100000f40)
            }
        );

        let header = MachHeader {
            cputype: CPU_TYPE_MC680X0,
            ..MachHeader::default()
        };

        if let LoadCommand::UnixThread { pc, .. } = LoadCommand::parse::<LittleEndian>(&header, &record(&data)).unwrap() {
            assert_eq!(pc, None);
        } else {
            panic!();
        }
    }

    #[test]
    fn test_parse_code_signature_command() {
        assert_eq!(
            parse_command!(LC_CODE_SIGNATURE_DATA),
            LoadCommand::CodeSignature(LinkEditData { off: 0x1000, size: 0x200 })
        );
    }

    #[test]
    fn test_parse_uuid_command() {
        if let LoadCommand::Uuid(ref uuid) = parse_command!(LC_UUID_DATA) {
            assert_eq!(uuid.hyphenated().to_string(), "92e3cf1f-20da-3373-a98c-851366d353bf");
        } else {
            panic!();
        }
    }

    #[test]
    fn test_parse_rpath_command() {
        assert_eq!(
            parse_command!(LC_RPATH_DATA),
            LoadCommand::Rpath(String::from("@loader_path/../lib"))
        );
    }

    #[test]
    fn test_parse_load_dylinker_command() {
        assert_eq!(
            parse_command!(LC_LOAD_DYLINKER_DATA),
            LoadCommand::LoadDyLinker(String::from("/usr/lib/dyld"))
        );
    }

    #[test]
    fn test_parse_opaque_command() {
        let data = [0x26, 0, 0, 0, 0x10, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

        assert_eq!(
            parse_command!(data),
            LoadCommand::Opaque(OpaqueCommand { cmd: LC_FUNCTION_STARTS, cmdsize: 16 })
        );
    }

    #[test]
    fn test_parse_big_endian_command() {
        let data = [0, 0, 0, 0x1d, 0, 0, 0, 0x10, 0, 0, 0x10, 0, 0, 0, 0x02, 0];
        let record = LoadCommandRecord {
            index: 0,
            offset: 0,
            cmd: BigEndian::read_u32(&data),
            cmdsize: BigEndian::read_u32(&data[4..]),
            data: &data,
        };

        assert_eq!(
            LoadCommand::parse::<BigEndian>(&MachHeader::default(), &record).unwrap(),
            LoadCommand::CodeSignature(LinkEditData { off: 0x1000, size: 0x200 })
        );
    }

    #[test]
    fn test_walk_commands() {
        let (data, header) = image(&[&LC_SEGMENT_64_PAGEZERO_DATA, &LC_LOAD_DYLIB_DATA, &LC_MAIN_DATA], None);
        let records = walk(&data, &header);

        assert_eq!(records.len(), 3);
        assert_eq!(
            records
                .iter()
                .map(|r| r.as_ref().map(|r| (r.cmd, r.cmdsize, r.offset)).unwrap())
                .collect::<Vec<_>>(),
            vec![(LC_SEGMENT_64, 72, 32), (LC_LOAD_DYLIB, 56, 104), (LC_MAIN, 24, 160)]
        );
        assert_eq!(records[2].as_ref().unwrap().payload().len(), 16);
    }

    #[test]
    fn test_walk_restart() {
        let (data, header) = image(&[&LC_MAIN_DATA, &LC_UUID_DATA], None);
        let mut walker = LoadCommands::<LittleEndian>::new(&data, 0, &header, MACH_HEADER_64_SIZE, 16).unwrap();
        let first = walker.by_ref().map(|r| r.unwrap().cmd).collect::<Vec<_>>();

        assert_eq!(walker.consumed(), 48);
        assert_eq!(walker.next(), None);
        assert_eq!(walker.restart().map(|r| r.unwrap().cmd).collect::<Vec<_>>(), first);
    }

    #[test]
    fn test_walk_undersized_command() {
        let bogus = [0x26, 0, 0, 0, 4, 0, 0, 0];
        let (data, header) = image(&[&bogus, &LC_MAIN_DATA], Some(32));
        let records = walk(&data, &header);

        assert_eq!(records.len(), 1);
        match records[0] {
            Err(FormatError::MalformedCommand { index, offset, .. }) => {
                assert_eq!(index, 0);
                assert_eq!(offset, 32);
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_walk_zero_sized_command() {
        let bogus = [0x26, 0, 0, 0, 0, 0, 0, 0];
        let (data, mut header) = image(&[&bogus], None);

        header.ncmds = 1000;

        let records = walk(&data, &header);

        assert_eq!(records.len(), 1);
        assert!(matches!(records[0], Err(FormatError::MalformedCommand { .. })));
    }

    #[test]
    fn test_walk_overruns_sizeofcmds() {
        let (data, header) = image(&[&LC_MAIN_DATA, &LC_UUID_DATA], Some(24));
        let records = walk(&data, &header);

        assert_eq!(records.len(), 2);
        assert!(records[0].is_ok());
        assert!(matches!(records[1], Err(FormatError::MalformedCommand { index: 1, .. })));
    }

    #[test]
    fn test_walk_tolerates_short_sizeofcmds_on_last_command() {
        let (data, header) = image(&[&LC_MAIN_DATA, &LC_UUID_DATA], Some(47));
        let mut walker = LoadCommands::<LittleEndian>::new(&data, 0, &header, MACH_HEADER_64_SIZE, 16).unwrap();

        assert!(walker.by_ref().all(|r| r.is_ok()));
        assert_eq!(walker.consumed(), 48);
    }

    #[test]
    fn test_walk_truncated() {
        let (mut data, mut header) = image(&[&LC_MAIN_DATA], None);

        header.ncmds = 2;
        header.sizeofcmds = 48;
        data.extend_from_slice(&[0x1b, 0, 0]);

        let records = walk(&data, &header);

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[1],
            Err(FormatError::Truncated {
                what: "load command",
                offset: 56,
                needed: 8,
                available: 3,
            })
        );
    }

    #[test]
    fn test_walk_past_slice_end() {
        let (mut data, header) = image(&[&LC_LOAD_DYLIB_DATA], None);

        data.truncate(data.len() - 8);

        let records = walk(&data, &header);

        assert_eq!(
            records,
            vec![Err(FormatError::Truncated {
                what: "load command",
                offset: 32,
                needed: 56,
                available: 48,
            })]
        );
    }

    #[test]
    fn test_walk_command_limit() {
        let (data, mut header) = image(&[], None);

        header.ncmds = u32::max_value();

        assert!(matches!(
            LoadCommands::<LittleEndian>::new(&data, 0, &header, MACH_HEADER_64_SIZE, 4096),
            Err(FormatError::MalformedCommand { .. })
        ));
    }

    #[test]
    fn test_builder_duplicate_entry_point() {
        let (data, header) = image(&[&LC_MAIN_DATA, &LC_MAIN_DATA], None);
        let mut builder = ModelBuilder::new(&header, 8);

        for record in LoadCommands::<LittleEndian>::new(&data, 0, &header, MACH_HEADER_64_SIZE, 16).unwrap() {
            builder.interpret::<LittleEndian>(&record.unwrap());
        }

        let (model, anomalies) = builder.finish(&data, 0);

        assert_eq!(
            model.entry_point,
            Some(EntryPoint::Main {
                entryoff: 0x11400,
                stacksize: 0
            })
        );
        assert_eq!(
            anomalies,
            vec![Anomaly {
                offset: 56,
                kind: AnomalyKind::DuplicateEntryPoint { cmd: LC_MAIN }
            }]
        );
    }

    #[test]
    fn test_builder_dylib_limit() {
        let (data, header) = image(&[&LC_LOAD_DYLIB_DATA, &LC_LOAD_DYLIB_DATA, &LC_LOAD_DYLIB_DATA], None);
        let mut builder = ModelBuilder::new(&header, 1);

        for record in LoadCommands::<LittleEndian>::new(&data, 0, &header, MACH_HEADER_64_SIZE, 16).unwrap() {
            builder.interpret::<LittleEndian>(&record.unwrap());
        }

        let (model, anomalies) = builder.finish(&data, 0);

        assert_eq!(model.dylibs.len(), 1);
        assert_eq!(model.dylibs.dropped(), 2);
        assert!(model.dylibs.is_truncated());
        assert_eq!(model.stats.interpreted, 3);
        assert_eq!(anomalies.len(), 1);
    }

    #[test]
    fn test_builder_downgrades_bad_segment() {
        let mut bad = LC_SEGMENT_64_PAGEZERO_DATA.to_vec();

        bad[8] = 0xff;

        let unknown = [0x7f, 0, 0, 0, 8, 0, 0, 0];
        let (data, header) = image(&[&bad, &LC_MAIN_DATA, &unknown], None);
        let mut builder = ModelBuilder::new(&header, 8);

        for record in LoadCommands::<LittleEndian>::new(&data, 0, &header, MACH_HEADER_64_SIZE, 16).unwrap() {
            builder.interpret::<LittleEndian>(&record.unwrap());
        }

        let (model, anomalies) = builder.finish(&data, 0);

        assert!(model.segments.is_empty());
        assert!(model.entry_point.is_some());
        assert_eq!(
            model.stats,
            CommandStats {
                observed: 3,
                interpreted: 1,
                opaque: 2
            }
        );
        assert_eq!(
            model.opaque,
            vec![
                OpaqueCommand { cmd: LC_SEGMENT_64, cmdsize: 72 },
                OpaqueCommand { cmd: 0x7f, cmdsize: 8 }
            ]
        );
        assert_eq!(anomalies.len(), 2);
        assert!(matches!(anomalies[0].kind, AnomalyKind::UndecodableCommand { cmd: LC_SEGMENT_64, .. }));
        assert_eq!(anomalies[1].kind, AnomalyKind::UnknownCommand { cmd: 0x7f, cmdsize: 8 });
    }

    #[test]
    fn test_builder_code_signature_bounds() {
        let (data, header) = image(&[&LC_CODE_SIGNATURE_DATA], None);
        let mut builder = ModelBuilder::new(&header, 8);

        for record in LoadCommands::<LittleEndian>::new(&data, 0, &header, MACH_HEADER_64_SIZE, 16).unwrap() {
            builder.interpret::<LittleEndian>(&record.unwrap());
        }

        let (model, anomalies) = builder.finish(&data, 0);

        assert_eq!(model.code_signature, None);
        assert_eq!(
            anomalies[0].kind,
            AnomalyKind::CodeSignatureOutOfBounds {
                dataoff: 0x1000,
                datasize: 0x200
            }
        );
    }

    #[test]
    fn test_builder_stack_guard_scan() {
        let mut symtab = vec![];

        symtab.extend_from_slice(&LC_SYMTAB.to_le_bytes());
        symtab.extend_from_slice(&24u32.to_le_bytes());
        symtab.extend_from_slice(&0u32.to_le_bytes());
        symtab.extend_from_slice(&0u32.to_le_bytes());
        symtab.extend_from_slice(&56u32.to_le_bytes());
        symtab.extend_from_slice(&24u32.to_le_bytes());

        let (mut data, header) = image(&[&symtab], None);

        data.extend_from_slice(b"\0_main\0___stack_chk_fail\0");

        let mut builder = ModelBuilder::new(&header, 8);

        for record in LoadCommands::<LittleEndian>::new(&data, 0, &header, MACH_HEADER_64_SIZE, 16).unwrap() {
            builder.interpret::<LittleEndian>(&record.unwrap());
        }

        let (model, anomalies) = builder.finish(&data, 0);

        assert!(anomalies.is_empty());
        assert!(model.stack_guard_referenced);
    }

    fn words(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|value| value.to_le_bytes().to_vec()).collect()
    }

    fn interpret_all(data: &[u8], header: &MachHeader) -> (CommandModel, Vec<Anomaly>) {
        let mut builder = ModelBuilder::new(header, 8);

        for record in LoadCommands::<LittleEndian>::new(data, 0, header, MACH_HEADER_64_SIZE, 16).unwrap() {
            builder.interpret::<LittleEndian>(&record.unwrap());
        }

        builder.finish(data, 0)
    }

    #[test]
    fn test_builder_keeps_first_encryption_info() {
        let encrypted = words(&[LC_ENCRYPTION_INFO_64, 24, 0x4000, 0x1000, 1, 0]);
        let cleared = words(&[LC_ENCRYPTION_INFO_64, 24, 0x4000, 0x1000, 0, 0]);
        let (data, header) = image(&[&encrypted, &cleared], None);
        let (model, anomalies) = interpret_all(&data, &header);

        assert_eq!(model.encryption.map(|info| info.cryptid), Some(1));
        assert!(SecurityReport::evaluate(0, &model).encrypted);
        assert_eq!(
            anomalies,
            vec![Anomaly {
                offset: 56,
                kind: AnomalyKind::DuplicateCommand {
                    cmd: LC_ENCRYPTION_INFO_64
                }
            }]
        );
    }

    #[test]
    fn test_builder_keeps_first_code_signature() {
        let first = words(&[LC_CODE_SIGNATURE, 16, 0, 16]);
        let second = words(&[LC_CODE_SIGNATURE, 16, 32, 16]);
        let (data, header) = image(&[&first, &second], None);
        let (model, anomalies) = interpret_all(&data, &header);

        assert_eq!(model.code_signature.as_ref().map(|span| span.dataoff), Some(0));
        assert_eq!(
            anomalies,
            vec![Anomaly {
                offset: 48,
                kind: AnomalyKind::DuplicateCommand { cmd: LC_CODE_SIGNATURE }
            }]
        );
    }

    #[test]
    fn test_builder_keeps_first_singletons() {
        let mut other_uuid = LC_UUID_DATA;

        other_uuid[8] = 0;

        let mut id = LC_LOAD_DYLIB_DATA;

        LittleEndian::write_u32(&mut id[..4], LC_ID_DYLIB);

        let mut other_id = id;

        LittleEndian::write_u32(&mut other_id[12..16], 7);

        let symtab = words(&[LC_SYMTAB, 24, 0, 0, 0, 0]);
        let other_symtab = words(&[LC_SYMTAB, 24, 0, 3, 0, 0]);
        let (data, header) = image(
            &[
                &LC_UUID_DATA,
                &other_uuid,
                &id,
                &other_id,
                &symtab,
                &other_symtab,
                &LC_LOAD_DYLINKER_DATA,
                &LC_LOAD_DYLINKER_DATA,
            ],
            None,
        );
        let (model, anomalies) = interpret_all(&data, &header);

        assert_eq!(
            model.uuid.map(|uuid| uuid.hyphenated().to_string()),
            Some(String::from("92e3cf1f-20da-3373-a98c-851366d353bf"))
        );
        assert_eq!(model.install_name.as_ref().map(|dylib| dylib.timestamp), Some(2));
        assert_eq!(model.symtab.map(|symtab| symtab.nsyms), Some(0));
        assert_eq!(model.dylinker.as_deref(), Some("/usr/lib/dyld"));
        assert_eq!(
            anomalies.into_iter().map(|anomaly| anomaly.kind).collect::<Vec<_>>(),
            vec![
                AnomalyKind::DuplicateCommand { cmd: LC_UUID },
                AnomalyKind::DuplicateCommand { cmd: LC_ID_DYLIB },
                AnomalyKind::DuplicateCommand { cmd: LC_SYMTAB },
                AnomalyKind::DuplicateCommand { cmd: LC_LOAD_DYLINKER },
            ]
        );
    }

    #[test]
    fn test_bounded_vec() {
        let mut v = BoundedVec::with_capacity(2);

        assert!(v.push(1));
        assert!(v.push(2));
        assert!(!v.push(3));
        assert_eq!(&v[..], &[1, 2]);
        assert_eq!(v.capacity(), 2);
        assert!(v.is_truncated());
    }
}

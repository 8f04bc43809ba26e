use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use byteorder::{self, BigEndian, LittleEndian, NativeEndian};
use memmap2::Mmap;

use crate::commands::{CodeSignatureSpan, CommandModel, CommandStats, DylibRef, EntryPoint, LoadCommands, ModelBuilder, SegmentInfo};
use crate::consts::*;
use crate::errors::{Anomaly, AnomalyKind, FormatError, Result};
use crate::security::SecurityReport;

bitflags! {
    /// The flags field of the mach header
    pub struct MachHeaderFlags: u32 {
        const NOUNDEFS = MH_NOUNDEFS;
        const INCRLINK = MH_INCRLINK;
        const DYLDLINK = MH_DYLDLINK;
        const BINDATLOAD = MH_BINDATLOAD;
        const PREBOUND = MH_PREBOUND;
        const SPLIT_SEGS = MH_SPLIT_SEGS;
        const LAZY_INIT = MH_LAZY_INIT;
        const TWOLEVEL = MH_TWOLEVEL;
        const FORCE_FLAT = MH_FORCE_FLAT;
        const NOMULTIDEFS = MH_NOMULTIDEFS;
        const NOFIXPREBINDING = MH_NOFIXPREBINDING;
        const PREBINDABLE = MH_PREBINDABLE;
        const ALLMODSBOUND = MH_ALLMODSBOUND;
        const SUBSECTIONS_VIA_SYMBOLS = MH_SUBSECTIONS_VIA_SYMBOLS;
        const CANONICAL = MH_CANONICAL;
        const WEAK_DEFINES = MH_WEAK_DEFINES;
        const BINDS_TO_WEAK = MH_BINDS_TO_WEAK;
        const ALLOW_STACK_EXECUTION = MH_ALLOW_STACK_EXECUTION;
        const ROOT_SAFE = MH_ROOT_SAFE;
        const SETUID_SAFE = MH_SETUID_SAFE;
        const NO_REEXPORTED_DYLIBS = MH_NO_REEXPORTED_DYLIBS;
        const PIE = MH_PIE;
        const DEAD_STRIPPABLE_DYLIB = MH_DEAD_STRIPPABLE_DYLIB;
        const HAS_TLV_DESCRIPTORS = MH_HAS_TLV_DESCRIPTORS;
        const NO_HEAP_EXECUTION = MH_NO_HEAP_EXECUTION;
        const APP_EXTENSION_SAFE = MH_APP_EXTENSION_SAFE;
        const NLIST_OUTOFSYNC_WITH_DYLDINFO = MH_NLIST_OUTOFSYNC_WITH_DYLDINFO;
        const SIM_SUPPORT = MH_SIM_SUPPORT;
        const DYLIB_IN_CACHE = MH_DYLIB_IN_CACHE;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryFormat {
    Thin32,
    Thin64,
    Fat32,
    Fat64,
    Unrecognized,
}

/// Whether the stored byte order matches the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Native,
    Swapped,
}

impl ByteOrder {
    pub fn is_little_endian(self) -> bool {
        cfg!(target_endian = "little") == (self == ByteOrder::Native)
    }
}

impl BinaryFormat {
    /// Classify a magic read in host byte order.
    pub fn from_magic(magic: u32) -> (BinaryFormat, ByteOrder) {
        match magic {
            MH_MAGIC => (BinaryFormat::Thin32, ByteOrder::Native),
            MH_CIGAM => (BinaryFormat::Thin32, ByteOrder::Swapped),
            MH_MAGIC_64 => (BinaryFormat::Thin64, ByteOrder::Native),
            MH_CIGAM_64 => (BinaryFormat::Thin64, ByteOrder::Swapped),
            FAT_MAGIC => (BinaryFormat::Fat32, ByteOrder::Native),
            FAT_CIGAM => (BinaryFormat::Fat32, ByteOrder::Swapped),
            FAT_MAGIC_64 => (BinaryFormat::Fat64, ByteOrder::Native),
            FAT_CIGAM_64 => (BinaryFormat::Fat64, ByteOrder::Swapped),
            _ => (BinaryFormat::Unrecognized, ByteOrder::Native),
        }
    }

    pub fn is_fat(self) -> bool {
        self == BinaryFormat::Fat32 || self == BinaryFormat::Fat64
    }
}

fn classify(buf: &[u8], offset: u64) -> ::std::result::Result<(BinaryFormat, ByteOrder), FormatError> {
    if buf.len() < 4 {
        return Err(FormatError::Truncated {
            what: "magic",
            offset,
            needed: 4,
            available: buf.len() as u64,
        });
    }

    match BinaryFormat::from_magic(<NativeEndian as byteorder::ByteOrder>::read_u32(buf)) {
        (BinaryFormat::Unrecognized, _) => Err(FormatError::NotMachO {
            magic: <BigEndian as byteorder::ByteOrder>::read_u32(buf),
            offset,
        }),
        classified => Ok(classified),
    }
}

/// Read exactly the 4 magic bytes from `reader` and classify them.
pub fn sniff<R: Read>(reader: &mut R) -> Result<(BinaryFormat, ByteOrder)> {
    let mut magic = Vec::with_capacity(4);

    reader.by_ref().take(4).read_to_end(&mut magic)?;

    Ok(classify(&magic, 0)?)
}

/// The mach header of one slice, with every field in host byte order.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MachHeader {
    /// mach magic number identifier
    pub magic: u32,
    /// cpu specifier
    pub cputype: cpu_type_t,
    /// machine specifier
    pub cpusubtype: cpu_subtype_t,
    /// type of file
    pub filetype: u32,
    /// number of load commands
    pub ncmds: u32,
    /// the size of all the load commands
    pub sizeofcmds: u32,
    /// flags
    pub flags: u32,
    /// reserved, 64-bit only
    pub reserved: u32,
}

impl MachHeader {
    pub fn is_64bit(&self) -> bool {
        self.magic == MH_MAGIC_64
    }

    pub fn flags(&self) -> MachHeaderFlags {
        MachHeaderFlags::from_bits_truncate(self.flags)
    }

    pub fn arch_name(&self) -> &'static str {
        get_arch_name(self.cputype, self.cpusubtype)
    }

    pub fn filetype_name(&self) -> &'static str {
        get_filetype_name(self.filetype)
    }
}

pub trait MachArch {
    const HEADER_SIZE: usize;

    /// Decode the header at the start of `buf`, a slice found at `offset` in the file.
    fn parse_mach_header<O: byteorder::ByteOrder>(
        buf: &[u8],
        offset: u64,
    ) -> ::std::result::Result<MachHeader, FormatError>;
}

pub enum Arch32 {}
pub enum Arch64 {}

fn check_header_size(buf: &[u8], offset: u64, needed: usize) -> ::std::result::Result<(), FormatError> {
    if buf.len() < needed {
        Err(FormatError::Truncated {
            what: "mach header",
            offset,
            needed: needed as u64,
            available: buf.len() as u64,
        })
    } else {
        Ok(())
    }
}

fn read_header_fields<O: byteorder::ByteOrder>(buf: &[u8]) -> MachHeader {
    MachHeader {
        magic: O::read_u32(&buf[0..4]),
        cputype: O::read_i32(&buf[4..8]),
        cpusubtype: O::read_i32(&buf[8..12]),
        filetype: O::read_u32(&buf[12..16]),
        ncmds: O::read_u32(&buf[16..20]),
        sizeofcmds: O::read_u32(&buf[20..24]),
        flags: O::read_u32(&buf[24..28]),
        reserved: 0,
    }
}

impl MachArch for Arch32 {
    const HEADER_SIZE: usize = MACH_HEADER_SIZE;

    fn parse_mach_header<O: byteorder::ByteOrder>(
        buf: &[u8],
        offset: u64,
    ) -> ::std::result::Result<MachHeader, FormatError> {
        check_header_size(buf, offset, Self::HEADER_SIZE)?;

        Ok(read_header_fields::<O>(buf))
    }
}

impl MachArch for Arch64 {
    const HEADER_SIZE: usize = MACH_HEADER_64_SIZE;

    fn parse_mach_header<O: byteorder::ByteOrder>(
        buf: &[u8],
        offset: u64,
    ) -> ::std::result::Result<MachHeader, FormatError> {
        check_header_size(buf, offset, Self::HEADER_SIZE)?;

        Ok(MachHeader {
            reserved: O::read_u32(&buf[28..32]),
            ..read_header_fields::<O>(buf)
        })
    }
}

/// One entry of the fat architecture table; 32-bit tables are widened.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FatArch {
    /// cpu specifier (int)
    pub cputype: cpu_type_t,
    /// machine specifier (int)
    pub cpusubtype: cpu_subtype_t,
    /// file offset to this object file
    pub offset: u64,
    /// size of this object file
    pub size: u64,
    /// alignment as a power of 2
    pub align: u32,
}

impl FatArch {
    pub fn arch_name(&self) -> &'static str {
        get_arch_name(self.cputype, self.cpusubtype)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FatHeader {
    pub magic: u32,
    pub archs: Vec<FatArch>,
}

impl FatHeader {
    fn parse<O: byteorder::ByteOrder>(buf: &[u8], is_64bit: bool) -> ::std::result::Result<FatHeader, FormatError> {
        if buf.len() < FAT_HEADER_SIZE {
            return Err(FormatError::Truncated {
                what: "fat header",
                offset: 0,
                needed: FAT_HEADER_SIZE as u64,
                available: buf.len() as u64,
            });
        }

        let magic = O::read_u32(&buf[0..4]);
        let nfat_arch = O::read_u32(&buf[4..8]);

        if nfat_arch > FAT_MAX_ARCHS {
            debug!("fat magic with {} archs, probably a Java class file", nfat_arch);

            return Err(FormatError::NotMachO {
                magic: <BigEndian as byteorder::ByteOrder>::read_u32(buf),
                offset: 0,
            });
        }

        let arch_size = if is_64bit { FAT_ARCH_64_SIZE } else { FAT_ARCH_SIZE };
        let table_size = FAT_HEADER_SIZE + nfat_arch as usize * arch_size;

        if buf.len() < table_size {
            return Err(FormatError::Truncated {
                what: "fat arch table",
                offset: FAT_HEADER_SIZE as u64,
                needed: (table_size - FAT_HEADER_SIZE) as u64,
                available: (buf.len() - FAT_HEADER_SIZE) as u64,
            });
        }

        debug!("parsing fat header with {} archs, magic=0x{:x}", nfat_arch, magic);

        let archs = buf[FAT_HEADER_SIZE..table_size]
            .chunks(arch_size)
            .enumerate()
            .map(|(i, entry)| {
                let arch = if is_64bit {
                    FatArch {
                        cputype: O::read_i32(&entry[0..4]),
                        cpusubtype: O::read_i32(&entry[4..8]),
                        offset: O::read_u64(&entry[8..16]),
                        size: O::read_u64(&entry[16..24]),
                        align: O::read_u32(&entry[24..28]),
                    }
                } else {
                    FatArch {
                        cputype: O::read_i32(&entry[0..4]),
                        cpusubtype: O::read_i32(&entry[4..8]),
                        offset: u64::from(O::read_u32(&entry[8..12])),
                        size: u64::from(O::read_u32(&entry[12..16])),
                        align: O::read_u32(&entry[16..20]),
                    }
                };

                debug!("fat header arch#{}, arch={:?}", i, arch);

                arch
            })
            .collect();

        Ok(FatHeader { magic, archs })
    }
}

/// Knobs for a parse.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// the most load commands a slice may declare
    pub max_load_commands: usize,
    /// capacity of each slice's dylib list
    pub max_dylibs: usize,
    /// fail a slice on its first anomaly
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_load_commands: 4096,
            max_dylibs: 256,
            strict: false,
        }
    }
}

impl ParseOptions {
    pub fn with_max_load_commands(self, max_load_commands: usize) -> Self {
        ParseOptions {
            max_load_commands,
            ..self
        }
    }

    pub fn with_max_dylibs(self, max_dylibs: usize) -> Self {
        ParseOptions { max_dylibs, ..self }
    }

    pub fn with_strict(self, strict: bool) -> Self {
        ParseOptions { strict, ..self }
    }
}

/// One decoded Mach-O image, the whole file or a member of a fat archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachSlice {
    header: MachHeader,
    byte_order: ByteOrder,
    offset: u64,
    size: u64,
    commands: CommandModel,
    security: SecurityReport,
    anomalies: Vec<Anomaly>,
}

impl MachSlice {
    pub fn header(&self) -> &MachHeader {
        &self.header
    }

    pub fn cputype(&self) -> cpu_type_t {
        self.header.cputype
    }

    pub fn cpusubtype(&self) -> cpu_subtype_t {
        self.header.cpusubtype
    }

    pub fn arch_name(&self) -> &'static str {
        self.header.arch_name()
    }

    pub fn is_64bit(&self) -> bool {
        self.header.is_64bit()
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// The file offset of the slice, 0 for thin files.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn filetype(&self) -> u32 {
        self.header.filetype
    }

    pub fn flags(&self) -> MachHeaderFlags {
        self.header.flags()
    }

    pub fn ncmds(&self) -> u32 {
        self.header.ncmds
    }

    pub fn sizeofcmds(&self) -> u32 {
        self.header.sizeofcmds
    }

    pub fn commands(&self) -> &CommandModel {
        &self.commands
    }

    pub fn segments(&self) -> &[SegmentInfo] {
        &self.commands.segments
    }

    pub fn dylibs(&self) -> &[DylibRef] {
        &self.commands.dylibs
    }

    pub fn entry_point(&self) -> Option<&EntryPoint> {
        self.commands.entry_point.as_ref()
    }

    pub fn code_signature(&self) -> Option<&CodeSignatureSpan> {
        self.commands.code_signature.as_ref()
    }

    pub fn stats(&self) -> CommandStats {
        self.commands.stats
    }

    pub fn security(&self) -> &SecurityReport {
        &self.security
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    fn note(&mut self, anomaly: Anomaly) {
        warn!("{}", anomaly);

        self.anomalies.push(anomaly);
    }

    fn check_strict(self, opts: &ParseOptions) -> ::std::result::Result<MachSlice, FormatError> {
        if opts.strict {
            if let Some(anomaly) = self.anomalies.first() {
                return Err(anomaly.clone().into());
            }
        }

        Ok(self)
    }
}

/// The outcome of one slice; fat archives keep going past a failed slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceOutcome {
    arch: Option<FatArch>,
    result: ::std::result::Result<MachSlice, FormatError>,
}

impl SliceOutcome {
    /// The fat table entry, `None` for thin files.
    pub fn arch(&self) -> Option<&FatArch> {
        self.arch.as_ref()
    }

    pub fn result(&self) -> ::std::result::Result<&MachSlice, &FormatError> {
        self.result.as_ref()
    }

    pub fn slice(&self) -> Option<&MachSlice> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&FormatError> {
        self.result.as_ref().err()
    }

    pub fn arch_name(&self) -> &'static str {
        match (&self.result, &self.arch) {
            (Ok(slice), _) => slice.arch_name(),
            (Err(_), Some(arch)) => arch.arch_name(),
            (Err(_), None) => "unknown",
        }
    }
}

/// Everything decoded from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    format: BinaryFormat,
    byte_order: ByteOrder,
    slices: Vec<SliceOutcome>,
}

impl ParseResult {
    pub fn parse(buf: &[u8]) -> Result<ParseResult> {
        Self::parse_with(buf, &ParseOptions::default())
    }

    pub fn parse_with(buf: &[u8], opts: &ParseOptions) -> Result<ParseResult> {
        let (format, byte_order) = classify(buf, 0)?;

        Self::parse_classified(buf, format, byte_order, opts)
    }

    fn parse_classified(
        buf: &[u8],
        format: BinaryFormat,
        byte_order: ByteOrder,
        opts: &ParseOptions,
    ) -> Result<ParseResult> {
        let slices = if format.is_fat() {
            let fat = if byte_order.is_little_endian() {
                FatHeader::parse::<LittleEndian>(buf, format == BinaryFormat::Fat64)?
            } else {
                FatHeader::parse::<BigEndian>(buf, format == BinaryFormat::Fat64)?
            };

            fat.archs
                .into_iter()
                .enumerate()
                .map(|(i, arch)| {
                    let result = parse_fat_slice(buf, &arch, opts);

                    if let Err(ref err) = result {
                        warn!("fat slice #{} ({}) failed, {}", i, arch.arch_name(), err);
                    }

                    SliceOutcome { arch: Some(arch), result }
                })
                .collect()
        } else {
            vec![SliceOutcome {
                arch: None,
                result: Ok(parse_slice(buf, 0, opts)?),
            }]
        };

        Ok(ParseResult {
            format,
            byte_order,
            slices,
        })
    }

    pub fn format(&self) -> BinaryFormat {
        self.format
    }

    /// The byte order of the outermost structure, the fat header for universal files.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn is_fat(&self) -> bool {
        self.format.is_fat()
    }

    pub fn slices(&self) -> &[SliceOutcome] {
        &self.slices
    }

    pub fn successes(&self) -> impl Iterator<Item = &MachSlice> {
        self.slices.iter().filter_map(SliceOutcome::slice)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FormatError> {
        self.slices.iter().filter_map(SliceOutcome::error)
    }

    pub fn find_arch(&self, cputype: cpu_type_t, cpusubtype: cpu_subtype_t) -> Option<&MachSlice> {
        self.successes().find(|slice| {
            slice.cputype() == cputype
                && get_cpu_subtype_type(slice.cpusubtype()) == get_cpu_subtype_type(cpusubtype)
        })
    }
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParseResult> {
    parse_file_with(path, &ParseOptions::default())
}

/// Open `path` read-only, sniff its magic, then map and parse it.
///
/// Nothing past the magic is read from a file that is not Mach-O.
pub fn parse_file_with<P: AsRef<Path>>(path: P, opts: &ParseOptions) -> Result<ParseResult> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    if !file.metadata()?.is_file() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("{:?} is not a regular file", path)).into());
    }

    let (format, byte_order) = sniff(&mut file)?;

    debug!("{:?} is {:?} with {:?} byte order", path, format, byte_order);

    let mmap = unsafe { Mmap::map(&file) }?;

    ParseResult::parse_classified(&mmap, format, byte_order, opts)
}

fn parse_fat_slice(buf: &[u8], arch: &FatArch, opts: &ParseOptions) -> ::std::result::Result<MachSlice, FormatError> {
    let data = arch
        .offset
        .checked_add(arch.size)
        .filter(|&end| arch.offset < buf.len() as u64 && end <= buf.len() as u64)
        .and_then(|end| buf.get(arch.offset as usize..end as usize))
        .ok_or_else(|| FormatError::Truncated {
            what: "fat slice",
            offset: arch.offset,
            needed: arch.size,
            available: (buf.len() as u64).saturating_sub(arch.offset),
        })?;

    let mut slice = parse_slice(data, arch.offset, opts)?;

    if slice.cputype() != arch.cputype {
        slice.note(Anomaly {
            offset: arch.offset,
            kind: AnomalyKind::ArchMismatch {
                expected: arch.cputype,
                found: slice.cputype(),
            },
        });
    }

    if arch.align >= 64 || arch.offset % (1u64 << arch.align) != 0 {
        slice.note(Anomaly {
            offset: arch.offset,
            kind: AnomalyKind::MisalignedSlice { align: arch.align },
        });
    }

    slice.check_strict(opts)
}

/// Parse one thin image; `base` is its offset in the file.
fn parse_slice(buf: &[u8], base: u64, opts: &ParseOptions) -> ::std::result::Result<MachSlice, FormatError> {
    let (format, byte_order) = classify(buf, base)?;

    match (format, byte_order.is_little_endian()) {
        (BinaryFormat::Thin32, true) => parse_mach_slice::<Arch32, LittleEndian>(buf, base, byte_order, opts),
        (BinaryFormat::Thin32, false) => parse_mach_slice::<Arch32, BigEndian>(buf, base, byte_order, opts),
        (BinaryFormat::Thin64, true) => parse_mach_slice::<Arch64, LittleEndian>(buf, base, byte_order, opts),
        (BinaryFormat::Thin64, false) => parse_mach_slice::<Arch64, BigEndian>(buf, base, byte_order, opts),
        _ => Err(FormatError::NotMachO {
            magic: <BigEndian as byteorder::ByteOrder>::read_u32(buf),
            offset: base,
        }),
    }
}

fn parse_mach_slice<A: MachArch, O: byteorder::ByteOrder>(
    buf: &[u8],
    base: u64,
    byte_order: ByteOrder,
    opts: &ParseOptions,
) -> ::std::result::Result<MachSlice, FormatError> {
    let header = A::parse_mach_header::<O>(buf, base)?;

    debug!("parsed mach-o file header: {:?}", header);

    let mut commands = LoadCommands::<O>::new(buf, base, &header, A::HEADER_SIZE, opts.max_load_commands)?;
    let mut builder = ModelBuilder::new(&header, opts.max_dylibs);

    for record in commands.by_ref() {
        builder.interpret::<O>(&record?);
    }

    debug!("parsed {} load commands", header.ncmds);

    if commands.consumed() != u64::from(header.sizeofcmds) {
        builder.note(Anomaly {
            offset: base + A::HEADER_SIZE as u64,
            kind: AnomalyKind::SizeMismatch {
                declared: header.sizeofcmds,
                consumed: commands.consumed(),
            },
        });
    }

    let (commands, anomalies) = builder.finish(buf, base);
    let security = SecurityReport::evaluate(header.flags, &commands);

    MachSlice {
        header,
        byte_order,
        offset: base,
        size: buf.len() as u64,
        commands,
        security,
        anomalies,
    }
    .check_strict(opts)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use byteorder::WriteBytesExt;

    use super::*;

    fn header<O: byteorder::ByteOrder>(magic: u32, ncmds: u32, sizeofcmds: u32, flags: u32) -> Vec<u8> {
        let mut buf = vec![];

        buf.write_u32::<O>(magic).unwrap();
        buf.write_i32::<O>(CPU_TYPE_X86_64).unwrap();
        buf.write_i32::<O>(CPU_SUBTYPE_X86_64_ALL).unwrap();
        buf.write_u32::<O>(MH_EXECUTE).unwrap();
        buf.write_u32::<O>(ncmds).unwrap();
        buf.write_u32::<O>(sizeofcmds).unwrap();
        buf.write_u32::<O>(flags).unwrap();
        if magic == MH_MAGIC_64 {
            buf.write_u32::<O>(0).unwrap();
        }

        buf
    }

    #[test]
    fn test_from_magic() {
        assert_eq!(BinaryFormat::from_magic(MH_MAGIC), (BinaryFormat::Thin32, ByteOrder::Native));
        assert_eq!(BinaryFormat::from_magic(MH_CIGAM), (BinaryFormat::Thin32, ByteOrder::Swapped));
        assert_eq!(BinaryFormat::from_magic(MH_MAGIC_64), (BinaryFormat::Thin64, ByteOrder::Native));
        assert_eq!(BinaryFormat::from_magic(MH_CIGAM_64), (BinaryFormat::Thin64, ByteOrder::Swapped));
        assert_eq!(BinaryFormat::from_magic(FAT_MAGIC), (BinaryFormat::Fat32, ByteOrder::Native));
        assert_eq!(BinaryFormat::from_magic(FAT_CIGAM), (BinaryFormat::Fat32, ByteOrder::Swapped));
        assert_eq!(BinaryFormat::from_magic(FAT_MAGIC_64), (BinaryFormat::Fat64, ByteOrder::Native));
        assert_eq!(BinaryFormat::from_magic(FAT_CIGAM_64), (BinaryFormat::Fat64, ByteOrder::Swapped));
        assert_eq!(BinaryFormat::from_magic(0xdeadbeef).0, BinaryFormat::Unrecognized);
    }

    #[test]
    fn test_sniff() {
        let mut cur = Cursor::new(vec![0xcf, 0xfa, 0xed, 0xfe, 0x07, 0x00, 0x00, 0x01]);
        let (format, byte_order) = sniff(&mut cur).unwrap();

        assert_eq!(format, BinaryFormat::Thin64);
        assert!(byte_order.is_little_endian());
        assert_eq!(cur.position(), 4);

        let (format, byte_order) = sniff(&mut Cursor::new(vec![0xca, 0xfe, 0xba, 0xbe])).unwrap();

        assert_eq!(format, BinaryFormat::Fat32);
        assert!(!byte_order.is_little_endian());
    }

    #[test]
    fn test_sniff_not_macho() {
        let mut cur = Cursor::new(vec![0xde, 0xad, 0xbe, 0xef, 0, 0, 0, 0]);

        match sniff(&mut cur) {
            Err(err) => assert_eq!(
                err.format_error(),
                Some(&FormatError::NotMachO {
                    magic: 0xdeadbeef,
                    offset: 0
                })
            ),
            Ok(classified) => panic!("unexpected {:?}", classified),
        }
        assert_eq!(cur.position(), 4);
    }

    #[test]
    fn test_sniff_truncated() {
        match sniff(&mut Cursor::new(vec![0xcf, 0xfa])) {
            Err(err) => assert_eq!(
                err.format_error(),
                Some(&FormatError::Truncated {
                    what: "magic",
                    offset: 0,
                    needed: 4,
                    available: 2
                })
            ),
            Ok(classified) => panic!("unexpected {:?}", classified),
        }
    }

    #[test]
    fn test_parse_mach_header() {
        let buf = header::<LittleEndian>(MH_MAGIC_64, 15, 2080, 0x00a18085);
        let header = Arch64::parse_mach_header::<LittleEndian>(&buf, 0).unwrap();

        assert_eq!(header.magic, MH_MAGIC_64);
        assert_eq!(header.cputype, CPU_TYPE_X86_64);
        assert_eq!(header.filetype, MH_EXECUTE);
        assert_eq!(header.ncmds, 15);
        assert_eq!(header.sizeofcmds, 2080);
        assert_eq!(header.flags, 0x00a18085);
        assert!(header.is_64bit());
        assert!(header.flags().contains(MachHeaderFlags::PIE));
        assert_eq!(header.arch_name(), "x86_64");
        assert_eq!(header.filetype_name(), "MH_EXECUTE");
    }

    #[test]
    fn test_parse_swapped_mach_header() {
        let native = Arch32::parse_mach_header::<LittleEndian>(&header::<LittleEndian>(MH_MAGIC, 3, 120, 0x85), 0);
        let swapped = Arch32::parse_mach_header::<BigEndian>(&header::<BigEndian>(MH_MAGIC, 3, 120, 0x85), 0);

        assert_eq!(native, swapped);
    }

    #[test]
    fn test_parse_truncated_mach_header() {
        let buf = header::<LittleEndian>(MH_MAGIC_64, 0, 0, 0);

        assert_eq!(
            Arch64::parse_mach_header::<LittleEndian>(&buf[..20], 0x4000),
            Err(FormatError::Truncated {
                what: "mach header",
                offset: 0x4000,
                needed: 32,
                available: 20
            })
        );
    }

    #[test]
    fn test_parse_java_class() {
        let mut buf = vec![0xca, 0xfe, 0xba, 0xbe, 0x00, 0x00, 0x00, 0x34];

        buf.resize(64, 0);

        match ParseResult::parse(&buf) {
            Err(err) => assert!(matches!(err.format_error(), Some(FormatError::NotMachO { .. }))),
            Ok(result) => panic!("unexpected {:?}", result),
        }
    }

    #[test]
    fn test_parse_truncated_fat_table() {
        let buf = vec![0xca, 0xfe, 0xba, 0xbe, 0x00, 0x00, 0x00, 0x02, 0, 0, 0, 7];

        match ParseResult::parse(&buf) {
            Err(err) => assert!(matches!(
                err.format_error(),
                Some(FormatError::Truncated { what: "fat arch table", .. })
            )),
            Ok(result) => panic!("unexpected {:?}", result),
        }
    }

    #[test]
    fn test_parse_thin() {
        let buf = header::<LittleEndian>(MH_MAGIC_64, 0, 0, MH_PIE);
        let result = ParseResult::parse(&buf).unwrap();

        assert_eq!(result.format(), BinaryFormat::Thin64);
        assert_eq!(result.slices().len(), 1);

        let slice = result.slices()[0].slice().unwrap();

        assert_eq!(slice.offset(), 0);
        assert_eq!(slice.size(), 32);
        assert!(slice.security().pie);
        assert!(result.find_arch(CPU_TYPE_X86_64, CPU_SUBTYPE_X86_64_ALL).is_some());
        assert!(result.find_arch(CPU_TYPE_ARM64, CPU_SUBTYPE_ARM64_ALL).is_none());
    }

    #[test]
    fn test_strict_mode() {
        let buf = header::<LittleEndian>(MH_MAGIC_64, 0, 8, 0);

        assert!(ParseResult::parse(&buf).unwrap().slices()[0].slice().unwrap().anomalies().len() == 1);

        match ParseResult::parse_with(&buf, &ParseOptions::default().with_strict(true)) {
            Err(err) => assert!(matches!(err.format_error(), Some(FormatError::Anomaly(_)))),
            Ok(result) => panic!("unexpected {:?}", result),
        }
    }

    #[test]
    fn test_parse_options() {
        let opts = ParseOptions::default().with_max_dylibs(32).with_max_load_commands(16);

        assert_eq!(opts.max_dylibs, 32);
        assert_eq!(opts.max_load_commands, 16);
        assert!(!opts.strict);
    }
}

use std::fmt;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::commands::{CodeSignatureSpan, DylibKind, DylibRef, EntryPoint, SegmentInfo};
use crate::consts::*;
use crate::loader::{ByteOrder, FatArch, MachHeader, MachSlice, ParseResult, SliceOutcome};
use crate::security::SecurityReport;

const TIMESTAMP: &[FormatItem<'_>] = format_description!(
    "[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second] [year] UTC"
);

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

impl fmt::Display for MachHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Mach header\n")?;
        write!(
            f,
            "      magic cputype cpusubtype  caps    filetype ncmds sizeofcmds      \
             flags\n"
        )?;
        write!(
            f,
            " 0x{:08x} {:7} {:10}  0x{:02x}  {:10} {:5} {:10} 0x{:08x}\n",
            self.magic,
            self.cputype,
            get_cpu_subtype_type(self.cpusubtype),
            get_cpu_subtype_feature(self.cpusubtype),
            self.filetype,
            self.ncmds,
            self.sizeofcmds,
            self.flags
        )
    }
}

impl fmt::Display for FatArch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "    cputype {} ({})\n", self.cputype, self.arch_name())?;
        write!(f, "    cpusubtype {}\n", get_cpu_subtype_type(self.cpusubtype))?;
        write!(f, "    capabilities 0x{:x}\n", get_cpu_subtype_feature(self.cpusubtype))?;
        write!(f, "    offset {}\n", self.offset)?;
        write!(f, "    size {}\n", self.size)?;
        if self.align < 64 {
            write!(f, "    align 2^{} ({})\n", self.align, 1u64 << self.align)
        } else {
            write!(f, "    align 2^{}\n", self.align)
        }
    }
}

impl fmt::Display for SegmentInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "  segname {}\n", self.name)?;
        write!(f, "   vmaddr 0x{:016x}\n", self.vmaddr)?;
        write!(f, "   vmsize 0x{:016x}\n", self.vmsize)?;
        write!(f, "  fileoff {}\n", self.fileoff)?;
        write!(f, " filesize {}\n", self.filesize)?;
        write!(f, "  maxprot 0x{:08x}\n", self.maxprot)?;
        write!(f, " initprot 0x{:08x}\n", self.initprot)?;
        write!(f, "   nsects {}\n", self.nsects)?;
        write!(f, "    flags 0x{:x}\n", self.flags)
    }
}

impl fmt::Display for DylibRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            DylibKind::Load => "load",
            DylibKind::Weak => "weak",
            DylibKind::Reexport => "reexport",
            DylibKind::Upward => "upward",
            DylibKind::Lazy => "lazy",
        };
        let ts = OffsetDateTime::from_unix_timestamp(i64::from(self.timestamp)).map_err(|_| fmt::Error)?;

        write!(f, "         name {} ({})\n", self.path, kind)?;
        write!(
            f,
            "   time stamp {} {}\n",
            self.timestamp,
            ts.format(TIMESTAMP).map_err(|_| fmt::Error)?
        )?;
        write!(f, "      current version {}\n", self.current_version)?;
        write!(f, "compatibility version {}\n", self.compatibility_version)
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EntryPoint::Main { entryoff, stacksize } => {
                write!(f, "  entryoff {}\n", entryoff)?;
                write!(f, " stacksize {}\n", stacksize)
            }
            EntryPoint::UnixThread { flavor, pc: Some(pc) } => {
                write!(f, "   flavor {}\n", flavor)?;
                write!(f, "       pc 0x{:016x}\n", pc)
            }
            EntryPoint::UnixThread { flavor, pc: None } => {
                write!(f, "   flavor {}\n", flavor)?;
                write!(f, "       pc unknown\n")
            }
        }
    }
}

impl fmt::Display for CodeSignatureSpan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "  dataoff {}\n", self.dataoff)?;
        write!(f, " datasize {}\n", self.datasize)?;
        write!(f, "   offset 0x{:x} in file\n", self.file_offset)?;

        if let Some(ref dir) = self.directory {
            write!(f, "    blobs {}\n", dir.slots.len())?;

            for index in &dir.slots {
                write!(f, "           slot 0x{:05x} at {}\n", index.slot, index.offset)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for SecurityReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "              pie {}\n", yes_no(self.pie))?;
        write!(f, "          nx_heap {}\n", yes_no(self.nx_heap))?;
        write!(f, "         nx_stack {}\n", yes_no(self.nx_stack))?;
        write!(f, "     stack_canary {}\n", yes_no(self.stack_canary))?;
        write!(f, " restrict_segment {}\n", yes_no(self.restrict_segment))?;
        write!(f, "      code_signed {}\n", yes_no(self.code_signed))?;
        write!(f, "        notarized {}\n", yes_no(self.notarized))?;
        write!(f, "        encrypted {}\n", yes_no(self.encrypted))?;
        write!(f, "            flags 0x{:08x}\n", self.flags)
    }
}

impl fmt::Display for MachSlice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let commands = self.commands();
        let stats = self.stats();

        write!(
            f,
            "{} {}, {} bytes at offset {}{}\n",
            self.arch_name(),
            get_filetype_name(self.filetype()),
            self.size(),
            self.offset(),
            if self.byte_order() == ByteOrder::Swapped {
                ", byte swapped"
            } else {
                ""
            }
        )?;
        write!(f, "{}", self.header())?;
        write!(
            f,
            "Load commands: {} observed, {} interpreted, {} opaque\n",
            stats.observed, stats.interpreted, stats.opaque
        )?;

        for segment in self.segments() {
            write!(f, "Segment\n{}", segment)?;
        }

        if let Some(ref dylib) = commands.install_name {
            write!(f, "Install name\n{}", dylib)?;
        }

        for dylib in self.dylibs() {
            write!(f, "Dylib\n{}", dylib)?;
        }

        if commands.dylibs.is_truncated() {
            write!(f, "  ({} more dylibs not listed)\n", commands.dylibs.dropped())?;
        }

        if let Some(ref dylinker) = commands.dylinker {
            write!(f, "Dylinker\n         name {}\n", dylinker)?;
        }

        for rpath in &commands.rpaths {
            write!(f, "Rpath\n         path {}\n", rpath)?;
        }

        if let Some(uuid) = commands.uuid {
            write!(f, "UUID\n    uuid {}\n", uuid.hyphenated().to_string().to_uppercase())?;
        }

        match self.entry_point() {
            Some(entry) => write!(f, "Entry point\n{}", entry)?,
            None => write!(f, "Entry point\n  none\n")?,
        }

        if let Some(span) = self.code_signature() {
            write!(f, "Code signature\n{}", span)?;
        }

        for opaque in &commands.opaque {
            write!(f, "Opaque {} (0x{:x}) {} bytes\n", opaque.name(), opaque.cmd, opaque.cmdsize)?;
        }

        write!(f, "Security\n{}", self.security())?;

        if !self.anomalies().is_empty() {
            write!(f, "Anomalies\n")?;

            for anomaly in self.anomalies() {
                write!(f, "  {}\n", anomaly)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for SliceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(arch) = self.arch() {
            write!(f, "{}", arch)?;
        }

        match self.result() {
            Ok(slice) => write!(f, "{}", slice),
            Err(err) => write!(f, "error: {}\n", err),
        }
    }
}

impl fmt::Display for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_fat() {
            write!(f, "Fat headers\n")?;
            write!(f, "nfat_arch {}\n", self.slices().len())?;

            for (i, slice) in self.slices().iter().enumerate() {
                write!(f, "architecture {}\n{}", i, slice)?;
            }

            Ok(())
        } else {
            self.slices().iter().try_for_each(|slice| write!(f, "{}", slice))
        }
    }
}

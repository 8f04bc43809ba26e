#![allow(dead_code)]
#![allow(non_camel_case_types)]

use std::collections::HashMap;

pub type cpu_type_t = i32;
pub type cpu_subtype_t = i32;
pub type vm_prot_t = i32;

// Capability bits used in the definition of cpu_type.
//

/// mask for architecture bits
pub const CPU_ARCH_MASK: cpu_type_t = 0xff000000u64 as cpu_type_t;
/// 64 bit ABI
pub const CPU_ARCH_ABI64: cpu_type_t = 0x01000000;
/// ABI for 64-bit hardware with 32-bit types; LP32
pub const CPU_ARCH_ABI64_32: cpu_type_t = 0x02000000;

//  Machine types known by all.
//

pub const CPU_TYPE_ANY: cpu_type_t = -1;

pub const CPU_TYPE_VAX: cpu_type_t = 1;
pub const CPU_TYPE_MC680X0: cpu_type_t = 6;
pub const CPU_TYPE_X86: cpu_type_t = 7;
pub const CPU_TYPE_I386: cpu_type_t = CPU_TYPE_X86;
pub const CPU_TYPE_X86_64: cpu_type_t = CPU_TYPE_X86 | CPU_ARCH_ABI64;
pub const CPU_TYPE_MIPS: cpu_type_t = 8;
pub const CPU_TYPE_MC98000: cpu_type_t = 10;
pub const CPU_TYPE_HPPA: cpu_type_t = 11;
pub const CPU_TYPE_ARM: cpu_type_t = 12;
pub const CPU_TYPE_ARM64: cpu_type_t = CPU_TYPE_ARM | CPU_ARCH_ABI64;
pub const CPU_TYPE_ARM64_32: cpu_type_t = CPU_TYPE_ARM | CPU_ARCH_ABI64_32;
pub const CPU_TYPE_MC88000: cpu_type_t = 13;
pub const CPU_TYPE_SPARC: cpu_type_t = 14;
pub const CPU_TYPE_I860: cpu_type_t = 15;
pub const CPU_TYPE_ALPHA: cpu_type_t = 16;
pub const CPU_TYPE_POWERPC: cpu_type_t = 18;
pub const CPU_TYPE_POWERPC64: cpu_type_t = CPU_TYPE_POWERPC | CPU_ARCH_ABI64;

// Capability bits used in the definition of cpu_subtype.
//

/// mask for feature flags
pub const CPU_SUBTYPE_MASK: cpu_subtype_t = 0xff000000u64 as cpu_subtype_t;
/// 64 bit libraries
pub const CPU_SUBTYPE_LIB64: cpu_subtype_t = 0x80000000u64 as cpu_subtype_t;

pub const CPU_SUBTYPE_MULTIPLE: cpu_subtype_t = -1;

pub const CPU_SUBTYPE_I386_ALL: cpu_subtype_t = 3;
pub const CPU_SUBTYPE_X86_ALL: cpu_subtype_t = 3;
pub const CPU_SUBTYPE_X86_64_ALL: cpu_subtype_t = 3;
pub const CPU_SUBTYPE_X86_64_H: cpu_subtype_t = 8;

pub const CPU_SUBTYPE_ARM_ALL: cpu_subtype_t = 0;
pub const CPU_SUBTYPE_ARM_V4T: cpu_subtype_t = 5;
pub const CPU_SUBTYPE_ARM_V6: cpu_subtype_t = 6;
pub const CPU_SUBTYPE_ARM_V5TEJ: cpu_subtype_t = 7;
pub const CPU_SUBTYPE_ARM_XSCALE: cpu_subtype_t = 8;
pub const CPU_SUBTYPE_ARM_V7: cpu_subtype_t = 9;
pub const CPU_SUBTYPE_ARM_V7F: cpu_subtype_t = 10;
pub const CPU_SUBTYPE_ARM_V7S: cpu_subtype_t = 11;
pub const CPU_SUBTYPE_ARM_V7K: cpu_subtype_t = 12;
pub const CPU_SUBTYPE_ARM_V6M: cpu_subtype_t = 14;
pub const CPU_SUBTYPE_ARM_V7M: cpu_subtype_t = 15;
pub const CPU_SUBTYPE_ARM_V7EM: cpu_subtype_t = 16;
pub const CPU_SUBTYPE_ARM_V8: cpu_subtype_t = 13;

pub const CPU_SUBTYPE_ARM64_ALL: cpu_subtype_t = 0;
pub const CPU_SUBTYPE_ARM64_V8: cpu_subtype_t = 1;
pub const CPU_SUBTYPE_ARM64E: cpu_subtype_t = 2;

pub const CPU_SUBTYPE_ARM64_32_V8: cpu_subtype_t = 1;

pub const CPU_SUBTYPE_POWERPC_ALL: cpu_subtype_t = 0;
pub const CPU_SUBTYPE_POWERPC_970: cpu_subtype_t = 100;

/// Strip the capability bits from a cpu subtype.
pub fn get_cpu_subtype_type(subtype: cpu_subtype_t) -> cpu_subtype_t {
    subtype & !CPU_SUBTYPE_MASK
}

/// The capability bits of a cpu subtype.
pub fn get_cpu_subtype_feature(subtype: cpu_subtype_t) -> u32 {
    ((subtype & CPU_SUBTYPE_MASK) as u32) >> 24
}

lazy_static! {
    static ref ARCH_NAMES: HashMap<(cpu_type_t, cpu_subtype_t), &'static str> = {
        let mut m = HashMap::new();

        m.insert((CPU_TYPE_I386, CPU_SUBTYPE_I386_ALL), "i386");
        m.insert((CPU_TYPE_X86_64, CPU_SUBTYPE_X86_64_ALL), "x86_64");
        m.insert((CPU_TYPE_X86_64, CPU_SUBTYPE_X86_64_H), "x86_64h");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_ALL), "arm");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V4T), "armv4t");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V5TEJ), "armv5");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_XSCALE), "xscale");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V6), "armv6");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V6M), "armv6m");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V7), "armv7");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V7F), "armv7f");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V7S), "armv7s");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V7K), "armv7k");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V7M), "armv7m");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V7EM), "armv7em");
        m.insert((CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V8), "armv8");
        m.insert((CPU_TYPE_ARM64, CPU_SUBTYPE_ARM64_ALL), "arm64");
        m.insert((CPU_TYPE_ARM64, CPU_SUBTYPE_ARM64_V8), "arm64v8");
        m.insert((CPU_TYPE_ARM64, CPU_SUBTYPE_ARM64E), "arm64e");
        m.insert((CPU_TYPE_ARM64_32, CPU_SUBTYPE_ARM64_32_V8), "arm64_32");
        m.insert((CPU_TYPE_POWERPC, CPU_SUBTYPE_POWERPC_ALL), "ppc");
        m.insert((CPU_TYPE_POWERPC, CPU_SUBTYPE_POWERPC_970), "ppc970");
        m.insert((CPU_TYPE_POWERPC64, CPU_SUBTYPE_POWERPC_ALL), "ppc64");
        m.insert((CPU_TYPE_MC680X0, 1), "m68k");
        m.insert((CPU_TYPE_HPPA, 0), "hppa");
        m.insert((CPU_TYPE_SPARC, 0), "sparc");
        m.insert((CPU_TYPE_MC88000, 0), "m88k");
        m.insert((CPU_TYPE_I860, 0), "i860");

        m
    };
}

/// Architecture name for a (cpu type, cpu subtype) pair, `"unknown"` if the pair is not listed.
///
/// The capability bits of the subtype (e.g. `CPU_SUBTYPE_LIB64`) are ignored.
pub fn get_arch_name(cputype: cpu_type_t, cpusubtype: cpu_subtype_t) -> &'static str {
    ARCH_NAMES
        .get(&(cputype, get_cpu_subtype_type(cpusubtype)))
        .cloned()
        .unwrap_or("unknown")
}

/// Reverse of `get_arch_name`.
pub fn get_arch_from_name(name: &str) -> Option<(cpu_type_t, cpu_subtype_t)> {
    ARCH_NAMES
        .iter()
        .find(|&(_, arch)| *arch == name)
        .map(|(&pair, _)| pair)
}

// Constant for the magic field of the mach_header (32-bit architectures)
//

/// the mach magic number
pub const MH_MAGIC: u32 = 0xfeedface;
/// NXSwapInt(MH_MAGIC)
pub const MH_CIGAM: u32 = 0xcefaedfe;

// Constant for the magic field of the mach_header_64 (64-bit architectures)
//

/// the 64-bit mach magic number
pub const MH_MAGIC_64: u32 = 0xfeedfacf;
/// NXSwapInt(MH_MAGIC_64)
pub const MH_CIGAM_64: u32 = 0xcffaedfe;

// The fat header always lives in big-endian byte order on disk.
//

/// the fat magic number
pub const FAT_MAGIC: u32 = 0xcafebabe;
/// NXSwapLong(FAT_MAGIC)
pub const FAT_CIGAM: u32 = 0xbebafeca;
/// the 64-bit fat magic number
pub const FAT_MAGIC_64: u32 = 0xcafebabf;
/// NXSwapLong(FAT_MAGIC_64)
pub const FAT_CIGAM_64: u32 = 0xbfbafeca;

/// Java class files share `FAT_MAGIC`; a larger architecture count means a class file.
pub const FAT_MAX_ARCHS: u32 = 30;

pub const MACH_HEADER_SIZE: usize = 28;
pub const MACH_HEADER_64_SIZE: usize = 32;
pub const FAT_HEADER_SIZE: usize = 8;
pub const FAT_ARCH_SIZE: usize = 20;
pub const FAT_ARCH_64_SIZE: usize = 32;

// Constants for the filetype field of the mach_header
//

/// relocatable object file
pub const MH_OBJECT: u32 = 0x1;
/// demand paged executable file
pub const MH_EXECUTE: u32 = 0x2;
/// fixed VM shared library file
pub const MH_FVMLIB: u32 = 0x3;
/// core file
pub const MH_CORE: u32 = 0x4;
/// preloaded executable file
pub const MH_PRELOAD: u32 = 0x5;
/// dynamically bound shared library
pub const MH_DYLIB: u32 = 0x6;
/// dynamic link editor
pub const MH_DYLINKER: u32 = 0x7;
/// dynamically bound bundle file
pub const MH_BUNDLE: u32 = 0x8;
/// shared library stub for static linking only, no section contents
pub const MH_DYLIB_STUB: u32 = 0x9;
/// companion file with only debug sections
pub const MH_DSYM: u32 = 0xa;
/// x86_64 kexts
pub const MH_KEXT_BUNDLE: u32 = 0xb;
/// a file composed of other Mach-Os to be run in the same userspace sharing a single linkedit
pub const MH_FILESET: u32 = 0xc;

pub fn get_filetype_name(filetype: u32) -> &'static str {
    match filetype {
        MH_OBJECT => "MH_OBJECT",
        MH_EXECUTE => "MH_EXECUTE",
        MH_FVMLIB => "MH_FVMLIB",
        MH_CORE => "MH_CORE",
        MH_PRELOAD => "MH_PRELOAD",
        MH_DYLIB => "MH_DYLIB",
        MH_DYLINKER => "MH_DYLINKER",
        MH_BUNDLE => "MH_BUNDLE",
        MH_DYLIB_STUB => "MH_DYLIB_STUB",
        MH_DSYM => "MH_DSYM",
        MH_KEXT_BUNDLE => "MH_KEXT_BUNDLE",
        MH_FILESET => "MH_FILESET",
        _ => "MH_UNKNOWN",
    }
}

// Constants for the flags field of the mach_header
//

/// the object file has no undefined references
pub const MH_NOUNDEFS: u32 = 0x1;
/// the object file is the output of an incremental link against a base file and can't be link edited again
pub const MH_INCRLINK: u32 = 0x2;
/// the object file is input for the dynamic linker and can't be staticly link edited again
pub const MH_DYLDLINK: u32 = 0x4;
/// the object file's undefined references are bound by the dynamic linker when loaded.
pub const MH_BINDATLOAD: u32 = 0x8;
/// the file has its dynamic undefined references prebound.
pub const MH_PREBOUND: u32 = 0x10;
/// the file has its read-only and read-write segments split
pub const MH_SPLIT_SEGS: u32 = 0x20;
/// the shared library init routine is to be run lazily (obsolete)
pub const MH_LAZY_INIT: u32 = 0x40;
/// the image is using two-level name space bindings
pub const MH_TWOLEVEL: u32 = 0x80;
/// the executable is forcing all images to use flat name space bindings
pub const MH_FORCE_FLAT: u32 = 0x100;
/// this umbrella guarantees no multiple defintions of symbols in its sub-images
pub const MH_NOMULTIDEFS: u32 = 0x200;
/// do not have dyld notify the prebinding agent about this executable
pub const MH_NOFIXPREBINDING: u32 = 0x400;
/// the binary is not prebound but can have its prebinding redone
pub const MH_PREBINDABLE: u32 = 0x800;
/// indicates that this binary binds to all two-level namespace modules of its dependent libraries
pub const MH_ALLMODSBOUND: u32 = 0x1000;
/// safe to divide up the sections into sub-sections via symbols for dead code stripping
pub const MH_SUBSECTIONS_VIA_SYMBOLS: u32 = 0x2000;
/// the binary has been canonicalized via the unprebind operation
pub const MH_CANONICAL: u32 = 0x4000;
/// the final linked image contains external weak symbols
pub const MH_WEAK_DEFINES: u32 = 0x8000;
/// the final linked image uses weak symbols
pub const MH_BINDS_TO_WEAK: u32 = 0x10000;
/// When this bit is set, all stacks in the task will be given stack execution privilege.
/// Only used in MH_EXECUTE filetypes.
pub const MH_ALLOW_STACK_EXECUTION: u32 = 0x20000;
/// When this bit is set, the binary declares it is safe for use in processes with uid zero
pub const MH_ROOT_SAFE: u32 = 0x40000;
/// When this bit is set, the binary declares it is safe for use in processes when issetugid() is true
pub const MH_SETUID_SAFE: u32 = 0x80000;
/// When this bit is set on a dylib, the static linker does not need to examine dependent dylibs
pub const MH_NO_REEXPORTED_DYLIBS: u32 = 0x100000;
/// When this bit is set, the OS will load the main executable at a random address.
/// Only used in MH_EXECUTE filetypes.
pub const MH_PIE: u32 = 0x200000;
/// Only for use on dylibs.
pub const MH_DEAD_STRIPPABLE_DYLIB: u32 = 0x400000;
/// Contains a section of type S_THREAD_LOCAL_VARIABLES
pub const MH_HAS_TLV_DESCRIPTORS: u32 = 0x800000;
/// When this bit is set, the OS will run the main executable with a non-executable heap
/// even on platforms (e.g. i386) that don't require it. Only used in MH_EXECUTE filetypes.
pub const MH_NO_HEAP_EXECUTION: u32 = 0x1000000;
/// The code was linked for use in an application extension.
pub const MH_APP_EXTENSION_SAFE: u32 = 0x02000000;
/// The external symbols listed in the nlist symbol table do not include all the symbols
/// listed in the dyld info.
pub const MH_NLIST_OUTOFSYNC_WITH_DYLDINFO: u32 = 0x04000000;
/// Allow LC_MIN_VERSION_MACOS and LC_BUILD_VERSION load commands with the platforms
/// macOS, iOSMac, iOSSimulator, tvOSSimulator and watchOSSimulator.
pub const MH_SIM_SUPPORT: u32 = 0x08000000;
/// Only for use on dylibs. When this bit is set, the dylib is part of the dyld shared cache.
pub const MH_DYLIB_IN_CACHE: u32 = 0x80000000;

// After MacOS X 10.1 when a new load command is added that is required to be
// understood by the dynamic linker for the image to execute properly the
// LC_REQ_DYLD bit will be or'ed into the load command constant.
//
pub const LC_REQ_DYLD: u32 = 0x80000000;

// Constants for the cmd field of all load commands, the type
pub const LC_SEGMENT: u32 = 0x1; /* segment of this file to be mapped */
pub const LC_SYMTAB: u32 = 0x2; /* link-edit stab symbol table info */
pub const LC_SYMSEG: u32 = 0x3; /* link-edit gdb symbol table info (obsolete) */
pub const LC_THREAD: u32 = 0x4; /* thread */
pub const LC_UNIXTHREAD: u32 = 0x5; /* unix thread (includes a stack) */
pub const LC_LOADFVMLIB: u32 = 0x6; /* load a specified fixed VM shared library */
pub const LC_IDFVMLIB: u32 = 0x7; /* fixed VM shared library identification */
pub const LC_IDENT: u32 = 0x8; /* object identification info (obsolete) */
pub const LC_FVMFILE: u32 = 0x9; /* fixed VM file inclusion (internal use) */
pub const LC_PREPAGE: u32 = 0xa; /* prepage command (internal use) */
pub const LC_DYSYMTAB: u32 = 0xb; /* dynamic link-edit symbol table info */
pub const LC_LOAD_DYLIB: u32 = 0xc; /* load a dynamically linked shared library */
pub const LC_ID_DYLIB: u32 = 0xd; /* dynamically linked shared lib ident */
pub const LC_LOAD_DYLINKER: u32 = 0xe; /* load a dynamic linker */
pub const LC_ID_DYLINKER: u32 = 0xf; /* dynamic linker identification */
pub const LC_PREBOUND_DYLIB: u32 = 0x10; /* modules prebound for a dynamically linked shared library */
pub const LC_ROUTINES: u32 = 0x11; /* image routines */
pub const LC_SUB_FRAMEWORK: u32 = 0x12; /* sub framework */
pub const LC_SUB_UMBRELLA: u32 = 0x13; /* sub umbrella */
pub const LC_SUB_CLIENT: u32 = 0x14; /* sub client */
pub const LC_SUB_LIBRARY: u32 = 0x15; /* sub library */
pub const LC_TWOLEVEL_HINTS: u32 = 0x16; /* two-level namespace lookup hints */
pub const LC_PREBIND_CKSUM: u32 = 0x17; /* prebind checksum */
pub const LC_LOAD_WEAK_DYLIB: u32 = 0x18 | LC_REQ_DYLD; /* load a dylib that is allowed to be missing */
pub const LC_SEGMENT_64: u32 = 0x19; /* 64-bit segment of this file to be mapped */
pub const LC_ROUTINES_64: u32 = 0x1a; /* 64-bit image routines */
pub const LC_UUID: u32 = 0x1b; /* the uuid */
pub const LC_RPATH: u32 = 0x1c | LC_REQ_DYLD; /* runpath additions */
pub const LC_CODE_SIGNATURE: u32 = 0x1d; /* local of code signature */
pub const LC_SEGMENT_SPLIT_INFO: u32 = 0x1e; /* local of info to split segments */
pub const LC_REEXPORT_DYLIB: u32 = 0x1f | LC_REQ_DYLD; /* load and re-export dylib */
pub const LC_LAZY_LOAD_DYLIB: u32 = 0x20; /* delay load of dylib until first use */
pub const LC_ENCRYPTION_INFO: u32 = 0x21; /* encrypted segment information */
pub const LC_DYLD_INFO: u32 = 0x22; /* compressed dyld information */
pub const LC_DYLD_INFO_ONLY: u32 = 0x22 | LC_REQ_DYLD; /* compressed dyld information only */
pub const LC_LOAD_UPWARD_DYLIB: u32 = 0x23 | LC_REQ_DYLD; /* load upward dylib */
pub const LC_VERSION_MIN_MACOSX: u32 = 0x24; /* build for MacOSX min OS version */
pub const LC_VERSION_MIN_IPHONEOS: u32 = 0x25; /* build for iPhoneOS min OS version */
pub const LC_FUNCTION_STARTS: u32 = 0x26; /* compressed table of function start addresses */
pub const LC_DYLD_ENVIRONMENT: u32 = 0x27; /* string for dyld to treat like environment variable */
pub const LC_MAIN: u32 = 0x28 | LC_REQ_DYLD; /* replacement for LC_UNIXTHREAD */
pub const LC_DATA_IN_CODE: u32 = 0x29; /* table of non-instructions in __text */
pub const LC_SOURCE_VERSION: u32 = 0x2A; /* source version used to build binary */
pub const LC_DYLIB_CODE_SIGN_DRS: u32 = 0x2B; /* Code signing DRs copied from linked dylibs */
pub const LC_ENCRYPTION_INFO_64: u32 = 0x2C; /* 64-bit encrypted segment information */
pub const LC_LINKER_OPTION: u32 = 0x2D; /* linker options in MH_OBJECT files */
pub const LC_LINKER_OPTIMIZATION_HINT: u32 = 0x2E; /* optimization hints in MH_OBJECT files */
pub const LC_VERSION_MIN_TVOS: u32 = 0x2F; /* build for AppleTV min OS version */
pub const LC_VERSION_MIN_WATCHOS: u32 = 0x30; /* build for Watch min OS version */
pub const LC_NOTE: u32 = 0x31; /* arbitrary data included within a Mach-O file */
pub const LC_BUILD_VERSION: u32 = 0x32; /* build for platform min OS version */
pub const LC_DYLD_EXPORTS_TRIE: u32 = 0x33 | LC_REQ_DYLD; /* used with linkedit_data_command, payload is trie */
pub const LC_DYLD_CHAINED_FIXUPS: u32 = 0x34 | LC_REQ_DYLD; /* used with linkedit_data_command */
pub const LC_FILESET_ENTRY: u32 = 0x35 | LC_REQ_DYLD; /* used with fileset_entry_command */

/// cmd + cmdsize
pub const LOAD_COMMAND_HEADER_SIZE: usize = 8;

// Reserved segment names
//

/// the pagezero segment which has no protections and catches NULL references
pub const SEG_PAGEZERO: &str = "__PAGEZERO";
/// the tradition UNIX text segment
pub const SEG_TEXT: &str = "__TEXT";
/// the tradition UNIX data segment
pub const SEG_DATA: &str = "__DATA";
/// the segment containing all structs created and maintained by the link editor
pub const SEG_LINKEDIT: &str = "__LINKEDIT";
/// dyld refuses DYLD_* environment variables for images carrying this segment
pub const SEG_RESTRICT: &str = "__RESTRICT";

// Thread state flavors
//

pub const X86_THREAD_STATE32: u32 = 1;
pub const X86_THREAD_STATE64: u32 = 4;
pub const ARM_THREAD_STATE: u32 = 1;
pub const ARM_THREAD_STATE64: u32 = 6;
pub const PPC_THREAD_STATE: u32 = 1;

// Code signing blobs, always big-endian.
//

/// single Requirement blob
pub const CSMAGIC_REQUIREMENT: u32 = 0xfade0c00;
/// Requirements vector (internal requirements)
pub const CSMAGIC_REQUIREMENTS: u32 = 0xfade0c01;
/// CodeDirectory blob
pub const CSMAGIC_CODEDIRECTORY: u32 = 0xfade0c02;
/// embedded form of signature data
pub const CSMAGIC_EMBEDDED_SIGNATURE: u32 = 0xfade0cc0;
/// multi-arch collection of embedded signatures
pub const CSMAGIC_DETACHED_SIGNATURE: u32 = 0xfade0cc1;
/// CMS Signature, among other things
pub const CSMAGIC_BLOBWRAPPER: u32 = 0xfade0b01;
/// embedded entitlements
pub const CSMAGIC_EMBEDDED_ENTITLEMENTS: u32 = 0xfade7171;

pub const CSSLOT_CODEDIRECTORY: u32 = 0;
pub const CSSLOT_INFOSLOT: u32 = 1;
pub const CSSLOT_REQUIREMENTS: u32 = 2;
pub const CSSLOT_RESOURCEDIR: u32 = 3;
pub const CSSLOT_APPLICATION: u32 = 4;
pub const CSSLOT_ENTITLEMENTS: u32 = 5;
pub const CSSLOT_DER_ENTITLEMENTS: u32 = 7;
pub const CSSLOT_ALTERNATE_CODEDIRECTORIES: u32 = 0x1000;
/// CMS signature
pub const CSSLOT_SIGNATURESLOT: u32 = 0x10000;
pub const CSSLOT_IDENTIFICATIONSLOT: u32 = 0x10001;
/// stapled notarization ticket
pub const CSSLOT_TICKETSLOT: u32 = 0x10002;

/// magic + length + count
pub const CS_SUPERBLOB_HEADER_SIZE: usize = 12;
/// type + offset
pub const CS_BLOB_INDEX_SIZE: usize = 8;

// Imported symbols emitted by -fstack-protector
//

pub const STACK_CHK_FAIL: &[u8] = b"___stack_chk_fail";
pub const STACK_CHK_GUARD: &[u8] = b"___stack_chk_guard";

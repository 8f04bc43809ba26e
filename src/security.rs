use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};

use crate::commands::CommandModel;
use crate::consts::*;
use crate::loader::MachHeaderFlags;

/// One entry of the super-blob index.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlobIndex {
    /// type of entry
    pub slot: u32,
    /// offset of entry
    pub offset: u32,
}

/// The index of an embedded code signature super-blob.
///
/// The blob is always big-endian, whatever the byte order of the slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureDirectory {
    pub magic: u32,
    /// total length of the super-blob
    pub length: u32,
    pub slots: Vec<BlobIndex>,
}

impl SignatureDirectory {
    /// Returns `None` unless `blob` starts with an embedded signature whose whole index fits in `blob`.
    pub fn parse(blob: &[u8]) -> Option<SignatureDirectory> {
        if blob.len() < CS_SUPERBLOB_HEADER_SIZE {
            return None;
        }

        let mut buf = Cursor::new(blob);
        let magic = buf.read_u32::<BigEndian>().ok()?;

        if magic != CSMAGIC_EMBEDDED_SIGNATURE {
            debug!("code signature blob magic 0x{:08x} is not an embedded signature", magic);

            return None;
        }

        let length = buf.read_u32::<BigEndian>().ok()?;
        let count = buf.read_u32::<BigEndian>().ok()?;
        let index_size = u64::from(count) * CS_BLOB_INDEX_SIZE as u64;

        if CS_SUPERBLOB_HEADER_SIZE as u64 + index_size > blob.len() as u64 {
            debug!("code signature index of {} entries overruns the {} bytes blob", count, blob.len());

            return None;
        }

        let mut slots = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let slot = buf.read_u32::<BigEndian>().ok()?;
            let offset = buf.read_u32::<BigEndian>().ok()?;

            if offset as usize >= blob.len() {
                trace!("code signature slot 0x{:x} points outside the blob at {}", slot, offset);

                continue;
            }

            slots.push(BlobIndex { slot, offset });
        }

        Some(SignatureDirectory { magic, length, slots })
    }

    pub fn has_slot(&self, slot: u32) -> bool {
        self.slots.iter().any(|index| index.slot == slot)
    }

    /// Both a CMS signature and a stapled notarization ticket are indexed.
    pub fn is_notarized(&self) -> bool {
        self.has_slot(CSSLOT_SIGNATURESLOT) && self.has_slot(CSSLOT_TICKETSLOT)
    }
}

/// The hardening properties of one slice.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SecurityReport {
    /// `MH_PIE`
    pub pie: bool,
    /// `MH_NO_HEAP_EXECUTION`
    pub nx_heap: bool,
    /// no `MH_ALLOW_STACK_EXECUTION`
    pub nx_stack: bool,
    /// `___stack_chk_fail` or `___stack_chk_guard` appears in the raw string table.
    ///
    /// A best-effort heuristic, not an authoritative answer: symbols are never resolved,
    /// so a stripped binary reads `false` and a stray string reads `true`.
    pub stack_canary: bool,
    /// a `__RESTRICT` segment is present
    pub restrict_segment: bool,
    pub code_signed: bool,
    pub notarized: bool,
    /// `LC_ENCRYPTION_INFO` with a non-zero cryptid
    pub encrypted: bool,
    /// the raw header flags
    pub flags: u32,
}

impl SecurityReport {
    pub fn evaluate(flags: u32, commands: &CommandModel) -> SecurityReport {
        let header_flags = MachHeaderFlags::from_bits_truncate(flags);

        SecurityReport {
            pie: header_flags.contains(MachHeaderFlags::PIE),
            nx_heap: header_flags.contains(MachHeaderFlags::NO_HEAP_EXECUTION),
            nx_stack: !header_flags.contains(MachHeaderFlags::ALLOW_STACK_EXECUTION),
            stack_canary: commands.stack_guard_referenced,
            restrict_segment: commands.segment(SEG_RESTRICT).is_some(),
            code_signed: commands.code_signature.is_some(),
            notarized: commands
                .code_signature
                .as_ref()
                .and_then(|span| span.directory.as_ref())
                .map_or(false, SignatureDirectory::is_notarized),
            encrypted: commands.encryption.map_or(false, |info| info.cryptid != 0),
            flags,
        }
    }

    pub fn header_flags(&self) -> MachHeaderFlags {
        MachHeaderFlags::from_bits_truncate(self.flags)
    }
}

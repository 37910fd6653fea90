// FAT16 BIOS parameter block and directory entry records

use super::constants::{BPB_SIZE, DIR_ENTRY_SIZE, END_OF_DIRECTORY, KANJI_ESCAPE};
use byteorder::{LittleEndian, ReadBytesExt};
use fatrec_core::RecoveryError;
use std::io::Cursor;

// ============================================================================
// BIOS Parameter Block
// ============================================================================

/// BPB fields starting at offset 0x0B of the volume boot sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiosParameterBlock {
    pub bytes_per_sector: u16,   // 0x0B
    pub sectors_per_cluster: u8, // 0x0D
    pub reserved_sectors: u16,   // 0x0E
    pub num_fats: u8,            // 0x10
    pub root_entries: u16,       // 0x11
    pub total_sectors_16: u16,   // 0x13
    pub media_descriptor: u8,    // 0x15
    pub sectors_per_fat: u16,    // 0x16
    pub sectors_per_track: u16,  // 0x18
    pub num_heads: u16,          // 0x1A
    pub hidden_sectors: u32,     // 0x1C
    pub total_sectors_32: u32,   // 0x20
}

impl BiosParameterBlock {
    /// Decode from the raw bytes at the BPB offset.
    pub fn parse(bytes: &[u8]) -> Result<Self, RecoveryError> {
        if bytes.len() < BPB_SIZE {
            return Err(RecoveryError::MalformedImage(format!(
                "parameter block needs {} bytes, got {}",
                BPB_SIZE,
                bytes.len()
            )));
        }

        let mut cursor = Cursor::new(bytes);
        let bpb = Self {
            bytes_per_sector: cursor.read_u16::<LittleEndian>()?,
            sectors_per_cluster: cursor.read_u8()?,
            reserved_sectors: cursor.read_u16::<LittleEndian>()?,
            num_fats: cursor.read_u8()?,
            root_entries: cursor.read_u16::<LittleEndian>()?,
            total_sectors_16: cursor.read_u16::<LittleEndian>()?,
            media_descriptor: cursor.read_u8()?,
            sectors_per_fat: cursor.read_u16::<LittleEndian>()?,
            sectors_per_track: cursor.read_u16::<LittleEndian>()?,
            num_heads: cursor.read_u16::<LittleEndian>()?,
            hidden_sectors: cursor.read_u32::<LittleEndian>()?,
            total_sectors_32: cursor.read_u32::<LittleEndian>()?,
        };
        bpb.validate()?;
        Ok(bpb)
    }

    /// Reject geometry that would make offset arithmetic meaningless.
    pub fn validate(&self) -> Result<(), RecoveryError> {
        if self.bytes_per_sector == 0 {
            return Err(RecoveryError::MalformedImage("bytes per sector is 0".to_string()));
        }
        if self.sectors_per_cluster == 0 {
            return Err(RecoveryError::MalformedImage("sectors per cluster is 0".to_string()));
        }
        if self.num_fats == 0 {
            return Err(RecoveryError::MalformedImage("number of FATs is 0".to_string()));
        }
        Ok(())
    }

    pub fn bytes_per_cluster(&self) -> u64 {
        self.bytes_per_sector as u64 * self.sectors_per_cluster as u64
    }

    /// Size of the fixed root directory region.
    pub fn root_directory_bytes(&self) -> u64 {
        self.root_entries as u64 * DIR_ENTRY_SIZE as u64
    }

    pub fn total_sectors(&self) -> u64 {
        if self.total_sectors_16 != 0 {
            self.total_sectors_16 as u64
        } else {
            self.total_sectors_32 as u64
        }
    }
}

// ============================================================================
// Directory Entry
// ============================================================================

/// FAT Directory Entry Attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FatAttributes(pub u8);

impl FatAttributes {
    pub const READ_ONLY: u8 = 0x01;
    pub const HIDDEN: u8 = 0x02;
    pub const SYSTEM: u8 = 0x04;
    pub const VOLUME_ID: u8 = 0x08;
    pub const DIRECTORY: u8 = 0x10;
    pub const ARCHIVE: u8 = 0x20;

    pub fn is_hidden(&self) -> bool { self.0 & Self::HIDDEN != 0 }
    pub fn is_volume_id(&self) -> bool { self.0 & Self::VOLUME_ID != 0 }
    pub fn is_directory(&self) -> bool { self.0 & Self::DIRECTORY != 0 }
}

/// One 32-byte directory record. Only the fields recovery needs are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: [u8; 8],
    pub ext: [u8; 3],
    pub attributes: FatAttributes,
    pub first_cluster: u16,
    pub file_size: u32,
}

impl DirectoryEntry {
    const ATTRIBUTES_OFFSET: usize = 0x0B;
    const FIRST_CLUSTER_OFFSET: usize = 0x1A;
    const FILE_SIZE_OFFSET: usize = 0x1C;

    pub fn parse(raw: &[u8; DIR_ENTRY_SIZE]) -> Self {
        let mut name = [0u8; 8];
        let mut ext = [0u8; 3];
        name.copy_from_slice(&raw[0..8]);
        ext.copy_from_slice(&raw[8..11]);

        let cluster = Self::FIRST_CLUSTER_OFFSET;
        let size = Self::FILE_SIZE_OFFSET;
        Self {
            name,
            ext,
            attributes: FatAttributes(raw[Self::ATTRIBUTES_OFFSET]),
            first_cluster: u16::from_le_bytes([raw[cluster], raw[cluster + 1]]),
            file_size: u32::from_le_bytes([raw[size], raw[size + 1], raw[size + 2], raw[size + 3]]),
        }
    }

    /// Check if this is the end of directory
    pub fn is_end(&self) -> bool {
        self.name[0] == END_OF_DIRECTORY
    }

    pub fn is_hidden(&self) -> bool {
        self.attributes.is_hidden()
    }

    pub fn is_directory(&self) -> bool {
        self.attributes.is_directory()
    }

    /// Volume labels and long-filename fragments both carry the volume bit.
    pub fn is_volume_label(&self) -> bool {
        self.attributes.is_volume_id()
    }

    /// The `.` and `..` links at the top of every subdirectory.
    pub fn is_dot_entry(&self) -> bool {
        self.name[0] == b'.' && self.name[1..].iter().all(|&b| b == b' ' || b == b'.')
    }

    /// Decode the 8.3 name: trailing spaces trimmed, `.EXT` appended when
    /// the extension is not blank. Returns `None` for the end-of-directory record.
    pub fn decode_name(&self) -> Option<String> {
        if self.is_end() {
            return None;
        }

        let mut name = String::new();
        let base_len = self.name.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
        for (i, &b) in self.name[..base_len].iter().enumerate() {
            if i == 0 && b == KANJI_ESCAPE {
                name.push(0xE5 as char);
            } else {
                name.push(b as char);
            }
        }

        let ext_len = self.ext.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
        if ext_len > 0 {
            name.push('.');
            name.extend(self.ext[..ext_len].iter().map(|&b| b as char));
        }

        Some(name)
    }
}

// FAT on-disk format constants

/// Size of the master boot record preceding the volume boot sector.
pub const MASTER_BOOT_RECORD_SIZE: u64 = 0x200;

/// Offset of the BIOS parameter block inside the volume boot sector.
pub const BPB_FIELD_OFFSET: u64 = 0x0B;

/// Encoded size of the BIOS parameter block fields we decode.
pub const BPB_SIZE: usize = 25;

/// Size of one directory entry record.
pub const DIR_ENTRY_SIZE: usize = 32;

/// Data cluster numbering starts at 2; 0 and 1 are reserved.
pub const FIRST_DATA_CLUSTER: u16 = 2;

/// Name byte marking the end of in-use entries in a directory region.
pub const END_OF_DIRECTORY: u8 = 0x00;

/// A leading 0x05 stands for a real 0xE5 name byte.
pub const KANJI_ESCAPE: u8 = 0x05;

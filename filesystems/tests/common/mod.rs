// Synthetic FAT16 images for recovery tests
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use fatrec_filesystems::{BiosParameterBlock, Fat16Layout, FatAttributes};

pub const DATA_CLUSTERS: u64 = 32;

/// One on-disk directory record.
pub type RawEntry = [u8; 32];

/// Builds a small image: 512-byte sectors, one sector per cluster, one
/// reserved sector, two single-sector FATs and a 16-entry root directory.
pub struct ImageBuilder {
    image: Vec<u8>,
    layout: Fat16Layout,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self::with_boot_sector_offset(0x200)
    }

    pub fn with_boot_sector_offset(boot_sector_offset: u64) -> Self {
        let bpb = BiosParameterBlock {
            bytes_per_sector: 512,
            sectors_per_cluster: 1,
            reserved_sectors: 1,
            num_fats: 2,
            root_entries: 16,
            total_sectors_16: (4 + DATA_CLUSTERS) as u16,
            media_descriptor: 0xF8,
            sectors_per_fat: 1,
            sectors_per_track: 32,
            num_heads: 2,
            hidden_sectors: 1,
            total_sectors_32: 0,
        };
        let layout = Fat16Layout::new(bpb, boot_sector_offset);
        let size = layout.root_directory_end() + DATA_CLUSTERS * bpb.bytes_per_cluster();

        let mut image = vec![0u8; size as usize];
        let raw = encode_bpb(&bpb);
        let bpb_offset = boot_sector_offset as usize + 0x0B;
        image[bpb_offset..bpb_offset + raw.len()].copy_from_slice(&raw);

        Self { image, layout }
    }

    pub fn layout(&self) -> Fat16Layout {
        self.layout
    }

    fn write_at(&mut self, offset: u64, bytes: &[u8]) {
        let start = offset as usize;
        self.image[start..start + bytes.len()].copy_from_slice(bytes);
    }

    fn write_entries(&mut self, offset: u64, entries: &[RawEntry]) {
        for (i, entry) in entries.iter().enumerate() {
            self.write_at(offset + (i as u64) * 32, entry);
        }
    }

    pub fn root(mut self, entries: &[RawEntry]) -> Self {
        let offset = self.layout.root_directory_offset();
        self.write_entries(offset, entries);
        self
    }

    /// Directory region stored in `cluster`, preceded by `.` and `..`.
    pub fn directory(mut self, cluster: u16, parent: u16, entries: &[RawEntry]) -> Self {
        let offset = self.layout.cluster_to_offset(cluster).unwrap();
        let dot = raw_entry(*b".       ", *b"   ", FatAttributes::DIRECTORY, cluster, 0);
        let dotdot = raw_entry(*b"..      ", *b"   ", FatAttributes::DIRECTORY, parent, 0);

        let mut all = vec![dot, dotdot];
        all.extend_from_slice(entries);
        self.write_entries(offset, &all);
        self
    }

    pub fn file_data(mut self, cluster: u16, contents: &[u8]) -> Self {
        let offset = self.layout.cluster_to_offset(cluster).unwrap();
        self.write_at(offset, contents);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.image
    }
}

fn encode_bpb(bpb: &BiosParameterBlock) -> Vec<u8> {
    let mut raw = Vec::new();
    raw.write_u16::<LittleEndian>(bpb.bytes_per_sector).unwrap();
    raw.write_u8(bpb.sectors_per_cluster).unwrap();
    raw.write_u16::<LittleEndian>(bpb.reserved_sectors).unwrap();
    raw.write_u8(bpb.num_fats).unwrap();
    raw.write_u16::<LittleEndian>(bpb.root_entries).unwrap();
    raw.write_u16::<LittleEndian>(bpb.total_sectors_16).unwrap();
    raw.write_u8(bpb.media_descriptor).unwrap();
    raw.write_u16::<LittleEndian>(bpb.sectors_per_fat).unwrap();
    raw.write_u16::<LittleEndian>(bpb.sectors_per_track).unwrap();
    raw.write_u16::<LittleEndian>(bpb.num_heads).unwrap();
    raw.write_u32::<LittleEndian>(bpb.hidden_sectors).unwrap();
    raw.write_u32::<LittleEndian>(bpb.total_sectors_32).unwrap();
    raw
}

/// Record with the name and extension fields written verbatim.
pub fn raw_entry(name: [u8; 8], ext: [u8; 3], attributes: u8, cluster: u16, size: u32) -> RawEntry {
    let mut raw = [0u8; 32];
    raw[0..8].copy_from_slice(&name);
    raw[8..11].copy_from_slice(&ext);
    raw[0x0B] = attributes;
    raw[0x1A..0x1C].copy_from_slice(&cluster.to_le_bytes());
    raw[0x1C..0x20].copy_from_slice(&size.to_le_bytes());
    raw
}

/// Record for a `NAME.EXT` style name, space padded.
pub fn entry(short_name: &str, attributes: u8, cluster: u16, size: u32) -> RawEntry {
    let (base, ext) = match short_name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => (base, ext),
        _ => (short_name, ""),
    };
    let mut name = [b' '; 8];
    let mut extension = [b' '; 3];
    for (slot, byte) in name.iter_mut().zip(base.bytes()) {
        *slot = byte;
    }
    for (slot, byte) in extension.iter_mut().zip(ext.bytes()) {
        *slot = byte;
    }
    raw_entry(name, extension, attributes, cluster, size)
}

pub fn end_marker() -> RawEntry {
    [0u8; 32]
}

pub fn file(name: &str, cluster: u16, size: u32) -> RawEntry {
    entry(name, FatAttributes::ARCHIVE, cluster, size)
}

pub fn dir(name: &str, cluster: u16) -> RawEntry {
    entry(name, FatAttributes::DIRECTORY, cluster, 0)
}

pub fn hidden(mut raw: RawEntry) -> RawEntry {
    raw[0x0B] |= FatAttributes::HIDDEN;
    raw
}

// FAT16 directory walk: rebuild the reachable tree from a raw image

use super::layout::Fat16Layout;
use crate::families::fat::common::{BiosParameterBlock, DirectoryEntry, BPB_FIELD_OFFSET, BPB_SIZE, DIR_ENTRY_SIZE};
use crate::image_reader::ImageReader;
use fatrec_core::{is_plain_component, DirectoryNode, FileNode, RecoveryError, RecoveryOptions};
use log::{debug, info, warn};
use std::io::{Read, Seek};

/// Counts gathered during one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryStats {
    pub directories: usize,
    pub files: usize,
    pub hidden_skipped: usize,
    pub file_bytes: u64,
}

/// Read the parameter block at `boot_sector_offset + 0x0B`.
pub fn read_parameter_block<R: Read + Seek>(
    reader: &mut ImageReader<R>,
    boot_sector_offset: u64,
) -> Result<BiosParameterBlock, RecoveryError> {
    let offset = boot_sector_offset + BPB_FIELD_OFFSET;
    let mut raw = [0u8; BPB_SIZE];
    reader.seek_to(offset)?;
    if !reader.read_record(&mut raw)? {
        return Err(RecoveryError::MalformedImage(format!(
            "image ends before the parameter block at {:#x}",
            offset
        )));
    }
    BiosParameterBlock::parse(&raw)
}

/// Recover the directory tree of the image, rooted at a directory named
/// `options.root_name`.
pub fn recover<R: Read + Seek>(image: R, options: &RecoveryOptions) -> Result<DirectoryNode, RecoveryError> {
    let mut recovery = Fat16Recovery::new(ImageReader::new(image), options.clone())?;
    recovery.recover()
}

pub struct Fat16Recovery<R> {
    reader: ImageReader<R>,
    layout: Fat16Layout,
    options: RecoveryOptions,
    stats: RecoveryStats,
}

impl<R: Read + Seek> Fat16Recovery<R> {
    pub fn new(mut reader: ImageReader<R>, options: RecoveryOptions) -> Result<Self, RecoveryError> {
        let bpb = read_parameter_block(&mut reader, options.boot_sector_offset)?;
        let layout = Fat16Layout::new(bpb, options.boot_sector_offset);

        info!("FAT16 volume details:");
        info!("  Bytes per sector: {}", bpb.bytes_per_sector);
        info!("  Sectors per cluster: {}", bpb.sectors_per_cluster);
        info!("  Reserved sectors: {}", bpb.reserved_sectors);
        info!("  FATs: {} x {} sectors", bpb.num_fats, bpb.sectors_per_fat);
        info!("  Root entries: {}", bpb.root_entries);
        info!("  Total sectors: {}", bpb.total_sectors());
        info!("  Root directory at {:#x}", layout.root_directory_offset());

        Ok(Self {
            reader,
            layout,
            options,
            stats: RecoveryStats::default(),
        })
    }

    pub fn layout(&self) -> &Fat16Layout {
        &self.layout
    }

    pub fn stats(&self) -> RecoveryStats {
        self.stats
    }

    /// Walk from the root directory region and return the populated root.
    pub fn recover(&mut self) -> Result<DirectoryNode, RecoveryError> {
        self.stats = RecoveryStats::default();
        self.reader.seek_to(self.layout.root_directory_offset())?;

        let mut root = DirectoryNode::new(Some(self.options.root_name.clone()));
        self.walk_directory(&mut root, 0)?;
        self.stats.directories += 1;

        info!(
            "Recovered {} directories, {} files ({} bytes), skipped {} hidden entries",
            self.stats.directories, self.stats.files, self.stats.file_bytes, self.stats.hidden_skipped
        );
        Ok(root)
    }

    /// Read entries from the cursor until the end-of-directory record.
    ///
    /// Each subdirectory is walked to completion before it is inserted, then
    /// the cursor is restored to the entry after the one that led into it.
    pub fn walk_directory(&mut self, directory: &mut DirectoryNode, depth: usize) -> Result<(), RecoveryError> {
        loop {
            let entry_offset = self.reader.position()?;
            let mut raw = [0u8; DIR_ENTRY_SIZE];
            if !self.reader.read_record(&mut raw)? {
                return Err(RecoveryError::TruncatedDirectoryRegion { offset: entry_offset });
            }
            let next_entry = entry_offset + DIR_ENTRY_SIZE as u64;

            let entry = DirectoryEntry::parse(&raw);
            let Some(name) = entry.decode_name() else {
                debug!("End of directory '{}' at {:#x}", directory.name(), entry_offset);
                return Ok(());
            };

            if entry.is_hidden() {
                debug!("Skipping hidden entry '{}'", name);
                self.stats.hidden_skipped += 1;
                continue;
            }
            if entry.is_volume_label() || entry.is_dot_entry() {
                debug!("Skipping '{}' (attributes {:#04x})", name, entry.attributes.0);
                continue;
            }
            if name.is_empty() {
                return Err(RecoveryError::MalformedImage(format!(
                    "blank entry name at {:#x}",
                    entry_offset
                )));
            }
            if !is_plain_component(&name) {
                return Err(RecoveryError::MalformedImage(format!(
                    "entry name {:?} at {:#x} is not a plain file name",
                    name, entry_offset
                )));
            }

            if entry.is_directory() {
                if depth >= self.options.max_depth {
                    return Err(RecoveryError::MalformedImage(format!(
                        "directory '{}' nested deeper than {} levels",
                        name, self.options.max_depth
                    )));
                }
                let offset = self.layout.cluster_to_offset(entry.first_cluster)?;
                debug!("Descending into '{}' at {:#x}", name, offset);

                let mut child = DirectoryNode::new(Some(name));
                self.reader.seek_to(offset)?;
                self.walk_directory(&mut child, depth + 1)?;
                self.stats.directories += 1;
                directory.insert_child(child);
            } else {
                let contents = self.read_file_contents(&name, &entry)?;
                debug!("File '{}' ({} bytes)", name, contents.len());

                self.stats.files += 1;
                self.stats.file_bytes += contents.len() as u64;
                directory.insert_child(FileNode::new(name, contents.len(), contents));
            }

            self.reader.seek_to(next_entry)?;
        }
    }

    /// Read `file_size` bytes from the first cluster onward. Fragmented files
    /// come back with whatever follows the first run on disk.
    fn read_file_contents(&mut self, name: &str, entry: &DirectoryEntry) -> Result<Vec<u8>, RecoveryError> {
        if entry.file_size == 0 {
            return Ok(Vec::new());
        }

        let offset = self.layout.cluster_to_offset(entry.first_cluster)?;
        if entry.file_size as u64 > self.layout.bpb.bytes_per_cluster() {
            warn!(
                "'{}' spans more than one cluster; assuming its clusters are contiguous",
                name
            );
        }

        self.reader
            .read_at(offset, entry.file_size as u64)?
            .ok_or_else(|| RecoveryError::TruncatedFileContents {
                name: name.to_string(),
                offset,
            })
    }
}

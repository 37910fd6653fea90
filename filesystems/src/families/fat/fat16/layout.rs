// FAT16 volume layout: where the root directory and each data cluster live

use crate::families::fat::common::{BiosParameterBlock, FIRST_DATA_CLUSTER};
use fatrec_core::RecoveryError;

/// Absolute byte offsets derived from the parameter block.
///
/// ```text
/// boot sector | reserved | FAT x num_fats | root directory | cluster 2 | cluster 3 | ...
/// ```
///
/// Files are assumed to occupy one contiguous run starting at their first
/// cluster; the FAT chain is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fat16Layout {
    pub bpb: BiosParameterBlock,
    /// Absolute offset of the volume boot sector in the image.
    pub boot_sector_offset: u64,
}

impl Fat16Layout {
    pub fn new(bpb: BiosParameterBlock, boot_sector_offset: u64) -> Self {
        Self { bpb, boot_sector_offset }
    }

    /// Start of the root directory: reserved sectors plus every FAT copy.
    pub fn root_directory_offset(&self) -> u64 {
        let sectors = self.bpb.reserved_sectors as u64
            + self.bpb.num_fats as u64 * self.bpb.sectors_per_fat as u64;
        self.boot_sector_offset + sectors * self.bpb.bytes_per_sector as u64
    }

    /// First byte after the fixed root directory region; cluster 2 starts here.
    pub fn root_directory_end(&self) -> u64 {
        self.root_directory_offset() + self.bpb.root_directory_bytes()
    }

    /// Absolute offset of data cluster `cluster`.
    pub fn cluster_to_offset(&self, cluster: u16) -> Result<u64, RecoveryError> {
        if cluster < FIRST_DATA_CLUSTER {
            return Err(RecoveryError::MalformedImage(format!(
                "cluster {} is not a data cluster",
                cluster
            )));
        }
        let index = (cluster - FIRST_DATA_CLUSTER) as u64;
        Ok(self.root_directory_end() + index * self.bpb.bytes_per_cluster())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::fat::common::{BPB_FIELD_OFFSET, MASTER_BOOT_RECORD_SIZE};

    fn layout() -> Fat16Layout {
        let bpb = BiosParameterBlock {
            bytes_per_sector: 512,
            sectors_per_cluster: 4,
            reserved_sectors: 1,
            num_fats: 2,
            root_entries: 512,
            total_sectors_16: 0,
            media_descriptor: 0xF8,
            sectors_per_fat: 64,
            sectors_per_track: 32,
            num_heads: 64,
            hidden_sectors: 1,
            total_sectors_32: 65_536,
        };
        Fat16Layout::new(bpb, 0x200)
    }

    #[test]
    fn test_root_directory_offset() {
        // 0x200 + (1 + 2 * 64) * 512
        assert_eq!(layout().root_directory_offset(), 0x200 + 129 * 512);
        // 512 entries * 32 bytes
        assert_eq!(layout().root_directory_end(), 0x200 + 129 * 512 + 16_384);
    }

    #[test]
    fn test_cluster_numbering_starts_at_two() {
        let layout = layout();
        let data_start = layout.root_directory_end();
        assert_eq!(layout.cluster_to_offset(2).unwrap(), data_start);
        assert_eq!(layout.cluster_to_offset(3).unwrap(), data_start + 2048);
        assert_eq!(layout.cluster_to_offset(0xFFEF).unwrap(), data_start + 0xFFED * 2048);
    }

    #[test]
    fn test_reserved_clusters_rejected() {
        assert!(matches!(
            layout().cluster_to_offset(0),
            Err(RecoveryError::MalformedImage(_))
        ));
        assert!(layout().cluster_to_offset(1).is_err());
    }

    #[test]
    fn test_default_boot_sector_follows_mbr() {
        let options = fatrec_core::RecoveryOptions::default();
        assert_eq!(options.boot_sector_offset, MASTER_BOOT_RECORD_SIZE);
        assert_eq!(options.boot_sector_offset + BPB_FIELD_OFFSET, 0x20B);
    }

    #[test]
    fn test_boot_sector_offset_shifts_everything() {
        let mut shifted = layout();
        shifted.boot_sector_offset = 0;
        assert_eq!(layout().root_directory_offset() - shifted.root_directory_offset(), 0x200);
    }
}

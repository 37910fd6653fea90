// Filesystem families organization
pub mod families;

pub mod image_reader;

pub use families::fat::common::{BiosParameterBlock, DirectoryEntry, FatAttributes, MASTER_BOOT_RECORD_SIZE};
pub use families::fat::fat16::{read_parameter_block, recover, Fat16Layout, Fat16Recovery, RecoveryStats};
pub use image_reader::ImageReader;

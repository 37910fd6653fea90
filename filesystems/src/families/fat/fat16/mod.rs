// FAT16 module - volume layout and directory-tree recovery

pub mod layout;
pub mod recovery;

pub use layout::Fat16Layout;
pub use recovery::{read_parameter_block, recover, Fat16Recovery, RecoveryStats};

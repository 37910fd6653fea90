// Filesystem families: only FAT is supported for recovery
pub mod fat;

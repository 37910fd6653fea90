// Common FAT on-disk structures and format constants

pub mod constants;
pub mod structures;

pub use constants::*;
pub use structures::*;

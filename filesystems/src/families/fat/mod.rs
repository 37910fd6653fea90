// FAT family
pub mod common;
pub mod fat16;

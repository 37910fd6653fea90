use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("No such image file: {}", path.display())]
    ImageNotFound { path: PathBuf },

    #[error("Malformed image: {0}")]
    MalformedImage(String),

    #[error("Truncated directory region at offset {offset:#x}")]
    TruncatedDirectoryRegion { offset: u64 },

    #[error("Truncated contents of '{name}' at offset {offset:#x}")]
    TruncatedFileContents { name: String, offset: u64 },

    #[error("Failed to materialize {}: {source}", path.display())]
    Materialization {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RecoveryError {
    /// True for failures that abort decoding before any tree exists.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            RecoveryError::MalformedImage(_)
                | RecoveryError::TruncatedDirectoryRegion { .. }
                | RecoveryError::TruncatedFileContents { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = RecoveryError::ImageNotFound { path: PathBuf::from("disk.img") };
        assert_eq!(err.to_string(), "No such image file: disk.img");

        let err = RecoveryError::TruncatedDirectoryRegion { offset: 0x4400 };
        assert_eq!(err.to_string(), "Truncated directory region at offset 0x4400");
        assert!(err.is_decode_failure());
    }

    #[test]
    fn test_materialization_keeps_source() {
        use std::error::Error as _;

        let err = RecoveryError::Materialization {
            path: PathBuf::from("ROOT/A"),
            source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "exists"),
        };
        assert!(!err.is_decode_failure());
        assert!(err.source().is_some());
    }
}

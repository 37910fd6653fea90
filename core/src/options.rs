use serde::{Deserialize, Serialize};

/// What `materialize` does when creating a path on the host fails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MaterializePolicy {
    /// Stop at the first failure and return it.
    #[default]
    FailFast,
    /// Record the failure, skip that subtree and carry on with its siblings.
    ContinueSiblings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryOptions {
    /// Absolute offset of the volume boot sector (the MBR occupies the bytes before it).
    pub boot_sector_offset: u64,
    pub root_name: String,
    pub indent_width: usize,
    pub max_depth: usize,
    pub materialize_policy: MaterializePolicy,
}

impl Default for RecoveryOptions {
    fn default() -> Self {
        Self {
            boot_sector_offset: 0x200,
            root_name: crate::tree::ROOT_NAME.to_string(),
            indent_width: 4,
            max_depth: 64,
            materialize_policy: MaterializePolicy::FailFast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RecoveryOptions::default();
        assert_eq!(options.boot_sector_offset, 0x200);
        assert_eq!(options.root_name, "ROOT");
        assert_eq!(options.indent_width, 4);
        assert_eq!(options.materialize_policy, MaterializePolicy::FailFast);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut options = RecoveryOptions::default();
        options.materialize_policy = MaterializePolicy::ContinueSiblings;
        let json = serde_json::to_string(&options).unwrap();
        let parsed: RecoveryOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.materialize_policy, MaterializePolicy::ContinueSiblings);
        assert_eq!(parsed.max_depth, 64);
    }
}

pub mod error;
pub mod materialize;
pub mod options;
pub mod tree;

pub use error::RecoveryError;
pub use materialize::{materialize, MaterializeFailure, MaterializeReport};
pub use options::{MaterializePolicy, RecoveryOptions};
pub use tree::{is_plain_component, DirectoryNode, FileNode, Node, NodeKind, NodeSummary, TeardownStats, ROOT_NAME};

// Replay a recovered tree onto the host filesystem

use crate::error::RecoveryError;
use crate::options::MaterializePolicy;
use crate::tree::{is_plain_component, Node};
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct MaterializeFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

#[derive(Debug, Default)]
pub struct MaterializeReport {
    pub directories_created: usize,
    pub files_written: usize,
    pub bytes_written: u64,
    pub failures: Vec<MaterializeFailure>,
}

impl MaterializeReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Recreate `root` at `base_dir/<root name>`.
///
/// Directories are created before their children and creation never merges
/// into an existing path, so running this twice against the same base fails
/// the second time. Under `FailFast` the first host error is returned; under
/// `ContinueSiblings` the failing subtree is skipped and recorded in the report.
/// A node whose name is not a single plain component is never joined onto the
/// host path; it fails with `InvalidInput` under the same policy.
pub fn materialize(
    root: &Node,
    base_dir: &Path,
    policy: MaterializePolicy,
) -> Result<MaterializeReport, RecoveryError> {
    let target = base_dir.join(root.name());
    info!("Materializing tree at {}", target.display());

    let mut report = MaterializeReport::default();
    materialize_subtree(root, &target, policy, &mut report)?;

    if !report.is_complete() {
        warn!("{} path(s) could not be materialized", report.failures.len());
    }
    Ok(report)
}

fn materialize_subtree(
    node: &Node,
    path: &Path,
    policy: MaterializePolicy,
    report: &mut MaterializeReport,
) -> Result<(), RecoveryError> {
    let created = if !is_plain_component(node.name()) {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' is not a single path component", node.name().escape_debug()),
        ))
    } else {
        match node {
            Node::File(file) => write_file(path, file.contents()).map(|()| {
                report.files_written += 1;
                report.bytes_written += file.size() as u64;
            }),
            Node::Directory(_) => fs::create_dir(path).map(|()| report.directories_created += 1),
        }
    };

    if let Err(error) = created {
        return match policy {
            MaterializePolicy::FailFast => Err(RecoveryError::Materialization {
                path: path.to_path_buf(),
                source: error,
            }),
            MaterializePolicy::ContinueSiblings => {
                warn!("Skipping {}: {}", path.display(), error);
                report.failures.push(MaterializeFailure { path: path.to_path_buf(), error });
                Ok(())
            }
        };
    }
    debug!("Created {}", path.display());

    if let Node::Directory(dir) = node {
        for child in dir.children() {
            materialize_subtree(child, &path.join(child.name()), policy, report)?;
        }
    }
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = fs::OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(contents)?;
    file.flush()
}

use anyhow::Context;
use clap::Parser;
use fatrec_core::{materialize, MaterializePolicy, Node, RecoveryError, RecoveryOptions};
use fatrec_filesystems::{Fat16Recovery, ImageReader, MASTER_BOOT_RECORD_SIZE};
use log::{info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "fatrec")]
#[command(about = "Recover the directory tree of a FAT16 disk image", long_about = None)]
struct Cli {
    /// Path to the raw disk image
    image: PathBuf,

    /// Directory under which the recovered tree is recreated
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Absolute offset of the volume boot sector (size of the MBR)
    #[arg(long, default_value_t = MASTER_BOOT_RECORD_SIZE, value_parser = parse_offset)]
    boot_sector_offset: u64,

    /// Only print the tree, do not recreate it on disk
    #[arg(long)]
    no_materialize: bool,

    /// Do not print the tree
    #[arg(long)]
    no_print: bool,

    /// Print a JSON outline instead of the indented tree
    #[arg(long)]
    json: bool,

    /// Keep recreating siblings after a path fails, report failures at the end
    #[arg(long)]
    continue_on_error: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> RecoveryOptions {
        RecoveryOptions {
            boot_sector_offset: self.boot_sector_offset,
            materialize_policy: if self.continue_on_error {
                MaterializePolicy::ContinueSiblings
            } else {
                MaterializePolicy::FailFast
            },
            ..RecoveryOptions::default()
        }
    }
}

/// Accept decimal or `0x`-prefixed hexadecimal.
fn parse_offset(value: &str) -> Result<u64, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid offset '{}': {}", value, e))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = cli.options();

    let reader = ImageReader::open(&cli.image)?;
    let mut recovery = Fat16Recovery::new(reader, options.clone())?;
    let root = Node::from(recovery.recover()?);

    if !cli.no_print {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&root.summary())?);
        } else {
            root.print_tree(options.indent_width)
                .context("failed to print the recovered tree")?;
        }
    }

    if !cli.no_materialize {
        let report = materialize(&root, &cli.output_dir, options.materialize_policy)?;
        info!(
            "Created {} directories and {} files ({} bytes)",
            report.directories_created, report.files_written, report.bytes_written
        );
        if !report.is_complete() {
            for failure in &report.failures {
                warn!("{}: {}", failure.path.display(), failure.error);
            }
            anyhow::bail!("{} path(s) could not be recreated", report.failures.len());
        }
    }

    let released = root.destroy();
    info!(
        "Released {} directories and {} files",
        released.directories, released.files
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fatrec: {:#}", e);
            if e.downcast_ref::<RecoveryError>().is_some_and(RecoveryError::is_decode_failure) {
                eprintln!("fatrec: no tree was printed or written");
            }
            ExitCode::FAILURE
        }
    }
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fs_twin::compare::{compare_dir, compare_file, CompareOptions, Segment};
use fs_twin::{Copier, CopyOptions, RealFileSystem, RW_R_R};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fs-twin")]
#[command(about = "Copy files and directory trees, and compare them regardless of line endings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy a file, or a directory and all its content
    Copy {
        src: PathBuf,

        dest: PathBuf,

        /// Octal permission of copied files
        /// (defaults to $FS_TWIN_PERM or 644)
        #[arg(short, long, value_parser = parse_perm)]
        perm: Option<u32>,
    },

    /// Check whether a path exists
    Exists { path: PathBuf },

    /// Compare two directories, or two files, and list every difference
    Compare {
        expected: PathBuf,

        actual: PathBuf,

        /// Ignore differences made only of whitespace
        #[arg(long)]
        ignore_whitespace: bool,

        /// Show modified contents inline instead of as unified diffs
        #[arg(long)]
        inline: bool,
    },
}

fn parse_perm(value: &str) -> std::result::Result<u32, String> {
    let perm = u32::from_str_radix(value.trim_start_matches("0o"), 8)
        .map_err(|e| format!("invalid octal permission {}: {}", value, e))?;
    if perm > 0o7777 {
        return Err(format!("permission {} is out of range", value));
    }
    Ok(perm)
}

fn copy_command(src: PathBuf, dest: PathBuf, perm: Option<u32>) -> Result<()> {
    let perm = match perm {
        Some(perm) => perm,
        None => match std::env::var("FS_TWIN_PERM") {
            Ok(value) => parse_perm(&value)
                .map_err(anyhow::Error::msg)
                .context("Invalid FS_TWIN_PERM")?,
            Err(_) => RW_R_R,
        },
    };
    log::info!("Copying with permission {:o}", perm);

    let copier = Copier::new(RealFileSystem::new())
        .with_options(CopyOptions::default().with_perm(perm));

    if src.is_dir() {
        copier
            .copy_dir(&src, &dest)
            .with_context(|| format!("Failed to copy directory {}", src.display()))?;
    } else {
        copier
            .copy_file(&src, &dest)
            .with_context(|| format!("Failed to copy file {}", src.display()))?;
    }

    println!("Copied {} to {}", src.display(), dest.display());
    Ok(())
}

fn exists_command(path: PathBuf) -> Result<()> {
    let exists = Copier::new(RealFileSystem::new()).exists(&path);
    println!("{}", exists);
    if !exists {
        std::process::exit(1);
    }
    Ok(())
}

fn compare_command(
    expected: PathBuf,
    actual: PathBuf,
    ignore_whitespace: bool,
    inline: bool,
) -> Result<()> {
    let mut options = CompareOptions::new();
    if ignore_whitespace {
        options = options.ignore_diff(|_, segment: &Segment| {
            segment.text_lossy().chars().all(char::is_whitespace)
        });
    }

    let report = if expected.is_dir() {
        compare_dir(&expected, &actual, &options)
    } else {
        compare_file(&expected, &actual, &options)
    };

    if report.is_empty() {
        println!("{} and {} are equal", expected.display(), actual.display());
        return Ok(());
    }

    for discrepancy in report.discrepancies() {
        if inline {
            println!("{}", discrepancy.inline());
        } else {
            println!("{}", discrepancy);
        }
    }
    anyhow::bail!(
        "{} discrepancies found between {} and {}",
        report.len(),
        expected.display(),
        actual.display()
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let log_level = if cli.verbose { "info" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .init();

    match cli.command {
        Commands::Copy { src, dest, perm } => copy_command(src, dest, perm),
        Commands::Exists { path } => exists_command(path),
        Commands::Compare {
            expected,
            actual,
            ignore_whitespace,
            inline,
        } => compare_command(expected, actual, ignore_whitespace, inline),
    }
}

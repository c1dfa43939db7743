// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — document capture and passport MRZ extraction from the shell.
//
// Entry point. Initialises logging, parses arguments, runs one subcommand,
// and maps the outcome to an exit code.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use scanwerk_core::human_errors::humanize_error;
use scanwerk_core::{EnhanceMode, Locale, ScanMode};

/// Exit code for expected outcomes the user can act on (no document edges,
/// no MRZ, bad corner points, malformed zone).
const EXIT_RECOVERABLE: u8 = 1;
/// Exit code for faults (unreadable files, bad configuration, I/O).
const EXIT_FAULT: u8 = 2;

#[derive(Parser)]
#[command(name = "scanwerk")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// JSON configuration file; missing sections take their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Locate the document in a photo and print its corner points as JSON.
    Detect {
        image: PathBuf,
    },

    /// Flatten the document in a photo into a top-down page image.
    Rectify {
        image: PathBuf,

        /// Where to write the rectified image; the extension picks the format.
        #[arg(long, short)]
        output: PathBuf,

        /// Corner points as a JSON array of four `{"x": .., "y": ..}` objects
        /// (top-left, top-right, bottom-right, bottom-left). Detected when
        /// omitted.
        #[arg(long)]
        points: Option<String>,

        /// Enhancement: none, magic-color, grayscale, black-white, or otsu.
        #[arg(long)]
        enhance: Option<EnhanceMode>,

        /// Also keep a content-addressed PNG copy in this directory.
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Extract and parse a passport MRZ from recognised text (`-` for stdin).
    Mrz {
        text: PathBuf,

        /// Display locale for derived fields: en or tr.
        #[arg(long)]
        locale: Option<Locale>,
    },

    /// Render a PDF report from recognised text.
    Report {
        text: PathBuf,

        /// passport or generic.
        #[arg(long, default_value = "passport")]
        mode: ScanMode,

        #[arg(long, short)]
        output: PathBuf,

        /// Report locale: en or tr.
        #[arg(long)]
        locale: Option<Locale>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let human = humanize_error(&err);
            tracing::debug!(error = %err, "Command failed");
            eprintln!("error: {}", human.message);
            eprintln!("hint: {}", human.suggestion);
            if err.is_recoverable() {
                ExitCode::from(EXIT_RECOVERABLE)
            } else {
                ExitCode::from(EXIT_FAULT)
            }
        }
    }
}

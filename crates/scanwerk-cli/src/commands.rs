// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand implementations.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::{ClientPoint, Locale, ScanConfig, ScanMode};
use scanwerk_document::ImageProcessor;
use scanwerk_pipeline::{ArtifactStore, Extraction, PdfReportRenderer, Pipeline, ReportRenderer};
use serde::Serialize;
use tracing::info;

use crate::{Cli, Commands};

#[derive(Serialize)]
struct DetectOutput {
    located: bool,
    message: String,
    points: [ClientPoint; 4],
}

#[derive(Serialize)]
struct RectifyOutput {
    output: PathBuf,
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
}

pub(crate) fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };

    match cli.command {
        Commands::Detect { image } => detect(config, &image),
        Commands::Rectify {
            image,
            output,
            points,
            enhance,
            store,
        } => {
            if let Some(mode) = enhance {
                config.enhancement.mode = mode;
            }
            rectify(config, &image, output, points.as_deref(), store)
        }
        Commands::Mrz { text, locale } => {
            override_locale(&mut config, locale);
            mrz(config, &text)
        }
        Commands::Report {
            text,
            mode,
            output,
            locale,
        } => {
            override_locale(&mut config, locale);
            report(config, &text, mode, &output)
        }
    }
}

fn override_locale(config: &mut ScanConfig, locale: Option<Locale>) {
    if let Some(locale) = locale {
        config.mrz.locale = locale;
    }
}

fn detect(config: ScanConfig, image: &Path) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let photo = ImageProcessor::open(image)?.into_dynamic();
    let outcome = pipeline.locate(&photo)?;
    print_json(&DetectOutput {
        located: outcome.located,
        message: outcome.message,
        points: outcome.points,
    })
}

fn rectify(
    config: ScanConfig,
    image: &Path,
    output: PathBuf,
    points: Option<&str>,
    store: Option<PathBuf>,
) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let photo = ImageProcessor::open(image)?.into_dynamic();

    let page = match points {
        Some(json) => {
            let points: Vec<ClientPoint> = serde_json::from_str(json).map_err(|err| {
                ScanwerkError::InvalidShape(format!("could not read corner points: {err}"))
            })?;
            pipeline.rectify(photo, &points)?
        }
        None => {
            let (outcome, page) = pipeline.scan(photo)?;
            if !outcome.located {
                info!("{}", outcome.message);
            }
            page
        }
    };

    let (width, height) = (page.width, page.height);
    let processor = ImageProcessor::from_dynamic(page.image);
    processor.save(&output)?;

    let key = match store {
        Some(root) => Some(ArtifactStore::new(root).put(&processor.to_png_bytes()?)?),
        None => None,
    };
    print_json(&RectifyOutput {
        output,
        width,
        height,
        key,
    })
}

fn mrz(config: ScanConfig, text: &Path) -> Result<()> {
    let text = read_text(text)?;
    let passport = Pipeline::new(config)?.extract_passport(&text)?;
    print_json(&passport)
}

fn report(config: ScanConfig, text: &Path, mode: ScanMode, output: &Path) -> Result<()> {
    let text = read_text(text)?;
    let renderer = PdfReportRenderer::from_config(&config);
    let pipeline = Pipeline::new(config)?;

    let bytes = match pipeline.extract_from_text(mode, &text)? {
        Extraction::Passport(passport) => renderer.render_passport(&passport)?,
        Extraction::Generic(document) => renderer.render_document(&document)?,
    };
    fs::write(output, &bytes)?;
    info!(path = %output.display(), bytes = bytes.len(), "Report written");
    Ok(())
}

/// Read recognised text from a file, or from stdin when the path is `-`.
fn read_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanwerk_core::EnhanceMode;

    #[test]
    fn enhance_mode_accepts_cli_spelling() {
        assert_eq!("magic-color".parse::<EnhanceMode>(), Ok(EnhanceMode::MagicColor));
        assert_eq!("black-white".parse::<EnhanceMode>(), Ok(EnhanceMode::BlackWhite));
    }

    #[test]
    fn locale_override_only_when_given() {
        let mut config = ScanConfig::default();
        override_locale(&mut config, None);
        assert_eq!(config.mrz.locale, Locale::English);
        override_locale(&mut config, Some(Locale::Turkish));
        assert_eq!(config.mrz.locale, Locale::Turkish);
    }
}

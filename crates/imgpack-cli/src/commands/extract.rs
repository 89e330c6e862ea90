//! Extract command implementation.

use super::Source;
use super::build_config;
use super::with_timeout;
use crate::cli::ExtractArgs;
use crate::error::add_source_context;
use crate::output::ExtractionOutcome;
use crate::output::OutputFormatter;
use crate::progress::CliSpinner;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use imgpack_core::ArchiveImageExtractor;
use imgpack_core::ExtractedImage;
use imgpack_core::ExtractionReport;
use imgpack_core::HttpClient;
use imgpack_core::extract_images_from_bytes;
use imgpack_core::read_archive_file;
use std::collections::HashSet;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

pub async fn execute<C: HttpClient>(
    args: &ExtractArgs,
    client: &C,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let source = args.source.source.as_str();
    let config = build_config(&args.source.direct_hosts);

    let report: ExtractionReport = match Source::parse(source) {
        Source::Url(url) => {
            let _spinner = CliSpinner::start_if(show_progress, &format!("Fetching {url}"));
            let extractor = ArchiveImageExtractor::new(client, &config);
            let result =
                with_timeout(&args.source, extractor.extract_images_with_report(url)).await?;
            add_source_context(result, source)?
        }
        Source::File(path) => {
            let payload = add_source_context(read_archive_file(path), source)?;
            let result = with_timeout(&args.source, extract_images_from_bytes(payload, &config))
                .await?;
            add_source_context(result, source)?
        }
    };

    let written = match &args.output_dir {
        Some(dir) => write_images(&report.images, dir, args.force, formatter)?,
        None => Vec::new(),
    };

    formatter.format_extraction_result(&ExtractionOutcome {
        source,
        report: &report,
        written: &written,
        include_data: args.include_data,
    })
}

/// Writes every image under its name into `dir`.
///
/// Images whose name was already written in this run are skipped with a
/// warning.
fn write_images(
    images: &[ExtractedImage],
    dir: &Path,
    force: bool,
    formatter: &dyn OutputFormatter,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;

    let mut seen = HashSet::new();
    let mut written = Vec::with_capacity(images.len());

    for image in images {
        if !is_plain_file_name(&image.name) {
            formatter.format_warning(&format!(
                "Skipped '{}': not a plain file name",
                image.name
            ));
            continue;
        }
        if !seen.insert(image.name.as_str()) {
            formatter.format_warning(&format!(
                "Skipped '{}': another image with the same name was already written",
                image.name
            ));
            continue;
        }

        let path = dir.join(&image.name);
        if !force && path.exists() {
            bail!(
                "Output file '{}' already exists\n\
                 HINT: Use --force to overwrite existing files.",
                path.display()
            );
        }

        let bytes = image
            .decode()
            .with_context(|| format!("failed to decode image '{}'", image.name))?;
        fs::write(&path, &bytes)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote image");
        written.push(path);
    }

    Ok(written)
}

/// A name is written only if it is exactly one normal path component.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('\\')
}

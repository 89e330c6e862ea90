//! Human-readable output formatter with colors and styling.

use super::formatter::ExtractionOutcome;
use super::formatter::OutputFormatter;
use crate::progress::humanize_bytes;
use crate::progress::humanize_duration;
use anyhow::Result;
use console::Term;
use console::style;
use imgpack_core::ArchiveEntry;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn format_approximate_size(bytes: f64) -> String {
        humanize_bytes(bytes.round() as u64)
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn write_header(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_extraction_result(&self, outcome: &ExtractionOutcome<'_>) -> Result<()> {
        let report = outcome.report;
        for skipped in &report.skipped {
            self.format_warning(&format!("Skipped {}: {}", skipped.path, skipped.reason));
        }

        if self.quiet {
            return Ok(());
        }

        let count = report.images.len();
        self.write_header(&format!(
            "Extracted {} image{} from {}",
            Self::format_number(count),
            if count == 1 { "" } else { "s" },
            outcome.source
        ));

        let width = report
            .images
            .iter()
            .map(|image| image.name.chars().count())
            .max()
            .unwrap_or(0);
        for image in &report.images {
            let _ = self.term.write_line(&format!(
                "  {:<width$}  {:<14} ~{}",
                image.name,
                image.mime_type,
                Self::format_approximate_size(image.approximate_size_bytes)
            ));
            if outcome.include_data {
                let _ = self.term.write_line(&format!("    {}", image.data));
            }
        }

        if !outcome.written.is_empty() {
            let _ = self.term.write_line("");
            let _ = self.term.write_line(&format!(
                "  Files written: {}",
                Self::format_number(outcome.written.len())
            ));
            if self.verbose {
                for path in outcome.written {
                    let _ = self.term.write_line(&format!("    {}", path.display()));
                }
            }
        }

        let _ = self.term.write_line(&format!(
            "  Total size: ~{}",
            Self::format_approximate_size(report.approximate_total_size())
        ));

        if self.verbose {
            if let Some(url) = &report.source_url {
                let _ = self.term.write_line(&format!("  Requested: {url}"));
            }
            let _ = self.term.write_line(&format!(
                "  Archive size: {}",
                humanize_bytes(report.bytes_fetched)
            ));
            let _ = self.term.write_line(&format!(
                "  Entries: {} ({} image candidates)",
                Self::format_number(report.entries_total),
                Self::format_number(report.image_candidates)
            ));
            let _ = self.term.write_line(&format!(
                "  Duration: {}",
                humanize_duration(report.duration)
            ));
        }

        Ok(())
    }

    fn format_entries(&self, _source: &str, entries: &[ArchiveEntry]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in entries {
            let type_char = if entry.is_dir { "d" } else { "-" };
            let marker = if entry.is_synthesized() {
                " (implied)"
            } else if entry.is_image_candidate() {
                " *"
            } else {
                ""
            };
            let _ = self.term.write_line(&format!(
                "{type_char} {:>10}  {}{marker}",
                humanize_bytes(entry.size),
                entry.name
            ));
        }

        let images = entries.iter().filter(|e| e.is_image_candidate()).count();
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "Total: {} entries, {} images",
            Self::format_number(entries.len()),
            Self::format_number(images)
        ));

        Ok(())
    }

    fn format_normalized_url(&self, original: &str, normalized: &str) -> Result<()> {
        // The URL itself is the result, so it is printed even in quiet mode
        let _ = self.term.write_line(normalized);

        if self.verbose && !self.quiet {
            let note = if original == normalized {
                "unchanged"
            } else {
                "rewritten to direct download"
            };
            let _ = self.err_term.write_line(&format!("({note})"));
        }

        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:#}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:#}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}

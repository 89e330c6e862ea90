//! List command implementation

use super::Source;
use super::build_config;
use super::with_timeout;
use crate::cli::ListArgs;
use crate::error::add_source_context;
use crate::output::OutputFormatter;
use crate::progress::CliSpinner;
use anyhow::Result;
use imgpack_core::ArchiveImageExtractor;
use imgpack_core::HttpClient;
use imgpack_core::list_entries;
use imgpack_core::read_archive_file;

pub async fn execute<C: HttpClient>(
    args: &ListArgs,
    client: &C,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let source = args.source.source.as_str();
    let config = build_config(&args.source.direct_hosts);

    let result = match Source::parse(source) {
        Source::Url(url) => {
            let _spinner = CliSpinner::start_if(show_progress, &format!("Fetching {url}"));
            let extractor = ArchiveImageExtractor::new(client, &config);
            with_timeout(&args.source, extractor.list_entries(url)).await?
        }
        Source::File(path) => {
            read_archive_file(path).and_then(|payload| list_entries(payload, &config))
        }
    };
    let entries = add_source_context(result, source)?;

    formatter.format_entries(source, &entries)
}

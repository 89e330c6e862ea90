//! Normalize command implementation

use super::build_config;
use crate::cli::NormalizeArgs;
use crate::error::add_source_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use imgpack_core::normalize_url;

pub fn execute(args: &NormalizeArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = build_config(&args.direct_hosts);
    let normalized = add_source_context(normalize_url(&args.url, &config), &args.url)?;
    formatter.format_normalized_url(&args.url, &normalized)
}

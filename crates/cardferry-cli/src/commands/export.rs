use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use cardferry_sync::outlook::{count_vcards, OutlookSource};
use cardferry_sync::source::VcfSource;
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(long, help = "Where to write the vCard file (default: import.vcf_path)")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ExportReport {
    source: &'static str,
    count: usize,
    output: String,
}

pub fn export(ctx: &Context<'_>, args: ExportArgs) -> Result<()> {
    let out = args
        .out
        .unwrap_or_else(|| ctx.config.import.vcf_path.clone());

    if !ctx.json {
        println!("Exporting contacts from Microsoft Outlook...");
    }
    let source = OutlookSource::new();
    let data = source.fetch_vcf()?;
    debug!(source = source.source_name(), bytes = data.len(), "export fetched");

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create export directory {}", parent.display()))?;
        }
    }
    fs::write(&out, &data).with_context(|| format!("write export file {}", out.display()))?;

    let report = ExportReport {
        source: source.source_name(),
        count: count_vcards(&data),
        output: out.display().to_string(),
    };
    if ctx.json {
        return print_json(&report);
    }
    println!("Exported {} contacts to {}", report.count, report.output);
    Ok(())
}

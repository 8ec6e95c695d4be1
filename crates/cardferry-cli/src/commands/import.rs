use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use cardferry_core::IndexPolicy;
use cardferry_sync::import::{run_import, ImportOptions, ImportReport};
use cardferry_sync::macos::MacosContactsSink;
use cardferry_sync::source::{VcfFileSource, VcfSource};
use cardferry_sync::vcf;
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[arg(long, help = "Contacts group to import into (default: import.group, then GM)")]
    pub group: Option<String>,
    #[arg(long, help = "Show what would be imported without making changes")]
    pub dry_run: bool,
    #[arg(
        long,
        help = "Path to the vCard file (default: import.vcf_path, then outlook_contacts.vcf)"
    )]
    pub vcf: Option<PathBuf>,
    #[arg(
        long,
        help = "snapshot: match only people already in Contacts; cumulative: also match people imported earlier in this run"
    )]
    pub policy: Option<IndexPolicy>,
    #[arg(long, help = "Number of people created per AppleScript call")]
    pub batch_size: Option<usize>,
}

pub fn import(ctx: &Context<'_>, args: ImportArgs) -> Result<()> {
    let defaults = &ctx.config.import;
    let vcf_path = args.vcf.unwrap_or_else(|| defaults.vcf_path.clone());
    let options = ImportOptions {
        group: args.group.unwrap_or_else(|| defaults.group.clone()),
        preview: args.dry_run,
        policy: args.policy.unwrap_or(defaults.index_policy),
        batch_size: args.batch_size.unwrap_or(defaults.batch_size),
    };

    let source = VcfFileSource::new(&vcf_path);
    let data = source.fetch_vcf()?;
    let parsed = vcf::parse_vcf(&data)
        .with_context(|| format!("parse vcf file {}", vcf_path.display()))?;
    debug!(
        source = source.source_name(),
        cards = parsed.contacts.len(),
        warnings = parsed.warnings.len(),
        "source parsed"
    );

    let mut sink = MacosContactsSink::new();
    let report = run_import(&mut sink, parsed, &options)?;

    if ctx.json {
        return print_json(&report);
    }
    print_report(&report, &vcf_path);
    Ok(())
}

fn print_report(report: &ImportReport, vcf_path: &std::path::Path) {
    println!(
        "Existing contacts: {} names, {} emails, {} phones",
        report.existing.names, report.existing.emails, report.existing.phones
    );
    println!("Parsed {} vCards from {}", report.total, vcf_path.display());
    println!();
    println!("  Duplicates: {}", report.duplicates.len());
    println!("  Blank/empty: {}", report.blank);
    println!("  New to import: {}", report.planned.len());

    if !report.duplicates.is_empty() {
        let mut dupes: Vec<_> = report.duplicates.iter().collect();
        dupes.sort_by(|a, b| a.name.cmp(&b.name));
        println!();
        println!("Skipping duplicates:");
        for dupe in dupes {
            println!("  SKIP: {} ({})", dupe.name, dupe.reason);
        }
    }

    if report.planned.is_empty() {
        println!();
        println!("Nothing to import.");
    } else if report.preview {
        let mut planned: Vec<&String> = report.planned.iter().collect();
        planned.sort();
        println!();
        println!(
            "[DRY RUN] Would import {} contacts into '{}' ({} index):",
            planned.len(),
            report.group,
            report.policy
        );
        for name in planned {
            println!("  + {}", name);
        }
    } else {
        for failed in &report.failed {
            println!("  FAILED: {} ({})", failed.name, failed.error);
        }
        println!();
        println!(
            "{} contacts assigned to '{}'",
            report.assigned, report.group
        );
        println!(
            "Done! Imported {}, failed {}.",
            report.imported,
            report.failed.len()
        );
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("- {}", warning);
        }
    }
}

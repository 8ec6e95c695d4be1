//! One-shot import of source contacts into a destination address book.

use crate::error::{Result, SyncError};
use crate::sink::ContactSink;
use crate::vcf::ParsedVcf;
use cardferry_core::domain::{validate_batch_size, validate_group_label};
use cardferry_core::{
    ContactRecord, DestinationIndex, Disposition, IndexPolicy, MatchReason, NormalizedKey,
};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub group: String,
    pub preview: bool,
    pub policy: IndexPolicy,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedContact {
    pub name: String,
    pub reason: MatchReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedContact {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndexSummary {
    pub names: usize,
    pub emails: usize,
    pub phones: usize,
}

impl IndexSummary {
    fn of(index: &DestinationIndex) -> Self {
        Self {
            names: index.name_count(),
            emails: index.email_count(),
            phones: index.phone_count(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub to_import: Vec<ContactRecord>,
    pub duplicates: Vec<SkippedContact>,
    pub blank: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub group: String,
    pub preview: bool,
    pub policy: IndexPolicy,
    pub existing: IndexSummary,
    pub total: usize,
    pub blank: usize,
    pub duplicates: Vec<SkippedContact>,
    pub planned: Vec<String>,
    pub imported: usize,
    pub failed: Vec<FailedContact>,
    pub assigned: usize,
    pub warnings: Vec<String>,
}

/// Decides the disposition of every record, in source order.
///
/// Blank records are counted and dropped before matching. Under
/// [`IndexPolicy::Cumulative`] each accepted record joins the index as soon as it
/// is accepted, so the plan does not depend on whether writes later succeed.
pub fn plan_import(
    records: Vec<ContactRecord>,
    mut index: DestinationIndex,
    policy: IndexPolicy,
) -> ImportPlan {
    let mut plan = ImportPlan {
        to_import: Vec::new(),
        duplicates: Vec::new(),
        blank: 0,
    };

    for record in records {
        if record.is_blank() {
            plan.blank += 1;
            continue;
        }

        let key = NormalizedKey::from_record(&record);
        match index.resolve(&key) {
            Disposition::Duplicate(reason) => {
                debug!(name = record.display_label(), %reason, "duplicate");
                plan.duplicates.push(SkippedContact {
                    name: record.display_label().to_string(),
                    reason,
                });
            }
            Disposition::New => {
                debug!(name = record.display_label(), "new");
                if policy == IndexPolicy::Cumulative {
                    index.insert(&key);
                }
                plan.to_import.push(record);
            }
        }
    }

    plan
}

pub fn run_import<S>(
    sink: &mut S,
    parsed: ParsedVcf,
    options: &ImportOptions,
) -> Result<ImportReport>
where
    S: ContactSink + ?Sized,
{
    let group = validate_group_label(&options.group)?;
    let batch_size = validate_batch_size(options.batch_size)?;

    let existing = sink.existing_contacts()?;
    let index = DestinationIndex::from_records(&existing);
    let summary = IndexSummary::of(&index);
    info!(
        sink = sink.sink_name(),
        names = summary.names,
        emails = summary.emails,
        phones = summary.phones,
        "destination index built"
    );

    let total = parsed.contacts.len();
    let plan = plan_import(parsed.contacts, index, options.policy);

    let mut report = ImportReport {
        group: group.clone(),
        preview: options.preview,
        policy: options.policy,
        existing: summary,
        total,
        blank: plan.blank,
        duplicates: plan.duplicates,
        planned: plan
            .to_import
            .iter()
            .map(|record| record.display_label().to_string())
            .collect(),
        imported: 0,
        failed: Vec::new(),
        assigned: 0,
        warnings: parsed.warnings,
    };

    if options.preview || plan.to_import.is_empty() {
        return Ok(report);
    }

    sink.ensure_group(&group)?;

    let batches = plan.to_import.len().div_ceil(batch_size);
    for (idx, batch) in plan.to_import.chunks(batch_size).enumerate() {
        let mut results = sink.create_contacts(&group, batch).into_iter();
        let mut created = 0;
        for record in batch {
            let result = results.next().unwrap_or_else(|| {
                Err(SyncError::DestinationWrite(
                    "sink returned no result".to_string(),
                ))
            });
            match result {
                Ok(()) => created += 1,
                Err(err) => {
                    warn!(name = record.display_label(), error = %err, "import failed");
                    report.failed.push(FailedContact {
                        name: record.display_label().to_string(),
                        error: err.to_string(),
                    });
                }
            }
        }
        report.imported += created;
        info!(
            batch = idx + 1,
            batches,
            created,
            total = report.imported,
            "batch written"
        );
    }

    match sink.finish(&group) {
        Ok(assigned) => report.assigned = assigned,
        Err(err) => {
            warn!(error = %err, "group assignment pass failed");
            report
                .warnings
                .push(format!("group assignment pass failed: {err}"));
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardferry_core::{EmailLabel, MatchRule};

    #[test]
    fn plan_skips_blank_records() {
        let records = vec![
            ContactRecord::default(),
            ContactRecord::new("Ada"),
            ContactRecord::new("   "),
        ];
        let plan = plan_import(records, DestinationIndex::default(), IndexPolicy::Snapshot);
        assert_eq!(plan.blank, 2);
        assert_eq!(plan.to_import.len(), 1);
    }

    #[test]
    fn snapshot_policy_keeps_internal_duplicates() {
        let records = vec![
            ContactRecord::new("Ada").with_email(EmailLabel::Work, "ada@example.com"),
            ContactRecord::new("Ada L.").with_email(EmailLabel::Home, "ADA@example.com"),
        ];
        let plan = plan_import(records, DestinationIndex::default(), IndexPolicy::Snapshot);
        assert_eq!(plan.to_import.len(), 2);
        assert!(plan.duplicates.is_empty());
    }

    #[test]
    fn cumulative_policy_folds_accepted_records() {
        let records = vec![
            ContactRecord::new("Ada").with_email(EmailLabel::Work, "ada@example.com"),
            ContactRecord::new("Ada L.").with_email(EmailLabel::Home, "ADA@example.com"),
            ContactRecord::new("ada"),
        ];
        let plan = plan_import(records, DestinationIndex::default(), IndexPolicy::Cumulative);
        assert_eq!(plan.to_import.len(), 1);
        assert_eq!(plan.duplicates.len(), 2);
        assert_eq!(plan.duplicates[0].reason.rule, MatchRule::Email);
        assert_eq!(plan.duplicates[1].reason.rule, MatchRule::Name);
    }
}

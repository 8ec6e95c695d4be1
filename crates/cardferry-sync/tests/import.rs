use cardferry_core::{ContactRecord, EmailLabel, IndexPolicy, MatchRule, PhoneLabel};
use cardferry_sync::import::{run_import, ImportOptions, ImportReport};
use cardferry_sync::sink::ContactSink;
use cardferry_sync::vcf::{parse_vcf, ParsedVcf};
use cardferry_sync::{Result, SyncError};

#[derive(Default)]
struct RecordingSink {
    existing: Vec<ContactRecord>,
    reject: Vec<&'static str>,
    fail_finish: bool,
    drop_first_result: bool,
    groups: Vec<String>,
    batches: Vec<Vec<String>>,
    finished: usize,
}

impl ContactSink for RecordingSink {
    fn sink_name(&self) -> &'static str {
        "recording"
    }

    fn existing_contacts(&mut self) -> Result<Vec<ContactRecord>> {
        Ok(self.existing.clone())
    }

    fn ensure_group(&mut self, group: &str) -> Result<()> {
        self.groups.push(group.to_string());
        Ok(())
    }

    fn create_contacts(&mut self, _group: &str, batch: &[ContactRecord]) -> Vec<Result<()>> {
        self.batches
            .push(batch.iter().map(|r| r.full_name.clone()).collect());
        batch
            .iter()
            .map(|record| {
                if self.reject.iter().any(|name| *name == record.full_name) {
                    Err(SyncError::DestinationWrite(format!(
                        "rejected {}",
                        record.full_name
                    )))
                } else {
                    Ok(())
                }
            })
            .skip(usize::from(self.drop_first_result))
            .collect()
    }

    fn finish(&mut self, _group: &str) -> Result<usize> {
        self.finished += 1;
        if self.fail_finish {
            return Err(SyncError::Command("Contacts did not respond".to_string()));
        }
        Ok(self.batches.iter().map(Vec::len).sum())
    }
}

impl RecordingSink {
    fn write_calls(&self) -> usize {
        self.groups.len() + self.batches.len() + self.finished
    }
}

fn options(preview: bool, policy: IndexPolicy) -> ImportOptions {
    ImportOptions {
        group: "GM".to_string(),
        preview,
        policy,
        batch_size: 10,
    }
}

fn parsed(records: Vec<ContactRecord>) -> ParsedVcf {
    ParsedVcf {
        contacts: records,
        warnings: Vec::new(),
    }
}

fn existing_people() -> Vec<ContactRecord> {
    vec![
        ContactRecord::new("Jane Doe")
            .with_email(EmailLabel::Other, "a@x.com")
            .with_phone(PhoneLabel::Other, "(555) 123-4567"),
        ContactRecord::new("John Smith"),
    ]
}

fn incoming_people() -> Vec<ContactRecord> {
    vec![
        ContactRecord::new("Jane D.").with_email(EmailLabel::Work, "A@X.COM"),
        ContactRecord::new("Janie").with_phone(PhoneLabel::Mobile, "15551234567"),
        ContactRecord::new("john smith"),
        ContactRecord::new("Someone Else")
            .with_email(EmailLabel::Work, "b@y.com")
            .with_phone(PhoneLabel::Work, "9998887777"),
        ContactRecord::default(),
    ]
}

fn dispositions(report: &ImportReport) -> (Vec<(String, MatchRule)>, Vec<String>) {
    let dupes = report
        .duplicates
        .iter()
        .map(|d| (d.name.clone(), d.reason.rule))
        .collect();
    (dupes, report.planned.clone())
}

#[test]
fn import_skips_duplicates_by_rule() {
    let mut sink = RecordingSink {
        existing: existing_people(),
        ..RecordingSink::default()
    };
    let report = run_import(
        &mut sink,
        parsed(incoming_people()),
        &options(false, IndexPolicy::Snapshot),
    )
    .expect("import");

    assert_eq!(report.total, 5);
    assert_eq!(report.blank, 1);
    let (dupes, planned) = dispositions(&report);
    assert_eq!(
        dupes,
        vec![
            ("Jane D.".to_string(), MatchRule::Email),
            ("Janie".to_string(), MatchRule::Phone),
            ("john smith".to_string(), MatchRule::Name),
        ]
    );
    assert_eq!(planned, vec!["Someone Else".to_string()]);
    assert_eq!(report.imported, 1);
    assert_eq!(report.assigned, 1);
    assert_eq!(report.existing.names, 2);
    assert_eq!(report.existing.emails, 1);
    assert_eq!(report.existing.phones, 1);
    assert_eq!(sink.groups, vec!["GM".to_string()]);
    assert_eq!(sink.batches, vec![vec!["Someone Else".to_string()]]);
}

#[test]
fn preview_matches_real_run_without_writes() {
    let mut preview_sink = RecordingSink {
        existing: existing_people(),
        ..RecordingSink::default()
    };
    let preview = run_import(
        &mut preview_sink,
        parsed(incoming_people()),
        &options(true, IndexPolicy::Cumulative),
    )
    .expect("preview");

    let mut real_sink = RecordingSink {
        existing: existing_people(),
        ..RecordingSink::default()
    };
    let real = run_import(
        &mut real_sink,
        parsed(incoming_people()),
        &options(false, IndexPolicy::Cumulative),
    )
    .expect("import");

    assert_eq!(dispositions(&preview), dispositions(&real));
    assert!(preview.preview);
    assert_eq!(preview.imported, 0);
    assert_eq!(preview_sink.write_calls(), 0);
    assert!(real_sink.write_calls() > 0);
}

#[test]
fn policies_differ_on_internal_duplicates() {
    let source = || {
        parsed(vec![
            ContactRecord::new("Ada Lovelace").with_email(EmailLabel::Work, "ada@example.com"),
            ContactRecord::new("Ada Lovelace").with_phone(PhoneLabel::Mobile, "+1 415 555 1212"),
        ])
    };

    let mut sink = RecordingSink::default();
    let snapshot = run_import(&mut sink, source(), &options(false, IndexPolicy::Snapshot))
        .expect("snapshot");
    assert_eq!(snapshot.imported, 2);

    let mut sink = RecordingSink::default();
    let cumulative = run_import(&mut sink, source(), &options(false, IndexPolicy::Cumulative))
        .expect("cumulative");
    assert_eq!(cumulative.imported, 1);
    assert_eq!(cumulative.duplicates[0].reason.rule, MatchRule::Name);
}

#[test]
fn write_failures_do_not_stop_the_run() {
    let records = (0..25)
        .map(|idx| ContactRecord::new(format!("Person {idx}")))
        .collect();
    let mut sink = RecordingSink {
        reject: vec!["Person 3", "Person 17"],
        ..RecordingSink::default()
    };
    let report = run_import(&mut sink, parsed(records), &options(false, IndexPolicy::Snapshot))
        .expect("import");

    assert_eq!(sink.batches.len(), 3);
    assert_eq!(sink.batches[2].len(), 5);
    assert_eq!(report.imported, 23);
    let failed: Vec<_> = report.failed.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(failed, vec!["Person 3", "Person 17"]);
    assert!(report.failed[0].error.contains("rejected"));
}

#[test]
fn missing_sink_results_are_reported_as_failures() {
    let mut sink = RecordingSink {
        drop_first_result: true,
        ..RecordingSink::default()
    };
    let report = run_import(
        &mut sink,
        parsed(vec![ContactRecord::new("Ada"), ContactRecord::new("Grace")]),
        &options(false, IndexPolicy::Snapshot),
    )
    .expect("import");

    assert_eq!(report.planned.len(), 2);
    assert_eq!(report.imported + report.failed.len(), 2);
    assert_eq!(report.imported, 1);
    assert_eq!(report.failed[0].name, "Grace");
    assert!(report.failed[0].error.contains("sink returned no result"));
}

#[test]
fn nothing_to_import_touches_no_group() {
    let mut sink = RecordingSink {
        existing: existing_people(),
        ..RecordingSink::default()
    };
    let report = run_import(
        &mut sink,
        parsed(vec![ContactRecord::new("JOHN SMITH")]),
        &options(false, IndexPolicy::Snapshot),
    )
    .expect("import");
    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(sink.write_calls(), 0);
}

#[test]
fn failed_group_assignment_becomes_a_warning() {
    let mut sink = RecordingSink {
        fail_finish: true,
        ..RecordingSink::default()
    };
    let report = run_import(
        &mut sink,
        parsed(vec![ContactRecord::new("Ada")]),
        &options(false, IndexPolicy::Snapshot),
    )
    .expect("import");
    assert_eq!(report.imported, 1);
    assert_eq!(report.assigned, 0);
    assert!(report
        .warnings
        .iter()
        .any(|warning| warning.contains("group assignment")));
}

#[test]
fn invalid_options_are_rejected_before_reading_destination() {
    let mut sink = RecordingSink::default();
    let mut opts = options(false, IndexPolicy::Snapshot);
    opts.group = "  ".to_string();
    let err = run_import(&mut sink, parsed(Vec::new()), &opts).unwrap_err();
    assert!(matches!(err, SyncError::Core(_)));

    let mut opts = options(false, IndexPolicy::Snapshot);
    opts.batch_size = 0;
    assert!(run_import(&mut sink, parsed(Vec::new()), &opts).is_err());
}

#[test]
fn parsed_vcf_flows_through_import() {
    let data = "BEGIN:VCARD\nVERSION:3.0\nFN:Jane Doe\nEMAIL;TYPE=WORK:jane@new.com\nEND:VCARD\nBEGIN:VCARD\nVERSION:3.0\nN:Smith;John;;;\nTEL;TYPE=HOME:555 000 1111\nEND:VCARD\nBEGIN:VCARD\nVERSION:3.0\nEND:VCARD\n";
    let parsed = parse_vcf(data).expect("parse");
    let mut sink = RecordingSink {
        existing: existing_people(),
        ..RecordingSink::default()
    };
    let report = run_import(&mut sink, parsed, &options(true, IndexPolicy::Snapshot))
        .expect("preview");

    assert_eq!(report.total, 3);
    assert_eq!(report.blank, 1);
    let (dupes, planned) = dispositions(&report);
    assert_eq!(
        dupes,
        vec![
            ("Jane Doe".to_string(), MatchRule::Name),
            ("John Smith".to_string(), MatchRule::Name),
        ]
    );
    assert!(planned.is_empty());
    assert!(report
        .warnings
        .iter()
        .any(|warning| warning.contains("missing FN")));
}

use crate::applescript::{
    build_person_script, parse_create_output, wrap_create_script, BlockOutcome, Osascript,
    ScriptRunner, ENSURE_GROUP_SCRIPT, LIST_PEOPLE_SCRIPT, REASSIGN_GROUP_SCRIPT,
};
use crate::sink::ContactSink;
use crate::{Result, SyncError};
use cardferry_core::{ContactRecord, EmailLabel, PhoneLabel};
use tracing::{debug, warn};

/// macOS Contacts.app, driven through AppleScript.
#[derive(Debug, Clone, Default)]
pub struct MacosContactsSink<R = Osascript> {
    runner: R,
}

impl MacosContactsSink<Osascript> {
    pub fn new() -> Self {
        Self { runner: Osascript }
    }
}

impl<R: ScriptRunner> MacosContactsSink<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Runs every block exactly once. A runner failure fails every block in the
    /// batch; blocks are never retried.
    fn run_batch(&self, group: &str, blocks: &[String]) -> Vec<BlockOutcome> {
        let script = wrap_create_script(blocks);
        match self.runner.run(&script, &[group]) {
            Ok(output) => parse_create_output(&output, blocks.len()),
            Err(err) => {
                warn!(error = %err, size = blocks.len(), "batch script failed");
                let message = err.to_string();
                blocks.iter().map(|_| Err(message.clone())).collect()
            }
        }
    }
}

impl<R: ScriptRunner> ContactSink for MacosContactsSink<R> {
    fn sink_name(&self) -> &'static str {
        "macos-contacts"
    }

    fn existing_contacts(&mut self) -> Result<Vec<ContactRecord>> {
        let output = self.runner.run(LIST_PEOPLE_SCRIPT, &[])?;
        Ok(parse_people_listing(&output))
    }

    fn ensure_group(&mut self, group: &str) -> Result<()> {
        let name = self.runner.run(ENSURE_GROUP_SCRIPT, &[group])?;
        debug!(group = %name.trim(), "group ready");
        Ok(())
    }

    fn create_contacts(&mut self, group: &str, batch: &[ContactRecord]) -> Vec<Result<()>> {
        let blocks: Vec<Option<String>> = batch.iter().map(build_person_script).collect();
        let buildable: Vec<String> = blocks.iter().flatten().cloned().collect();

        let mut outcomes = if buildable.is_empty() {
            Vec::new()
        } else {
            self.run_batch(group, &buildable)
        }
        .into_iter();

        blocks
            .into_iter()
            .map(|block| match block {
                None => Err(SyncError::DestinationWrite(
                    "record has no name, organization, title, or note".to_string(),
                )),
                Some(_) => match outcomes.next() {
                    Some(Ok(())) => Ok(()),
                    Some(Err(message)) => Err(SyncError::DestinationWrite(message)),
                    None => Err(SyncError::DestinationWrite(
                        "Contacts reported no result for this person".to_string(),
                    )),
                },
            })
            .collect()
    }

    fn finish(&mut self, group: &str) -> Result<usize> {
        let output = self.runner.run(REASSIGN_GROUP_SCRIPT, &[group])?;
        output.trim().parse::<usize>().map_err(|_| {
            SyncError::Parse(format!("unexpected group assignment output: {}", output.trim()))
        })
    }
}

/// Parses the `name<TAB>email;email;<TAB>phone;phone;` listing produced by
/// [`LIST_PEOPLE_SCRIPT`]. Labels are not part of the listing.
pub fn parse_people_listing(output: &str) -> Vec<ContactRecord> {
    let mut people = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split('\t');
        let mut record = ContactRecord::new(parts.next().unwrap_or_default().trim());
        if let Some(emails) = parts.next() {
            for email in emails.split(';').map(str::trim).filter(|e| !e.is_empty()) {
                record = record.with_email(EmailLabel::Other, email);
            }
        }
        if let Some(phones) = parts.next() {
            for phone in phones.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                record = record.with_phone(PhoneLabel::Other, phone);
            }
        }
        if !record.is_blank() {
            people.push(record);
        }
    }
    people
}

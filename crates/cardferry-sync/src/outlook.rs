use crate::applescript::{Osascript, ScriptRunner, EXPORT_OUTLOOK_SCRIPT};
use crate::source::VcfSource;
use crate::{Result, SyncError};

/// Microsoft Outlook for Mac, exported as concatenated vCards.
#[derive(Debug, Default)]
pub struct OutlookSource<R = Osascript> {
    runner: R,
}

impl OutlookSource<Osascript> {
    pub fn new() -> Self {
        Self { runner: Osascript }
    }
}

impl<R: ScriptRunner> OutlookSource<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: ScriptRunner> VcfSource for OutlookSource<R> {
    fn source_name(&self) -> &'static str {
        "outlook"
    }

    fn fetch_vcf(&self) -> Result<String> {
        let output = self
            .runner
            .run(EXPORT_OUTLOOK_SCRIPT, &[])
            .map_err(|err| match err {
                SyncError::Unavailable(_) => err,
                other => SyncError::SourceUnavailable(format!("outlook export failed: {other}")),
            })?;
        Ok(output)
    }
}

/// Counts `BEGIN:VCARD` markers, case-insensitively.
pub fn count_vcards(data: &str) -> usize {
    data.lines()
        .filter(|line| line.trim().eq_ignore_ascii_case("BEGIN:VCARD"))
        .count()
}

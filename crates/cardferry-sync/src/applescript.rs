//! AppleScript generation and the `osascript` bridge.

use crate::{Result, SyncError};
use cardferry_core::ContactRecord;

/// Executes an AppleScript program with positional `argv` arguments.
pub trait ScriptRunner {
    fn run(&self, script: &str, args: &[&str]) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Osascript;

impl ScriptRunner for Osascript {
    fn run(&self, script: &str, args: &[&str]) -> Result<String> {
        run_osascript(script, args)
    }
}

#[cfg(target_os = "macos")]
fn run_osascript(script: &str, args: &[&str]) -> Result<String> {
    use std::process::Command;

    let mut cmd = Command::new("osascript");
    cmd.arg("-e").arg(script);
    for arg in args {
        cmd.arg(arg);
    }

    let output = cmd.output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = if stderr.trim().is_empty() {
            format!("osascript exited with status {}", output.status)
        } else {
            stderr.trim().to_string()
        };
        return Err(SyncError::Command(message));
    }

    String::from_utf8(output.stdout)
        .map_err(|_| SyncError::Parse("osascript output was not valid UTF-8".to_string()))
}

#[cfg(not(target_os = "macos"))]
fn run_osascript(_script: &str, _args: &[&str]) -> Result<String> {
    Err(SyncError::Unavailable(
        "AppleScript automation is only available on macOS".to_string(),
    ))
}

pub fn escape_applescript(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Statements that create one person inside the `targetGroup` variable.
///
/// Returns `None` when the record has no property Contacts.app can create a
/// person from.
pub fn build_person_script(record: &ContactRecord) -> Option<String> {
    let fields = [
        ("first name", &record.first_name),
        ("last name", &record.last_name),
        ("organization", &record.organization),
        ("job title", &record.job_title),
        ("note", &record.note),
    ];
    let props: Vec<String> = fields
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| format!("{key}:\"{}\"", escape_applescript(value)))
        .collect();
    if props.is_empty() {
        return None;
    }

    let mut lines = vec![format!(
        "set newPerson to make new person with properties {{{}}}",
        props.join(", ")
    )];
    for email in &record.emails {
        lines.push(format!(
            "make new email at end of emails of newPerson with properties {{label:\"{}\", value:\"{}\"}}",
            email.label.as_str(),
            escape_applescript(&email.address)
        ));
    }
    for phone in &record.phones {
        lines.push(format!(
            "make new phone at end of phones of newPerson with properties {{label:\"{}\", value:\"{}\"}}",
            phone.label.as_str(),
            escape_applescript(&phone.number)
        ));
    }
    lines.push("add newPerson to targetGroup".to_string());
    Some(lines.join("\n        "))
}

/// Wraps person statements in one script. Each block runs in its own `try`,
/// so a failing person never rolls back or repeats the others. The script
/// prints one `ok` or `ERROR: <message>` line per block, in order. The group
/// name is passed as `argv` item 1.
pub fn wrap_create_script(blocks: &[String]) -> String {
    let body: Vec<String> = blocks
        .iter()
        .map(|block| {
            format!(
                r#"try
            {}
            set end of results to "ok"
        on error errMsg
            set end of results to "ERROR: " & errMsg
        end try"#,
                block.replace('\n', "\n    ")
            )
        })
        .collect();
    format!(
        r#"
on run argv
    tell application "Contacts"
        set targetGroup to group (item 1 of argv)
        set results to {{}}
        {}
        save
        set AppleScript's text item delimiters to linefeed
        set output to results as text
        set AppleScript's text item delimiters to ""
        return output
    end tell
end run
"#,
        body.join("\n        ")
    )
}

/// Outcome of one person block: `Err` carries the Contacts.app error message.
pub type BlockOutcome = std::result::Result<(), String>;

/// Splits the output of [`wrap_create_script`] into one outcome per block.
///
/// Lines that start with neither `ok` nor `ERROR: ` continue the previous
/// error message. Blocks without a reported line come back as errors.
pub fn parse_create_output(output: &str, expected: usize) -> Vec<BlockOutcome> {
    let mut outcomes: Vec<BlockOutcome> = Vec::with_capacity(expected);
    for line in output.lines() {
        let line = line.trim_end();
        if line == "ok" {
            outcomes.push(Ok(()));
        } else if let Some(message) = line.strip_prefix("ERROR: ") {
            outcomes.push(Err(message.to_string()));
        } else if let Some(Err(message)) = outcomes.last_mut() {
            message.push('\n');
            message.push_str(line);
        }
    }
    outcomes.truncate(expected);
    while outcomes.len() < expected {
        outcomes.push(Err("Contacts reported no result for this person".to_string()));
    }
    outcomes
}

pub const LIST_PEOPLE_SCRIPT: &str = r#"
tell application "Contacts"
    set output to ""
    repeat with p in every person
        set pName to name of p
        if pName is missing value then set pName to ""
        set pEmails to ""
        try
            repeat with e in emails of p
                set pEmails to pEmails & (value of e) & ";"
            end repeat
        end try
        set pPhones to ""
        try
            repeat with ph in phones of p
                set pPhones to pPhones & (value of ph) & ";"
            end repeat
        end try
        set output to output & pName & tab & pEmails & tab & pPhones & linefeed
    end repeat
    return output
end tell
"#;

pub const ENSURE_GROUP_SCRIPT: &str = r#"
on run argv
    set groupName to item 1 of argv
    tell application "Contacts"
        try
            set targetGroup to group groupName
        on error
            set targetGroup to make new group with properties {name:groupName}
            save
        end try
        return name of targetGroup
    end tell
end run
"#;

/// Re-adds people created in the last hour to the group. Contacts.app can drop
/// group membership assigned in the same script that created the person.
pub const REASSIGN_GROUP_SCRIPT: &str = r#"
on run argv
    tell application "Contacts"
        set targetGroup to group (item 1 of argv)
        set recentPeople to every person whose creation date > (current date) - 1 * hours
        set addCount to 0
        repeat with p in recentPeople
            add p to targetGroup
            set addCount to addCount + 1
        end repeat
        save
        return addCount as text
    end tell
end run
"#;

pub const EXPORT_OUTLOOK_SCRIPT: &str = r#"
tell application "Microsoft Outlook"
    set vcardOutput to ""
    repeat with c in every contact
        try
            set vcardOutput to vcardOutput & (vcard data of c) & linefeed
        end try
    end repeat
    return vcardOutput
end tell
"#;

use crate::error::{Result, SyncError};
use cardferry_core::domain::{ContactRecord, EmailEntry, EmailLabel, PhoneEntry, PhoneLabel};

#[derive(Debug, Clone)]
pub struct ParsedVcf {
    pub contacts: Vec<ContactRecord>,
    pub warnings: Vec<String>,
}

/// Parses a stream of vCards into contact records.
///
/// Malformed cards are recovered rather than rejected: whatever fields are
/// readable are kept and a warning is recorded. Cards with no identifying
/// fields still come back (as blank records) so callers can count them.
///
/// Empty input yields no records. Non-empty input without a single
/// `BEGIN:VCARD` is not a vCard stream and fails with
/// [`SyncError::SourceUnavailable`].
pub fn parse_vcf(data: &str) -> Result<ParsedVcf> {
    let data = data.strip_prefix('\u{feff}').unwrap_or(data);
    let mut warnings = Vec::new();
    let mut contacts = Vec::new();
    let mut saw_card = false;

    let mut current: Option<RawCard> = None;
    for line in unfold_lines(data) {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("BEGIN:VCARD") {
            saw_card = true;
            if let Some(card) = current.take() {
                warnings.push("nested BEGIN:VCARD encountered; closing previous card".to_string());
                contacts.push(card.into_record(contacts.len() + 1, &mut warnings));
            }
            current = Some(RawCard::default());
            continue;
        }

        if trimmed.eq_ignore_ascii_case("END:VCARD") {
            if let Some(card) = current.take() {
                contacts.push(card.into_record(contacts.len() + 1, &mut warnings));
            } else {
                warnings.push("END:VCARD without matching BEGIN:VCARD".to_string());
            }
            continue;
        }

        let Some(card) = current.as_mut() else {
            continue;
        };

        let Some(property) = split_property(trimmed) else {
            continue;
        };

        match property.name.as_str() {
            "FN" => {
                let value = unescape_vcard_value(&property.value);
                if card.fn_name.is_none() && !value.trim().is_empty() {
                    card.fn_name = Some(value.trim().to_string());
                }
            }
            "N" => {
                if card.structured_name.is_none() {
                    let parts = split_escaped(&property.value, ';');
                    let component = |idx: usize| {
                        parts
                            .get(idx)
                            .map(|raw| unescape_vcard_value(raw).trim().to_string())
                            .unwrap_or_default()
                    };
                    card.structured_name = Some((component(0), component(1)));
                }
            }
            "ORG" => {
                if card.organization.is_none() {
                    let first = split_escaped(&property.value, ';')
                        .into_iter()
                        .next()
                        .unwrap_or_default();
                    let value = unescape_vcard_value(&first);
                    if !value.trim().is_empty() {
                        card.organization = Some(value.trim().to_string());
                    }
                }
            }
            "TITLE" => {
                let value = unescape_vcard_value(&property.value);
                if card.job_title.is_none() && !value.trim().is_empty() {
                    card.job_title = Some(value.trim().to_string());
                }
            }
            "NOTE" => {
                let value = unescape_vcard_value(&property.value);
                if card.note.is_none() && !value.trim().is_empty() {
                    card.note = Some(value.trim().to_string());
                }
            }
            "EMAIL" => {
                let value = unescape_vcard_value(&property.value);
                if !value.trim().is_empty() {
                    card.emails.push(EmailEntry {
                        label: EmailLabel::from_params(&property.params),
                        address: value.trim().to_string(),
                    });
                }
            }
            "TEL" => {
                let value = unescape_vcard_value(&property.value);
                if !value.trim().is_empty() {
                    card.phones.push(PhoneEntry {
                        label: PhoneLabel::from_params(&property.params),
                        number: value.trim().to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    if let Some(card) = current.take() {
        warnings.push("missing END:VCARD at end of file".to_string());
        contacts.push(card.into_record(contacts.len() + 1, &mut warnings));
    }

    if !saw_card && !data.trim().is_empty() {
        return Err(SyncError::SourceUnavailable(
            "input contains no BEGIN:VCARD; not a vCard file".to_string(),
        ));
    }

    Ok(ParsedVcf { contacts, warnings })
}

#[derive(Default)]
struct RawCard {
    fn_name: Option<String>,
    structured_name: Option<(String, String)>,
    organization: Option<String>,
    job_title: Option<String>,
    note: Option<String>,
    emails: Vec<EmailEntry>,
    phones: Vec<PhoneEntry>,
}

impl RawCard {
    fn into_record(self, ordinal: usize, warnings: &mut Vec<String>) -> ContactRecord {
        let (mut last_name, mut first_name) = self.structured_name.unwrap_or_default();

        let full_name = match self.fn_name {
            Some(value) => value,
            None => {
                let derived = join_name(&first_name, &last_name);
                if !derived.is_empty() {
                    warnings.push(format!("vCard {ordinal}: missing FN; using name from N"));
                }
                derived
            }
        };

        if first_name.is_empty() && last_name.is_empty() {
            let mut parts = full_name.splitn(2, char::is_whitespace);
            first_name = parts.next().unwrap_or_default().to_string();
            last_name = parts.next().unwrap_or_default().trim().to_string();
        }

        ContactRecord {
            full_name,
            first_name,
            last_name,
            organization: self.organization.unwrap_or_default(),
            job_title: self.job_title.unwrap_or_default(),
            note: self.note.unwrap_or_default(),
            emails: self.emails,
            phones: self.phones,
        }
    }
}

fn join_name(first: &str, last: &str) -> String {
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{first} {last}"),
        (false, true) => first.to_string(),
        (true, false) => last.to_string(),
        (true, true) => String::new(),
    }
}

struct Property {
    name: String,
    params: String,
    value: String,
}

/// Splits on CRLF, LF or bare CR and joins folded continuation lines.
fn unfold_lines(input: &str) -> Vec<String> {
    let input = input.replace("\r\n", "\n");
    let mut lines: Vec<String> = Vec::new();
    for line in input.split(|c: char| c == '\n' || c == '\r') {
        match line.strip_prefix(|c: char| c == ' ' || c == '\t') {
            Some(rest) => match lines.last_mut() {
                Some(last) => last.push_str(rest),
                None => lines.push(rest.to_string()),
            },
            None => lines.push(line.to_string()),
        }
    }
    lines
}

fn split_property(line: &str) -> Option<Property> {
    let (left, value) = line.split_once(':')?;
    let (name, params) = match left.split_once(';') {
        Some((name, params)) => (name, params),
        None => (left, ""),
    };
    let mut name = name.trim();
    if let Some((_, group)) = name.rsplit_once('.') {
        name = group;
    }
    if name.is_empty() {
        return None;
    }
    Some(Property {
        name: name.to_ascii_uppercase(),
        params: params.to_string(),
        value: value.to_string(),
    })
}

fn split_escaped(value: &str, separator: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut escape = false;

    for ch in value.chars() {
        if escape {
            current.push(ch);
            escape = false;
            continue;
        }

        if ch == '\\' {
            current.push(ch);
            escape = true;
            continue;
        }

        if ch == separator {
            items.push(current);
            current = String::new();
        } else {
            current.push(ch);
        }
    }

    items.push(current);
    items
}

fn unescape_vcard_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut escaped = false;
    for ch in value.chars() {
        if escaped {
            out.push(match ch {
                'n' | 'N' | 'r' | 'R' => '\n',
                other => other,
            });
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else {
            out.push(ch);
        }
    }
    out
}

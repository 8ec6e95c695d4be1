use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailLabel {
    Work,
    Home,
    Other,
}

impl EmailLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            EmailLabel::Work => "work",
            EmailLabel::Home => "home",
            EmailLabel::Other => "other",
        }
    }

    /// Picks a label from raw vCard property parameters such as `TYPE=WORK,INTERNET`.
    pub fn from_params(params: &str) -> Self {
        let params = params.to_ascii_lowercase();
        if params.contains("work") {
            EmailLabel::Work
        } else if params.contains("home") {
            EmailLabel::Home
        } else {
            EmailLabel::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhoneLabel {
    Mobile,
    Work,
    Home,
    WorkFax,
    Pager,
    Other,
}

impl PhoneLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            PhoneLabel::Mobile => "mobile",
            PhoneLabel::Work => "work",
            PhoneLabel::Home => "home",
            PhoneLabel::WorkFax => "work fax",
            PhoneLabel::Pager => "pager",
            PhoneLabel::Other => "other",
        }
    }

    pub fn from_params(params: &str) -> Self {
        let params = params.to_ascii_lowercase();
        if params.contains("cell") || params.contains("mobile") {
            PhoneLabel::Mobile
        } else if params.contains("fax") {
            PhoneLabel::WorkFax
        } else if params.contains("work") {
            PhoneLabel::Work
        } else if params.contains("home") {
            PhoneLabel::Home
        } else if params.contains("pager") {
            PhoneLabel::Pager
        } else {
            PhoneLabel::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailEntry {
    pub label: EmailLabel,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEntry {
    pub label: PhoneLabel,
    pub number: String,
}

/// A contact as read from either address book.
///
/// Only `full_name`, `emails` and `phones` take part in duplicate matching; the
/// remaining fields are carried so the destination can create a complete person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub job_title: String,
    pub note: String,
    pub emails: Vec<EmailEntry>,
    pub phones: Vec<PhoneEntry>,
}

impl ContactRecord {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, label: EmailLabel, address: impl Into<String>) -> Self {
        self.emails.push(EmailEntry {
            label,
            address: address.into(),
        });
        self
    }

    pub fn with_phone(mut self, label: PhoneLabel, number: impl Into<String>) -> Self {
        self.phones.push(PhoneEntry {
            label,
            number: number.into(),
        });
        self
    }

    /// True when the record has nothing that could identify a person.
    pub fn is_blank(&self) -> bool {
        self.full_name.trim().is_empty()
            && self.emails.iter().all(|e| e.address.trim().is_empty())
            && self.phones.iter().all(|p| p.number.trim().is_empty())
    }

    /// Name used in reports; falls back to the first email or phone.
    pub fn display_label(&self) -> &str {
        let name = self.full_name.trim();
        if !name.is_empty() {
            return name;
        }
        if let Some(email) = self.emails.first() {
            return email.address.trim();
        }
        if let Some(phone) = self.phones.first() {
            return phone.number.trim();
        }
        ""
    }
}

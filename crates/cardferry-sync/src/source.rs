use crate::{Result, SyncError};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub trait VcfSource {
    fn source_name(&self) -> &'static str;
    fn fetch_vcf(&self) -> Result<String>;
}

/// vCard text previously exported to disk.
#[derive(Debug, Clone)]
pub struct VcfFileSource {
    pub path: PathBuf,
}

impl VcfFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VcfSource for VcfFileSource {
    fn source_name(&self) -> &'static str {
        "vcf-file"
    }

    fn fetch_vcf(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|err| {
            let reason = match err.kind() {
                ErrorKind::NotFound => "file not found".to_string(),
                ErrorKind::InvalidData => "file is not valid UTF-8".to_string(),
                _ => err.to_string(),
            };
            SyncError::SourceUnavailable(format!("{}: {reason}", self.path.display()))
        })
    }
}

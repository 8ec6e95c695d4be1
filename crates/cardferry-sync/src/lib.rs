pub mod applescript;
pub mod error;
pub mod import;
pub mod macos;
pub mod outlook;
pub mod sink;
pub mod source;
pub mod vcf;

pub use error::{Result, SyncError};

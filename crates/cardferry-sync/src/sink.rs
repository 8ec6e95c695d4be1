use crate::Result;
use cardferry_core::ContactRecord;

/// Destination address book.
///
/// Implementations only ever create new people; existing entries are read for
/// duplicate detection and never modified.
pub trait ContactSink {
    fn sink_name(&self) -> &'static str;

    fn existing_contacts(&mut self) -> Result<Vec<ContactRecord>>;

    fn ensure_group(&mut self, group: &str) -> Result<()>;

    /// Creates every record in `batch` inside `group`, returning one result per record.
    /// Records past the end of a short result list are reported as failed.
    fn create_contacts(&mut self, group: &str, batch: &[ContactRecord]) -> Vec<Result<()>>;

    /// Runs after all batches are written. Returns the number of people assigned to the group.
    fn finish(&mut self, _group: &str) -> Result<usize> {
        Ok(0)
    }
}

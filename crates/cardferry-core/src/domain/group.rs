use crate::error::CoreError;

pub const DEFAULT_GROUP: &str = "GM";
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const MAX_BATCH_SIZE: usize = 500;

pub fn validate_group_label(value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyGroupLabel);
    }
    Ok(trimmed.to_string())
}

pub fn validate_batch_size(value: usize) -> Result<usize, CoreError> {
    if value == 0 || value > MAX_BATCH_SIZE {
        return Err(CoreError::InvalidBatchSize(value));
    }
    Ok(value)
}

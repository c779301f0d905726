//! Input validation for identity-bearing records.
//!
//! Over-long input is rejected, never truncated.

use crate::error::LedgerError;
use crate::types::{MAX_NAME_LEN, MAX_TASK_ID_LEN, MAX_URI_LEN};

pub fn validate_agent_name(name: &str) -> Result<(), LedgerError> {
    if name.trim().is_empty() {
        return Err(LedgerError::InvalidName);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(LedgerError::NameTooLong {
            len: name.len(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// URIs may be empty (no metadata / no proof), but are bounded
pub fn validate_uri(uri: &str) -> Result<(), LedgerError> {
    if uri.len() > MAX_URI_LEN {
        return Err(LedgerError::UriTooLong {
            len: uri.len(),
            max: MAX_URI_LEN,
        });
    }
    Ok(())
}

pub fn validate_task_id(task_id: &str) -> Result<(), LedgerError> {
    if task_id.trim().is_empty() {
        return Err(LedgerError::InvalidTaskId("Task ID cannot be empty".to_string()));
    }
    if task_id.len() > MAX_TASK_ID_LEN {
        return Err(LedgerError::InvalidTaskId(format!(
            "Task ID is {} bytes (max {})",
            task_id.len(),
            MAX_TASK_ID_LEN
        )));
    }
    Ok(())
}

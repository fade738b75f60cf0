use crate::error::{CheckError, Result};

/// Split `records` into consecutive groups of `size`, keeping order. The
/// last group may be shorter.
pub fn batch<T>(records: Vec<T>, size: usize) -> Result<Vec<Vec<T>>> {
    if size == 0 {
        return Err(CheckError::InvalidConfiguration(
            "batch size must be a positive integer".to_string(),
        ));
    }

    let mut batches = Vec::with_capacity(records.len().div_ceil(size));
    let mut records = records.into_iter().peekable();
    while records.peek().is_some() {
        batches.push(records.by_ref().take(size).collect());
    }
    Ok(batches)
}

use crate::server::error::{internal::InternalError, AppError};

/// Parses a Discord snowflake persisted as text.
///
/// # Arguments
/// - `value` - The stored string to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed snowflake
/// - `Err(AppError::InternalErr(ParseStringId))` - The stored value is not a valid u64
pub fn parse_u64_from_string(value: String) -> Result<u64, AppError> {
    match value.parse::<u64>() {
        Ok(id) => Ok(id),
        Err(source) => Err(InternalError::ParseStringId { value, source }.into()),
    }
}

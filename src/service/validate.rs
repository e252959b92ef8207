use crate::error::{ServiceError, ServiceResult};

/// Earliest season with championship data
pub const DEFAULT_MIN_YEAR: i32 = 1950;

pub fn validate_id(id: i64) -> ServiceResult<()> {
    if id <= 0 {
        return Err(ServiceError::InvalidInput(
            "ID must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_year(year: i32, min_year: i32) -> ServiceResult<()> {
    if year < min_year {
        return Err(ServiceError::InvalidInput(format!(
            "Year must be at least {}",
            min_year
        )));
    }
    Ok(())
}

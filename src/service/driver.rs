use std::sync::Arc;
use tracing::info;

use super::validate::validate_id;
use crate::error::ServiceResult;
use crate::models::{Driver, DriverSummary};
use crate::repository::DriverRepository;

pub struct DriverService {
    repository: Arc<dyn DriverRepository>,
}

impl DriverService {
    pub fn new(repository: Arc<dyn DriverRepository>) -> Self {
        Self { repository }
    }

    pub fn get_all(&self) -> ServiceResult<Vec<Driver>> {
        info!("Getting all drivers");
        Ok(self.repository.get_all()?)
    }

    pub fn get_by_id(&self, id: i64) -> ServiceResult<Option<Driver>> {
        validate_id(id)?;
        info!(id, "Getting driver");
        Ok(self.repository.get_by_id(id)?)
    }

    pub fn get_summaries(&self) -> ServiceResult<Vec<DriverSummary>> {
        info!("Getting all driver summaries");
        Ok(self.repository.get_summaries()?)
    }

    pub fn get_summary_by_id(&self, id: i64) -> ServiceResult<Option<DriverSummary>> {
        validate_id(id)?;
        info!(id, "Getting driver summary");
        Ok(self.repository.get_summary_by_id(id)?)
    }
}

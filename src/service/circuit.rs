use std::sync::Arc;
use tracing::info;

use super::validate::validate_id;
use crate::error::ServiceResult;
use crate::models::{Circuit, CircuitSummary};
use crate::repository::CircuitRepository;

pub struct CircuitService {
    repository: Arc<dyn CircuitRepository>,
}

impl CircuitService {
    pub fn new(repository: Arc<dyn CircuitRepository>) -> Self {
        Self { repository }
    }

    pub fn get_all(&self) -> ServiceResult<Vec<Circuit>> {
        info!("Getting all circuits");
        Ok(self.repository.get_all()?)
    }

    pub fn get_by_id(&self, id: i64) -> ServiceResult<Option<Circuit>> {
        validate_id(id)?;
        info!(id, "Getting circuit");
        Ok(self.repository.get_by_id(id)?)
    }

    pub fn get_summaries(&self) -> ServiceResult<Vec<CircuitSummary>> {
        info!("Getting all circuit summaries");
        Ok(self.repository.get_summaries()?)
    }

    pub fn get_summary_by_id(&self, id: i64) -> ServiceResult<Option<CircuitSummary>> {
        validate_id(id)?;
        info!(id, "Getting circuit summary");
        Ok(self.repository.get_summary_by_id(id)?)
    }
}

use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{RiderRepository, RiderRepositoryError};
use crate::domain::{RecordId, Rider, RiderStatus, UpdateAck};

#[derive(Default)]
pub struct MemoryRiderRepository {
    riders: Mutex<Vec<Rider>>,
}

impl MemoryRiderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, RiderRepositoryError> {
        Ok(lock(&self.riders, RiderRepositoryError::query)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RiderRepositoryError> {
        self.len().map(|count| count == 0)
    }
}

#[async_trait]
impl RiderRepository for MemoryRiderRepository {
    async fn list(&self, status: Option<RiderStatus>) -> Result<Vec<Rider>, RiderRepositoryError> {
        let riders = lock(&self.riders, RiderRepositoryError::query)?;
        let mut matching: Vec<Rider> = riders
            .iter()
            .filter(|rider| status.is_none_or(|wanted| rider.status == wanted))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn insert(&self, rider: &Rider) -> Result<(), RiderRepositoryError> {
        lock(&self.riders, RiderRepositoryError::query)?.push(rider.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<u64, RiderRepositoryError> {
        let mut riders = lock(&self.riders, RiderRepositoryError::query)?;
        let before = riders.len();
        riders.retain(|rider| rider.id != *id);
        Ok((before - riders.len()) as u64)
    }

    async fn activate(&self, id: &RecordId) -> Result<UpdateAck, RiderRepositoryError> {
        let mut riders = lock(&self.riders, RiderRepositoryError::query)?;
        let Some(rider) = riders.iter_mut().find(|rider| rider.id == *id) else {
            return Ok(UpdateAck::new(0, 0));
        };
        if rider.status == RiderStatus::Active {
            return Ok(UpdateAck::new(1, 0));
        }
        rider.status = RiderStatus::Active;
        Ok(UpdateAck::new(1, 1))
    }
}

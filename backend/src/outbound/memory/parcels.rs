use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::lock;
use crate::domain::ports::{ParcelRepository, ParcelRepositoryError};
use crate::domain::{Parcel, ParcelQuery, PaymentState, RecordId, TransactionId, UpdateAck};

#[derive(Default)]
pub struct MemoryParcelRepository {
    parcels: Mutex<Vec<Parcel>>,
}

impl MemoryParcelRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParcelRepository for MemoryParcelRepository {
    async fn list(&self, query: &ParcelQuery) -> Result<Vec<Parcel>, ParcelRepositoryError> {
        let parcels = lock(&self.parcels, ParcelRepositoryError::query)?;
        let mut matching: Vec<Parcel> = parcels
            .iter()
            .filter(|parcel| {
                query
                    .created_by
                    .as_ref()
                    .is_none_or(|owner| parcel.is_owned_by(owner))
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.creation_date.cmp(&a.creation_date));
        Ok(matching)
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Parcel>, ParcelRepositoryError> {
        let parcels = lock(&self.parcels, ParcelRepositoryError::query)?;
        Ok(parcels.iter().find(|parcel| parcel.id == *id).cloned())
    }

    async fn insert(&self, parcel: &Parcel) -> Result<(), ParcelRepositoryError> {
        let mut parcels = lock(&self.parcels, ParcelRepositoryError::query)?;
        if parcels.iter().any(|existing| existing.id == parcel.id) {
            return Err(ParcelRepositoryError::query(format!(
                "duplicate parcel id {}",
                parcel.id
            )));
        }
        parcels.push(parcel.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<u64, ParcelRepositoryError> {
        let mut parcels = lock(&self.parcels, ParcelRepositoryError::query)?;
        let before = parcels.len();
        parcels.retain(|parcel| parcel.id != *id);
        Ok((before - parcels.len()) as u64)
    }

    async fn mark_paid(
        &self,
        id: &RecordId,
        transaction_id: &TransactionId,
        paid_at: DateTime<Utc>,
    ) -> Result<UpdateAck, ParcelRepositoryError> {
        let mut parcels = lock(&self.parcels, ParcelRepositoryError::query)?;
        let Some(parcel) = parcels.iter_mut().find(|parcel| parcel.id == *id) else {
            return Ok(UpdateAck::new(0, 0));
        };
        if parcel.payment.is_paid() {
            return Ok(UpdateAck::new(1, 0));
        }
        parcel.payment = PaymentState::Paid {
            transaction_id: transaction_id.clone(),
            paid_at,
        };
        Ok(UpdateAck::new(1, 1))
    }
}

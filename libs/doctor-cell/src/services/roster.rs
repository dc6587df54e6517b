use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::StoreClient;

use crate::models::{CreateDoctorRequest, Doctor, RosterError};

/// Admin-owned doctor roster. Plain CRUD; all authorization happens in the
/// routing layer before these are reached.
pub struct RosterService {
    store: StoreClient,
}

impl RosterService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    pub async fn add_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, RosterError> {
        let body = json!({
            "name": request.name,
            "email": request.email,
            "specialty": request.specialty,
            "imageUrl": request.image_url,
        });

        let doctor: Doctor = self.store.insert_one("doctors", body).await?;
        info!("Doctor {} added to roster", doctor.id);
        Ok(doctor)
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, RosterError> {
        let doctors = self.store.find("doctors", &[]).await?;
        Ok(doctors)
    }

    pub async fn remove_doctor(&self, id: Uuid) -> Result<(), RosterError> {
        let removed = self
            .store
            .delete_one("doctors", &[("id", &id.to_string())])
            .await?;

        if removed == 0 {
            return Err(RosterError::NotFound);
        }

        debug!("Doctor {} removed from roster", id);
        Ok(())
    }
}

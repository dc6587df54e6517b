use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{StoreClient, StoreError};

use crate::models::{AppointmentOption, Booking, SpecialtyName};

pub struct AvailabilityService {
    store: StoreClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Remaining capacity per treatment for a date: the catalog slots minus
    /// the slots already taken by that date's bookings. Treatments with no
    /// remaining slots are still returned, with an empty slot list.
    ///
    /// Recomputed on every call; serving a cached answer would let two
    /// clients see the same open slot.
    pub async fn available_slots(&self, date: &str) -> Result<Vec<AppointmentOption>, StoreError> {
        debug!("Calculating available slots for {}", date);

        let options: Vec<AppointmentOption> =
            self.store.find("appointment_options", &[]).await?;
        let booked: Vec<Booking> = self
            .store
            .find("bookings", &[("appointmentDate", date)])
            .await?;

        let adjusted = options
            .into_iter()
            .map(|mut option| {
                let taken: Vec<&str> = booked
                    .iter()
                    .filter(|booking| booking.treatment_name == option.name)
                    .map(|booking| booking.slot.as_str())
                    .collect();

                option.slots.retain(|slot| !taken.contains(&slot.as_str()));
                option
            })
            .collect();

        Ok(adjusted)
    }

    /// Name-only projection of the treatment catalog.
    pub async fn specialties(&self) -> Result<Vec<SpecialtyName>, StoreError> {
        self.store
            .find_projected("appointment_options", &[], "name")
            .await
    }

    /// Catalog-wide price upsert. Legacy maintenance operation kept for the
    /// /addPrice endpoint.
    pub async fn backfill_prices(&self, price: f64) -> Result<u64, StoreError> {
        self.store
            .update_many("appointment_options", json!({ "price": price }))
            .await
    }
}

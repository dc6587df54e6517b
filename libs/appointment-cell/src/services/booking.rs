use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{StoreClient, StoreError};

use crate::models::{AppointmentOption, Booking, BookingError, CreateBookingRequest};

pub struct BookingService {
    store: StoreClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Create a booking. At most one booking may exist per
    /// (appointmentDate, email, treatmentName) triple; the slot is not part
    /// of the key, so asking for a second slot on the same day is still a
    /// duplicate.
    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        debug!(
            "Booking {} / {} on {}",
            request.email, request.treatment_name, request.appointment_date
        );

        // The requested slot must exist in the treatment's catalog.
        let option: AppointmentOption = self
            .store
            .find_one("appointment_options", &[("name", &request.treatment_name)])
            .await?
            .ok_or_else(|| BookingError::UnknownTreatment(request.treatment_name.clone()))?;

        if !option.slots.contains(&request.slot) {
            return Err(BookingError::SlotNotInCatalog {
                slot: request.slot.clone(),
                treatment: request.treatment_name.clone(),
            });
        }

        let existing: Vec<Booking> = self
            .store
            .find(
                "bookings",
                &[
                    ("appointmentDate", request.appointment_date.as_str()),
                    ("email", request.email.as_str()),
                    ("treatmentName", request.treatment_name.as_str()),
                ],
            )
            .await?;

        if !existing.is_empty() {
            return Err(BookingError::AlreadyBooked {
                date: request.appointment_date,
            });
        }

        let body = json!({
            "appointmentDate": request.appointment_date,
            "email": request.email,
            "treatmentName": request.treatment_name,
            "slot": request.slot,
            "price": request.price,
            "paid": false,
        });

        // Two racing requests can both pass the check above; the store's
        // uniqueness constraint on the triple is the backstop, and its
        // conflict answer collapses into the same duplicate response.
        match self.store.insert_one::<Booking>("bookings", body).await {
            Ok(booking) => {
                info!("Booking {} created", booking.id);
                Ok(booking)
            }
            Err(StoreError::Conflict(detail)) => {
                warn!("Store rejected duplicate booking: {}", detail);
                Err(BookingError::AlreadyBooked {
                    date: request.appointment_date,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn bookings_for_owner(&self, email: &str) -> Result<Vec<Booking>, BookingError> {
        let bookings = self.store.find("bookings", &[("email", email)]).await?;
        Ok(bookings)
    }

    pub async fn booking_by_id(&self, id: Uuid) -> Result<Booking, BookingError> {
        self.store
            .find_one("bookings", &[("id", &id.to_string())])
            .await?
            .ok_or(BookingError::NotFound)
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;

/// A treatment on offer: its price and the full, ordered slot catalog.
/// The catalog is static per treatment; availability for a date is derived
/// by subtracting that date's bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentOption {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub slots: Vec<String>,
}

/// Name-only projection of the catalog, used by clients to populate the
/// specialty dropdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialtyName {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub appointment_date: String,
    pub email: String,
    pub treatment_name: String,
    pub slot: String,
    pub price: f64,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub appointment_date: String,
    pub email: String,
    pub treatment_name: String,
    pub slot: String,
    pub price: f64,
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("You already have a booking on {date}")]
    AlreadyBooked { date: String },

    #[error("Unknown treatment: {0}")]
    UnknownTreatment(String),

    #[error("Slot {slot} is not offered for {treatment}")]
    SlotNotInCatalog { slot: String, treatment: String },

    #[error("Booking not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

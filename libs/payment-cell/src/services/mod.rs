pub mod payment;
pub mod stripe;

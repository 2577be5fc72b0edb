use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

/// Every bookable start time and every service length is a multiple of this.
pub const SLOT_INTERVAL_MINUTES: u32 = 15;

/// Checks that a service length is a positive multiple of
/// [`SLOT_INTERVAL_MINUTES`] and returns it as minutes.
///
/// This is the only place the rule lives; service creation, slot generation
/// and appointment creation all go through it.
pub fn validate_service_duration(minutes: impl Into<i64>) -> BookingResult<u32> {
    let minutes = minutes.into();
    if minutes <= 0 || minutes % i64::from(SLOT_INTERVAL_MINUTES) != 0 {
        return Err(BookingError::InvalidInput(format!(
            "Service duration must be a positive multiple of {SLOT_INTERVAL_MINUTES} minutes, \
             got {minutes}"
        )));
    }
    u32::try_from(minutes)
        .map_err(|_| BookingError::InvalidInput(format!("Service duration {minutes} is too long")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub barbershop_id: Uuid,
    pub name: String,
    pub duration_minutes: u32,
    /// Price in the smallest currency unit.
    pub price_cents: i64,
    pub is_active: bool,
}

impl Service {
    pub fn new(barbershop_id: Uuid, request: CreateServiceRequest) -> BookingResult<Self> {
        let duration_minutes = validate_service_duration(request.duration_minutes)?;
        if request.price_cents < 0 {
            return Err(BookingError::InvalidInput(format!(
                "Service price must not be negative, got {}",
                request.price_cents
            )));
        }
        let name = request.name.trim();
        if name.is_empty() {
            return Err(BookingError::InvalidInput(
                "Service name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            barbershop_id,
            name: name.to_string(),
            duration_minutes,
            price_cents: request.price_cents,
            is_active: true,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
}

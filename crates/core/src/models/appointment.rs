use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::time::{TimeOfDay, TimeRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Statuses whose interval still blocks the barber's calendar.
    pub const ACTIVE: [AppointmentStatus; 2] =
        [AppointmentStatus::Pending, AppointmentStatus::Confirmed];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn holds_slot(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    /// The lifecycle state machine: the status reached by applying `action`,
    /// or `InvalidTransition` when the current status does not allow it.
    pub fn apply(self, action: LifecycleAction) -> BookingResult<AppointmentStatus> {
        use AppointmentStatus::*;

        match (self, action) {
            (Pending, LifecycleAction::Confirm) => Ok(Confirmed),
            (Confirmed, LifecycleAction::Complete) => Ok(Completed),
            (Pending | Confirmed, LifecycleAction::Cancel) => Ok(Cancelled),
            (from, action) => Err(BookingError::InvalidTransition {
                action: action.as_str(),
                from,
            }),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(BookingError::InvalidInput(format!(
                "Unknown appointment status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Confirm,
    Complete,
    Cancel,
}

impl LifecycleAction {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleAction::Confirm => "confirm",
            LifecycleAction::Complete => "complete",
            LifecycleAction::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(BookingError::InvalidInput(format!(
                "Unknown payment status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub barbershop_id: Uuid,
    pub barber_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub appointment_date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub status: AppointmentStatus,
    pub payment_status: PaymentStatus,
    /// Service price at booking time, in the smallest currency unit.
    pub total_price_cents: i64,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by the store on every successful write; writes carry the
    /// version they were derived from.
    #[serde(default)]
    pub version: i64,
}

impl Appointment {
    pub fn time_range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// True if both appointments hold the same barber over intersecting time.
    pub fn conflicts_with(&self, other: &Appointment) -> bool {
        self.barber_id == other.barber_id
            && self.appointment_date == other.appointment_date
            && self.status.holds_slot()
            && other.status.holds_slot()
            && self.time_range().overlaps(&other.time_range())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub barbershop_id: Uuid,
    pub barber_id: Uuid,
    pub service_id: Uuid,
    pub appointment_date: NaiveDate,
    pub start_time: TimeOfDay,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fields a caller may change without going through a status transition.
///
/// `notes` is tri-state: a missing field leaves the notes alone, `null`
/// clears them and a string replaces them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

/// Only called for fields present in the input, so `null` becomes `Some(None)`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_location, validate_positive_amount};

/// Ride status enum representing the lifecycle of a posted ride
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Open,
    Completed,
    Cancelled,
}

impl RideStatus {
    /// Convert status to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Open => "open",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        }
    }

    /// Parse status from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "open" => Ok(RideStatus::Open),
            "completed" => Ok(RideStatus::Completed),
            "cancelled" => Ok(RideStatus::Cancelled),
            _ => Err(format!("Invalid ride status: {}", s)),
        }
    }
}

impl Default for RideStatus {
    fn default() -> Self {
        RideStatus::Open
    }
}

impl std::fmt::Display for RideStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing a posted ride
///
/// `tickets` is the remaining seat inventory, not the vehicle capacity;
/// it is decremented when bookings reserve seats and restored when they
/// are rejected or cancelled.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Ride {
    pub id: Uuid,
    pub driver_email: String,
    pub driver_name: String,
    pub driver_phone: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: DateTime<Utc>,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub tickets: i32,
    pub vehicle_type: String,
    pub status: RideStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for posting a new ride
///
/// When `price` is omitted the per-seat price is derived from the route
/// distance and the vehicle capacity. When it is supplied it must not
/// exceed the passenger fare ceiling for the route.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRideRequest {
    #[validate(custom = "validate_location")]
    pub origin: String,
    #[validate(custom = "validate_location")]
    pub destination: String,
    pub departure_date: DateTime<Utc>,
    #[validate(custom = "validate_positive_amount")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[validate(range(min = 1, message = "Ride must offer at least one seat"))]
    pub tickets: i32,
    #[validate(length(min = 1, message = "Vehicle type is required"))]
    pub vehicle_type: String,
    /// Seats the posting driver reserves for themselves on their own ride
    #[validate(range(min = 1, message = "Reserved seats must be at least 1"))]
    pub reserved_seats: Option<i32>,
}

/// Request DTO for updating a posted ride
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRideRequest {
    pub departure_date: Option<DateTime<Utc>>,
    #[validate(custom = "validate_positive_amount")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Seat count cannot be negative"))]
    pub tickets: Option<i32>,
    #[validate(length(min = 1, message = "Vehicle type is required"))]
    pub vehicle_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ride_status_round_trip() {
        for status in [RideStatus::Open, RideStatus::Completed, RideStatus::Cancelled] {
            assert_eq!(RideStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_ride_status_from_str_rejects_unknown() {
        assert!(RideStatus::from_str("departed").is_err());
    }

    #[test]
    fn test_create_ride_request_validation() {
        let request = CreateRideRequest {
            origin: "Algiers".to_string(),
            destination: "Oran".to_string(),
            departure_date: Utc::now(),
            price: None,
            tickets: 0,
            vehicle_type: "sedan".to_string(),
            reserved_seats: None,
        };
        assert!(request.validate().is_err());
    }
}

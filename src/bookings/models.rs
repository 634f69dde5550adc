use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Booking status enum representing the reservation and settlement lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    DriverCompleted,
    CashPaymentPending,
    PaymentPending,
    Completed,
}

impl BookingStatus {
    /// Convert status to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::DriverCompleted => "driver_completed",
            BookingStatus::CashPaymentPending => "cash_payment_pending",
            BookingStatus::PaymentPending => "payment_pending",
            BookingStatus::Completed => "completed",
        }
    }

    /// Parse status from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "accepted" => Ok(BookingStatus::Accepted),
            "rejected" => Ok(BookingStatus::Rejected),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "driver_completed" => Ok(BookingStatus::DriverCompleted),
            "cash_payment_pending" => Ok(BookingStatus::CashPaymentPending),
            "payment_pending" => Ok(BookingStatus::PaymentPending),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment method chosen at booking time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Card
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment state of a booking, tracked independently of the booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    PendingCollection,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::PendingCollection => "pending_collection",
            PaymentStatus::Paid => "paid",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "pending_collection" => Ok(PaymentStatus::PendingCollection),
            "paid" => Ok(PaymentStatus::Paid),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Unpaid
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing a booking
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub ride_id: Uuid,
    pub user_email: String,
    pub seats: i32,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    #[schema(value_type = String)]
    pub distance_km: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub ride_id: Uuid,
    pub user_email: String,
    pub seats: i32,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub distance_km: Decimal,
    pub total_price: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: BookingStatus,
}

/// Request DTO for creating a booking
///
/// A positive `total_price` overrides the computed fare; it is honored
/// verbatim at creation time only.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub ride_id: Uuid,
    #[validate(range(min = 1, message = "At least one seat must be booked"))]
    pub seats: i32,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    #[schema(value_type = Option<String>)]
    pub total_price: Option<Decimal>,
    pub payment_method: Option<PaymentMethod>,
}

/// Request DTO for updating booking status
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

/// Request DTO for a fare estimate
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EstimateRequest {
    #[validate(length(min = 1, message = "Origin is required"))]
    pub origin: String,
    #[validate(length(min = 1, message = "Destination is required"))]
    pub destination: String,
    #[validate(range(min = 1, message = "At least one seat must be estimated"))]
    pub seats: i32,
}

/// Response DTO for a fare estimate
#[derive(Debug, Serialize, ToSchema)]
pub struct EstimateResponse {
    #[schema(value_type = String)]
    pub distance_km: Decimal,
    #[schema(value_type = String)]
    pub price_per_seat: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Accepted,
            BookingStatus::Rejected,
            BookingStatus::Cancelled,
            BookingStatus::DriverCompleted,
            BookingStatus::CashPaymentPending,
            BookingStatus::PaymentPending,
            BookingStatus::Completed,
        ] {
            assert_eq!(BookingStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_booking_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&BookingStatus::CashPaymentPending).unwrap();
        assert_eq!(json, "\"cash_payment_pending\"");
    }

    #[test]
    fn test_payment_method_round_trip() {
        for method in [PaymentMethod::Cash, PaymentMethod::Card] {
            assert_eq!(PaymentMethod::from_str(method.as_str()).unwrap(), method);
        }
    }

    #[test]
    fn test_payment_status_round_trip() {
        for status in [
            PaymentStatus::Unpaid,
            PaymentStatus::PendingCollection,
            PaymentStatus::Paid,
        ] {
            assert_eq!(PaymentStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(BookingStatus::default(), BookingStatus::Pending);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Card);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Unpaid);
    }
}

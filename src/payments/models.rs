use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_positive_amount;

/// Status of a recorded payment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentRecordStatus {
    Pending,
    Confirmed,
}

impl PaymentRecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRecordStatus::Pending => "pending",
            PaymentRecordStatus::Confirmed => "confirmed",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PaymentRecordStatus::Pending),
            "confirmed" => Ok(PaymentRecordStatus::Confirmed),
            _ => Err(format!("Invalid payment record status: {}", s)),
        }
    }
}

impl Default for PaymentRecordStatus {
    fn default() -> Self {
        PaymentRecordStatus::Pending
    }
}

impl std::fmt::Display for PaymentRecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing a payment record
///
/// `provider_reference` is the gateway's intent identifier and is unique
/// across all payments; confirmation is idempotent on it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Option<Uuid>,
    pub user_email: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub provider_reference: String,
    pub method_reference: Option<String>,
    pub status: PaymentRecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a payment record
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub booking_id: Option<Uuid>,
    pub user_email: String,
    pub amount: Decimal,
    pub provider_reference: String,
    pub method_reference: Option<String>,
    pub status: PaymentRecordStatus,
}

/// Request DTO for creating a payment intent
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIntentRequest {
    #[validate(custom = "validate_positive_amount")]
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub booking_id: Option<Uuid>,
}

/// Response DTO for a created payment intent
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateIntentResponse {
    pub payment_intent_id: String,
    pub client_secret: String,
}

/// Request DTO for confirming a payment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ConfirmPaymentRequest {
    #[validate(length(min = 1, message = "Payment intent id is required"))]
    pub payment_intent_id: String,
    pub payment_method_id: Option<String>,
}

/// Request DTO for simulating a successful payment end to end
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SimulatePaymentRequest {
    pub booking_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_record_status_round_trip() {
        for status in [PaymentRecordStatus::Pending, PaymentRecordStatus::Confirmed] {
            assert_eq!(
                PaymentRecordStatus::from_str(status.as_str()).unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_payment_record_status_rejects_unknown() {
        assert!(PaymentRecordStatus::from_str("settled").is_err());
    }
}

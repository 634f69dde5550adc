// Payment gateway port

use axum::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::payments::error::PaymentError;

/// An intent minted by the gateway for a pending payment
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub intent_id: String,
    pub client_secret: String,
}

/// Abstraction over the external payment provider
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for an amount
    async fn create_intent(
        &self,
        amount: Decimal,
        user_email: &str,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Gateway used in every environment without a real provider: mints
/// locally-generated intent identifiers that the confirm flow accepts
#[derive(Debug, Clone, Default)]
pub struct SimulatedGateway;

impl SimulatedGateway {
    pub fn new() -> Self {
        Self
    }

    fn client_secret() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();
        format!("secret_{}", suffix)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn create_intent(
        &self,
        amount: Decimal,
        user_email: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::GatewayError(
                "Provider rejected non-positive amount".to_string(),
            ));
        }

        tracing::debug!("Minting simulated intent for {} ({})", user_email, amount);

        Ok(PaymentIntent {
            intent_id: format!("SIMULATED_INTENT_{}", Uuid::new_v4()),
            client_secret: Self::client_secret(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_intents_are_unique() {
        let gateway = SimulatedGateway::new();
        let a = gateway.create_intent(dec!(100), "a@example.com").await.unwrap();
        let b = gateway.create_intent(dec!(100), "a@example.com").await.unwrap();
        assert_ne!(a.intent_id, b.intent_id);
        assert_ne!(a.client_secret, b.client_secret);
    }

    #[tokio::test]
    async fn test_intent_id_is_prefixed() {
        let gateway = SimulatedGateway::new();
        let intent = gateway.create_intent(dec!(50), "a@example.com").await.unwrap();
        assert!(intent.intent_id.starts_with("SIMULATED_INTENT_"));
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let gateway = SimulatedGateway::new();
        assert!(gateway.create_intent(dec!(0), "a@example.com").await.is_err());
        assert!(gateway.create_intent(dec!(-1), "a@example.com").await.is_err());
    }
}

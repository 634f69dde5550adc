// Database access for payment records

use sqlx::PgPool;

use crate::payments::models::{NewPayment, Payment};

const PAYMENT_COLUMNS: &str = "id, booking_id, user_email, amount, provider_reference, \
     method_reference, status, created_at, updated_at";

/// Repository for payment persistence
#[derive(Clone)]
pub struct PaymentsRepository {
    pool: PgPool,
}

impl PaymentsRepository {
    /// Create a new PaymentsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a payment record. The unique index on provider_reference
    /// rejects a second record for the same intent.
    pub async fn insert(&self, payment: NewPayment) -> Result<Payment, sqlx::Error> {
        sqlx::query_as::<_, Payment>(&format!(
            "INSERT INTO payments (booking_id, user_email, amount, provider_reference, \
             method_reference, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            PAYMENT_COLUMNS
        ))
        .bind(payment.booking_id)
        .bind(&payment.user_email)
        .bind(payment.amount)
        .bind(&payment.provider_reference)
        .bind(&payment.method_reference)
        .bind(payment.status)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a payment by its gateway intent reference
    pub async fn find_by_reference(
        &self,
        provider_reference: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(&format!(
            "SELECT {} FROM payments WHERE provider_reference = $1",
            PAYMENT_COLUMNS
        ))
        .bind(provider_reference)
        .fetch_optional(&self.pool)
        .await
    }

    /// Confirm a pending payment, compare-and-swap on status.
    ///
    /// Exactly one caller can win this update per intent; a second confirm
    /// for the same reference matches no rows and gets Ok(None).
    pub async fn confirm_pending(
        &self,
        provider_reference: &str,
        method_reference: Option<&str>,
    ) -> Result<Option<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(&format!(
            "UPDATE payments
             SET status = 'confirmed', method_reference = COALESCE($2, method_reference), \
             updated_at = NOW()
             WHERE provider_reference = $1 AND status = 'pending'
             RETURNING {}",
            PAYMENT_COLUMNS
        ))
        .bind(provider_reference)
        .bind(method_reference)
        .fetch_optional(&self.pool)
        .await
    }

    /// List a passenger's payments, newest first
    pub async fn find_by_user_email(&self, user_email: &str) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(&format!(
            "SELECT {} FROM payments
             WHERE LOWER(user_email) = LOWER($1)
             ORDER BY created_at DESC",
            PAYMENT_COLUMNS
        ))
        .bind(user_email)
        .fetch_all(&self.pool)
        .await
    }

    /// List payments received on a driver's rides, newest first
    pub async fn find_by_driver_email(
        &self,
        driver_email: &str,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            "SELECT p.id, p.booking_id, p.user_email, p.amount, p.provider_reference, \
             p.method_reference, p.status, p.created_at, p.updated_at
             FROM payments p
             JOIN bookings b ON b.id = p.booking_id
             JOIN rides r ON r.id = b.ride_id
             WHERE LOWER(r.driver_email) = LOWER($1)
             ORDER BY p.created_at DESC",
        )
        .bind(driver_email)
        .fetch_all(&self.pool)
        .await
    }
}

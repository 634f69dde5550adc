// Database access for bookings

use sqlx::PgPool;
use uuid::Uuid;

use crate::bookings::models::{Booking, BookingStatus, NewBooking, PaymentStatus};
use crate::rides::repository::{release_seats, reserve_seats};

const BOOKING_COLUMNS: &str = "id, ride_id, user_email, seats, pickup_location, dropoff_location, \
     distance_km, total_price, payment_method, payment_status, status, created_at, updated_at";

/// Repository for booking persistence
#[derive(Clone)]
pub struct BookingsRepository {
    pool: PgPool,
}

impl BookingsRepository {
    /// Create a new BookingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a booking while atomically reserving its seats.
    ///
    /// The seat decrement and the booking row commit or roll back together;
    /// returns Ok(None) when the ride no longer has enough seats.
    pub async fn create_reserved(
        &self,
        booking: NewBooking,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let reserved = reserve_seats(&mut tx, booking.ride_id, booking.seats).await?;
        if !reserved {
            // Transaction rolls back when tx is dropped
            return Ok(None);
        }

        let created = sqlx::query_as::<_, Booking>(&format!(
            "INSERT INTO bookings (ride_id, user_email, seats, pickup_location, dropoff_location, \
             distance_km, total_price, payment_method, payment_status, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(booking.ride_id)
        .bind(&booking.user_email)
        .bind(booking.seats)
        .bind(&booking.pickup_location)
        .bind(&booking.dropoff_location)
        .bind(booking.distance_km)
        .bind(booking.total_price)
        .bind(booking.payment_method)
        .bind(booking.payment_status)
        .bind(booking.status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(created))
    }

    /// Find a booking by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List a passenger's bookings, newest first
    pub async fn find_by_user_email(&self, user_email: &str) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings
             WHERE LOWER(user_email) = LOWER($1)
             ORDER BY created_at DESC",
            BOOKING_COLUMNS
        ))
        .bind(user_email)
        .fetch_all(&self.pool)
        .await
    }

    /// List every booking on a ride
    pub async fn find_by_ride_id(&self, ride_id: Uuid) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE ride_id = $1 ORDER BY created_at ASC",
            BOOKING_COLUMNS
        ))
        .bind(ride_id)
        .fetch_all(&self.pool)
        .await
    }

    /// List bookings on every ride a driver has posted
    pub async fn find_by_driver_email(
        &self,
        driver_email: &str,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT b.id, b.ride_id, b.user_email, b.seats, b.pickup_location, \
             b.dropoff_location, b.distance_km, b.total_price, b.payment_method, \
             b.payment_status, b.status, b.created_at, b.updated_at
             FROM bookings b
             JOIN rides r ON r.id = b.ride_id
             WHERE LOWER(r.driver_email) = LOWER($1)
             ORDER BY b.created_at DESC",
        )
        .bind(driver_email)
        .fetch_all(&self.pool)
        .await
    }

    /// List every booking, newest first
    pub async fn find_all(&self) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings ORDER BY created_at DESC",
            BOOKING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Update booking status, guarded on the status the caller read.
    ///
    /// Returns Ok(None) when the booking is gone or no longer in `expected`,
    /// so a stale caller cannot re-apply a transition.
    pub async fn update_status(
        &self,
        id: Uuid,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "UPDATE bookings SET status = $1, updated_at = NOW()
             WHERE id = $2 AND status = $3 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(status)
        .bind(id)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await
    }

    /// Update booking status while returning its seats to the ride.
    ///
    /// Status change and seat release commit or roll back together. The
    /// update is guarded on `expected` like [`Self::update_status`]; when it
    /// matches zero rows the seats are not released and Ok(None) is returned.
    pub async fn update_status_releasing(
        &self,
        id: Uuid,
        ride_id: Uuid,
        seats: i32,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Booking>(&format!(
            "UPDATE bookings SET status = $1, updated_at = NOW()
             WHERE id = $2 AND status = $3 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(status)
        .bind(id)
        .bind(expected)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(updated) = updated else {
            // Transaction rolls back when tx is dropped
            return Ok(None);
        };

        release_seats(&mut tx, ride_id, seats).await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Update booking status and payment state in one step
    pub async fn update_settlement(
        &self,
        id: Uuid,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> Result<Booking, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            "UPDATE bookings SET status = $1, payment_status = $2, updated_at = NOW()
             WHERE id = $3 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(status)
        .bind(payment_status)
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    /// Force every booking stuck mid-settlement to completed and paid.
    ///
    /// Blunt by intent: this is the admin escape hatch for bookings wedged
    /// by missed settlement callbacks. Returns the number of rows touched.
    pub async fn remediate_stuck(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bookings SET status = 'completed', payment_status = 'paid', updated_at = NOW()
             WHERE status IN ('payment_pending', 'driver_completed')
                OR payment_status IN ('unpaid', 'pending_collection')",
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

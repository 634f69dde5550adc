// Database access for rides and seat inventory

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::rides::models::{Ride, RideStatus};

const RIDE_COLUMNS: &str = "id, driver_email, driver_name, driver_phone, origin, destination, \
     departure_date, price, tickets, vehicle_type, status, created_at, updated_at";

/// Atomically reserve seats on a ride.
///
/// The decrement only succeeds when enough seats remain; two concurrent
/// reservations for the last seat cannot both pass. Returns false when the
/// inventory was insufficient.
pub async fn reserve_seats(
    conn: &mut PgConnection,
    ride_id: Uuid,
    seats: i32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE rides SET tickets = tickets - $1, updated_at = NOW()
         WHERE id = $2 AND tickets >= $1 AND status = 'open'",
    )
    .bind(seats)
    .bind(ride_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Return previously reserved seats to a ride's inventory.
///
/// The increment is unconditional; callers must only release seats they
/// actually hold, exactly once per booking.
pub async fn release_seats(
    conn: &mut PgConnection,
    ride_id: Uuid,
    seats: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE rides SET tickets = tickets + $1, updated_at = NOW() WHERE id = $2")
        .bind(seats)
        .bind(ride_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Repository for ride persistence
#[derive(Clone)]
pub struct RidesRepository {
    pool: PgPool,
}

impl RidesRepository {
    /// Create a new RidesRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new ride
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        driver_email: &str,
        driver_name: &str,
        driver_phone: &str,
        origin: &str,
        destination: &str,
        departure_date: DateTime<Utc>,
        price: Decimal,
        tickets: i32,
        vehicle_type: &str,
    ) -> Result<Ride, sqlx::Error> {
        sqlx::query_as::<_, Ride>(&format!(
            "INSERT INTO rides (driver_email, driver_name, driver_phone, origin, destination, \
             departure_date, price, tickets, vehicle_type)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {}",
            RIDE_COLUMNS
        ))
        .bind(driver_email)
        .bind(driver_name)
        .bind(driver_phone)
        .bind(origin)
        .bind(destination)
        .bind(departure_date)
        .bind(price)
        .bind(tickets)
        .bind(vehicle_type)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a ride by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Ride>, sqlx::Error> {
        sqlx::query_as::<_, Ride>(&format!(
            "SELECT {} FROM rides WHERE id = $1",
            RIDE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List open rides that still have seats available
    pub async fn list_open(&self) -> Result<Vec<Ride>, sqlx::Error> {
        sqlx::query_as::<_, Ride>(&format!(
            "SELECT {} FROM rides
             WHERE status = 'open' AND tickets > 0
             ORDER BY departure_date ASC",
            RIDE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Search open rides by origin and destination (case-insensitive substring)
    pub async fn search(&self, origin: &str, destination: &str) -> Result<Vec<Ride>, sqlx::Error> {
        sqlx::query_as::<_, Ride>(&format!(
            "SELECT {} FROM rides
             WHERE status = 'open' AND tickets > 0
               AND origin ILIKE $1 AND destination ILIKE $2
             ORDER BY departure_date ASC",
            RIDE_COLUMNS
        ))
        .bind(format!("%{}%", origin))
        .bind(format!("%{}%", destination))
        .fetch_all(&self.pool)
        .await
    }

    /// List every ride posted by a driver, newest first
    pub async fn list_by_driver(&self, driver_email: &str) -> Result<Vec<Ride>, sqlx::Error> {
        sqlx::query_as::<_, Ride>(&format!(
            "SELECT {} FROM rides
             WHERE LOWER(driver_email) = LOWER($1)
             ORDER BY created_at DESC",
            RIDE_COLUMNS
        ))
        .bind(driver_email)
        .fetch_all(&self.pool)
        .await
    }

    /// Update the mutable fields of a ride
    pub async fn update(
        &self,
        id: Uuid,
        departure_date: DateTime<Utc>,
        price: Decimal,
        tickets: i32,
        vehicle_type: &str,
    ) -> Result<Ride, sqlx::Error> {
        sqlx::query_as::<_, Ride>(&format!(
            "UPDATE rides
             SET departure_date = $1, price = $2, tickets = $3, vehicle_type = $4, updated_at = NOW()
             WHERE id = $5
             RETURNING {}",
            RIDE_COLUMNS
        ))
        .bind(departure_date)
        .bind(price)
        .bind(tickets)
        .bind(vehicle_type)
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    /// Update ride status
    pub async fn update_status(&self, id: Uuid, status: RideStatus) -> Result<Ride, sqlx::Error> {
        sqlx::query_as::<_, Ride>(&format!(
            "UPDATE rides SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            RIDE_COLUMNS
        ))
        .bind(status)
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    /// Delete a ride
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rides WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

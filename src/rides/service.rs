use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::policy::{authorize_owner, authorize_role, Action, Caller};
use crate::auth::repository::UserRepository;
use crate::auth::Role;
use crate::bookings::{CreateBookingRequest, FareCalculator, PaymentMethod, ReservationService};
use crate::distance::{meters_to_km, DistanceProvider};
use crate::rides::models::{CreateRideRequest, Ride, RideStatus, UpdateRideRequest};
use crate::rides::repository::RidesRepository;
use crate::rides::RideError;

/// Service for ride lifecycle business logic
#[derive(Clone)]
pub struct RideService {
    rides_repo: RidesRepository,
    users_repo: UserRepository,
    distance: Arc<dyn DistanceProvider>,
    reservations: ReservationService,
}

impl RideService {
    /// Create a new RideService
    pub fn new(
        rides_repo: RidesRepository,
        users_repo: UserRepository,
        distance: Arc<dyn DistanceProvider>,
        reservations: ReservationService,
    ) -> Self {
        Self {
            rides_repo,
            users_repo,
            distance,
            reservations,
        }
    }

    /// Post a new ride
    ///
    /// # Validation
    /// - The caller must be a driver (or admin)
    /// - The route must be serviced by the distance provider
    /// - A supplied per-seat price must not exceed the fare ceiling for the
    ///   route; when omitted it is derived from distance and capacity
    /// - `reserved_seats` books seats on the new ride for the driver
    ///   themselves; a failed self-booking does not fail the post
    pub async fn create_post(
        &self,
        caller: &Caller,
        request: CreateRideRequest,
    ) -> Result<Ride, RideError> {
        authorize_role(caller, Role::Driver, Action::ManageRide)
            .map_err(|_| RideError::Forbidden("Only drivers may post rides".to_string()))?;

        let driver = self
            .users_repo
            .find_by_email(&caller.email)
            .await
            .map_err(|e| RideError::DatabaseError(e.to_string()))?
            .ok_or_else(|| RideError::Forbidden("Unknown driver account".to_string()))?;

        let meters = self
            .distance
            .distance_meters(&request.origin, &request.destination)
            .await?;
        let distance_km = meters_to_km(meters);

        let price = self.resolve_price(request.price, distance_km, request.tickets)?;

        let ride = self
            .rides_repo
            .create(
                &driver.email,
                &driver.name,
                &driver.phone,
                &request.origin,
                &request.destination,
                request.departure_date,
                price,
                request.tickets,
                &request.vehicle_type,
            )
            .await?;

        info!(
            "Ride {} posted by {}: {} -> {} at {} per seat, {} seats",
            ride.id, ride.driver_email, ride.origin, ride.destination, ride.price, ride.tickets
        );

        if let Some(seats) = request.reserved_seats {
            let self_booking = CreateBookingRequest {
                ride_id: ride.id,
                seats,
                pickup_location: None,
                dropoff_location: None,
                total_price: None,
                payment_method: Some(PaymentMethod::Cash),
            };

            // The post stands even when the self-booking fails
            if let Err(e) = self
                .reservations
                .create_booking(caller, self_booking)
                .await
            {
                warn!(
                    "Self-booking of {} seat(s) on ride {} failed: {}",
                    seats, ride.id, e
                );
            }
        }

        // Re-read so the response reflects any self-booked seats
        Ok(self
            .rides_repo
            .find_by_id(ride.id)
            .await?
            .unwrap_or(ride))
    }

    /// Update a posted ride
    ///
    /// The price ceiling is re-validated when the price changes.
    pub async fn update_ride(
        &self,
        caller: &Caller,
        ride_id: Uuid,
        request: UpdateRideRequest,
    ) -> Result<Ride, RideError> {
        let ride = self
            .rides_repo
            .find_by_id(ride_id)
            .await?
            .ok_or(RideError::NotFound)?;

        authorize_owner(caller, &ride.driver_email, Action::ManageRide)
            .map_err(|_| RideError::Forbidden("Only the ride's driver may update it".to_string()))?;

        if ride.status != RideStatus::Open {
            return Err(RideError::InvalidState(format!(
                "Ride is {} and cannot be updated",
                ride.status
            )));
        }

        let price = match request.price {
            Some(price) => {
                let meters = self
                    .distance
                    .distance_meters(&ride.origin, &ride.destination)
                    .await?;
                let ceiling = FareCalculator::ceiling(meters_to_km(meters));
                if price > ceiling {
                    return Err(RideError::PriceAboveCeiling { ceiling });
                }
                price
            }
            None => ride.price,
        };

        let updated = self
            .rides_repo
            .update(
                ride.id,
                request.departure_date.unwrap_or(ride.departure_date),
                price,
                request.tickets.unwrap_or(ride.tickets),
                request.vehicle_type.as_deref().unwrap_or(&ride.vehicle_type),
            )
            .await?;

        info!("Ride {} updated by {}", updated.id, caller.email);
        Ok(updated)
    }

    /// Delete a posted ride
    pub async fn delete_ride(&self, caller: &Caller, ride_id: Uuid) -> Result<(), RideError> {
        let ride = self
            .rides_repo
            .find_by_id(ride_id)
            .await?
            .ok_or(RideError::NotFound)?;

        authorize_owner(caller, &ride.driver_email, Action::ManageRide)
            .map_err(|_| RideError::Forbidden("Only the ride's driver may delete it".to_string()))?;

        self.rides_repo.delete(ride.id).await?;
        info!("Ride {} deleted by {}", ride.id, caller.email);
        Ok(())
    }

    /// Complete a ride.
    ///
    /// Marks the ride completed, then moves every accepted booking into its
    /// settlement branch. Pending bookings are left as they are.
    pub async fn complete_ride(&self, caller: &Caller, ride_id: Uuid) -> Result<Ride, RideError> {
        let ride = self
            .rides_repo
            .find_by_id(ride_id)
            .await?
            .ok_or(RideError::NotFound)?;

        authorize_owner(caller, &ride.driver_email, Action::CompleteRide).map_err(|_| {
            RideError::Forbidden("Only the ride's driver may complete it".to_string())
        })?;

        if ride.status != RideStatus::Open {
            return Err(RideError::InvalidState(format!(
                "Ride is {} and cannot be completed",
                ride.status
            )));
        }

        let completed = self
            .rides_repo
            .update_status(ride.id, RideStatus::Completed)
            .await?;

        self.reservations
            .settle_ride_bookings(&completed)
            .await
            .map_err(|e| RideError::DatabaseError(e.to_string()))?;

        info!("Ride {} completed by {}", completed.id, caller.email);
        Ok(completed)
    }

    /// Cancel a ride
    pub async fn cancel_ride(&self, caller: &Caller, ride_id: Uuid) -> Result<Ride, RideError> {
        let ride = self
            .rides_repo
            .find_by_id(ride_id)
            .await?
            .ok_or(RideError::NotFound)?;

        authorize_owner(caller, &ride.driver_email, Action::ManageRide)
            .map_err(|_| RideError::Forbidden("Only the ride's driver may cancel it".to_string()))?;

        if ride.status != RideStatus::Open {
            return Err(RideError::InvalidState(format!(
                "Ride is {} and cannot be cancelled",
                ride.status
            )));
        }

        let cancelled = self
            .rides_repo
            .update_status(ride.id, RideStatus::Cancelled)
            .await?;

        info!("Ride {} cancelled by {}", cancelled.id, caller.email);
        Ok(cancelled)
    }

    /// List open rides with seats remaining
    pub async fn list_open(&self) -> Result<Vec<Ride>, RideError> {
        Ok(self.rides_repo.list_open().await?)
    }

    /// Search open rides by route
    pub async fn search(&self, origin: &str, destination: &str) -> Result<Vec<Ride>, RideError> {
        Ok(self.rides_repo.search(origin, destination).await?)
    }

    /// Look up a ride by ID
    pub async fn get_ride(&self, ride_id: Uuid) -> Result<Ride, RideError> {
        self.rides_repo
            .find_by_id(ride_id)
            .await?
            .ok_or(RideError::NotFound)
    }

    /// List the caller's posted rides
    pub async fn driver_posts(&self, caller: &Caller) -> Result<Vec<Ride>, RideError> {
        Ok(self.rides_repo.list_by_driver(&caller.email).await?)
    }

    fn resolve_price(
        &self,
        requested: Option<Decimal>,
        distance_km: Decimal,
        capacity: i32,
    ) -> Result<Decimal, RideError> {
        let ceiling = FareCalculator::ceiling(distance_km);

        match requested {
            Some(price) => {
                if price > ceiling {
                    return Err(RideError::PriceAboveCeiling { ceiling });
                }
                Ok(price)
            }
            None => Ok(FareCalculator::auto_post_price(distance_km, capacity)),
        }
    }
}

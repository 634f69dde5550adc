use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::auth::policy::{authorize_owner, authorize_role, Action, Caller};
use crate::auth::repository::UserRepository;
use crate::auth::Role;
use crate::bookings::{
    Booking, BookingError, BookingStatus, CreateBookingRequest, EstimateRequest, EstimateResponse,
    FareCalculator, NewBooking, PaymentMethod, PaymentStatus, StatusMachine,
};
use crate::bookings::repository::BookingsRepository;
use crate::distance::{meters_to_km, DistanceProvider};
use crate::notifications::NotificationService;
use crate::rides::models::{Ride, RideStatus};
use crate::rides::repository::RidesRepository;

/// Service for booking business logic: seat reservation, fare computation
/// and the settlement lifecycle
#[derive(Clone)]
pub struct ReservationService {
    bookings_repo: BookingsRepository,
    rides_repo: RidesRepository,
    users_repo: UserRepository,
    distance: Arc<dyn DistanceProvider>,
    notifications: NotificationService,
}

impl ReservationService {
    /// Create a new ReservationService
    pub fn new(
        bookings_repo: BookingsRepository,
        rides_repo: RidesRepository,
        users_repo: UserRepository,
        distance: Arc<dyn DistanceProvider>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            bookings_repo,
            rides_repo,
            users_repo,
            distance,
            notifications,
        }
    }

    /// Create a booking on a ride
    ///
    /// # Validation
    /// - The ride must exist and be open
    /// - The caller must be a passenger, the ride's own driver, or an admin
    /// - Requested seats must be available; the seat decrement and the
    ///   booking insert are atomic, so concurrent requests cannot oversell
    /// - A positive caller-supplied total_price overrides the computed fare
    /// - Cash bookings start with payment pending collection, card bookings
    ///   start unpaid; every booking starts in pending status
    pub async fn create_booking(
        &self,
        caller: &Caller,
        request: CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        let ride = self
            .rides_repo
            .find_by_id(request.ride_id)
            .await?
            .ok_or(BookingError::RideNotFound)?;

        self.authorize_booking(caller, &ride)?;

        if ride.status != RideStatus::Open {
            return Err(BookingError::InvalidState(format!(
                "Ride is {} and cannot be booked",
                ride.status
            )));
        }

        if ride.tickets < request.seats {
            return Err(BookingError::InsufficientCapacity {
                requested: request.seats,
                available: ride.tickets,
            });
        }

        let meters = self
            .distance
            .distance_meters(&ride.origin, &ride.destination)
            .await?;
        let distance_km = meters_to_km(meters);

        let quote = FareCalculator::quote(distance_km, request.seats);
        let total_price = match request.total_price {
            Some(price) if price > Decimal::ZERO => price,
            _ => quote.total_price,
        };

        let payment_method = request.payment_method.unwrap_or_default();
        let payment_status = match payment_method {
            PaymentMethod::Cash => PaymentStatus::PendingCollection,
            PaymentMethod::Card => PaymentStatus::Unpaid,
        };

        let new_booking = NewBooking {
            ride_id: ride.id,
            user_email: caller.email.clone(),
            seats: request.seats,
            pickup_location: request.pickup_location,
            dropoff_location: request.dropoff_location,
            distance_km,
            total_price,
            payment_method,
            payment_status,
            status: BookingStatus::Pending,
        };

        let booking = self
            .bookings_repo
            .create_reserved(new_booking)
            .await?
            .ok_or(BookingError::InsufficientCapacity {
                requested: request.seats,
                available: ride.tickets,
            })?;

        info!(
            "Booking {} created on ride {} for {} ({} seats, {} {})",
            booking.id, ride.id, booking.user_email, booking.seats, booking.total_price,
            booking.payment_method
        );

        self.notifications
            .notify(
                &ride.driver_email,
                &format!(
                    "New booking request from {} for {} seat(s) on your ride {} to {}.",
                    booking.user_email, booking.seats, ride.origin, ride.destination
                ),
                "booking",
            )
            .await;
        self.notifications
            .notify(
                &booking.user_email,
                &format!(
                    "Your booking request for {} seat(s) from {} to {} has been sent to the driver.",
                    booking.seats, ride.origin, ride.destination
                ),
                "booking",
            )
            .await;

        Ok(booking)
    }

    /// Update a booking's status
    ///
    /// The ride's driver may apply any legal transition. A passenger may
    /// only cancel their own pending booking. Seats are returned to the
    /// ride, atomically with the status change, when the booking moves to
    /// rejected or cancelled.
    pub async fn update_status(
        &self,
        caller: &Caller,
        booking_id: Uuid,
        new_status: BookingStatus,
    ) -> Result<Booking, BookingError> {
        let booking = self
            .bookings_repo
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        let ride = self
            .rides_repo
            .find_by_id(booking.ride_id)
            .await?
            .ok_or(BookingError::RideNotFound)?;

        if !caller.is_admin() && !caller.is(&ride.driver_email) {
            // Passengers may only cancel their own booking
            if !(caller.is(&booking.user_email) && new_status == BookingStatus::Cancelled) {
                authorize_owner(caller, &ride.driver_email, Action::UpdateBookingStatus)
                    .map_err(|_| {
                        BookingError::Forbidden(
                            "Only the ride's driver may update this booking".to_string(),
                        )
                    })?;
            }
        }

        StatusMachine::transition(booking.status, new_status)
            .map_err(BookingError::InvalidTransition)?;

        // Guarded on the status read above; a concurrent transition makes
        // the update match zero rows instead of releasing seats twice
        let updated = if StatusMachine::releases_seats(new_status) {
            self.bookings_repo
                .update_status_releasing(
                    booking.id,
                    booking.ride_id,
                    booking.seats,
                    booking.status,
                    new_status,
                )
                .await?
        } else {
            self.bookings_repo
                .update_status(booking.id, booking.status, new_status)
                .await?
        };
        let updated = updated.ok_or_else(|| {
            BookingError::InvalidTransition(format!(
                "Booking is no longer {} and cannot move to {}",
                booking.status, new_status
            ))
        })?;

        info!(
            "Booking {} transitioned {} -> {}",
            booking.id, booking.status, new_status
        );

        self.notify_status_change(&updated, &ride).await;
        Ok(updated)
    }

    /// Passenger confirmation that the ride dropped them off.
    ///
    /// Moves a driver_completed booking into its settlement branch: cash
    /// riders owe on collection, unpaid card riders settle online, paid
    /// card riders are done.
    pub async fn confirm_dropoff(
        &self,
        caller: &Caller,
        booking_id: Uuid,
    ) -> Result<Booking, BookingError> {
        let booking = self
            .bookings_repo
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        authorize_owner(caller, &booking.user_email, Action::ConfirmDropoff).map_err(|_| {
            BookingError::Forbidden("Only the booking's passenger may confirm dropoff".to_string())
        })?;

        if booking.status != BookingStatus::DriverCompleted {
            return Err(BookingError::InvalidState(format!(
                "Booking is {} and cannot confirm dropoff",
                booking.status
            )));
        }

        let ride = self
            .rides_repo
            .find_by_id(booking.ride_id)
            .await?
            .ok_or(BookingError::RideNotFound)?;

        let target = StatusMachine::dropoff_target(booking.payment_method, booking.payment_status);
        let updated = self
            .bookings_repo
            .update_status(booking.id, BookingStatus::DriverCompleted, target)
            .await?
            .ok_or_else(|| {
                BookingError::InvalidState(
                    "Booking is no longer driver_completed".to_string(),
                )
            })?;

        info!(
            "Booking {} dropoff confirmed, settlement branch {}",
            booking.id, target
        );

        self.notify_status_change(&updated, &ride).await;
        Ok(updated)
    }

    /// Driver confirmation that cash was collected.
    ///
    /// Completes a cash_payment_pending booking and marks it paid.
    pub async fn confirm_cash(
        &self,
        caller: &Caller,
        booking_id: Uuid,
    ) -> Result<Booking, BookingError> {
        let booking = self
            .bookings_repo
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        let ride = self
            .rides_repo
            .find_by_id(booking.ride_id)
            .await?
            .ok_or(BookingError::RideNotFound)?;

        authorize_owner(caller, &ride.driver_email, Action::ConfirmCash).map_err(|_| {
            BookingError::Forbidden("Only the ride's driver may confirm cash payment".to_string())
        })?;

        if booking.status != BookingStatus::CashPaymentPending {
            return Err(BookingError::InvalidState(format!(
                "Booking is {} and has no cash payment to confirm",
                booking.status
            )));
        }

        let updated = self
            .bookings_repo
            .update_settlement(booking.id, BookingStatus::Completed, PaymentStatus::Paid)
            .await?;

        info!("Booking {} cash payment confirmed", booking.id);

        self.notifications
            .notify(
                &booking.user_email,
                "Your cash payment has been confirmed. Thank you for riding with us.",
                "payment",
            )
            .await;

        Ok(updated)
    }

    /// Quote a fare for a route and seat count without creating a booking
    pub async fn estimate(
        &self,
        request: EstimateRequest,
    ) -> Result<EstimateResponse, BookingError> {
        let meters = self
            .distance
            .distance_meters(&request.origin, &request.destination)
            .await?;
        let quote = FareCalculator::quote(meters_to_km(meters), request.seats);

        Ok(EstimateResponse {
            distance_km: quote.distance_km,
            price_per_seat: quote.price_per_seat,
            total_price: quote.total_price,
        })
    }

    /// List the caller's own bookings
    pub async fn my_bookings(&self, caller: &Caller) -> Result<Vec<Booking>, BookingError> {
        Ok(self.bookings_repo.find_by_user_email(&caller.email).await?)
    }

    /// List bookings on the caller's posted rides
    pub async fn driver_bookings(&self, caller: &Caller) -> Result<Vec<Booking>, BookingError> {
        Ok(self.bookings_repo.find_by_driver_email(&caller.email).await?)
    }

    /// List every booking in the system (admin only)
    pub async fn all_bookings(&self, caller: &Caller) -> Result<Vec<Booking>, BookingError> {
        authorize_role(caller, Role::Admin, Action::ViewAllBookings).map_err(|_| {
            BookingError::Forbidden("Only admins may list all bookings".to_string())
        })?;

        Ok(self.bookings_repo.find_all().await?)
    }

    /// Force every booking stuck mid-settlement to completed and paid
    /// (admin only)
    pub async fn remediate_stuck(&self, caller: &Caller) -> Result<u64, BookingError> {
        authorize_role(caller, Role::Admin, Action::RemediateBookings).map_err(|_| {
            BookingError::Forbidden("Only admins may remediate bookings".to_string())
        })?;

        let touched = self.bookings_repo.remediate_stuck().await?;
        info!("Remediated {} stuck bookings", touched);
        Ok(touched)
    }

    /// Mark every accepted booking on a ride as driver_completed and move
    /// it into its settlement branch. Called by the ride lifecycle when the
    /// driver wraps up a ride; pending bookings are left untouched.
    pub async fn settle_ride_bookings(&self, ride: &Ride) -> Result<(), BookingError> {
        let bookings = self.bookings_repo.find_by_ride_id(ride.id).await?;

        for booking in bookings {
            if booking.status != BookingStatus::Accepted {
                continue;
            }

            let target =
                StatusMachine::dropoff_target(booking.payment_method, booking.payment_status);
            let Some(updated) = self
                .bookings_repo
                .update_status(booking.id, BookingStatus::Accepted, target)
                .await?
            else {
                // Changed concurrently since the list was read; leave it be
                continue;
            };

            self.notify_status_change(&updated, ride).await;
        }

        Ok(())
    }

    fn authorize_booking(&self, caller: &Caller, ride: &Ride) -> Result<(), BookingError> {
        if caller.is_admin() || caller.is(&ride.driver_email) {
            return Ok(());
        }

        authorize_role(caller, Role::Passenger, Action::CreateBooking).map_err(|_| {
            BookingError::Forbidden("Only passengers may book rides".to_string())
        })
    }

    async fn notify_status_change(&self, booking: &Booking, ride: &Ride) {
        // Every transition tells the passenger the new status
        self.notifications
            .notify(
                &booking.user_email,
                &format!(
                    "Your booking for the ride from {} to {} is now {}.",
                    ride.origin, ride.destination, booking.status
                ),
                "booking",
            )
            .await;

        match booking.status {
            BookingStatus::Accepted => {
                // Additional detailed confirmation with the driver's contact
                let contact = match self.users_repo.find_by_email(&ride.driver_email).await {
                    Ok(Some(driver)) => {
                        format!(" Contact your driver {} at {}.", driver.name, driver.phone)
                    }
                    _ => String::new(),
                };

                self.notifications
                    .notify(
                        &booking.user_email,
                        &format!(
                            "Your seat on the ride from {} to {} is confirmed.{}",
                            ride.origin, ride.destination, contact
                        ),
                        "booking",
                    )
                    .await;
            }
            BookingStatus::Cancelled => {
                self.notifications
                    .notify(
                        &ride.driver_email,
                        &format!(
                            "{} cancelled their booking of {} seat(s) on your ride from {} to {}.",
                            booking.user_email, booking.seats, ride.origin, ride.destination
                        ),
                        "booking",
                    )
                    .await;
            }
            BookingStatus::CashPaymentPending => {
                self.notifications
                    .notify(
                        &booking.user_email,
                        &format!(
                            "Your ride from {} to {} is complete. Please pay {} in cash to the driver.",
                            ride.origin, ride.destination, booking.total_price
                        ),
                        "payment",
                    )
                    .await;
            }
            BookingStatus::PaymentPending => {
                self.notifications
                    .notify(
                        &booking.user_email,
                        &format!(
                            "Your ride from {} to {} is complete. Please settle your fare of {} online.",
                            ride.origin, ride.destination, booking.total_price
                        ),
                        "payment",
                    )
                    .await;
            }
            _ => {}
        }
    }
}

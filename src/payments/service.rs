use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::auth::policy::Caller;
use crate::bookings::repository::BookingsRepository;
use crate::bookings::{Booking, BookingStatus, PaymentStatus};
use crate::notifications::NotificationService;
use crate::payments::error::PaymentError;
use crate::payments::gateway::PaymentGateway;
use crate::payments::models::{
    ConfirmPaymentRequest, CreateIntentRequest, CreateIntentResponse, NewPayment, Payment,
    PaymentRecordStatus, SimulatePaymentRequest,
};
use crate::payments::repository::PaymentsRepository;
use crate::rides::repository::RidesRepository;

/// Service for payment intents, confirmation and reconciliation
#[derive(Clone)]
pub struct PaymentService {
    payments_repo: PaymentsRepository,
    bookings_repo: BookingsRepository,
    rides_repo: RidesRepository,
    notifications: NotificationService,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    /// Create a new PaymentService
    pub fn new(
        payments_repo: PaymentsRepository,
        bookings_repo: BookingsRepository,
        rides_repo: RidesRepository,
        notifications: NotificationService,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            payments_repo,
            bookings_repo,
            rides_repo,
            notifications,
            gateway,
        }
    }

    /// Create a payment intent and log a pending payment record for it.
    ///
    /// The caller may be anonymous; the record is then attributed to the
    /// booking's passenger when a booking is named.
    pub async fn create_intent(
        &self,
        caller_email: Option<&str>,
        request: CreateIntentRequest,
    ) -> Result<CreateIntentResponse, PaymentError> {
        let user_email = match caller_email {
            Some(email) => email.to_string(),
            None => match request.booking_id {
                Some(booking_id) => {
                    self.bookings_repo
                        .find_by_id(booking_id)
                        .await?
                        .ok_or(PaymentError::BookingNotFound)?
                        .user_email
                }
                None => "anonymous".to_string(),
            },
        };

        let intent = self
            .gateway
            .create_intent(request.amount, &user_email)
            .await?;

        self.payments_repo
            .insert(NewPayment {
                booking_id: request.booking_id,
                user_email,
                amount: request.amount,
                provider_reference: intent.intent_id.clone(),
                method_reference: None,
                status: PaymentRecordStatus::Pending,
            })
            .await?;

        info!("Payment intent {} logged", intent.intent_id);

        Ok(CreateIntentResponse {
            payment_intent_id: intent.intent_id,
            client_secret: intent.client_secret,
        })
    }

    /// Confirm a payment intent.
    ///
    /// Confirmation is idempotent on the provider reference: the status
    /// flip from pending to confirmed is a compare-and-swap, so exactly one
    /// confirm settles the booking and sends notifications; any replay gets
    /// the already-confirmed record back unchanged.
    pub async fn confirm(&self, request: ConfirmPaymentRequest) -> Result<Payment, PaymentError> {
        let won = self
            .payments_repo
            .confirm_pending(
                &request.payment_intent_id,
                request.payment_method_id.as_deref(),
            )
            .await?;

        match won {
            Some(payment) => {
                info!("Payment {} confirmed", payment.provider_reference);
                self.settle_booking(&payment).await?;
                Ok(payment)
            }
            None => {
                // Lost the swap: either already confirmed (replay) or unknown
                self.payments_repo
                    .find_by_reference(&request.payment_intent_id)
                    .await?
                    .ok_or(PaymentError::NotFound)
            }
        }
    }

    /// Simulate a successful payment for a booking end to end: mints a
    /// fresh confirmed payment record, settles the booking and returns it
    /// completed and paid. Each call creates a new record; this path is
    /// deliberately not idempotent.
    pub async fn simulate(&self, request: SimulatePaymentRequest) -> Result<Booking, PaymentError> {
        let booking = self
            .bookings_repo
            .find_by_id(request.booking_id)
            .await?
            .ok_or(PaymentError::BookingNotFound)?;

        let payment = self
            .payments_repo
            .insert(NewPayment {
                booking_id: Some(booking.id),
                user_email: booking.user_email.clone(),
                amount: booking.total_price,
                provider_reference: format!("SIMULATED_INTENT_{}", Uuid::new_v4()),
                method_reference: Some("simulated".to_string()),
                status: PaymentRecordStatus::Confirmed,
            })
            .await?;

        info!(
            "Simulated payment {} for booking {}",
            payment.provider_reference, booking.id
        );

        self.settle_booking(&payment)
            .await?
            .ok_or(PaymentError::BookingNotFound)
    }

    /// List the caller's payments
    pub async fn my_history(&self, caller: &Caller) -> Result<Vec<Payment>, PaymentError> {
        Ok(self.payments_repo.find_by_user_email(&caller.email).await?)
    }

    /// List payments received on the caller's rides
    pub async fn driver_history(&self, caller: &Caller) -> Result<Vec<Payment>, PaymentError> {
        Ok(self
            .payments_repo
            .find_by_driver_email(&caller.email)
            .await?)
    }

    /// Apply a confirmed payment to its booking: complete it, mark it paid
    /// and notify both parties. Returns the settled booking; payments
    /// without a booking settle nothing and return None.
    async fn settle_booking(&self, payment: &Payment) -> Result<Option<Booking>, PaymentError> {
        let Some(booking_id) = payment.booking_id else {
            return Ok(None);
        };

        let booking = self
            .bookings_repo
            .find_by_id(booking_id)
            .await?
            .ok_or(PaymentError::BookingNotFound)?;

        let settled = self
            .bookings_repo
            .update_settlement(booking.id, BookingStatus::Completed, PaymentStatus::Paid)
            .await?;

        self.notify_settled(&booking, payment).await;
        Ok(Some(settled))
    }

    async fn notify_settled(&self, booking: &Booking, payment: &Payment) {
        if let Ok(Some(ride)) = self.rides_repo.find_by_id(booking.ride_id).await {
            self.notifications
                .notify(
                    &ride.driver_email,
                    &format!(
                        "Payment of {} received for the booking by {} on your ride from {} to {}.",
                        payment.amount, booking.user_email, ride.origin, ride.destination
                    ),
                    "payment",
                )
                .await;
        }

        self.notifications
            .notify(
                &booking.user_email,
                &format!(
                    "Your payment of {} has been confirmed. Your booking is complete.",
                    payment.amount
                ),
                "payment",
            )
            .await;
    }
}

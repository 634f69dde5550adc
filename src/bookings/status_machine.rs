use crate::bookings::models::{BookingStatus, PaymentMethod, PaymentStatus};

/// Service for managing booking status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → Accepted, Rejected, Cancelled
    /// - Accepted → DriverCompleted
    /// - DriverCompleted → CashPaymentPending, PaymentPending, Completed
    /// - CashPaymentPending → Completed
    /// - PaymentPending → Completed
    /// - Rejected, Cancelled, Completed → (terminal, no transitions)
    ///
    /// Unlike a generic workflow machine there are no same-status no-ops:
    /// seat inventory is released exactly once on Rejected or Cancelled, so
    /// re-entering a state must be rejected.
    pub fn is_valid_transition(from: BookingStatus, to: BookingStatus) -> bool {
        match (from, to) {
            // From Pending
            (BookingStatus::Pending, BookingStatus::Accepted) => true,
            (BookingStatus::Pending, BookingStatus::Rejected) => true,
            (BookingStatus::Pending, BookingStatus::Cancelled) => true,

            // From Accepted
            (BookingStatus::Accepted, BookingStatus::DriverCompleted) => true,

            // From DriverCompleted, branching on settlement path
            (BookingStatus::DriverCompleted, BookingStatus::CashPaymentPending) => true,
            (BookingStatus::DriverCompleted, BookingStatus::PaymentPending) => true,
            (BookingStatus::DriverCompleted, BookingStatus::Completed) => true,

            // Settlement states converge on Completed
            (BookingStatus::CashPaymentPending, BookingStatus::Completed) => true,
            (BookingStatus::PaymentPending, BookingStatus::Completed) => true,

            // Rejected, Cancelled and Completed are terminal
            _ => false,
        }
    }

    /// Attempt to transition from one status to another
    ///
    /// # Returns
    /// `Ok(to)` if the transition is valid, `Err(message)` otherwise
    pub fn transition(from: BookingStatus, to: BookingStatus) -> Result<BookingStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }

    /// Whether a status frees the booking's reserved seats when entered
    pub fn releases_seats(to: BookingStatus) -> bool {
        matches!(to, BookingStatus::Rejected | BookingStatus::Cancelled)
    }

    /// Whether a status is terminal
    pub fn is_terminal(status: BookingStatus) -> bool {
        matches!(
            status,
            BookingStatus::Rejected | BookingStatus::Cancelled | BookingStatus::Completed
        )
    }

    /// Settlement state a DriverCompleted booking moves to when its ride is
    /// wrapped up, decided by payment method and current payment state
    ///
    /// - Cash riders owe the driver on dropoff
    /// - Card riders who have not paid yet settle online
    /// - Card riders who already paid are done
    pub fn dropoff_target(method: PaymentMethod, payment_status: PaymentStatus) -> BookingStatus {
        match (method, payment_status) {
            (PaymentMethod::Cash, _) => BookingStatus::CashPaymentPending,
            (PaymentMethod::Card, PaymentStatus::Paid) => BookingStatus::Completed,
            (PaymentMethod::Card, _) => BookingStatus::PaymentPending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_to_accepted() {
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Pending,
            BookingStatus::Accepted
        ));
    }

    #[test]
    fn test_pending_to_rejected() {
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Pending,
            BookingStatus::Rejected
        ));
    }

    #[test]
    fn test_pending_to_cancelled() {
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Pending,
            BookingStatus::Cancelled
        ));
    }

    #[test]
    fn test_accepted_to_driver_completed() {
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Accepted,
            BookingStatus::DriverCompleted
        ));
    }

    #[test]
    fn test_accepted_cannot_be_cancelled() {
        assert!(!StatusMachine::is_valid_transition(
            BookingStatus::Accepted,
            BookingStatus::Cancelled
        ));
    }

    #[test]
    fn test_driver_completed_settlement_branches() {
        for to in [
            BookingStatus::CashPaymentPending,
            BookingStatus::PaymentPending,
            BookingStatus::Completed,
        ] {
            assert!(StatusMachine::is_valid_transition(
                BookingStatus::DriverCompleted,
                to
            ));
        }
    }

    #[test]
    fn test_settlement_states_complete() {
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::CashPaymentPending,
            BookingStatus::Completed
        ));
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::PaymentPending,
            BookingStatus::Completed
        ));
    }

    #[test]
    fn test_same_status_is_rejected() {
        assert!(!StatusMachine::is_valid_transition(
            BookingStatus::Pending,
            BookingStatus::Pending
        ));
        assert!(!StatusMachine::is_valid_transition(
            BookingStatus::Cancelled,
            BookingStatus::Cancelled
        ));
    }

    #[test]
    fn test_pending_cannot_skip_to_completed() {
        assert!(!StatusMachine::is_valid_transition(
            BookingStatus::Pending,
            BookingStatus::Completed
        ));
    }

    #[test]
    fn test_transition_valid() {
        let result = StatusMachine::transition(BookingStatus::Pending, BookingStatus::Accepted);
        assert_eq!(result.unwrap(), BookingStatus::Accepted);
    }

    #[test]
    fn test_transition_invalid() {
        let result = StatusMachine::transition(BookingStatus::Rejected, BookingStatus::Accepted);
        assert!(result.unwrap_err().contains("Invalid status transition"));
    }

    #[test]
    fn test_releases_seats_only_on_rejected_and_cancelled() {
        assert!(StatusMachine::releases_seats(BookingStatus::Rejected));
        assert!(StatusMachine::releases_seats(BookingStatus::Cancelled));
        assert!(!StatusMachine::releases_seats(BookingStatus::Completed));
        assert!(!StatusMachine::releases_seats(BookingStatus::Accepted));
    }

    #[test]
    fn test_dropoff_target_cash() {
        assert_eq!(
            StatusMachine::dropoff_target(PaymentMethod::Cash, PaymentStatus::Unpaid),
            BookingStatus::CashPaymentPending
        );
        assert_eq!(
            StatusMachine::dropoff_target(PaymentMethod::Cash, PaymentStatus::PendingCollection),
            BookingStatus::CashPaymentPending
        );
    }

    #[test]
    fn test_dropoff_target_card_unpaid() {
        assert_eq!(
            StatusMachine::dropoff_target(PaymentMethod::Card, PaymentStatus::Unpaid),
            BookingStatus::PaymentPending
        );
    }

    #[test]
    fn test_dropoff_target_card_paid() {
        assert_eq!(
            StatusMachine::dropoff_target(PaymentMethod::Card, PaymentStatus::Paid),
            BookingStatus::Completed
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn booking_status_strategy() -> impl Strategy<Value = BookingStatus> {
        prop_oneof![
            Just(BookingStatus::Pending),
            Just(BookingStatus::Accepted),
            Just(BookingStatus::Rejected),
            Just(BookingStatus::Cancelled),
            Just(BookingStatus::DriverCompleted),
            Just(BookingStatus::CashPaymentPending),
            Just(BookingStatus::PaymentPending),
            Just(BookingStatus::Completed),
        ]
    }

    /// Terminal states admit no outgoing transitions
    #[test]
    fn prop_terminal_states_are_terminal() {
        proptest!(|(
            from in booking_status_strategy(),
            to in booking_status_strategy()
        )| {
            if StatusMachine::is_terminal(from) {
                prop_assert!(!StatusMachine::is_valid_transition(from, to));
            }
        });
    }

    /// Seat-releasing states are reachable only from Pending, so seats are
    /// released at most once per booking
    #[test]
    fn prop_release_states_only_reachable_from_pending() {
        proptest!(|(from in booking_status_strategy())| {
            for to in [BookingStatus::Rejected, BookingStatus::Cancelled] {
                if StatusMachine::is_valid_transition(from, to) {
                    prop_assert_eq!(from, BookingStatus::Pending);
                }
            }
        });
    }

    /// transition() and is_valid_transition() agree
    #[test]
    fn prop_transition_consistency() {
        proptest!(|(
            from in booking_status_strategy(),
            to in booking_status_strategy()
        )| {
            let is_valid = StatusMachine::is_valid_transition(from, to);
            let result = StatusMachine::transition(from, to);

            if is_valid {
                prop_assert_eq!(result.unwrap(), to);
            } else {
                prop_assert!(result.is_err());
            }
        });
    }

    /// Every dropoff target is a legal transition out of DriverCompleted
    #[test]
    fn prop_dropoff_targets_are_legal() {
        let cases = [
            (PaymentMethod::Cash, PaymentStatus::Unpaid),
            (PaymentMethod::Cash, PaymentStatus::PendingCollection),
            (PaymentMethod::Cash, PaymentStatus::Paid),
            (PaymentMethod::Card, PaymentStatus::Unpaid),
            (PaymentMethod::Card, PaymentStatus::PendingCollection),
            (PaymentMethod::Card, PaymentStatus::Paid),
        ];

        for (method, payment_status) in cases {
            let target = StatusMachine::dropoff_target(method, payment_status);
            assert!(
                StatusMachine::is_valid_transition(BookingStatus::DriverCompleted, target),
                "Dropoff target {} must be reachable from driver_completed",
                target
            );
        }
    }
}

// Centralized authorization policy
//
// All "is this caller allowed to act on this resource" decisions go through
// here, parameterized by (caller, resource owner, action), instead of being
// duplicated per endpoint. Admins pass every ownership check; everyone else
// must be the named owner. Denials leak nothing beyond what the operation
// already implies.

use tracing::warn;

use crate::auth::middleware::AuthenticatedUser;
use crate::auth::models::Role;

/// The acting identity, decoupled from the HTTP extractor so services can
/// be exercised without axum.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

impl From<AuthenticatedUser> for Caller {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            role: user.role,
        }
    }
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Case-insensitive email identity check
    pub fn is(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

/// The operation being authorized; used for audit logging on denial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateBooking,
    UpdateBookingStatus,
    ConfirmDropoff,
    ConfirmCash,
    ViewAllBookings,
    RemediateBookings,
    ManageRide,
    CompleteRide,
    ManageUsers,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::CreateBooking => "create_booking",
            Action::UpdateBookingStatus => "update_booking_status",
            Action::ConfirmDropoff => "confirm_dropoff",
            Action::ConfirmCash => "confirm_cash",
            Action::ViewAllBookings => "view_all_bookings",
            Action::RemediateBookings => "remediate_bookings",
            Action::ManageRide => "manage_ride",
            Action::CompleteRide => "complete_ride",
            Action::ManageUsers => "manage_users",
        };
        write!(f, "{}", name)
    }
}

/// Policy denial; call sites map this to their module's Forbidden variant
#[derive(Debug)]
pub struct Denied;

/// Require the caller to be the resource owner (by email) or an admin
pub fn authorize_owner(caller: &Caller, owner_email: &str, action: Action) -> Result<(), Denied> {
    if caller.is_admin() || caller.is(owner_email) {
        return Ok(());
    }

    warn!(
        "Authorization denied: caller={} action={} owner={}",
        caller.email, action, owner_email
    );
    Err(Denied)
}

/// Require the caller to hold a specific role (admins always pass)
pub fn authorize_role(caller: &Caller, required: Role, action: Action) -> Result<(), Denied> {
    if caller.is_admin() || caller.role == required {
        return Ok(());
    }

    warn!(
        "Authorization denied: caller={} action={} required_role={}",
        caller.email, action, required
    );
    Err(Denied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(email: &str, role: Role) -> Caller {
        Caller {
            user_id: 1,
            email: email.to_string(),
            role,
        }
    }

    #[test]
    fn test_owner_passes() {
        let c = caller("driver@example.com", Role::Driver);
        assert!(authorize_owner(&c, "driver@example.com", Action::ManageRide).is_ok());
    }

    #[test]
    fn test_owner_check_is_case_insensitive() {
        let c = caller("Driver@Example.COM", Role::Driver);
        assert!(authorize_owner(&c, "driver@example.com", Action::ManageRide).is_ok());
    }

    #[test]
    fn test_non_owner_is_denied() {
        let c = caller("stranger@example.com", Role::Driver);
        assert!(authorize_owner(&c, "driver@example.com", Action::ManageRide).is_err());
    }

    #[test]
    fn test_admin_passes_every_ownership_check() {
        let c = caller("admin@example.com", Role::Admin);
        assert!(authorize_owner(&c, "driver@example.com", Action::CompleteRide).is_ok());
        assert!(authorize_role(&c, Role::Driver, Action::ManageRide).is_ok());
    }

    #[test]
    fn test_role_check() {
        let c = caller("p@example.com", Role::Passenger);
        assert!(authorize_role(&c, Role::Passenger, Action::CreateBooking).is_ok());
        assert!(authorize_role(&c, Role::Driver, Action::ManageRide).is_err());
    }

    #[test]
    fn test_pending_admin_has_no_admin_powers() {
        let c = caller("pending@example.com", Role::PendingAdmin);
        assert!(authorize_owner(&c, "other@example.com", Action::ViewAllBookings).is_err());
        assert!(authorize_role(&c, Role::Admin, Action::RemediateBookings).is_err());
    }
}

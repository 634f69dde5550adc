use rust_decimal::{Decimal, RoundingStrategy};

/// Base fare applied to every passenger quote, before the distance component
const BASE_FARE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
/// Per-kilometer rate for passenger quotes
const PASSENGER_RATE_PER_KM: Decimal = Decimal::from_parts(2, 0, 0, false, 0);
/// Per-kilometer rate used when deriving a posted ride's per-seat price
const DRIVER_RATE_PER_KM: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// A computed passenger fare
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareQuote {
    pub distance_km: Decimal,
    pub price_per_seat: Decimal,
    pub total_price: Decimal,
}

/// Service for fare computation
///
/// All published amounts are rounded to two decimal places with half-up
/// midpoint rounding. The total is computed from the unrounded per-seat
/// price and rounded once, so it is not necessarily seats times the
/// rounded per-seat price.
pub struct FareCalculator;

impl FareCalculator {
    /// Quote a passenger fare for a route distance and seat count
    pub fn quote(distance_km: Decimal, seats: i32) -> FareQuote {
        let per_seat = BASE_FARE + PASSENGER_RATE_PER_KM * distance_km;
        let total = per_seat * Decimal::from(seats);

        FareQuote {
            distance_km,
            price_per_seat: Self::round2(per_seat),
            total_price: Self::round2(total),
        }
    }

    /// Derive the per-seat price for a posted ride from the route distance
    /// and the vehicle capacity
    pub fn auto_post_price(distance_km: Decimal, capacity: i32) -> Decimal {
        let capacity = capacity.max(1);
        let gross = BASE_FARE + DRIVER_RATE_PER_KM * distance_km;
        Self::round2(gross / Decimal::from(capacity))
    }

    /// The maximum per-seat price a driver may post for a route: the
    /// single-seat passenger quote
    pub fn ceiling(distance_km: Decimal) -> Decimal {
        Self::quote(distance_km, 1).price_per_seat
    }

    fn round2(amount: Decimal) -> Decimal {
        // round_dp never widens the scale, so rescale afterwards to keep
        // whole amounts rendering as 70.00 rather than 70
        let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_basic() {
        let quote = FareCalculator::quote(dec!(10), 2);
        assert_eq!(quote.price_per_seat, dec!(70.00));
        assert_eq!(quote.total_price, dec!(140.00));
    }

    #[test]
    fn test_quote_zero_distance_is_base_fare() {
        let quote = FareCalculator::quote(dec!(0), 1);
        assert_eq!(quote.price_per_seat, dec!(50.00));
        assert_eq!(quote.total_price, dec!(50.00));
    }

    #[test]
    fn test_quote_rounds_half_up() {
        // per seat: 50 + 2 * 1.2525 = 52.505 -> 52.51
        let quote = FareCalculator::quote(dec!(1.2525), 1);
        assert_eq!(quote.price_per_seat, dec!(52.51));
    }

    #[test]
    fn test_total_rounds_from_unrounded_per_seat() {
        // per seat unrounded: 50 + 2 * 0.0025 = 50.005 -> rounds to 50.01
        // total for 3 seats: 150.015 -> 150.02, not 3 * 50.01 = 150.03
        let quote = FareCalculator::quote(dec!(0.0025), 3);
        assert_eq!(quote.price_per_seat, dec!(50.01));
        assert_eq!(quote.total_price, dec!(150.02));
    }

    #[test]
    fn test_auto_post_price() {
        // gross: 50 + 10 * 10 = 150, capacity 4 -> 37.50
        assert_eq!(FareCalculator::auto_post_price(dec!(10), 4), dec!(37.50));
    }

    #[test]
    fn test_auto_post_price_clamps_capacity() {
        assert_eq!(
            FareCalculator::auto_post_price(dec!(10), 0),
            FareCalculator::auto_post_price(dec!(10), 1)
        );
    }

    #[test]
    fn test_whole_amounts_render_with_two_decimals() {
        // A 10 km single-seat quote is exactly 70; it must still print as
        // a currency amount with cents
        let quote = FareCalculator::quote(dec!(10), 1);
        assert_eq!(quote.price_per_seat.to_string(), "70.00");
        assert_eq!(quote.total_price.to_string(), "70.00");
        assert_eq!(FareCalculator::ceiling(dec!(10)).to_string(), "70.00");
        assert_eq!(FareCalculator::auto_post_price(dec!(10), 2).to_string(), "75.00");
    }

    #[test]
    fn test_ceiling_is_single_seat_quote() {
        let d = dec!(25.5);
        assert_eq!(
            FareCalculator::ceiling(d),
            FareCalculator::quote(d, 1).price_per_seat
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    /// Fare totals scale with seats: a quote for more seats never costs less
    #[test]
    fn prop_total_monotonic_in_seats() {
        proptest!(|(
            distance_m in 0i64..=500_000,
            seats in 1i32..=8
        )| {
            let distance_km = Decimal::from(distance_m) / Decimal::from(1000);
            let smaller = FareCalculator::quote(distance_km, seats);
            let larger = FareCalculator::quote(distance_km, seats + 1);
            prop_assert!(larger.total_price >= smaller.total_price);
        });
    }

    /// Per-seat price grows with distance
    #[test]
    fn prop_per_seat_monotonic_in_distance() {
        proptest!(|(
            near_m in 0i64..=250_000,
            extra_m in 1i64..=250_000
        )| {
            let near = Decimal::from(near_m) / Decimal::from(1000);
            let far = Decimal::from(near_m + extra_m) / Decimal::from(1000);
            prop_assert!(
                FareCalculator::quote(far, 1).price_per_seat
                    >= FareCalculator::quote(near, 1).price_per_seat
            );
        });
    }

    /// Quotes never fall below the base fare
    #[test]
    fn prop_quote_at_least_base_fare() {
        proptest!(|(
            distance_m in 0i64..=500_000,
            seats in 1i32..=8
        )| {
            let distance_km = Decimal::from(distance_m) / Decimal::from(1000);
            let quote = FareCalculator::quote(distance_km, seats);
            prop_assert!(quote.price_per_seat >= dec!(50.00));
            prop_assert!(quote.total_price >= dec!(50.00));
        });
    }

    /// Published amounts carry exactly two decimal places
    #[test]
    fn prop_amounts_rounded_to_cents() {
        proptest!(|(
            distance_m in 0i64..=500_000,
            seats in 1i32..=8
        )| {
            let distance_km = Decimal::from(distance_m) / Decimal::from(1000);
            let quote = FareCalculator::quote(distance_km, seats);
            prop_assert_eq!(quote.price_per_seat.scale(), 2);
            prop_assert_eq!(quote.total_price.scale(), 2);
        });
    }
}

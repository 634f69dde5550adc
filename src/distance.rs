// Distance resolution port
//
// Route distance lookup is an external concern (the production deployment
// fronts a mapping provider); the core only depends on this trait. Lookup
// failures surface as ServiceUnavailable and are never retried here.

use axum::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;

/// Errors from distance resolution
#[derive(Debug, thiserror::Error)]
pub enum DistanceError {
    #[error("Distance service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Resolves an (origin, destination) pair to a distance in meters
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    async fn distance_meters(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<i64, DistanceError>;
}

/// Convert a meter distance to kilometers with 3 decimal places
pub fn meters_to_km(meters: i64) -> Decimal {
    Decimal::from(meters) / Decimal::from(1000)
}

/// Distance provider backed by the route_distances table
///
/// Routes are symmetric: the reversed pair is consulted when the direct
/// pair is missing. An unknown route is a ServiceUnavailable failure, not
/// a silent zero.
#[derive(Clone)]
pub struct PgDistanceProvider {
    pool: PgPool,
}

impl PgDistanceProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DistanceProvider for PgDistanceProvider {
    async fn distance_meters(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<i64, DistanceError> {
        let meters: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT meters FROM route_distances
            WHERE (LOWER(origin) = LOWER($1) AND LOWER(destination) = LOWER($2))
               OR (LOWER(origin) = LOWER($2) AND LOWER(destination) = LOWER($1))
            LIMIT 1
            "#,
        )
        .bind(origin)
        .bind(destination)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DistanceError::ServiceUnavailable(e.to_string()))?;

        meters.ok_or_else(|| {
            DistanceError::ServiceUnavailable(format!(
                "No distance known for route {} -> {}",
                origin, destination
            ))
        })
    }
}

/// In-memory distance provider for tests
#[derive(Clone, Default)]
pub struct StaticDistanceProvider {
    routes: HashMap<(String, String), i64>,
}

impl StaticDistanceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, origin: &str, destination: &str, meters: i64) -> Self {
        self.routes
            .insert((origin.to_lowercase(), destination.to_lowercase()), meters);
        self
    }
}

#[async_trait]
impl DistanceProvider for StaticDistanceProvider {
    async fn distance_meters(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<i64, DistanceError> {
        let key = (origin.to_lowercase(), destination.to_lowercase());
        let reversed = (key.1.clone(), key.0.clone());

        self.routes
            .get(&key)
            .or_else(|| self.routes.get(&reversed))
            .copied()
            .ok_or_else(|| {
                DistanceError::ServiceUnavailable(format!(
                    "No distance known for route {} -> {}",
                    origin, destination
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_static_provider_resolves_known_route() {
        let provider = StaticDistanceProvider::new().with_route("Chennai", "Bangalore", 346_000);

        let meters = provider
            .distance_meters("Chennai", "Bangalore")
            .await
            .unwrap();
        assert_eq!(meters, 346_000);
    }

    #[tokio::test]
    async fn test_static_provider_is_symmetric() {
        let provider = StaticDistanceProvider::new().with_route("Chennai", "Bangalore", 346_000);

        let meters = provider
            .distance_meters("bangalore", "CHENNAI")
            .await
            .unwrap();
        assert_eq!(meters, 346_000);
    }

    #[tokio::test]
    async fn test_static_provider_unknown_route_fails() {
        let provider = StaticDistanceProvider::new();

        let result = provider.distance_meters("Nowhere", "Elsewhere").await;
        assert!(matches!(result, Err(DistanceError::ServiceUnavailable(_))));
    }

    #[test]
    fn test_meters_to_km() {
        assert_eq!(meters_to_km(10_000), dec!(10));
        assert_eq!(meters_to_km(1_500), dec!(1.5));
        assert_eq!(meters_to_km(0), dec!(0));
    }
}

//! Planner configuration.
//!
//! Policies the request itself does not carry: candidate granularity,
//! location and travel rules, item ordering and progress throttling.
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! granularity_minutes = 30
//! max_options = 50
//! travel_speed_kmh = 40.0
//! ordering = ["priority", "most_constrained"]
//!
//! [location_policy]
//! policy = "within_radius"
//! max_km = 25.0
//! ```

use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::dispatching::OrderingRule;
use crate::error::ConfigError;
use crate::models::Location;

/// Distance below which two locations count as the same place (km).
const SAME_LOCATION_KM: f64 = 0.01;

/// Planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Step between candidate start times inside a free window (minutes).
    pub granularity_minutes: u32,
    /// Upper bound on options returned in Options mode.
    pub max_options: Option<usize>,
    /// Which item locations a resource may serve.
    pub location_policy: LocationPolicy,
    /// Travel speed used to reserve travel time between items.
    /// `None` disables travel buffers.
    pub travel_speed_kmh: Option<f64>,
    /// Item ordering rules for Regular mode, applied in sequence.
    /// Empty keeps input order.
    pub ordering: Vec<OrderingRule>,
    /// Minimum interval between progress notifications (ms).
    pub progress_interval_ms: u64,
    /// Capacity of the progress notification channel.
    pub progress_buffer: usize,
}

/// Location compatibility policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum LocationPolicy {
    /// Any location is reachable.
    #[default]
    Unrestricted,
    /// The item must be where the resource currently is.
    SameLocation,
    /// The item must lie within `max_km` of the resource's position.
    WithinRadius {
        /// Maximum distance (km).
        max_km: f64,
    },
}

impl LocationPolicy {
    /// Whether a resource at `from` may take an item at `to`.
    pub fn allows(&self, from: &Location, to: &Location) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::SameLocation => from.name == to.name || from.distance_km(to) < SAME_LOCATION_KM,
            Self::WithinRadius { max_km } => from.distance_km(to) <= *max_km,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: 15,
            max_options: None,
            location_policy: LocationPolicy::Unrestricted,
            travel_speed_kmh: None,
            ordering: Vec::new(),
            progress_interval_ms: 250,
            progress_buffer: 16,
        }
    }
}

impl PlannerConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.granularity_minutes == 0 {
            return Err(ConfigError::Invalid(
                "granularity_minutes must be positive".into(),
            ));
        }
        if self.max_options == Some(0) {
            return Err(ConfigError::Invalid("max_options must be positive".into()));
        }
        if let Some(speed) = self.travel_speed_kmh {
            if !(speed.is_finite() && speed > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "travel_speed_kmh must be positive, got {speed}"
                )));
            }
        }
        if let LocationPolicy::WithinRadius { max_km } = self.location_policy {
            if !(max_km.is_finite() && max_km >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "location radius must be non-negative, got {max_km}"
                )));
            }
        }
        if self.progress_buffer == 0 {
            return Err(ConfigError::Invalid("progress_buffer must be positive".into()));
        }
        Ok(())
    }

    /// Sets the candidate granularity.
    pub fn with_granularity_minutes(mut self, minutes: u32) -> Self {
        self.granularity_minutes = minutes;
        self
    }

    /// Caps the number of options.
    pub fn with_max_options(mut self, max: usize) -> Self {
        self.max_options = Some(max);
        self
    }

    /// Sets the location policy.
    pub fn with_location_policy(mut self, policy: LocationPolicy) -> Self {
        self.location_policy = policy;
        self
    }

    /// Enables travel buffers at the given speed.
    pub fn with_travel_speed(mut self, kmh: f64) -> Self {
        self.travel_speed_kmh = Some(kmh);
        self
    }

    /// Sets the item ordering rules.
    pub fn with_ordering(mut self, ordering: Vec<OrderingRule>) -> Self {
        self.ordering = ordering;
        self
    }

    /// Sets the progress notification interval.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Candidate step as a `TimeDelta`.
    pub fn granularity(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.granularity_minutes.max(1)))
    }

    /// Progress interval as a `Duration`.
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    /// Travel time between two locations, rounded up to whole minutes.
    ///
    /// Zero when travel buffers are disabled.
    pub fn travel_time(&self, from: &Location, to: &Location) -> TimeDelta {
        match self.travel_speed_kmh {
            Some(speed) if speed > 0.0 => {
                let minutes = (from.distance_km(to) / speed * 60.0).ceil();
                TimeDelta::minutes(minutes as i64)
            }
            _ => TimeDelta::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn haarlem() -> Location {
        Location::new("Haarlem", 52.377639, 4.642735)
    }

    fn amsterdam() -> Location {
        Location::new("Amsterdam", 52.372776, 4.892222)
    }

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.granularity(), TimeDelta::minutes(15));
        assert_eq!(config.location_policy, LocationPolicy::Unrestricted);
        assert!(config.ordering.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = PlannerConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let config = PlannerConfig::from_toml_str(
            r#"
            granularity_minutes = 30
            max_options = 50
            travel_speed_kmh = 40.0
            ordering = ["priority", "most_constrained"]
            progress_interval_ms = 100

            [location_policy]
            policy = "within_radius"
            max_km = 25.0
            "#,
        )
        .unwrap();

        assert_eq!(config.granularity_minutes, 30);
        assert_eq!(config.max_options, Some(50));
        assert_eq!(config.travel_speed_kmh, Some(40.0));
        assert_eq!(
            config.ordering,
            vec![OrderingRule::Priority, OrderingRule::MostConstrained]
        );
        assert_eq!(config.location_policy, LocationPolicy::WithinRadius { max_km: 25.0 });
        assert_eq!(config.progress_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            PlannerConfig::from_toml_str("granularity_minutes = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PlannerConfig::from_toml_str("travel_speed_kmh = -5.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PlannerConfig::from_toml_str("granularity_minutes = \"often\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_location_policies() {
        assert!(LocationPolicy::Unrestricted.allows(&haarlem(), &amsterdam()));
        assert!(LocationPolicy::SameLocation.allows(&haarlem(), &haarlem()));
        assert!(!LocationPolicy::SameLocation.allows(&haarlem(), &amsterdam()));
        assert!(LocationPolicy::WithinRadius { max_km: 20.0 }.allows(&haarlem(), &amsterdam()));
        assert!(!LocationPolicy::WithinRadius { max_km: 10.0 }.allows(&haarlem(), &amsterdam()));
    }

    #[test]
    fn test_travel_time() {
        let config = PlannerConfig::default();
        assert_eq!(config.travel_time(&haarlem(), &amsterdam()), TimeDelta::zero());

        // ~17 km at 60 km/h → 17 minutes, rounded up
        let config = config.with_travel_speed(60.0);
        assert_eq!(config.travel_time(&haarlem(), &amsterdam()), TimeDelta::minutes(17));
        assert_eq!(config.travel_time(&haarlem(), &haarlem()), TimeDelta::zero());
    }
}

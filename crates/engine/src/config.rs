use std::str::FromStr;
use std::time::Duration;

/// Engine configuration loaded from environment variables.
///
/// All fields have defaults matching the reference feed behaviour.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Synthetic feed tick period (default: 30 s).
    pub feed_interval: Duration,
    /// Per-tick probability that the feed produces an event (default: `0.10`).
    pub feed_probability: f64,
    /// Start the synthetic feed at boot (default: `true`).
    pub feed_autostart: bool,
    /// Prefix of generated tracking ids (default: `HR`).
    pub tracking_id_prefix: String,
    /// Broadcast buffer of the notification bus (default: `1024`).
    pub notification_capacity: usize,
    /// Insert the demo reports at start-up (default: `false`).
    pub seed_demo_events: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            feed_interval: Duration::from_millis(30_000),
            feed_probability: 0.10,
            feed_autostart: true,
            tracking_id_prefix: "HR".into(),
            notification_capacity: 1024,
            seed_demo_events: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default  |
    /// |-------------------------|----------|
    /// | `FEED_INTERVAL_MS`      | `30000`  |
    /// | `FEED_PROBABILITY`      | `0.10`   |
    /// | `FEED_AUTOSTART`        | `true`   |
    /// | `TRACKING_ID_PREFIX`    | `HR`     |
    /// | `NOTIFICATION_CAPACITY` | `1024`   |
    /// | `SEED_DEMO_EVENTS`      | `false`  |
    ///
    /// Malformed values are logged and replaced by the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let interval_ms: u64 = env_or("FEED_INTERVAL_MS", 30_000);
        let feed_interval = if interval_ms == 0 {
            tracing::warn!("FEED_INTERVAL_MS must be positive, using default");
            defaults.feed_interval
        } else {
            Duration::from_millis(interval_ms)
        };

        let feed_probability = env_or("FEED_PROBABILITY", defaults.feed_probability);
        let feed_probability = if feed_probability.is_finite() {
            feed_probability.clamp(0.0, 1.0)
        } else {
            defaults.feed_probability
        };

        let tracking_id_prefix = std::env::var("TRACKING_ID_PREFIX")
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or(defaults.tracking_id_prefix);

        Self {
            feed_interval,
            feed_probability,
            feed_autostart: env_or("FEED_AUTOSTART", defaults.feed_autostart),
            tracking_id_prefix,
            notification_capacity: env_or("NOTIFICATION_CAPACITY", defaults.notification_capacity)
                .max(1),
            seed_demo_events: env_or("SEED_DEMO_EVENTS", defaults.seed_demo_events),
        }
    }
}

/// Parse `key` from the environment, falling back to `default` when the
/// variable is unset or malformed.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Malformed environment value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_feed() {
        let config = EngineConfig::default();
        assert_eq!(config.feed_interval, Duration::from_secs(30));
        assert!((config.feed_probability - 0.10).abs() < f64::EPSILON);
        assert!(config.feed_autostart);
        assert_eq!(config.tracking_id_prefix, "HR");
    }

    #[test]
    fn env_or_falls_back_on_garbage() {
        std::env::set_var("HAZARDWATCH_TEST_ENV_OR", "not-a-number");
        assert_eq!(env_or("HAZARDWATCH_TEST_ENV_OR", 7u64), 7);
        std::env::set_var("HAZARDWATCH_TEST_ENV_OR", " 42 ");
        assert_eq!(env_or("HAZARDWATCH_TEST_ENV_OR", 7u64), 42);
        std::env::remove_var("HAZARDWATCH_TEST_ENV_OR");
        assert_eq!(env_or("HAZARDWATCH_TEST_ENV_OR", 7u64), 7);
    }
}

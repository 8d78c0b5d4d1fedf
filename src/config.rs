//! Runtime configuration

use std::time::Duration;

const DEFAULT_CHANNEL_CAPACITY: usize = 64;
const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Settings for the host runtime, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Bound of the inbound message channel
    pub channel_capacity: usize,
    /// Bound of the runtime event broadcast
    pub event_capacity: usize,
    /// Artificial latency the demo executor adds to every effect
    pub effect_delay: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            effect_delay: Duration::ZERO,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable or zero values fall back to
    /// the defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            channel_capacity: parse("EFFECT_ROUTER_CHANNEL_CAPACITY")
                .and_then(|n| usize::try_from(n).ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.channel_capacity),
            event_capacity: parse("EFFECT_ROUTER_EVENT_CAPACITY")
                .and_then(|n| usize::try_from(n).ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.event_capacity),
            effect_delay: parse("EFFECT_ROUTER_EFFECT_DELAY_MS")
                .map_or(defaults.effect_delay, Duration::from_millis),
        }
    }
}

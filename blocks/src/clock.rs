//! Network time: seconds since the network epoch.

use dpos_config::{ConfigError, ConfigManager};

pub trait Clock {
    fn now(&self) -> u32;
}

/// Wall clock offset by the network epoch.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    epoch_unix: i64,
}

impl SystemClock {
    pub fn new(epoch_unix: i64) -> Self {
        Self { epoch_unix }
    }

    pub fn for_network(config: &ConfigManager) -> Result<Self, ConfigError> {
        Ok(Self::new(config.network().epoch_unix()?))
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u32 {
        let elapsed = chrono::Utc::now().timestamp() - self.epoch_unix;
        elapsed.clamp(0, i64::from(u32::MAX)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_counts_from_epoch() {
        let clock = SystemClock::new(chrono::Utc::now().timestamp() - 100);
        let now = clock.now();
        assert!((100..110).contains(&now));

        let future = SystemClock::new(chrono::Utc::now().timestamp() + 1_000);
        assert_eq!(future.now(), 0);
    }
}

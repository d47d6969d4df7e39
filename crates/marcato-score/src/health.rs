use marcato_ruleset::HealthConfig;

/// Live health value in [0, 1] plus the failure flags derived from it.
#[derive(Debug, Clone)]
pub struct HealthState {
    value: f64,
    clear_threshold: f64,
    only_fail_at_end: bool,
    has_failed: bool,
    currently_failed: bool,
}

impl HealthState {
    pub fn new(config: &HealthConfig) -> Self {
        let value = config.start.clamp(0.0, 1.0);
        let currently_failed = value <= config.clear_threshold;
        Self {
            value,
            clear_threshold: config.clear_threshold,
            only_fail_at_end: config.only_fail_at_end,
            has_failed: currently_failed,
            currently_failed,
        }
    }

    /// Apply a judgement's health delta and refresh the failure flags.
    /// `currently_failed` tracks the live value; `has_failed` is sticky.
    pub fn apply(&mut self, delta: f64) {
        self.value = (self.value + delta).clamp(0.0, 1.0);
        self.currently_failed = self.value <= self.clear_threshold;
        if self.currently_failed {
            self.has_failed = true;
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn has_failed(&self) -> bool {
        self.has_failed
    }

    pub fn currently_failed(&self) -> bool {
        self.currently_failed
    }

    /// The run's fail verdict under this config: the sticky flag, or only
    /// the final state when the config defers failure to the end.
    pub fn failed(&self) -> bool {
        if self.only_fail_at_end {
            self.currently_failed
        } else {
            self.has_failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(start: f64, only_fail_at_end: bool) -> HealthConfig {
        HealthConfig {
            start,
            clear_threshold: 0.0,
            only_fail_at_end,
            deltas: vec![],
        }
    }

    #[test]
    fn test_clamping() {
        let mut health = HealthState::new(&config(0.9, false));
        health.apply(0.5);
        assert_eq!(health.value(), 1.0);
        health.apply(-2.0);
        assert_eq!(health.value(), 0.0);
    }

    #[test]
    fn test_sticky_failure() {
        let mut health = HealthState::new(&config(0.1, false));
        health.apply(-0.5);
        assert!(health.failed());

        // Recovery clears the live flag but not the verdict.
        health.apply(0.8);
        assert!(!health.currently_failed());
        assert!(health.has_failed());
        assert!(health.failed());
    }

    #[test]
    fn test_only_fail_at_end_recovers() {
        let mut health = HealthState::new(&config(0.1, true));
        health.apply(-0.5);
        assert!(health.failed());

        health.apply(0.8);
        assert!(!health.failed());
    }
}

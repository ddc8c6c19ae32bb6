use std::time::Duration;

use crate::Amount;

/// Settings for a simulator instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Spending ceiling for one session.
    pub daily_budget: Amount,
    /// Streak the user starts with; kept across sessions.
    pub streak_seed: u32,
    /// How long the carbon impact modal stays up before the purchase commits.
    pub commit_delay: Duration,
}

impl SimulatorConfig {
    pub const DEFAULT_DAILY_BUDGET: i64 = 1000;
    pub const DEFAULT_STREAK_SEED: u32 = 12;
    pub const DEFAULT_COMMIT_DELAY: Duration = Duration::from_secs(3);

    pub fn with_daily_budget(mut self, daily_budget: Amount) -> Self {
        self.daily_budget = daily_budget;
        self
    }

    pub fn with_streak_seed(mut self, streak_seed: u32) -> Self {
        self.streak_seed = streak_seed;
        self
    }

    pub fn with_commit_delay(mut self, commit_delay: Duration) -> Self {
        self.commit_delay = commit_delay;
        self
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            daily_budget: Amount::from_whole(Self::DEFAULT_DAILY_BUDGET),
            streak_seed: Self::DEFAULT_STREAK_SEED,
            commit_delay: Self::DEFAULT_COMMIT_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.daily_budget, Amount::from_whole(1000));
        assert_eq!(config.streak_seed, 12);
        assert_eq!(config.commit_delay, Duration::from_secs(3));
    }

    #[test]
    fn builders_override_fields() {
        let config = SimulatorConfig::default()
            .with_daily_budget(Amount::from_whole(500))
            .with_streak_seed(0)
            .with_commit_delay(Duration::ZERO);
        assert_eq!(config.daily_budget, Amount::from_whole(500));
        assert_eq!(config.streak_seed, 0);
        assert_eq!(config.commit_delay, Duration::ZERO);
    }
}

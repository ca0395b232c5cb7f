use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tycoon_game::EngineConfig;

use crate::logic::bots::BotStrategy;
use crate::logic::simulation::{SimulationConfig, SimulationSession, SimulationSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub strategy: BotStrategy,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
    /// Figures from the final iteration.
    pub last_summary: Option<SimulationSummary>,
}

/// Shape of every run a [`LogicTester`] performs.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub days: u32,
    pub skip_every: Option<u32>,
    pub engine_config: EngineConfig,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            days: 14,
            skip_every: None,
            engine_config: EngineConfig::default(),
        }
    }
}

pub struct LogicTester {
    plan: RunPlan,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(plan: RunPlan, verbose: bool) -> Self {
        Self { plan, verbose }
    }

    pub fn run_bot(
        &self,
        strategy: BotStrategy,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing bot: {} (days: {} seed: {})",
                        strategy.key().bright_white(),
                        self.plan.days,
                        seed
                    );
                }
                self.run_single(strategy, seed, iterations)
            })
            .collect()
    }

    fn run_single(&self, strategy: BotStrategy, seed: u64, iterations: usize) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();
        let mut last_summary = None;

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let config = SimulationConfig::new(strategy, iteration_seed)
                .with_days(self.plan.days)
                .with_skip_every(self.plan.skip_every);
            let summary =
                SimulationSession::new(config, self.plan.engine_config.clone()).run();

            if summary.violations.is_empty() {
                successes += 1;
                let duration = start_time.elapsed();
                performance_data.push(duration);
                if self.verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) coins:{} streak:{} level:{}",
                        i + 1,
                        iterations,
                        summary.final_coins,
                        summary.final_streak,
                        summary.gym_level
                    );
                }
            } else {
                let first = &summary.violations[0];
                failures.push(format!(
                    "Iteration {} (bot {}, seed {}, actions {}): {} violation(s), first: {}",
                    i + 1,
                    strategy,
                    iteration_seed,
                    summary.actions_taken,
                    summary.violations.len(),
                    first
                ));
                if self.verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        first.as_str().red()
                    );
                }
            }
            last_summary = Some(summary);
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: format!("{strategy} (seed {seed})"),
            strategy,
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
            last_summary,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_plan() -> RunPlan {
        RunPlan {
            days: 2,
            ..RunPlan::default()
        }
    }

    #[test]
    fn one_result_per_seed() {
        let tester = LogicTester::new(short_plan(), false);
        let results = tester.run_bot(BotStrategy::Saver, &[1, 2, 3], 1);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.passed && r.successful_iterations == 1));
        assert_eq!(results[1].scenario_name, "saver (seed 2)");
    }

    #[test]
    fn iterations_walk_consecutive_seeds() {
        let tester = LogicTester::new(short_plan(), false);
        let result = &tester.run_bot(BotStrategy::Grinder, &[10], 3)[0];
        assert_eq!(result.iterations_run, 3);
        assert_eq!(result.last_summary.as_ref().map(|s| s.seed), Some(12));
    }

    #[test]
    fn durations_serialize_as_millis() {
        let result = ScenarioResult {
            scenario_name: "grinder (seed 1)".to_string(),
            strategy: BotStrategy::Grinder,
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
            last_summary: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
        assert_eq!(json["performance_data"][0], 12);
        assert_eq!(json["strategy"], "grinder");
    }
}

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::scenarios::{Scenario, ScenarioCtx};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    /// RFC 3339 start time of the first iteration.
    pub started_at: String,
}

pub struct ScenarioRunner {
    latency: Duration,
    verbose: bool,
}

impl ScenarioRunner {
    pub const fn new(latency: Duration, verbose: bool) -> Self {
        Self { latency, verbose }
    }

    pub async fn run(&self, scenario: Scenario, iterations: usize) -> ScenarioResult {
        if self.verbose {
            println!(
                "🧪 Testing scenario: {} ({iterations} iterations)",
                scenario.key().bright_white()
            );
        }
        let started_at = chrono::Utc::now().to_rfc3339();

        let mut successes = 0;
        let mut failures = Vec::new();
        let mut timings = Vec::with_capacity(iterations);

        for iteration in 0..iterations {
            let ctx = ScenarioCtx {
                iteration,
                latency: self.latency,
            };
            let start = Instant::now();
            let outcome = scenario.run(&ctx).await;
            let elapsed = start.elapsed();
            timings.push(elapsed);

            match outcome {
                Ok(()) => {
                    successes += 1;
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{iterations} passed ({elapsed:?})",
                            iteration + 1
                        );
                    }
                }
                Err(err) => {
                    log::debug!("{} iteration {} failed: {err:?}", scenario.key(), iteration + 1);
                    let message = format!("Iteration {}: {err:#}", iteration + 1);
                    if self.verbose {
                        println!("  ❌ {}", message.clone().red());
                    }
                    failures.push(message);
                }
            }
        }

        ScenarioResult {
            scenario_name: scenario.key().to_string(),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration: average(&timings),
            started_at,
        }
    }
}

fn average(timings: &[Duration]) -> Duration {
    if timings.is_empty() {
        return Duration::ZERO;
    }
    timings.iter().sum::<Duration>() / u32::try_from(timings.len()).unwrap_or(u32::MAX)
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        u64::try_from(duration.as_micros())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_micros(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collects_iterations_into_one_result() {
        let runner = ScenarioRunner::new(Duration::ZERO, false);
        let result = runner.run(Scenario::Smoke, 3).await;
        assert!(result.passed, "{:?}", result.failures);
        assert_eq!(result.iterations_run, 3);
        assert_eq!(result.successful_iterations, 3);
        assert_eq!(result.scenario_name, "smoke");
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average(&[]), Duration::ZERO);
        assert_eq!(
            average(&[Duration::from_millis(10), Duration::from_millis(30)]),
            Duration::from_millis(20)
        );
    }

    #[test]
    fn durations_serialize_as_micros() {
        let result = ScenarioResult {
            scenario_name: "smoke".into(),
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(2),
            started_at: "2026-01-01T00:00:00+00:00".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 2_000);
    }
}

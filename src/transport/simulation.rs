use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::config::ErrorConfig;
use crate::errors::{MockError, MockResult};
use crate::operation::Operation;

/// Decides whether a request fails before it reaches the resolvers.
pub struct ErrorSimulator {
    rng: Mutex<StdRng>,
}

impl Default for ErrorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorSimulator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic draws, for tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// A configured message for the operation always fails it; otherwise a
    /// uniform draw below the error rate does.
    pub fn check(&self, operation: Operation, config: &ErrorConfig) -> MockResult<()> {
        if !config.enabled {
            return Ok(());
        }

        if let Some(message) = config.specific_errors.get(operation.field_name()) {
            warn!("Injected error for {}: {}", operation, message);
            return Err(MockError::Simulated(message.clone()));
        }

        if config.error_rate > 0.0 {
            let draw: f64 = {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                rng.gen()
            };
            if draw < config.error_rate {
                warn!("Simulated failure for {} (draw {:.3})", operation, draw);
                return Err(MockError::Simulated(format!(
                    "Simulated error for {}",
                    operation
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(rate: f64) -> ErrorConfig {
        ErrorConfig {
            enabled: true,
            error_rate: rate,
            ..Default::default()
        }
    }

    #[test]
    fn disabled_never_fails() {
        let simulator = ErrorSimulator::seeded(7);
        let mut config = config(1.0);
        config.enabled = false;
        config
            .specific_errors
            .insert("agreements".to_string(), "down".to_string());

        assert!(simulator.check(Operation::Agreements, &config).is_ok());
    }

    #[test]
    fn full_rate_always_fails() {
        let simulator = ErrorSimulator::seeded(7);
        for _ in 0..50 {
            let err = simulator
                .check(Operation::Clients, &config(1.0))
                .unwrap_err();
            assert_eq!(err.to_string(), "Simulated error for clients");
            assert!(err.is_simulated());
        }
    }

    #[test]
    fn zero_rate_never_fails() {
        let simulator = ErrorSimulator::seeded(7);
        for _ in 0..50 {
            assert!(simulator.check(Operation::Clients, &config(0.0)).is_ok());
        }
    }

    #[test]
    fn specific_message_targets_one_operation() {
        let simulator = ErrorSimulator::seeded(7);
        let mut config = config(0.0);
        config.specific_errors.insert(
            "createAgreement".to_string(),
            "Failed to create agreement".to_string(),
        );

        let err = simulator
            .check(Operation::CreateAgreement, &config)
            .unwrap_err();
        assert_eq!(err, MockError::Simulated("Failed to create agreement".to_string()));
        assert!(simulator.check(Operation::Agreements, &config).is_ok());
    }

    #[test]
    fn partial_rate_fails_some_requests() {
        let simulator = ErrorSimulator::seeded(42);
        let failures = (0..1000)
            .filter(|_| simulator.check(Operation::Products, &config(0.5)).is_err())
            .count();
        assert!(failures > 350 && failures < 650, "{} failures", failures);
    }
}

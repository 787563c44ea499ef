pub mod random;

use std::future::Future;

use parking_lot::Mutex;

use crate::classify::{ErrorCode, NormalizedError, synthetic_error};
use crate::config::InjectorConfig;
use crate::error::Error;
use crate::inject::random::RandomSource;

/// Operation label → the failure a demo of that operation most plausibly hits.
pub const OPERATION_CODES: &[(&str, ErrorCode)] = &[
    ("connect", ErrorCode::WalletConnectionRejected),
    ("submit", ErrorCode::InsufficientFeeFunds),
    ("validate", ErrorCode::CustomProgramError),
    ("claim", ErrorCode::AccountNotFound),
    ("create", ErrorCode::ComputeBudgetExceeded),
    ("update", ErrorCode::InvalidAccountData),
];

pub fn code_for_operation(operation: &str) -> ErrorCode {
    OPERATION_CODES
        .iter()
        .find(|(name, _)| *name == operation)
        .map_or(ErrorCode::NetworkError, |(_, code)| *code)
}

/// Deterministic counterpart of [`FaultInjector`]: fail `operation` with its
/// mapped code when `should_fail` is set.
pub fn simulate_operation_error(
    operation: &str,
    should_fail: bool,
    source: &mut impl RandomSource,
) -> Option<NormalizedError> {
    should_fail.then(|| synthetic_error(code_for_operation(operation), source))
}

/// Probability-gated fault injection around async operations.
///
/// Inactive unless `mock_mode` is set, in which case every call draws one
/// sample and fails with a synthetic error when the sample is below the
/// configured probability.
pub struct FaultInjector<R = fastrand::Rng> {
    config: InjectorConfig,
    source: Mutex<R>,
}

impl FaultInjector<fastrand::Rng> {
    pub fn new(config: InjectorConfig) -> Result<Self, Error> {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self::with_source(config, rng)
    }

    /// An injector that always calls through.
    pub fn disabled() -> Self {
        Self {
            config: InjectorConfig {
                mock_mode: false,
                probability: 0.0,
                seed: None,
            },
            source: Mutex::new(fastrand::Rng::new()),
        }
    }
}

impl<R: RandomSource> FaultInjector<R> {
    pub fn with_source(config: InjectorConfig, source: R) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            source: Mutex::new(source),
        })
    }

    pub fn is_active(&self) -> bool {
        self.config.mock_mode
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    /// Decide whether this call fails. `None` means call through.
    pub fn draw(&self, operation: &str) -> Option<NormalizedError> {
        if !self.config.mock_mode {
            return None;
        }

        let mut source = self.source.lock();
        let sample = source.next_f64();
        if sample >= self.config.probability {
            return None;
        }

        let code = ErrorCode::random(&mut *source);
        tracing::debug!(operation, %code, sample, "injecting mock failure");
        Some(synthetic_error(code, &mut *source))
    }

    /// Run `f` unless an injected failure is drawn first.
    pub async fn run<T, F, Fut>(&self, operation: &str, f: F) -> Result<T, NormalizedError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, NormalizedError>>,
    {
        if let Some(err) = self.draw(operation) {
            return Err(err);
        }
        f().await
    }
}

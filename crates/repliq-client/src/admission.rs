//! Admission control.
//!
//! An admission controller is a pre-dispatch gate: when it rejects a call,
//! the client produces a throttled result immediately and no replica is ever
//! contacted. The built-in implementation uses a token bucket that allows
//! bursts while limiting the sustained request rate.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use repliq_common::Request;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    Allowed,
    Throttled,
}

impl AdmissionDecision {
    pub fn is_allowed(self) -> bool {
        self == Self::Allowed
    }
}

/// Pre-dispatch gate consulted once per call.
#[async_trait]
pub trait AdmissionController: Send + Sync {
    async fn admit(&self, request: &Request) -> AdmissionDecision;
}

/// Configuration for the token-bucket admission controller.
///
/// # Example
///
/// ```
/// use repliq_client::AdmissionConfig;
///
/// // 10 requests per second sustained, bursts of up to 20
/// let config = AdmissionConfig::new(10.0, 20);
/// assert_eq!(config.requests_per_second, 10.0);
/// assert_eq!(config.burst_size, 20);
/// ```
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Maximum sustained request rate (requests per second)
    pub requests_per_second: f64,
    /// Maximum burst size (number of tokens)
    pub burst_size: u32,
}

impl AdmissionConfig {
    pub fn new(requests_per_second: f64, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }

    /// Convenience constructor: `rate` requests per second with an equal
    /// burst size.
    pub fn per_second(rate: u32) -> Self {
        Self::new(rate as f64, rate)
    }
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket admission controller.
///
/// The bucket starts full. Each admitted call consumes one token; tokens
/// refill continuously at the configured rate up to `burst_size`. A call
/// arriving at an empty bucket is throttled.
pub struct TokenBucketAdmission {
    config: AdmissionConfig,
    bucket: Mutex<Bucket>,
}

impl TokenBucketAdmission {
    pub fn new(config: AdmissionConfig) -> Self {
        let bucket = Bucket {
            tokens: config.burst_size as f64,
            last_refill: Instant::now(),
        };
        Self {
            config,
            bucket: Mutex::new(bucket),
        }
    }
}

#[async_trait]
impl AdmissionController for TokenBucketAdmission {
    async fn admit(&self, _request: &Request) -> AdmissionDecision {
        let mut bucket = self.bucket.lock().await;

        // Refill based on elapsed time, allowing fractional tokens.
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill);
        bucket.tokens = (bucket.tokens + elapsed.as_secs_f64() * self.config.requests_per_second)
            .min(self.config.burst_size as f64);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            AdmissionDecision::Allowed
        } else {
            AdmissionDecision::Throttled
        }
    }
}

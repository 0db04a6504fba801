use std::time::Duration;

use rand::Rng;

/// Exponential backoff policy (§4.6): base 1s, factor 2, jitter ±20%,
/// cap 60s, max 5 attempts.
pub const MAX_ATTEMPTS: u32 = 5;

const BASE: Duration = Duration::from_secs(1);
const FACTOR: u32 = 2;
const CAP: Duration = Duration::from_secs(60);
const JITTER: f64 = 0.2;

/// Delay before retry attempt `attempt` (0-indexed: the delay before the
/// *second* call is `delay_for_attempt(0)`).
pub fn delay_for_attempt(attempt: u32) -> Duration {
    let exp = FACTOR.saturating_pow(attempt);
    let raw = BASE.saturating_mul(exp).min(CAP);
    let jitter_frac = rand::thread_rng().gen_range(-JITTER..=JITTER);
    let millis = (raw.as_millis() as f64 * (1.0 + jitter_frac)).max(0.0);
    Duration::from_millis(millis as u64)
}

/// Call `f` up to `MAX_ATTEMPTS` times, sleeping the jittered backoff
/// delay between attempts. Returns the last error on terminal failure.
pub fn retry_with_backoff<T>(mut f: impl FnMut() -> anyhow::Result<T>) -> anyhow::Result<T> {
    let mut last_err = None;
    for attempt in 0..MAX_ATTEMPTS {
        match f() {
            Ok(value) => return Ok(value),
            Err(e) => {
                last_err = Some(e);
                if attempt + 1 < MAX_ATTEMPTS {
                    std::thread::sleep(delay_for_attempt(attempt));
                }
            }
        }
    }
    Err(last_err.expect("loop runs at least once"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn delay_grows_but_stays_capped() {
        let short = delay_for_attempt(0);
        let long = delay_for_attempt(10);
        assert!(short < Duration::from_secs(2));
        assert!(long <= Duration::from_millis((CAP.as_millis() as f64 * 1.2) as u64));
    }

    #[test]
    fn retries_until_success() {
        let attempts = AtomicU32::new(0);
        let result = retry_with_backoff(|| {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                anyhow::bail!("not yet")
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let attempts = AtomicU32::new(0);
        let result: anyhow::Result<()> = retry_with_backoff(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("always fails")
        });
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }
}

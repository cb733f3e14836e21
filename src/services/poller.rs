use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// A value whose server-side processing can finish.
pub trait Terminal {
    fn is_terminal(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.practice_poll_interval(),
            timeout: config.practice_poll_timeout(),
        }
    }
}

/// Calls `fetch` every `policy.interval` until it yields a terminal value.
///
/// Retryable fetch errors are logged and polling goes on; anything else
/// ends the poll. Runs out with `AppError::Timeout`.
pub async fn poll_until_terminal<T, F, Fut>(policy: PollPolicy, mut fetch: F) -> AppResult<T>
where
    T: Terminal,
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let deadline = Instant::now() + policy.timeout;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match fetch().await {
            Ok(value) if value.is_terminal() => return Ok(value),
            Ok(_) => log::debug!("Poll {} not finished yet", attempt),
            Err(err) if err.is_retryable() => {
                log::warn!("Poll {} failed, will retry: {}", attempt, err)
            }
            Err(err) => return Err(err),
        }

        if Instant::now() + policy.interval > deadline {
            return Err(AppError::Timeout(format!(
                "still processing after {} polls",
                attempt
            )));
        }
        tokio::time::sleep(policy.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Job {
        done: bool,
    }

    impl Terminal for Job {
        fn is_terminal(&self) -> bool {
            self.done
        }
    }

    fn fast_policy() -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(5),
            timeout: Duration::from_millis(500),
        }
    }

    #[tokio::test]
    async fn test_polls_until_terminal() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let job = poll_until_terminal(fast_policy(), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(Job { done: n >= 3 }) }
        })
        .await
        .unwrap();

        assert!(job.done);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retryable_errors_do_not_abort() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let job = poll_until_terminal(fast_policy(), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 1 {
                    Err(AppError::Network("reset".into()))
                } else {
                    Ok(Job { done: true })
                }
            }
        })
        .await
        .unwrap();

        assert!(job.done);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fatal_error_aborts() {
        let result = poll_until_terminal(fast_policy(), || async {
            Err::<Job, _>(AppError::Unauthorized("expired".into()))
        })
        .await;

        assert_eq!(result.unwrap_err(), AppError::Unauthorized("expired".into()));
    }

    #[tokio::test]
    async fn test_times_out() {
        let policy = PollPolicy {
            interval: Duration::from_millis(5),
            timeout: Duration::from_millis(30),
        };

        let result = poll_until_terminal(policy, || async { Ok(Job { done: false }) }).await;

        assert_eq!(result.unwrap_err().error_code(), "TIMEOUT");
    }

    #[test]
    fn test_policy_from_config() {
        let config = Config::test_config();
        let policy = PollPolicy::from_config(&config);
        assert_eq!(policy.interval, config.practice_poll_interval());
    }
}

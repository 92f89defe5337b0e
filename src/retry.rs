//! Bounded retry with an explicit transient/fatal split.
//!
//! Transaction submission fails routinely for boring reasons (a blockhash
//! going stale between fetch and send); those are retried up to a fixed
//! bound. Anything classified fatal stops the loop immediately.

use std::future::Future;

/// How one attempt failed.
#[derive(Debug)]
pub enum Attempt<E> {
    /// Worth trying again, up to the bound
    Transient(E),
    /// Stop now, retrying cannot help
    Fatal(E),
}

/// Why the whole loop gave up.
#[derive(Debug)]
pub enum RetryError<E> {
    Fatal(E),
    /// Every try failed with a transient error; the chain is kept in order
    Exhausted { failures: Vec<E> },
}

/// A successful run along with the transient failures seen on the way.
#[derive(Debug)]
pub struct Retried<T, E> {
    pub value: T,
    /// Attempt number (1-based) the value was produced on
    pub attempt: u32,
    pub failures: Vec<E>,
}

/// Runs `op` up to `max_attempts` times. The closure receives the 1-based
/// attempt number so callers can re-fetch per-attempt state (a fresh
/// blockhash) and log which try they are on.
pub async fn bounded<T, E, F, Fut>(
    max_attempts: u32,
    mut op: F,
) -> Result<Retried<T, E>, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, Attempt<E>>>,
{
    debug_assert!(max_attempts > 0);

    let mut failures = Vec::new();
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => {
                return Ok(Retried {
                    value,
                    attempt,
                    failures,
                })
            }
            Err(Attempt::Fatal(e)) => return Err(RetryError::Fatal(e)),
            Err(Attempt::Transient(e)) => {
                failures.push(e);
                if attempt >= max_attempts {
                    return Err(RetryError::Exhausted { failures });
                }
                attempt += 1;
            }
        }
    }
}

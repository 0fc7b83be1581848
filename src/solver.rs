//! Requester-side brute-force search for a digest that meets a [`Pow`]'s difficulty.
//!
//! Candidates are `payload || LE64(counter)`; workers pull counters from a shared
//! [`CounterSource`] and the first hit is sent back over a bounded channel.
use crate::error::Error;
use crate::pow::Pow;
use crate::stream::{CounterSource, StopFlag};
use derive_builder::Builder;
use flume::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;

/// Data that satisfies a challenge, with the counter it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solution {
    pub counter: u64,
    pub data: Vec<u8>,
    pub digest: Vec<u8>,
}

#[derive(Builder, Debug, Clone)]
#[builder(pattern = "owned")]
pub struct Solver {
    pub threads: usize,
    #[builder(default)]
    pub start_counter: u64,
    /// Give up after this many candidates; unbounded when unset.
    #[builder(default, setter(strip_option))]
    pub max_attempts: Option<u64>,
}

impl Solver {
    fn validate(&self) -> Result<(), Error> {
        if self.threads == 0 {
            return Err(Error::InvalidConfig("threads must be >= 1".into()));
        }
        if self.max_attempts == Some(0) {
            return Err(Error::InvalidConfig("max_attempts must be >= 1".into()));
        }
        Ok(())
    }

    /// Search for data over `payload` whose digest with `nonce` meets `pow`'s difficulty.
    pub fn solve(&self, pow: &Pow, nonce: &[u8], payload: &[u8]) -> Result<Solution, Error> {
        self.validate()?;
        let end = match self.max_attempts {
            Some(n) => self.start_counter.saturating_add(n),
            None => u64::MAX,
        };

        let pow = Arc::new(pow.clone());
        let nonce: Arc<[u8]> = Arc::from(nonce);
        let payload: Arc<[u8]> = Arc::from(payload);
        let source = Arc::new(CounterSource::new(self.start_counter, end));
        let stop = Arc::new(StopFlag::new());
        let (tx, rx): (Sender<Solution>, Receiver<Solution>) = flume::bounded(self.threads);

        tracing::debug!(
            threads = self.threads,
            start = self.start_counter,
            difficulty = pow.difficulty(),
            encoding = ?pow.encoding(),
            "starting proof-of-work search"
        );

        let mut joins = Vec::with_capacity(self.threads);
        for _ in 0..self.threads {
            let worker_pow = pow.clone();
            let worker_nonce = nonce.clone();
            let worker_payload = payload.clone();
            let worker_source = source.clone();
            let worker_stop = stop.clone();
            let worker_tx = tx.clone();
            let join = thread::spawn(move || {
                worker_loop(
                    worker_pow,
                    worker_nonce,
                    worker_payload,
                    worker_source,
                    worker_stop,
                    worker_tx,
                );
            });
            joins.push(join);
        }
        drop(tx);

        let outcome = rx.recv();
        stop.force_stop();
        join_handles(joins)?;

        match outcome {
            Ok(solution) => {
                tracing::debug!(counter = solution.counter, "found solution");
                Ok(solution)
            }
            Err(_) if source.is_exhausted() => {
                let attempts = end - self.start_counter;
                tracing::debug!(attempts, "search exhausted");
                Err(Error::Exhausted { attempts })
            }
            Err(_) => Err(Error::SolverFailed(
                "workers exited before the search finished".into(),
            )),
        }
    }
}

impl SolverBuilder {
    pub fn build_validated(self) -> Result<Solver, Error> {
        let solver = self
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        solver.validate()?;
        Ok(solver)
    }
}

/// Candidate data for `counter`: `payload || LE64(counter)`.
pub fn candidate_data(payload: &[u8], counter: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(payload.len() + 8);
    data.extend_from_slice(payload);
    data.extend_from_slice(&counter.to_le_bytes());
    data
}

fn worker_loop(
    pow: Arc<Pow>,
    nonce: Arc<[u8]>,
    payload: Arc<[u8]>,
    source: Arc<CounterSource>,
    stop: Arc<StopFlag>,
    tx: Sender<Solution>,
) {
    while !stop.should_stop() {
        let Some(counter) = source.fetch() else {
            break;
        };
        let data = candidate_data(&payload, counter);
        let digest = pow.digest(&data, &nonce);
        if pow.verify_difficulty(&digest) {
            stop.force_stop();
            // Capacity covers one send per worker, so this never blocks.
            let _ = tx.send(Solution {
                counter,
                data,
                digest,
            });
            break;
        }
    }
}

/// Join every worker, reporting the first one that panicked.
fn join_handles(joins: Vec<thread::JoinHandle<()>>) -> Result<(), Error> {
    let mut failure = None;
    for handle in joins {
        if let Err(payload) = handle.join() {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "worker panicked".to_owned());
            tracing::warn!(%msg, "solver worker panicked");
            failure.get_or_insert(Error::SolverFailed(msg));
        }
    }
    failure.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::{leading_zero_bits, DigestEncoding};
    use crate::hash::HashFunction;

    #[derive(Debug)]
    struct PanickingHasher;

    impl HashFunction for PanickingHasher {
        fn hash(&self, _input: &[u8]) -> Vec<u8> {
            panic!("hash backend unavailable");
        }
    }

    fn solver(threads: usize) -> Solver {
        SolverBuilder::default()
            .threads(threads)
            .build_validated()
            .expect("build solver")
    }

    #[test]
    fn solves_raw_difficulty_and_verifies() {
        let pow = Pow::builder()
            .secret("secret")
            .check(true)
            .difficulty(8)
            .build()
            .unwrap();
        let challenge = pow.issue().unwrap();
        let solution = solver(2)
            .solve(&pow, &challenge.nonce, b"payload")
            .expect("search should succeed");

        assert!(leading_zero_bits(&solution.digest) >= 8);
        assert_eq!(solution.data, candidate_data(b"payload", solution.counter));
        pow.verify_hash_at_difficulty(
            &challenge.nonce,
            &solution.data,
            &solution.digest,
            challenge.signature_bytes(),
        )
        .expect("solution should verify");
    }

    #[test]
    fn solves_hex_difficulty_and_verifies() {
        let pow = Pow::builder()
            .encoding(DigestEncoding::Hex)
            .difficulty(2)
            .build()
            .unwrap();
        let challenge = pow.issue().unwrap();
        let solution = solver(1)
            .solve(&pow, &challenge.nonce, b"payload")
            .expect("search should succeed");

        assert!(solution.digest.starts_with(b"00"));
        pow.verify_hash_at_difficulty(&challenge.nonce, &solution.data, &solution.digest, &[])
            .expect("solution should verify");
    }

    #[test]
    fn zero_difficulty_takes_first_counter() {
        let pow = Pow::default();
        let solver = SolverBuilder::default()
            .threads(1)
            .start_counter(42)
            .build_validated()
            .unwrap();
        let solution = solver.solve(&pow, b"nonce", b"p").unwrap();
        assert_eq!(solution.counter, 42);
        assert_eq!(solution.digest, pow.digest(&solution.data, b"nonce"));
    }

    #[test]
    fn bounded_search_exhausts() {
        let pow = Pow::builder().difficulty(64).build().unwrap();
        let solver = SolverBuilder::default()
            .threads(2)
            .max_attempts(50)
            .build_validated()
            .unwrap();
        let err = solver
            .solve(&pow, b"nonce", b"payload")
            .expect_err("64 bits should not be met in 50 tries");
        assert_eq!(err, Error::Exhausted { attempts: 50 });
    }

    #[test]
    fn rejects_zero_threads() {
        let err = SolverBuilder::default()
            .threads(0)
            .build_validated()
            .expect_err("zero threads should be rejected");
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = SolverBuilder::default()
            .threads(1)
            .max_attempts(0)
            .build_validated()
            .expect_err("zero attempts should be rejected");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn solve_revalidates_mutated_fields() {
        let mut solver = solver(1);
        solver.threads = 0;
        let err = solver.solve(&Pow::default(), b"n", b"p").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn panicking_worker_is_reported_as_failure() {
        let pow = Pow::builder()
            .difficulty(1)
            .hasher(Arc::new(PanickingHasher))
            .build()
            .unwrap();
        let err = solver(2)
            .solve(&pow, b"nonce", b"payload")
            .expect_err("a panicking hasher must fail the search");
        match err {
            Error::SolverFailed(msg) => assert!(msg.contains("hash backend unavailable")),
            other => panic!("expected SolverFailed, got {other:?}"),
        }
    }

    #[test]
    fn search_near_counter_max_stays_in_range() {
        let pow = Pow::builder().difficulty(64).build().unwrap();
        let solver = SolverBuilder::default()
            .threads(3)
            .start_counter(u64::MAX - 4)
            .build_validated()
            .unwrap();
        let err = solver.solve(&pow, b"nonce", b"payload").unwrap_err();
        assert_eq!(err, Error::Exhausted { attempts: 4 });
    }
}

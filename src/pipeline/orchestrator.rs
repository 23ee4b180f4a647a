//! Fallback orchestrator.
//!
//! Walks an ordered attempt list: `Pending → Trying(i) → Succeeded | Exhausted`.
//! An attempt fails when the upstream call fails or the adapter yields no
//! entities; the first attempt with at least one entity wins and nothing
//! after it is evaluated. Exhaustion resolves to the caller's default set,
//! never to an error.

use futures::stream::{FuturesOrdered, StreamExt};
use tracing::{debug, info, warn};

use super::plan::Attempt;
use crate::types::{AdapterError, UpstreamError};
use crate::upstream::{RawPayload, Upstream};

/// Where a run stands.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackState<T> {
    Pending,
    Trying(usize),
    Succeeded { index: usize, entities: Vec<T> },
    Exhausted(Vec<T>),
}

/// Why an attempt did not produce a result.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    Upstream(UpstreamError),
    Adapter(AdapterError),
    Empty,
}

/// One evaluated attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub label: String,
    pub failure: Option<AttemptFailure>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome<T> {
    pub entities: Vec<T>,
    /// The winning attempt; `None` when the plan was exhausted.
    pub source: Option<Attempt>,
    /// Every attempt evaluated, in evaluation order.
    pub trail: Vec<AttemptRecord>,
}

impl<T> FallbackOutcome<T> {
    pub fn exhausted(&self) -> bool {
        self.source.is_none()
    }

    pub fn attempts_made(&self) -> usize {
        self.trail.len()
    }
}

pub struct Orchestrator<'a> {
    upstream: &'a dyn Upstream,
}

impl<'a> Orchestrator<'a> {
    pub fn new(upstream: &'a dyn Upstream) -> Self {
        Self { upstream }
    }

    /// Judge one fetched attempt.
    fn evaluate<T, A>(
        attempt: &Attempt,
        fetched: Result<RawPayload, UpstreamError>,
        adapt: &A,
    ) -> Result<Vec<T>, AttemptFailure>
    where
        A: Fn(&Attempt, &RawPayload) -> Result<Vec<T>, AdapterError>,
    {
        let raw = fetched.map_err(AttemptFailure::Upstream)?;
        let entities = adapt(attempt, &raw).map_err(AttemptFailure::Adapter)?;
        if entities.is_empty() {
            Err(AttemptFailure::Empty)
        } else {
            Ok(entities)
        }
    }

    fn record(attempt: &Attempt, index: usize, failure: Option<AttemptFailure>) -> AttemptRecord {
        match &failure {
            Some(AttemptFailure::Upstream(e)) => {
                warn!(attempt = index, source = %attempt.label(), error = %e, "Upstream failed, falling back")
            }
            Some(AttemptFailure::Adapter(e)) => {
                warn!(attempt = index, source = %attempt.label(), error = %e, "Payload unusable, falling back")
            }
            Some(AttemptFailure::Empty) => {
                debug!(attempt = index, source = %attempt.label(), "No entities, falling back")
            }
            None => {}
        }
        AttemptRecord {
            label: attempt.label(),
            failure,
        }
    }

    fn finish<T>(
        attempts: &[Attempt],
        state: FallbackState<T>,
        trail: Vec<AttemptRecord>,
    ) -> FallbackOutcome<T> {
        match state {
            FallbackState::Succeeded { index, entities } => {
                let source = attempts.get(index).cloned();
                info!(
                    source = %source.as_ref().map(Attempt::label).unwrap_or_default(),
                    entities = entities.len(),
                    attempts = trail.len(),
                    "Fallback succeeded"
                );
                FallbackOutcome { entities, source, trail }
            }
            FallbackState::Exhausted(entities) => {
                info!(attempts = trail.len(), "All attempts exhausted, serving default");
                FallbackOutcome {
                    entities,
                    source: None,
                    trail,
                }
            }
            FallbackState::Pending | FallbackState::Trying(_) => FallbackOutcome {
                entities: Vec::new(),
                source: None,
                trail,
            },
        }
    }

    /// Evaluate attempts strictly one after another.
    pub async fn run<T, A, D>(&self, attempts: &[Attempt], adapt: A, default: D) -> FallbackOutcome<T>
    where
        A: Fn(&Attempt, &RawPayload) -> Result<Vec<T>, AdapterError>,
        D: Fn() -> Vec<T>,
    {
        let mut trail = Vec::with_capacity(attempts.len());
        let mut state = FallbackState::Pending;

        loop {
            state = match state {
                FallbackState::Pending if attempts.is_empty() => FallbackState::Exhausted(default()),
                FallbackState::Pending => FallbackState::Trying(0),
                FallbackState::Trying(i) => match attempts.get(i) {
                    None => FallbackState::Exhausted(default()),
                    Some(attempt) => {
                        debug!(attempt = i, source = %attempt.label(), endpoint = %attempt.request.describe(), "Trying");
                        let fetched = self.upstream.fetch(&attempt.request).await;
                        match Self::evaluate(attempt, fetched, &adapt) {
                            Ok(entities) => {
                                trail.push(Self::record(attempt, i, None));
                                FallbackState::Succeeded { index: i, entities }
                            }
                            Err(failure) => {
                                trail.push(Self::record(attempt, i, Some(failure)));
                                FallbackState::Trying(i + 1)
                            }
                        }
                    }
                },
                done @ (FallbackState::Succeeded { .. } | FallbackState::Exhausted(_)) => {
                    return Self::finish(attempts, done, trail);
                }
            };
        }
    }

    /// Launch every attempt at once but judge results in declared order.
    /// The first success by priority wins and the remaining calls are
    /// dropped, even if a lower-priority call finished earlier.
    pub async fn run_speculative<T, A, D>(
        &self,
        attempts: &[Attempt],
        adapt: A,
        default: D,
    ) -> FallbackOutcome<T>
    where
        A: Fn(&Attempt, &RawPayload) -> Result<Vec<T>, AdapterError>,
        D: Fn() -> Vec<T>,
    {
        let upstream = self.upstream;
        let mut in_flight: FuturesOrdered<_> = attempts
            .iter()
            .map(|attempt| async move { upstream.fetch(&attempt.request).await })
            .collect();

        let mut trail = Vec::with_capacity(attempts.len());
        let mut index = 0;
        while let Some(fetched) = in_flight.next().await {
            let Some(attempt) = attempts.get(index) else { break };
            match Self::evaluate(attempt, fetched, &adapt) {
                Ok(entities) => {
                    trail.push(Self::record(attempt, index, None));
                    drop(in_flight);
                    return Self::finish(attempts, FallbackState::Succeeded { index, entities }, trail);
                }
                Err(failure) => trail.push(Self::record(attempt, index, Some(failure))),
            }
            index += 1;
        }

        Self::finish(attempts, FallbackState::Exhausted(default()), trail)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

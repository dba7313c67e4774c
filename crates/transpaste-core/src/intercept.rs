//! The interception state machine.
//!
//! A cycle moves `Idle → Filtering → Converting → Synthesizing → Dispatching →
//! Idle`. The first two steps run synchronously inside the platform's event
//! handler ([`Interceptor::intercept`]); the rest is asynchronous
//! ([`Interceptor::run`]). Default-action suppression happens at the end of
//! the synchronous part, before any suspension point.

use std::cell::Cell;
use std::fmt;

use tracing::Instrument;

use crate::assemble::assemble;
use crate::classify::Classifier;
use crate::config::InterceptorConfig;
use crate::error::InterceptError;
use crate::platform::{Dom, InsertionPlatform};
use crate::synth::{SynthesizedEvent, synthesize};
use crate::transcode::{ImageCodec, transcode_all};
use crate::types::{CandidateImage, EventKind, InputEvent};

/// Where a cycle is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Filtering,
    Converting,
    Synthesizing,
    Dispatching,
}

/// Why an event was left to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Dispatched by script, including our own synthesized events.
    Untrusted,
    /// Nothing convertible in the payload.
    NoCandidates,
}

/// Outcome of the synchronous part of a cycle.
#[derive(Debug)]
pub enum Interception<D: Dom> {
    Ignored(IgnoreReason),
    /// Default action suppressed; the cycle must now be run.
    Intercepted(Cycle<D>),
}

/// One interception cycle past the filtering step.
pub struct Cycle<D: Dom> {
    id: u64,
    state: CycleState,
    event: InputEvent<D>,
    candidates: Vec<CandidateImage<D::File>>,
}

impl<D: Dom> Cycle<D> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn event(&self) -> &InputEvent<D> {
        &self.event
    }

    pub fn candidates(&self) -> &[CandidateImage<D::File>] {
        &self.candidates
    }

    fn advance(&mut self, next: CycleState) {
        tracing::debug!(from = ?self.state, to = ?next, "cycle state");
        self.state = next;
    }
}

impl<D: Dom> fmt::Debug for Cycle<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cycle")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("kind", &self.event.kind)
            .field("candidates", &self.candidates.len())
            .finish()
    }
}

/// Summary of a completed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub id: u64,
    pub kind: EventKind,
    /// Number of converted files carried by the dispatched event.
    pub converted: usize,
    /// State the cycle ended in; `Idle` once the cycle has completed.
    pub state: CycleState,
}

/// Orchestrates interception cycles for one document.
pub struct Interceptor<P, C> {
    platform: P,
    codec: C,
    classifier: Classifier,
    next_id: Cell<u64>,
}

impl<P, C> Interceptor<P, C>
where
    P: InsertionPlatform,
    C: ImageCodec,
{
    pub fn new(platform: P, codec: C, config: InterceptorConfig) -> Self {
        Self {
            platform,
            codec,
            classifier: Classifier::new(config),
            next_id: Cell::new(1),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &InterceptorConfig {
        self.classifier.config()
    }

    /// Synchronous part of a cycle: trust check, filtering, suppression.
    ///
    /// Must be called from within the platform's event handler. Returns
    /// `Intercepted` only after the original event's default action has been
    /// suppressed (exactly once). Ignored events see no side effects at all.
    pub fn intercept(
        &self,
        event: InputEvent<P::Dom>,
    ) -> Result<Interception<P::Dom>, InterceptError> {
        if !event.trusted {
            tracing::trace!(kind = %event.kind, "ignoring untrusted event");
            return Ok(Interception::Ignored(IgnoreReason::Untrusted));
        }
        let Some(payload) = event.payload.as_ref() else {
            let err = InterceptError::MalformedEvent {
                kind: event.kind.clone(),
            };
            tracing::warn!(error = %err, "dropping malformed event");
            return Err(err);
        };

        tracing::trace!(from = ?CycleState::Idle, to = ?CycleState::Filtering, "cycle state");
        let candidates = self
            .classifier
            .candidates(&payload.items, &event.document_url);
        if candidates.is_empty() {
            tracing::trace!(kind = %event.kind, items = payload.len(), "nothing to convert");
            return Ok(Interception::Ignored(IgnoreReason::NoCandidates));
        }

        self.platform.prevent_default(&event.raw);

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let mut cycle = Cycle {
            id,
            state: CycleState::Filtering,
            event,
            candidates,
        };
        cycle.advance(CycleState::Converting);
        tracing::debug!(
            id,
            kind = %cycle.event.kind,
            candidates = cycle.candidates.len(),
            "intercepted"
        );
        Ok(Interception::Intercepted(cycle))
    }

    /// Asynchronous part of a cycle: convert, synthesize, dispatch.
    ///
    /// Failures abort the cycle and are logged; nothing is inserted.
    pub async fn run(&self, mut cycle: Cycle<P::Dom>) -> Result<CycleReport, InterceptError> {
        let span = tracing::debug_span!("cycle", id = cycle.id, kind = %cycle.event.kind);
        let result = self.drive(&mut cycle).instrument(span).await;
        if let Err(err) = &result {
            tracing::warn!(
                id = cycle.id,
                state = ?cycle.state,
                error = %err,
                "interception aborted"
            );
        }
        cycle.advance(CycleState::Idle);

        let converted = result?;
        let report = CycleReport {
            id: cycle.id,
            kind: cycle.event.kind.clone(),
            converted,
            state: cycle.state,
        };
        tracing::info!(
            id = report.id,
            kind = %report.kind,
            converted = report.converted,
            "dispatched converted payload"
        );
        Ok(report)
    }

    /// Returns the number of files carried by the dispatched event.
    async fn drive(&self, cycle: &mut Cycle<P::Dom>) -> Result<usize, InterceptError> {
        let converted = transcode_all(&self.codec, &cycle.candidates).await?;

        cycle.advance(CycleState::Synthesizing);
        let payload = assemble(converted);
        let converted = payload.len();
        let synthesized = synthesize(&cycle.event.kind, payload, &cycle.event)?;

        cycle.advance(CycleState::Dispatching);
        let target = self
            .resolve_target(&synthesized)
            .ok_or_else(|| InterceptError::TargetUnresolvable {
                kind: synthesized.kind.clone(),
            })?;
        self.platform.dispatch(&target, synthesized)?;
        Ok(converted)
    }

    /// Drops go to the element under the recorded point as laid out now,
    /// pastes to whatever has focus now.
    fn resolve_target(
        &self,
        event: &SynthesizedEvent<P::Dom>,
    ) -> Option<<P::Dom as Dom>::Element> {
        match event.kind {
            EventKind::Drop => event
                .point
                .and_then(|point| self.platform.element_from_point(point)),
            _ => self.platform.active_element(),
        }
    }
}

// self
use crate::{_prelude::*, obs::HandoffKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by handoff flows.
#[derive(Clone, Debug)]
pub struct HandoffSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl HandoffSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: HandoffKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("desktop_handoff.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> HandoffSpanGuard {
		#[cfg(feature = "tracing")]
		{
			HandoffSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			HandoffSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`HandoffSpan::entered`].
pub struct HandoffSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for HandoffSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("HandoffSpanGuard(..)")
	}
}

/// Emits a warning event when tracing is enabled; no-op otherwise.
pub fn warn_discarded(kind: HandoffKind, reason: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(flow = kind.as_str(), %reason, "Handoff input discarded.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, reason);
	}
}

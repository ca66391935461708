// self
use crate::obs::{HandoffKind, HandoffOutcome};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_handoff_outcome(kind: HandoffKind, outcome: HandoffOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"desktop_handoff_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_handoff_outcome_noop_without_metrics() {
		record_handoff_outcome(HandoffKind::Exchange, HandoffOutcome::Failure);
	}
}

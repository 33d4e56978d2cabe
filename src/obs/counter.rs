// self
use crate::obs::{FlowKind, FlowOutcome};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_issuer_flow_total",
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

/// Records [`FlowOutcome::Success`] or [`FlowOutcome::Failure`] for a finished flow.
pub fn record_flow_result<T, E>(kind: FlowKind, result: &Result<T, E>) {
	let outcome = if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure };

	record_flow_outcome(kind, outcome);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_flow_outcome_noop_without_recorder() {
		record_flow_outcome(FlowKind::Token, FlowOutcome::Failure);
		record_flow_result::<(), ()>(FlowKind::Bearer, &Err(()));
	}
}

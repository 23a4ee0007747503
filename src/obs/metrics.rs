// self
use crate::obs::{FetchOutcome, FetchStep};

/// Records a fetch outcome via the global metrics recorder (when enabled).
pub fn record_fetch_outcome(step: FetchStep, outcome: FetchOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"identity_resolver_fetch_total",
			"step" => step.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (step, outcome);
	}
}

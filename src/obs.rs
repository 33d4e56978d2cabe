//! Observability helpers: flow spans, flow counters, request context, and subscriber setup.
//!
//! # Feature Flags
//!
//! - Spans named `oauth2_issuer.flow` always carry the `flow`, `stage`, and `request_id` fields.
//! - Enable `metrics` to increment the `oauth2_issuer_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod context;
mod counter;
mod span;
mod subscriber;

pub use context::*;
pub use counter::*;
pub use span::*;
pub use subscriber::*;

// self
use crate::_prelude::*;

/// Flows observed by the issuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Token endpoint (client authentication + grant dispatch).
	Token,
	/// Bearer validation on protected routes.
	Bearer,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Token => "token",
			FlowKind::Bearer => "bearer",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

// crates.io
use tracing::{Span, instrument::Instrumented};
// self
use crate::{
	_prelude::*,
	obs::{FlowKind, RequestContext},
};

/// A span builder used by issuer flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	span: Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the flow kind, stage, and the request's correlation ID.
	pub fn new(kind: FlowKind, stage: &'static str, ctx: &RequestContext) -> Self {
		let span = tracing::info_span!(
			"oauth2_issuer.flow",
			flow = kind.as_str(),
			stage,
			request_id = %ctx.request_id
		);

		Self { span }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		tracing::Instrument::instrument(fut, self.span.clone())
	}
}

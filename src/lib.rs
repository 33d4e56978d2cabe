//! Minimal OAuth 2.0 authorization server: client-credentials issuance, signed stateless
//! access tokens backed by an authoritative in-memory registry, and a bearer gate for
//! protected routes.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod flows;
pub mod gate;
pub mod http;
pub mod obs;
pub mod store;

mod _prelude {
	pub use std::{
		collections::{BTreeSet, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

// Only the binary reports startup failures through `color-eyre`.
use color_eyre as _;

//! MTConnect OPC UA companion data types in pure rust.
//!
//! This crate provides the enumerations and the small structured data types
//! of the MTConnect OPC UA information model, together with the glue needed
//! to move them through an OPC UA codec: a structured encoder/decoder
//! boundary, OPC UA binary and XML implementations of that boundary, typed
//! collections and a registry resolving type ids to encoding ids.
//!
//! Every enumeration is generated from a single schema table (see
//! [`types::enums`]) and every "enum + fallback string" structure is an
//! instance of [`types::Extensible`].
//!
//! For an example of how to use the codecs see the demos folder.

use std::fmt;

use tracing_error::SpanTrace;

pub mod encoding;
pub mod registry;
pub mod types;

pub use encoding::{CodecConfig, Decoder, Encodeable, Encoder, EncodingError, UnknownEnumPolicy};
pub use registry::{ExpandedNodeId, TypeRegistry};
pub use types::{Collection, Extensible, MtDataItemType, MtStatistic, MtStructure, UaEnumeration};

/// Span trace captured when an error is built.
#[derive(Debug, Clone)]
pub struct SpanTraceWrapper(SpanTrace);

impl snafu::GenerateImplicitData for Box<SpanTraceWrapper> {
	fn generate() -> Self {
		Box::new(SpanTraceWrapper(SpanTrace::capture()))
	}
}

impl fmt::Display for SpanTraceWrapper {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.0.status() == tracing_error::SpanTraceStatus::CAPTURED {
			write!(f, "\nAt:\n")?;
			self.0.fmt(f)?;
		}
		Ok(())
	}
}

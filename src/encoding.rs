//! Structured encoder/decoder boundary.
//!
//! Types never touch the wire directly. They describe themselves as a
//! sequence of named fields written to an [`Encoder`] and read back from a
//! [`Decoder`]. The [`binary`] and [`xml`] modules implement the boundary for
//! the two OPC UA encodings.

use serde::{Deserialize, Serialize};
use snafu::Snafu;
use tracing::instrument;

use crate::{SpanTraceWrapper, types::UaEnumeration};

pub mod binary;
pub mod xml;

pub use binary::{BinaryDecoder, BinaryEncoder};
pub use xml::{XmlDecoder, XmlEncoder};

/// What a decoder does with an enumeration value it does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownEnumPolicy {
	/// Fail with [`EncodingError::UnknownEnumValue`] or
	/// [`EncodingError::UnknownEnumLabel`].
	#[default]
	Reject,
	/// Use the catch-all member of the enumeration when it has one. Plain
	/// enumerations without a catch-all still reject.
	MapToCatchAll,
}

/// Decoder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
	/// Handling of enumeration values outside the known set.
	pub unknown_enum_policy: UnknownEnumPolicy,
	/// Maximum accepted string length in bytes. `0` means unlimited.
	pub max_string_length: usize,
	/// Maximum accepted array length. `0` means unlimited.
	pub max_array_length: usize,
}

impl Default for CodecConfig {
	fn default() -> Self {
		Self { unknown_enum_policy: UnknownEnumPolicy::Reject, max_string_length: 0, max_array_length: 0 }
	}
}

impl CodecConfig {
	pub(crate) fn check_string_length(&self, length: usize) -> Result<(), EncodingError> {
		check_limit("string", length, self.max_string_length)
	}

	pub(crate) fn check_array_length(&self, length: usize) -> Result<(), EncodingError> {
		check_limit("array", length, self.max_array_length)
	}
}

fn check_limit(what: &'static str, length: usize, limit: usize) -> Result<(), EncodingError> {
	if limit != 0 && length > limit {
		return LimitExceeded { what, length, limit }.fail();
	}
	Ok(())
}

/// An enumeration value as it was found on the wire, before it is resolved
/// against the known members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEnumValue {
	/// Binary form.
	Numeric(i32),
	/// Text form (XML).
	Text(String),
}

impl RawEnumValue {
	/// Resolve against the known members of `E`.
	#[must_use]
	pub fn resolve<E: UaEnumeration>(&self) -> Option<E> {
		match self {
			Self::Numeric(value) => E::from_i32(*value),
			Self::Text(text) => E::parse_text(text),
		}
	}
}

impl std::fmt::Display for RawEnumValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Numeric(value) => write!(f, "{value}"),
			Self::Text(text) => f.write_str(text),
		}
	}
}

/// Resolve a raw enumeration value, applying the unknown value policy.
///
/// Returns the member and, when the catch-all was used, the unrecognised wire
/// text so callers can keep it.
#[instrument(level = "debug")]
pub fn resolve_enumerated<E: UaEnumeration>(
	raw: RawEnumValue,
	policy: UnknownEnumPolicy,
) -> Result<(E, Option<String>), EncodingError> {
	if let Some(value) = raw.resolve::<E>() {
		return Ok((value, None));
	}
	if policy == UnknownEnumPolicy::MapToCatchAll
		&& let Some(catch_all) = E::catch_all()
	{
		tracing::warn!("Unknown {} value {raw}. Mapping to {}", E::TYPE_NAME, catch_all.label());
		return Ok((catch_all, Some(raw.to_string())));
	}
	match raw {
		RawEnumValue::Numeric(value) => UnknownEnumValue { type_name: E::TYPE_NAME, value }.fail(),
		RawEnumValue::Text(label) => UnknownEnumLabel { type_name: E::TYPE_NAME, label }.fail(),
	}
}

/// Writes named fields to some wire format.
pub trait Encoder {
	/// Qualify the following fields with a namespace.
	fn push_namespace(&mut self, namespace_uri: &str);
	/// Undo the last [`Encoder::push_namespace`].
	fn pop_namespace(&mut self);
	/// Write an enumeration field.
	fn write_enumerated<E: UaEnumeration>(&mut self, field: &str, value: E) -> Result<(), EncodingError>;
	/// Write a string field. `None` is the null string.
	fn write_string(&mut self, field: &str, value: Option<&str>) -> Result<(), EncodingError>;
	/// Write a nested structure.
	fn write_encodeable<T: Encodeable>(&mut self, field: &str, value: &T) -> Result<(), EncodingError>;
	/// Write an array field. `None` is the null array.
	fn write_array<T: Element>(&mut self, field: &str, values: Option<&[T]>) -> Result<(), EncodingError>;
}

/// Reads named fields from some wire format.
pub trait Decoder {
	/// The configuration the decoder was created with.
	fn config(&self) -> &CodecConfig;
	/// Qualify the following fields with a namespace.
	fn push_namespace(&mut self, namespace_uri: &str);
	/// Undo the last [`Decoder::push_namespace`].
	fn pop_namespace(&mut self);
	/// Read an enumeration field without resolving it.
	fn read_raw_enumerated(&mut self, field: &str) -> Result<RawEnumValue, EncodingError>;
	/// Read a string field. `None` is the null string.
	fn read_string(&mut self, field: &str) -> Result<Option<String>, EncodingError>;
	/// Read a nested structure.
	fn read_encodeable<T: Encodeable>(&mut self, field: &str) -> Result<T, EncodingError>;
	/// Read an array field. `None` is the null array.
	fn read_array<T: Element>(&mut self, field: &str) -> Result<Option<Vec<T>>, EncodingError>;

	/// Read an enumeration field, applying the configured unknown value policy.
	fn read_enumerated<E: UaEnumeration>(&mut self, field: &str) -> Result<E, EncodingError> {
		self.read_enumerated_with_fallback(field).map(|(value, _)| value)
	}

	/// Like [`Decoder::read_enumerated`] but also returns the wire text of a
	/// value that was mapped to the catch-all member.
	fn read_enumerated_with_fallback<E: UaEnumeration>(
		&mut self,
		field: &str,
	) -> Result<(E, Option<String>), EncodingError> {
		let raw = self.read_raw_enumerated(field)?;
		resolve_enumerated(raw, self.config().unknown_enum_policy)
	}
}

/// A structured type that knows how to write and read its fields.
pub trait Encodeable: Sized {
	/// Write all fields in order.
	fn encode<W: Encoder>(&self, encoder: &mut W) -> Result<(), EncodingError>;
	/// Read all fields in order.
	fn decode<R: Decoder>(decoder: &mut R) -> Result<Self, EncodingError>;
}

/// A value that can be an array element.
pub trait Element: Sized {
	/// Element name used by text encodings.
	const ELEMENT_NAME: &'static str;
	/// Write a single element.
	fn write_element<W: Encoder>(&self, encoder: &mut W) -> Result<(), EncodingError>;
	/// Read a single element.
	fn read_element<R: Decoder>(decoder: &mut R) -> Result<Self, EncodingError>;
}

impl<E: UaEnumeration> Element for E {
	const ELEMENT_NAME: &'static str = E::TYPE_NAME;

	fn write_element<W: Encoder>(&self, encoder: &mut W) -> Result<(), EncodingError> {
		encoder.write_enumerated(Self::ELEMENT_NAME, *self)
	}

	fn read_element<R: Decoder>(decoder: &mut R) -> Result<Self, EncodingError> {
		decoder.read_enumerated(Self::ELEMENT_NAME)
	}
}

/// Errors of the encoders and decoders.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub), context(suffix(false)))]
pub enum EncodingError {
	/// The input ended in the middle of a value.
	#[snafu(display("Not enough bytes"))]
	NotEnoughBytes {
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// A slice had the wrong size for a fixed width value.
	#[snafu(display("Failed to convert to sized slice"))]
	SizedSlice {
		/// The underlying error.
		source: std::array::TryFromSliceError,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// A string field is not valid UTF-8.
	#[snafu(display("Invalid UTF-8 in field {field}"))]
	InvalidUtf8 {
		/// Name of the field.
		field: String,
		/// The underlying error.
		source: std::string::FromUtf8Error,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// A length prefix is negative (other than the null marker) or too large.
	#[snafu(display("Invalid length {length} for field {field}"))]
	InvalidLength {
		/// Name of the field.
		field: String,
		/// The length found.
		length: i64,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// A required field is absent.
	#[snafu(display("Missing field: {field}"))]
	MissingField {
		/// Name of the field.
		field: String,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// An XML element other than the requested one was found.
	#[snafu(display("Unexpected element. Expected: {expected}, Got: {found}"))]
	UnexpectedElement {
		/// The element that was requested.
		expected: String,
		/// The element that was found.
		found: String,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// The XML input is malformed.
	#[snafu(display("Invalid XML at {position}: {reason}"))]
	InvalidXml {
		/// Byte offset in the input.
		position: usize,
		/// What is wrong.
		reason: &'static str,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// An integer that is not a member of the enumeration.
	#[snafu(display("Unknown {type_name} value: {value}"))]
	UnknownEnumValue {
		/// Name of the enumeration.
		type_name: &'static str,
		/// The value found.
		value: i32,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// A text label that is not a member of the enumeration.
	#[snafu(display("Unknown {type_name} label: {label}"))]
	UnknownEnumLabel {
		/// Name of the enumeration.
		type_name: &'static str,
		/// The label found.
		label: String,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// A string or array is longer than the configured limit.
	#[snafu(display("The {what} length {length} exceeds the limit of {limit}"))]
	LimitExceeded {
		/// Kind of value, `string` or `array`.
		what: &'static str,
		/// The length found.
		length: usize,
		/// The configured limit.
		limit: usize,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// Input was left over after a whole value was decoded.
	#[snafu(display("{remaining} bytes of trailing data"))]
	TrailingData {
		/// Number of bytes or characters left.
		remaining: usize,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::enums::{AlarmStateType, ExecutionType, StatisticTypeEnum};

	#[test]
	fn test_resolve_known_values() -> Result<(), EncodingError> {
		let (value, fallback) =
			resolve_enumerated::<AlarmStateType>(RawEnumValue::Numeric(2), UnknownEnumPolicy::Reject)?;
		assert_eq!(value, AlarmStateType::Cleared);
		assert_eq!(fallback, None);

		let (value, _) = resolve_enumerated::<AlarmStateType>(
			RawEnumValue::Text("CLEARED_2".to_owned()),
			UnknownEnumPolicy::Reject,
		)?;
		assert_eq!(value, AlarmStateType::Cleared);
		Ok(())
	}

	#[test]
	fn test_resolve_unknown_rejected() {
		let result = resolve_enumerated::<AlarmStateType>(
			RawEnumValue::Text("SILENCED_3".to_owned()),
			UnknownEnumPolicy::Reject,
		);
		assert!(matches!(result, Err(EncodingError::UnknownEnumLabel { label, .. }) if label == "SILENCED_3"));

		let result =
			resolve_enumerated::<ExecutionType>(RawEnumValue::Numeric(99), UnknownEnumPolicy::Reject);
		assert!(matches!(result, Err(EncodingError::UnknownEnumValue { value: 99, .. })));
	}

	#[test]
	fn test_resolve_unknown_without_catch_all_still_rejected() {
		let result = resolve_enumerated::<ExecutionType>(
			RawEnumValue::Numeric(99),
			UnknownEnumPolicy::MapToCatchAll,
		);
		assert!(result.is_err());
	}

	#[test]
	fn test_resolve_unknown_mapped_to_catch_all() -> Result<(), EncodingError> {
		let (value, fallback) = resolve_enumerated::<StatisticTypeEnum>(
			RawEnumValue::Text("x:PERCENTILE_95".to_owned()),
			UnknownEnumPolicy::MapToCatchAll,
		)?;
		assert_eq!(value, StatisticTypeEnum::Other);
		assert_eq!(fallback.as_deref(), Some("x:PERCENTILE_95"));
		Ok(())
	}

	#[test]
	fn test_limits() {
		let config = CodecConfig { max_string_length: 4, max_array_length: 2, ..Default::default() };
		assert!(config.check_string_length(4).is_ok());
		assert!(config.check_string_length(5).is_err());
		assert!(config.check_array_length(3).is_err());
		assert!(CodecConfig::default().check_array_length(usize::MAX).is_ok());
	}

	#[test]
	fn test_config_from_json() -> Result<(), serde_json::Error> {
		let config: CodecConfig =
			serde_json::from_str(r#"{"unknown_enum_policy": "map_to_catch_all", "max_array_length": 16}"#)?;
		assert_eq!(config.unknown_enum_policy, UnknownEnumPolicy::MapToCatchAll);
		assert_eq!(config.max_array_length, 16);
		assert_eq!(config.max_string_length, 0);
		Ok(())
	}
}

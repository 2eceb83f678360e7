//! OPC UA binary encoding.
//!
//! Enumerations are little endian Int32. Strings and arrays are prefixed by
//! an Int32 length where `-1` is the null value. Field names and namespaces
//! are not part of the binary form.

use snafu::{OptionExt as _, ResultExt as _};
use tracing::instrument;

use crate::{
	encoding::{
		CodecConfig, Decoder, Element, Encodeable, Encoder, EncodingError, InvalidLength, InvalidUtf8,
		NotEnoughBytes, RawEnumValue, SizedSlice, TrailingData,
	},
	types::UaEnumeration,
};

const NULL_LENGTH: i32 = -1;

/// Writes fields in the OPC UA binary encoding.
#[derive(Debug, Default)]
pub struct BinaryEncoder {
	buffer: Vec<u8>,
}

impl BinaryEncoder {
	/// An encoder with an empty buffer.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The written bytes.
	#[must_use]
	pub fn into_bytes(self) -> Vec<u8> {
		self.buffer
	}

	fn write_i32(&mut self, value: i32) {
		self.buffer.extend_from_slice(&value.to_le_bytes());
	}

	fn write_length(&mut self, field: &str, length: Option<usize>) -> Result<(), EncodingError> {
		let Some(length) = length else {
			self.write_i32(NULL_LENGTH);
			return Ok(());
		};
		let length = i32::try_from(length)
			.ok()
			.with_context(|| InvalidLength { field, length: i64::try_from(length).unwrap_or(i64::MAX) })?;
		self.write_i32(length);
		Ok(())
	}
}

impl Encoder for BinaryEncoder {
	fn push_namespace(&mut self, _namespace_uri: &str) {}

	fn pop_namespace(&mut self) {}

	fn write_enumerated<E: UaEnumeration>(&mut self, _field: &str, value: E) -> Result<(), EncodingError> {
		self.write_i32(value.to_i32());
		Ok(())
	}

	fn write_string(&mut self, field: &str, value: Option<&str>) -> Result<(), EncodingError> {
		self.write_length(field, value.map(str::len))?;
		if let Some(value) = value {
			self.buffer.extend_from_slice(value.as_bytes());
		}
		Ok(())
	}

	fn write_encodeable<T: Encodeable>(&mut self, _field: &str, value: &T) -> Result<(), EncodingError> {
		value.encode(self)
	}

	fn write_array<T: Element>(&mut self, field: &str, values: Option<&[T]>) -> Result<(), EncodingError> {
		self.write_length(field, values.map(<[T]>::len))?;
		for value in values.unwrap_or_default() {
			value.write_element(self)?;
		}
		Ok(())
	}
}

/// Reads fields in the OPC UA binary encoding.
#[derive(Debug)]
pub struct BinaryDecoder<'a> {
	bytes: &'a [u8],
	position: usize,
	config: &'a CodecConfig,
}

impl<'a> BinaryDecoder<'a> {
	/// A decoder reading `bytes` from the start.
	#[must_use]
	pub const fn new(bytes: &'a [u8], config: &'a CodecConfig) -> Self {
		Self { bytes, position: 0, config }
	}

	/// Number of bytes not read yet.
	#[must_use]
	pub const fn remaining(&self) -> usize {
		self.bytes.len() - self.position
	}

	/// Check that the whole input was consumed.
	pub fn finish(&self) -> Result<(), EncodingError> {
		if self.remaining() != 0 {
			return TrailingData { remaining: self.remaining() }.fail();
		}
		Ok(())
	}

	fn take(&mut self, length: usize) -> Result<&'a [u8], EncodingError> {
		let end = self.position.checked_add(length).context(NotEnoughBytes)?;
		let bytes = self.bytes.get(self.position..end).context(NotEnoughBytes)?;
		self.position = end;
		Ok(bytes)
	}

	fn read_i32(&mut self) -> Result<i32, EncodingError> {
		Ok(i32::from_le_bytes(self.take(4)?.try_into().context(SizedSlice)?))
	}

	/// Read a length prefix. `None` is the null value.
	fn read_length(&mut self, field: &str) -> Result<Option<usize>, EncodingError> {
		let length = self.read_i32()?;
		if length == NULL_LENGTH {
			return Ok(None);
		}
		usize::try_from(length)
			.ok()
			.with_context(|| InvalidLength { field, length: i64::from(length) })
			.map(Some)
	}
}

impl Decoder for BinaryDecoder<'_> {
	fn config(&self) -> &CodecConfig {
		self.config
	}

	fn push_namespace(&mut self, _namespace_uri: &str) {}

	fn pop_namespace(&mut self) {}

	fn read_raw_enumerated(&mut self, _field: &str) -> Result<RawEnumValue, EncodingError> {
		self.read_i32().map(RawEnumValue::Numeric)
	}

	#[instrument(level = "debug", skip(self))]
	fn read_string(&mut self, field: &str) -> Result<Option<String>, EncodingError> {
		let Some(length) = self.read_length(field)? else {
			return Ok(None);
		};
		self.config.check_string_length(length)?;
		let bytes = self.take(length)?.to_vec();
		String::from_utf8(bytes).context(InvalidUtf8 { field }).map(Some)
	}

	fn read_encodeable<T: Encodeable>(&mut self, _field: &str) -> Result<T, EncodingError> {
		T::decode(self)
	}

	#[instrument(level = "debug", skip(self))]
	fn read_array<T: Element>(&mut self, field: &str) -> Result<Option<Vec<T>>, EncodingError> {
		let Some(length) = self.read_length(field)? else {
			return Ok(None);
		};
		self.config.check_array_length(length)?;
		// Every element takes at least one byte, do not trust the prefix
		// beyond that.
		let mut values = Vec::with_capacity(length.min(self.remaining()));
		for _ in 0..length {
			values.push(T::read_element(self)?);
		}
		Ok(Some(values))
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::types::{AlarmStateType, PowerStateType};

	#[test]
	fn test_string_encoding() -> Result<(), EncodingError> {
		let mut encoder = BinaryEncoder::new();
		encoder.write_string("A", Some("héllo"))?;
		encoder.write_string("B", Some(""))?;
		encoder.write_string("C", None)?;
		let bytes = encoder.into_bytes();
		assert_eq!(&bytes[..4], &[6, 0, 0, 0]);
		assert_eq!(&bytes[10..14], &[0, 0, 0, 0]);
		assert_eq!(&bytes[14..], &[0xff, 0xff, 0xff, 0xff]);

		let config = CodecConfig::default();
		let mut decoder = BinaryDecoder::new(&bytes, &config);
		assert_eq!(decoder.read_string("A")?.as_deref(), Some("héllo"));
		assert_eq!(decoder.read_string("B")?.as_deref(), Some(""));
		assert_eq!(decoder.read_string("C")?, None);
		decoder.finish()
	}

	#[test]
	fn test_enumerated_encoding() -> Result<(), EncodingError> {
		let mut encoder = BinaryEncoder::new();
		encoder.write_enumerated("State", AlarmStateType::Cleared)?;
		let bytes = encoder.into_bytes();
		assert_eq!(bytes, [2, 0, 0, 0]);

		let config = CodecConfig::default();
		let mut decoder = BinaryDecoder::new(&bytes, &config);
		assert_eq!(decoder.read_enumerated::<AlarmStateType>("State")?, AlarmStateType::Cleared);
		Ok(())
	}

	#[test]
	fn test_unknown_enumerated_value() {
		let config = CodecConfig::default();
		let mut decoder = BinaryDecoder::new(&[7, 0, 0, 0], &config);
		let result = decoder.read_enumerated::<PowerStateType>("State");
		assert!(matches!(result, Err(EncodingError::UnknownEnumValue { value: 7, .. })));
	}

	#[test]
	fn test_not_enough_bytes() {
		let config = CodecConfig::default();
		let mut decoder = BinaryDecoder::new(&[1, 0], &config);
		assert!(matches!(decoder.read_string("A"), Err(EncodingError::NotEnoughBytes { .. })));
	}

	#[test]
	fn test_negative_length() {
		let config = CodecConfig::default();
		let mut decoder = BinaryDecoder::new(&[0xfe, 0xff, 0xff, 0xff], &config);
		assert!(matches!(decoder.read_string("A"), Err(EncodingError::InvalidLength { length: -2, .. })));
	}

	#[test]
	fn test_huge_length_does_not_allocate() {
		let config = CodecConfig::default();
		let bytes = [0xff, 0xff, 0xff, 0x7f, 1, 0, 0, 0];
		let mut decoder = BinaryDecoder::new(&bytes, &config);
		assert!(decoder.read_array::<PowerStateType>("A").is_err());
	}

	#[test]
	fn test_invalid_utf8() {
		let config = CodecConfig::default();
		let mut decoder = BinaryDecoder::new(&[2, 0, 0, 0, 0xc3, 0x28], &config);
		assert!(matches!(decoder.read_string("A"), Err(EncodingError::InvalidUtf8 { .. })));
	}

	#[test]
	fn test_string_limit() {
		let mut encoder = BinaryEncoder::new();
		encoder.write_string("A", Some("too long")).unwrap();
		let bytes = encoder.into_bytes();
		let config = CodecConfig { max_string_length: 4, ..Default::default() };
		let mut decoder = BinaryDecoder::new(&bytes, &config);
		assert!(matches!(decoder.read_string("A"), Err(EncodingError::LimitExceeded { .. })));
	}
}

//! Enumerations paired with a free-text extension.

use std::{fmt, marker::PhantomData};

use serde::{
	Deserialize, Deserializer, Serialize, Serializer,
	de::{self, DeserializeOwned, IgnoredAny, MapAccess},
	ser::SerializeStruct as _,
};
use tracing::instrument;

use crate::{
	encoding::{Decoder, Element, Encodeable, Encoder, EncodingError},
	registry::{self, ExpandedNodeId},
	types::{
		Collection, UaEnumeration,
		enums::{DataItemTypeEnum, StatisticTypeEnum},
	},
};

/// A structured type known to the type registry.
pub trait StructuredType {
	/// The data type name.
	const TYPE_NAME: &'static str;
	/// The data type node.
	const TYPE_ID: ExpandedNodeId;
	/// The `Default Binary` encoding node.
	const BINARY_ENCODING_ID: ExpandedNodeId;
	/// The `Default XML` encoding node.
	const XML_ENCODING_ID: ExpandedNodeId;
}

/// An enumeration that has an `OTHER` member and a structure pairing it with
/// a free-text extension.
pub trait ExtensibleEnumeration: UaEnumeration + Default + Serialize + DeserializeOwned {
	/// The member whose meaning is given by the extension text.
	const OTHER: Self;
	/// Name of the structure wrapping this enumeration.
	const STRUCTURE_NAME: &'static str;
	/// Name of the enumeration field.
	const VALUE_FIELD: &'static str;
	/// Name of the extension field.
	const EXTENSION_FIELD: &'static str;
	/// Data type node of the structure.
	const TYPE_ID: ExpandedNodeId;
	/// `Default Binary` encoding node of the structure.
	const BINARY_ENCODING_ID: ExpandedNodeId;
	/// `Default XML` encoding node of the structure.
	const XML_ENCODING_ID: ExpandedNodeId;
}

impl ExtensibleEnumeration for DataItemTypeEnum {
	const OTHER: Self = Self::Other;
	const STRUCTURE_NAME: &'static str = "MTDataItemTypeDataType";
	const VALUE_FIELD: &'static str = "DataItemType";
	const EXTENSION_FIELD: &'static str = "ExtensionType";
	const TYPE_ID: ExpandedNodeId = registry::MT_DATA_ITEM_TYPE_DATA_TYPE;
	const BINARY_ENCODING_ID: ExpandedNodeId = registry::MT_DATA_ITEM_TYPE_DATA_TYPE_BINARY;
	const XML_ENCODING_ID: ExpandedNodeId = registry::MT_DATA_ITEM_TYPE_DATA_TYPE_XML;
}

impl ExtensibleEnumeration for StatisticTypeEnum {
	const OTHER: Self = Self::Other;
	const STRUCTURE_NAME: &'static str = "MTStatisticDataType";
	const VALUE_FIELD: &'static str = "Statistic";
	const EXTENSION_FIELD: &'static str = "ExtensionStatistic";
	const TYPE_ID: ExpandedNodeId = registry::MT_STATISTIC_DATA_TYPE;
	const BINARY_ENCODING_ID: ExpandedNodeId = registry::MT_STATISTIC_DATA_TYPE_BINARY;
	const XML_ENCODING_ID: ExpandedNodeId = registry::MT_STATISTIC_DATA_TYPE_XML;
}

/// The data item type structure.
pub type MtDataItemType = Extensible<DataItemTypeEnum>;
/// The statistic structure.
pub type MtStatistic = Extensible<StatisticTypeEnum>;
/// Typed list of [`MtDataItemType`] values.
pub type MtDataItemTypeCollection = Collection<MtDataItemType>;
/// Typed list of [`MtStatistic`] values.
pub type MtStatisticCollection = Collection<MtStatistic>;

/// An enumeration value with a free-text extension for values that are not
/// known members.
///
/// Built through [`Extensible::new`], [`Extensible::other`] and the setters,
/// the extension is present only when the value is the `OTHER` member.
/// Decoding is lossless and keeps whatever pair was on the wire; use
/// [`Extensible::is_consistent`] to check it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Extensible<E> {
	value: E,
	extension: Option<String>,
}

impl<E: ExtensibleEnumeration> Extensible<E> {
	/// A known value without extension.
	#[must_use]
	pub const fn new(value: E) -> Self {
		Self { value, extension: None }
	}

	/// The `OTHER` member with the given extension text.
	#[must_use]
	pub fn other(extension: impl Into<String>) -> Self {
		Self { value: E::OTHER, extension: Some(extension.into()) }
	}

	/// Build from both fields as they are, without applying the extension
	/// rule.
	#[must_use]
	pub const fn from_parts(value: E, extension: Option<String>) -> Self {
		Self { value, extension }
	}

	/// Both fields.
	#[must_use]
	pub fn into_parts(self) -> (E, Option<String>) {
		(self.value, self.extension)
	}

	/// The enumeration value.
	#[must_use]
	pub const fn value(&self) -> E {
		self.value
	}

	/// The extension text, `None` when null.
	#[must_use]
	pub fn extension(&self) -> Option<&str> {
		self.extension.as_deref()
	}

	/// Set the value. The extension is dropped unless the value is `OTHER`.
	pub fn set_value(&mut self, value: E) {
		self.value = value;
		if value != E::OTHER {
			self.extension = None;
		}
	}

	/// Set the extension. A `Some` extension switches the value to `OTHER`.
	pub fn set_extension(&mut self, extension: Option<String>) {
		if extension.is_some() {
			self.value = E::OTHER;
		}
		self.extension = extension;
	}

	/// Whether the extension is only present alongside the `OTHER` member.
	#[must_use]
	pub fn is_consistent(&self) -> bool {
		self.extension.is_none() || self.value == E::OTHER
	}
}

impl<E: ExtensibleEnumeration> From<E> for Extensible<E> {
	fn from(value: E) -> Self {
		Self::new(value)
	}
}

impl<E: ExtensibleEnumeration> fmt::Display for Extensible<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.extension {
			Some(extension) if self.value == E::OTHER => f.write_str(extension),
			_ => f.write_str(self.value.label()),
		}
	}
}

impl<E: ExtensibleEnumeration> StructuredType for Extensible<E> {
	const TYPE_NAME: &'static str = E::STRUCTURE_NAME;
	const TYPE_ID: ExpandedNodeId = E::TYPE_ID;
	const BINARY_ENCODING_ID: ExpandedNodeId = E::BINARY_ENCODING_ID;
	const XML_ENCODING_ID: ExpandedNodeId = E::XML_ENCODING_ID;
}

impl<E: ExtensibleEnumeration> Encodeable for Extensible<E> {
	fn encode<W: Encoder>(&self, encoder: &mut W) -> Result<(), EncodingError> {
		encoder.push_namespace(registry::MTCONNECT_NAMESPACE_URI);
		encoder.write_enumerated(E::VALUE_FIELD, self.value)?;
		encoder.write_string(E::EXTENSION_FIELD, self.extension.as_deref())?;
		encoder.pop_namespace();
		Ok(())
	}

	#[instrument(level = "debug", skip(decoder), fields(type_name = E::STRUCTURE_NAME))]
	fn decode<R: Decoder>(decoder: &mut R) -> Result<Self, EncodingError> {
		decoder.push_namespace(registry::MTCONNECT_NAMESPACE_URI);
		let (value, unrecognized) = decoder.read_enumerated_with_fallback::<E>(E::VALUE_FIELD)?;
		let extension = decoder.read_string(E::EXTENSION_FIELD)?;
		decoder.pop_namespace();

		// Keep the unknown wire value when nothing better describes it.
		let extension = match (extension, unrecognized) {
			(None, Some(raw)) => {
				tracing::debug!("Using unknown {} value {raw} as extension", E::TYPE_NAME);
				Some(raw)
			}
			(extension, _) => extension,
		};
		Ok(Self { value, extension })
	}
}

impl<E: ExtensibleEnumeration> Element for Extensible<E> {
	const ELEMENT_NAME: &'static str = E::STRUCTURE_NAME;

	fn write_element<W: Encoder>(&self, encoder: &mut W) -> Result<(), EncodingError> {
		encoder.write_encodeable(Self::ELEMENT_NAME, self)
	}

	fn read_element<R: Decoder>(decoder: &mut R) -> Result<Self, EncodingError> {
		decoder.read_encodeable(Self::ELEMENT_NAME)
	}
}

impl<E: ExtensibleEnumeration> Serialize for Extensible<E> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut state = serializer.serialize_struct(E::STRUCTURE_NAME, 2)?;
		state.serialize_field(E::VALUE_FIELD, &self.value)?;
		state.serialize_field(E::EXTENSION_FIELD, &self.extension)?;
		state.end()
	}
}

impl<'de, E: ExtensibleEnumeration> Deserialize<'de> for Extensible<E> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_map(ExtensibleVisitor::<E>(PhantomData))
	}
}

struct ExtensibleVisitor<E>(PhantomData<E>);

impl<'de, E: ExtensibleEnumeration> de::Visitor<'de> for ExtensibleVisitor<E> {
	type Value = Extensible<E>;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "a {} object", E::STRUCTURE_NAME)
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
		let mut value = None;
		let mut extension = None;
		while let Some(key) = map.next_key::<String>()? {
			if key == E::VALUE_FIELD {
				value = Some(map.next_value::<E>()?);
			} else if key == E::EXTENSION_FIELD {
				extension = map.next_value::<Option<String>>()?;
			} else {
				map.next_value::<IgnoredAny>()?;
			}
		}
		let value = value.ok_or_else(|| de::Error::missing_field(E::VALUE_FIELD))?;
		Ok(Extensible { value, extension })
	}
}

//! The closed set of structured types and whole-body codecs.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
	encoding::{
		BinaryDecoder, BinaryEncoder, CodecConfig, Decoder as _, Encodeable, Encoder as _, EncodingError,
		XmlDecoder, XmlEncoder,
	},
	registry::ExpandedNodeId,
	types::{MtDataItemType, MtStatistic, extensible::StructuredType},
};

/// The structured types of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
	/// `MTDataItemTypeDataType`.
	DataItemType,
	/// `MTStatisticDataType`.
	Statistic,
}

impl StructureKind {
	/// Every kind.
	pub const ALL: [Self; 2] = [Self::DataItemType, Self::Statistic];

	/// The data type name, also the XML root element.
	#[must_use]
	pub const fn type_name(self) -> &'static str {
		match self {
			Self::DataItemType => MtDataItemType::TYPE_NAME,
			Self::Statistic => MtStatistic::TYPE_NAME,
		}
	}

	/// The data type node.
	#[must_use]
	pub const fn type_id(self) -> ExpandedNodeId {
		match self {
			Self::DataItemType => MtDataItemType::TYPE_ID,
			Self::Statistic => MtStatistic::TYPE_ID,
		}
	}

	/// The `Default Binary` encoding node.
	#[must_use]
	pub const fn binary_encoding_id(self) -> ExpandedNodeId {
		match self {
			Self::DataItemType => MtDataItemType::BINARY_ENCODING_ID,
			Self::Statistic => MtStatistic::BINARY_ENCODING_ID,
		}
	}

	/// The `Default XML` encoding node.
	#[must_use]
	pub const fn xml_encoding_id(self) -> ExpandedNodeId {
		match self {
			Self::DataItemType => MtDataItemType::XML_ENCODING_ID,
			Self::Statistic => MtStatistic::XML_ENCODING_ID,
		}
	}

	/// Decode a binary body of this kind. The whole input must be consumed.
	#[instrument(level = "debug", skip(bytes, config))]
	pub fn decode_binary(self, bytes: &[u8], config: &CodecConfig) -> Result<MtStructure, EncodingError> {
		let mut decoder = BinaryDecoder::new(bytes, config);
		let structure = match self {
			Self::DataItemType => MtStructure::DataItemType(MtDataItemType::decode(&mut decoder)?),
			Self::Statistic => MtStructure::Statistic(MtStatistic::decode(&mut decoder)?),
		};
		decoder.finish()?;
		Ok(structure)
	}

	/// Decode an XML body of this kind. The body is a single element named
	/// after the type.
	#[instrument(level = "debug", skip(xml, config))]
	pub fn decode_xml(self, xml: &str, config: &CodecConfig) -> Result<MtStructure, EncodingError> {
		let mut decoder = XmlDecoder::new(xml, config);
		let structure = match self {
			Self::DataItemType => MtStructure::DataItemType(decoder.read_encodeable(self.type_name())?),
			Self::Statistic => MtStructure::Statistic(decoder.read_encodeable(self.type_name())?),
		};
		decoder.finish()?;
		Ok(structure)
	}
}

/// Any structured value of the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MtStructure {
	/// A data item type.
	DataItemType(MtDataItemType),
	/// A statistic.
	Statistic(MtStatistic),
}

impl MtStructure {
	/// Which structured type this is.
	#[must_use]
	pub const fn kind(&self) -> StructureKind {
		match self {
			Self::DataItemType(_) => StructureKind::DataItemType,
			Self::Statistic(_) => StructureKind::Statistic,
		}
	}

	/// The data type node.
	#[must_use]
	pub const fn type_id(&self) -> ExpandedNodeId {
		self.kind().type_id()
	}

	/// The `Default Binary` encoding node.
	#[must_use]
	pub const fn binary_encoding_id(&self) -> ExpandedNodeId {
		self.kind().binary_encoding_id()
	}

	/// The `Default XML` encoding node.
	#[must_use]
	pub const fn xml_encoding_id(&self) -> ExpandedNodeId {
		self.kind().xml_encoding_id()
	}

	/// Encode as a binary body.
	pub fn encode_binary(&self) -> Result<Vec<u8>, EncodingError> {
		let mut encoder = BinaryEncoder::new();
		match self {
			Self::DataItemType(value) => value.encode(&mut encoder)?,
			Self::Statistic(value) => value.encode(&mut encoder)?,
		}
		Ok(encoder.into_bytes())
	}

	/// Encode as an XML body with the type name as root element.
	pub fn encode_xml(&self) -> Result<String, EncodingError> {
		let mut encoder = XmlEncoder::new();
		let name = self.kind().type_name();
		match self {
			Self::DataItemType(value) => encoder.write_encodeable(name, value)?,
			Self::Statistic(value) => encoder.write_encodeable(name, value)?,
		}
		Ok(encoder.into_string())
	}
}

impl fmt::Display for MtStructure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::DataItemType(value) => write!(f, "{}({value})", self.kind().type_name()),
			Self::Statistic(value) => write!(f, "{}({value})", self.kind().type_name()),
		}
	}
}

impl From<MtDataItemType> for MtStructure {
	fn from(value: MtDataItemType) -> Self {
		Self::DataItemType(value)
	}
}

impl From<MtStatistic> for MtStructure {
	fn from(value: MtStatistic) -> Self {
		Self::Statistic(value)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::types::{DataItemTypeEnum, StatisticTypeEnum};

	#[test]
	fn test_identifiers_are_distinct() {
		let mut ids = Vec::new();
		for kind in StructureKind::ALL {
			ids.extend([kind.type_id(), kind.binary_encoding_id(), kind.xml_encoding_id()]);
		}
		for (i, id) in ids.iter().enumerate() {
			assert!(!ids[i + 1..].contains(id), "{id} is used twice");
		}
	}

	#[test]
	fn test_binary_round_trip() -> Result<(), EncodingError> {
		let config = CodecConfig::default();
		let structures: [MtStructure; 2] = [
			MtDataItemType::new(DataItemTypeEnum::Temperature).into(),
			MtStatistic::other("P95").into(),
		];
		for structure in structures {
			let bytes = structure.encode_binary()?;
			assert_eq!(structure.kind().decode_binary(&bytes, &config)?, structure);
		}
		Ok(())
	}

	#[test]
	fn test_xml_round_trip() -> Result<(), EncodingError> {
		let config = CodecConfig::default();
		let structure = MtStructure::from(MtStatistic::new(StatisticTypeEnum::Kurtosis));
		let xml = structure.encode_xml()?;
		assert!(xml.starts_with("<MTStatisticDataType "));
		assert_eq!(StructureKind::Statistic.decode_xml(&xml, &config)?, structure);
		Ok(())
	}

	#[test]
	fn test_trailing_bytes_rejected() -> Result<(), EncodingError> {
		let mut bytes = MtStructure::from(MtStatistic::default()).encode_binary()?;
		bytes.push(0);
		let result = StructureKind::Statistic.decode_binary(&bytes, &CodecConfig::default());
		assert!(matches!(result, Err(EncodingError::TrailingData { remaining: 1, .. })));
		Ok(())
	}

	#[test]
	fn test_wrong_root_element_rejected() {
		let xml = MtStructure::from(MtStatistic::default()).encode_xml().unwrap();
		let result = StructureKind::DataItemType.decode_xml(&xml, &CodecConfig::default());
		assert!(matches!(result, Err(EncodingError::UnexpectedElement { .. })));
	}
}

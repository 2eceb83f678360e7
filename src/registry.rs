//! Type registry.
//!
//! Maps the data type node of every structured type to its encoding nodes
//! and dispatches decoding of extension object bodies by encoding id.

use std::{collections::HashMap, fmt};

use lazy_static::lazy_static;
use snafu::{OptionExt as _, ResultExt as _, Snafu};
use tracing::instrument;

use crate::{
	SpanTraceWrapper,
	encoding::{CodecConfig, EncodingError},
	types::{MtStructure, StructureKind},
};

/// Namespace of the MTConnect companion model.
pub const MTCONNECT_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/MTConnect/v2/";

/// Data type node of `MTDataItemTypeDataType`.
pub const MT_DATA_ITEM_TYPE_DATA_TYPE: ExpandedNodeId = ExpandedNodeId::mtconnect(3010);
/// `Default Binary` encoding of `MTDataItemTypeDataType`.
pub const MT_DATA_ITEM_TYPE_DATA_TYPE_BINARY: ExpandedNodeId = ExpandedNodeId::mtconnect(5010);
/// `Default XML` encoding of `MTDataItemTypeDataType`.
pub const MT_DATA_ITEM_TYPE_DATA_TYPE_XML: ExpandedNodeId = ExpandedNodeId::mtconnect(5011);
/// Data type node of `MTStatisticDataType`.
pub const MT_STATISTIC_DATA_TYPE: ExpandedNodeId = ExpandedNodeId::mtconnect(3011);
/// `Default Binary` encoding of `MTStatisticDataType`.
pub const MT_STATISTIC_DATA_TYPE_BINARY: ExpandedNodeId = ExpandedNodeId::mtconnect(5012);
/// `Default XML` encoding of `MTStatisticDataType`.
pub const MT_STATISTIC_DATA_TYPE_XML: ExpandedNodeId = ExpandedNodeId::mtconnect(5013);

/// A numeric node id qualified by its namespace URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpandedNodeId {
	/// Namespace the identifier belongs to.
	pub namespace_uri: &'static str,
	/// Numeric identifier.
	pub identifier: u32,
}

impl ExpandedNodeId {
	/// A node id in the given namespace.
	#[must_use]
	pub const fn new(namespace_uri: &'static str, identifier: u32) -> Self {
		Self { namespace_uri, identifier }
	}

	/// A node id in the MTConnect namespace.
	#[must_use]
	pub const fn mtconnect(identifier: u32) -> Self {
		Self::new(MTCONNECT_NAMESPACE_URI, identifier)
	}
}

impl fmt::Display for ExpandedNodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "nsu={};i={}", self.namespace_uri, self.identifier)
	}
}

/// Wire format of an encoded body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingFormat {
	/// OPC UA binary.
	Binary,
	/// OPC UA XML.
	Xml,
}

/// The encoding nodes of a data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingIds {
	/// `Default Binary`.
	pub binary: ExpandedNodeId,
	/// `Default XML`.
	pub xml: ExpandedNodeId,
}

/// The body of an extension object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionBody {
	/// Binary encoded bytes.
	Binary(Vec<u8>),
	/// XML text.
	Xml(String),
}

impl ExtensionBody {
	/// Format of the body.
	#[must_use]
	pub const fn format(&self) -> EncodingFormat {
		match self {
			Self::Binary(_) => EncodingFormat::Binary,
			Self::Xml(_) => EncodingFormat::Xml,
		}
	}
}

/// An encoded structure tagged with its encoding id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionObject {
	/// Encoding node the body was written with.
	pub encoding_id: ExpandedNodeId,
	/// The encoded structure.
	pub body: ExtensionBody,
}

impl ExtensionObject {
	/// Encode a structure in the given format.
	pub fn encode(structure: &MtStructure, format: EncodingFormat) -> Result<Self, RegistryError> {
		let (encoding_id, body) = match format {
			EncodingFormat::Binary => (
				structure.binary_encoding_id(),
				ExtensionBody::Binary(structure.encode_binary().context(Encoding)?),
			),
			EncodingFormat::Xml => {
				(structure.xml_encoding_id(), ExtensionBody::Xml(structure.encode_xml().context(Encoding)?))
			}
		};
		Ok(Self { encoding_id, body })
	}

	/// Decode the body using the global registry.
	pub fn decode(&self, config: &CodecConfig) -> Result<MtStructure, RegistryError> {
		TypeRegistry::global().decode(self, config)
	}
}

/// Lookup tables for the structured types.
#[derive(Debug)]
pub struct TypeRegistry {
	by_type_id: HashMap<ExpandedNodeId, StructureKind>,
	by_encoding_id: HashMap<ExpandedNodeId, (StructureKind, EncodingFormat)>,
}

lazy_static! {
	static ref REGISTRY: TypeRegistry = TypeRegistry::new(&StructureKind::ALL);
}

impl TypeRegistry {
	/// Build a registry holding the given kinds.
	#[must_use]
	pub fn new(kinds: &[StructureKind]) -> Self {
		let mut by_type_id = HashMap::with_capacity(kinds.len());
		let mut by_encoding_id = HashMap::with_capacity(kinds.len() * 2);
		for &kind in kinds {
			by_type_id.insert(kind.type_id(), kind);
			by_encoding_id.insert(kind.binary_encoding_id(), (kind, EncodingFormat::Binary));
			by_encoding_id.insert(kind.xml_encoding_id(), (kind, EncodingFormat::Xml));
		}
		Self { by_type_id, by_encoding_id }
	}

	/// The registry of every structured type of the model.
	#[must_use]
	pub fn global() -> &'static Self {
		&REGISTRY
	}

	/// The structured type of a data type node.
	pub fn kind(&self, type_id: &ExpandedNodeId) -> Result<StructureKind, RegistryError> {
		self.by_type_id.get(type_id).copied().with_context(|| UnknownTypeId { id: *type_id })
	}

	/// The encoding nodes of a data type.
	pub fn encoding_ids(&self, type_id: &ExpandedNodeId) -> Result<EncodingIds, RegistryError> {
		let kind = self.kind(type_id)?;
		Ok(EncodingIds { binary: kind.binary_encoding_id(), xml: kind.xml_encoding_id() })
	}

	/// The type and format an encoding node stands for.
	pub fn resolve_encoding(
		&self,
		encoding_id: &ExpandedNodeId,
	) -> Result<(StructureKind, EncodingFormat), RegistryError> {
		self.by_encoding_id.get(encoding_id).copied().with_context(|| UnknownEncodingId { id: *encoding_id })
	}

	/// Decode an extension object body.
	#[instrument(level = "debug", skip(self, config), fields(encoding_id = %object.encoding_id))]
	pub fn decode(&self, object: &ExtensionObject, config: &CodecConfig) -> Result<MtStructure, RegistryError> {
		let (kind, format) = self.resolve_encoding(&object.encoding_id)?;
		if format != object.body.format() {
			return FormatMismatch { id: object.encoding_id, expected: format, found: object.body.format() }
				.fail();
		}
		tracing::debug!("Decoding {} from {format:?}", kind.type_name());
		let structure = match &object.body {
			ExtensionBody::Binary(bytes) => kind.decode_binary(bytes, config),
			ExtensionBody::Xml(xml) => kind.decode_xml(xml, config),
		};
		structure.context(Encoding)
	}
}

/// Errors of the type registry.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub), context(suffix(false)))]
pub enum RegistryError {
	/// No structured type has this data type id.
	#[snafu(display("Unknown type id: {id}"))]
	UnknownTypeId {
		/// The id that was looked up.
		id: ExpandedNodeId,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// No structured type has this encoding id.
	#[snafu(display("Unknown encoding id: {id}"))]
	UnknownEncodingId {
		/// The id that was looked up.
		id: ExpandedNodeId,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// The body format does not match the encoding id.
	#[snafu(display("Encoding {id} is {expected:?} but the body is {found:?}"))]
	FormatMismatch {
		/// The id that was looked up.
		id: ExpandedNodeId,
		/// Format of the encoding id.
		expected: EncodingFormat,
		/// Format of the body.
		found: EncodingFormat,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
	/// The body could not be encoded or decoded.
	#[snafu(display("Encoding error{context}"))]
	Encoding {
		/// The underlying error.
		source: EncodingError,
		/// Span trace captured where the error was built.
		#[snafu(implicit)]
		context: Box<SpanTraceWrapper>,
	},
}

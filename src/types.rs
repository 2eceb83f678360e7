//! MTConnect data types.

pub mod collection;
pub mod enumeration;
pub mod enums;
pub mod extensible;
pub mod structure;

pub use collection::Collection;
pub use enumeration::UaEnumeration;
pub use enums::*;
pub use extensible::{
	Extensible, ExtensibleEnumeration, MtDataItemType, MtDataItemTypeCollection, MtStatistic,
	MtStatisticCollection, StructuredType,
};
pub use structure::{MtStructure, StructureKind};

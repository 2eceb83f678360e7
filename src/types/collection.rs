//! Typed list collections.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::encoding::{Decoder, Element, Encoder, EncodingError};

/// An ordered, owned list of values of one type.
///
/// Cloning deep-copies every element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T> {
	items: Vec<T>,
}

impl<T> Default for Collection<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Collection<T> {
	/// An empty collection.
	#[must_use]
	pub const fn new() -> Self {
		Self { items: Vec::new() }
	}

	/// An empty collection with room for `capacity` values.
	#[must_use]
	pub fn with_capacity(capacity: usize) -> Self {
		Self { items: Vec::with_capacity(capacity) }
	}

	/// Append a value.
	pub fn push(&mut self, value: T) {
		self.items.push(value);
	}

	/// The values in order.
	#[must_use]
	pub fn into_vec(self) -> Vec<T> {
		self.items
	}
}

impl<T: Clone> Collection<T> {
	/// Build a collection from an array. A null array gives an empty
	/// collection.
	#[must_use]
	pub fn from_array(values: Option<&[T]>) -> Self {
		values.map(Self::from).unwrap_or_default()
	}

	/// Copy a collection into a new array. A null collection gives a null
	/// array.
	#[must_use]
	pub fn to_array(collection: Option<&Self>) -> Option<Vec<T>> {
		collection.map(|collection| collection.items.clone())
	}
}

impl<T: Element> Collection<T> {
	/// Field name used when the collection is written on its own.
	#[must_use]
	pub fn list_name() -> String {
		format!("ListOf{}", T::ELEMENT_NAME)
	}

	/// Write the collection as an array field. A null collection is written
	/// as the null array.
	pub fn encode<W: Encoder>(
		collection: Option<&Self>,
		encoder: &mut W,
		field: &str,
	) -> Result<(), EncodingError> {
		encoder.write_array(field, collection.map(|collection| collection.items.as_slice()))
	}

	/// Read an array field. The null array is returned as `None`.
	#[instrument(level = "debug", skip(decoder))]
	pub fn decode<R: Decoder>(decoder: &mut R, field: &str) -> Result<Option<Self>, EncodingError> {
		Ok(decoder.read_array::<T>(field)?.map(Self::from))
	}
}

impl<T> Deref for Collection<T> {
	type Target = [T];

	fn deref(&self) -> &Self::Target {
		&self.items
	}
}

impl<T> DerefMut for Collection<T> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.items
	}
}

impl<T> AsRef<[T]> for Collection<T> {
	fn as_ref(&self) -> &[T] {
		&self.items
	}
}

impl<T> From<Vec<T>> for Collection<T> {
	fn from(items: Vec<T>) -> Self {
		Self { items }
	}
}

impl<T: Clone> From<&[T]> for Collection<T> {
	fn from(items: &[T]) -> Self {
		Self { items: items.to_vec() }
	}
}

impl<T> From<Collection<T>> for Vec<T> {
	fn from(collection: Collection<T>) -> Self {
		collection.items
	}
}

impl<T> FromIterator<T> for Collection<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self { items: iter.into_iter().collect() }
	}
}

impl<T> Extend<T> for Collection<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		self.items.extend(iter);
	}
}

impl<T> IntoIterator for Collection<T> {
	type Item = T;
	type IntoIter = std::vec::IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}

impl<'a, T> IntoIterator for &'a Collection<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::{
		encoding::{BinaryDecoder, BinaryEncoder, CodecConfig, XmlDecoder, XmlEncoder},
		types::{
			ExecutionType, ExecutionTypeCollection, MtStatistic, StatisticTypeEnum,
			extensible::StructuredType as _,
		},
	};

	fn statistics() -> Collection<MtStatistic> {
		[
			MtStatistic::new(StatisticTypeEnum::Average),
			MtStatistic::other("P95"),
			MtStatistic::from_parts(StatisticTypeEnum::Other, Some(String::new())),
		]
		.into_iter()
		.collect()
	}

	#[test]
	fn test_array_round_trip() {
		let arrays: [&[ExecutionType]; 3] = [
			&[],
			&[ExecutionType::Wait],
			&[ExecutionType::Active, ExecutionType::FeedHold, ExecutionType::Active],
		];
		for array in arrays {
			let collection = ExecutionTypeCollection::from_array(Some(array));
			assert_eq!(collection.len(), array.len());
			assert_eq!(Collection::to_array(Some(&collection)).unwrap(), array);
		}
	}

	#[test]
	fn test_null_conversions() {
		let collection = Collection::<ExecutionType>::from_array(None);
		assert!(collection.is_empty());
		assert_eq!(Collection::<ExecutionType>::to_array(None), None);
	}

	#[test]
	fn test_construction() {
		let mut collection = Collection::with_capacity(4);
		collection.push(ExecutionType::Ready);
		collection.extend([ExecutionType::Active, ExecutionType::Stopped]);
		assert_eq!(collection[1], ExecutionType::Active);
		assert_eq!(
			collection.into_vec(),
			vec![ExecutionType::Ready, ExecutionType::Active, ExecutionType::Stopped]
		);
		assert!(Collection::<MtStatistic>::new().is_empty());
	}

	#[test]
	fn test_clone_is_deep() {
		let original = statistics();
		let mut copy = original.clone();
		assert_eq!(copy.len(), original.len());
		for (copied, item) in copy.iter().zip(original.iter()) {
			assert_eq!(copied, item);
		}
		copy[1].set_extension(Some("P99".to_owned()));
		assert_eq!(original[1].extension(), Some("P95"));
		assert_ne!(copy, original);
	}

	#[test]
	fn test_binary_encoding() -> Result<(), EncodingError> {
		let collection = ExecutionTypeCollection::from(vec![ExecutionType::Wait, ExecutionType::Stopped]);
		let mut encoder = BinaryEncoder::new();
		Collection::encode(Some(&collection), &mut encoder, "Values")?;
		Collection::<ExecutionType>::encode(None, &mut encoder, "Values")?;
		let bytes = encoder.into_bytes();
		assert_eq!(bytes, [2, 0, 0, 0, 3, 0, 0, 0, 5, 0, 0, 0, 0xff, 0xff, 0xff, 0xff]);

		let config = CodecConfig::default();
		let mut decoder = BinaryDecoder::new(&bytes, &config);
		assert_eq!(Collection::decode(&mut decoder, "Values")?, Some(collection));
		assert_eq!(Collection::<ExecutionType>::decode(&mut decoder, "Values")?, None);
		decoder.finish()
	}

	#[test]
	fn test_xml_encoding() -> Result<(), EncodingError> {
		let collection = statistics();
		let field = Collection::<MtStatistic>::list_name();
		assert_eq!(field, format!("ListOf{}", MtStatistic::TYPE_NAME));

		let mut encoder = XmlEncoder::new();
		Collection::encode(Some(&collection), &mut encoder, &field)?;
		let xml = encoder.into_string();

		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new(&xml, &config);
		assert_eq!(Collection::decode(&mut decoder, &field)?, Some(collection));
		decoder.finish()
	}

	#[test]
	fn test_xml_empty_and_null() -> Result<(), EncodingError> {
		let mut encoder = XmlEncoder::new();
		Collection::encode(Some(&ExecutionTypeCollection::new()), &mut encoder, "Values")?;
		Collection::<ExecutionType>::encode(None, &mut encoder, "Missing")?;
		let xml = encoder.into_string();
		assert_eq!(xml, "<Values/>");

		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new(&xml, &config);
		assert_eq!(Collection::<ExecutionType>::decode(&mut decoder, "Values")?, Some(Collection::new()));
		assert_eq!(Collection::<ExecutionType>::decode(&mut decoder, "Missing")?, None);
		Ok(())
	}

	#[test]
	fn test_array_limit() {
		let collection = ExecutionTypeCollection::from(vec![ExecutionType::Wait; 3]);
		let mut encoder = BinaryEncoder::new();
		Collection::encode(Some(&collection), &mut encoder, "Values").unwrap();
		let bytes = encoder.into_bytes();

		let config = CodecConfig { max_array_length: 2, ..Default::default() };
		let mut decoder = BinaryDecoder::new(&bytes, &config);
		let result = Collection::<ExecutionType>::decode(&mut decoder, "Values");
		assert!(matches!(result, Err(EncodingError::LimitExceeded { limit: 2, .. })));
	}

	#[test]
	fn test_json_is_a_plain_array() -> Result<(), serde_json::Error> {
		let collection = ExecutionTypeCollection::from(vec![ExecutionType::Ready, ExecutionType::Wait]);
		let json = serde_json::to_string(&collection)?;
		assert_eq!(json, r#"["READY_0","WAIT_3"]"#);
		assert_eq!(serde_json::from_str::<ExecutionTypeCollection>(&json)?, collection);
		Ok(())
	}
}

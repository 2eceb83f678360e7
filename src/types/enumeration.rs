//! The enumeration trait and the schema table macro.

use std::{fmt, hash::Hash, marker::PhantomData};

use serde::{Deserializer, Serializer, de};

/// A closed set of named integer constants with stable wire labels.
///
/// Implemented by the `ua_enumerations!` schema table. Labels have the
/// `NAME_value` form used by the OPC UA XML and JSON encodings.
pub trait UaEnumeration: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
	/// The data type name.
	const TYPE_NAME: &'static str;
	/// Every member, in declaration order.
	const MEMBERS: &'static [Self];

	/// The integer value.
	fn to_i32(self) -> i32;
	/// The member with the given integer value.
	fn from_i32(value: i32) -> Option<Self>;
	/// The bare member name, e.g. `ACTIVE`.
	fn name(self) -> &'static str;
	/// The wire label, e.g. `ACTIVE_1`.
	fn label(self) -> &'static str;

	/// The member unknown values can be mapped to, if any.
	fn catch_all() -> Option<Self> {
		None
	}

	/// The member with the given wire label.
	fn from_label(label: &str) -> Option<Self> {
		Self::MEMBERS.iter().copied().find(|member| member.label() == label)
	}

	/// Parse any of the accepted text forms: the wire label, the bare name or
	/// a bare integer. A label is only accepted whole, so `SILENCED_2` is not
	/// `CLEARED_2`.
	fn parse_text(text: &str) -> Option<Self> {
		let text = text.trim();
		if let Some(member) = Self::from_label(text) {
			return Some(member);
		}
		if let Some(member) = Self::MEMBERS.iter().copied().find(|member| member.name() == text) {
			return Some(member);
		}
		text.parse::<i32>().ok().and_then(Self::from_i32)
	}
}

/// Serialize an enumeration as its wire label.
pub(crate) fn serialize_enumeration<E: UaEnumeration, S: Serializer>(
	value: E,
	serializer: S,
) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(value.label())
}

/// Deserialize an enumeration from any accepted text form or an integer.
pub(crate) fn deserialize_enumeration<'de, E: UaEnumeration, D: Deserializer<'de>>(
	deserializer: D,
) -> Result<E, D::Error> {
	deserializer.deserialize_any(EnumerationVisitor::<E>(PhantomData))
}

struct EnumerationVisitor<E>(PhantomData<E>);

impl<E: UaEnumeration> de::Visitor<'_> for EnumerationVisitor<E> {
	type Value = E;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "a {} label or integer value", E::TYPE_NAME)
	}

	fn visit_str<Er: de::Error>(self, v: &str) -> Result<E, Er> {
		E::parse_text(v).ok_or_else(|| Er::invalid_value(de::Unexpected::Str(v), &self))
	}

	fn visit_i64<Er: de::Error>(self, v: i64) -> Result<E, Er> {
		i32::try_from(v)
			.ok()
			.and_then(E::from_i32)
			.ok_or_else(|| Er::invalid_value(de::Unexpected::Signed(v), &self))
	}

	fn visit_u64<Er: de::Error>(self, v: u64) -> Result<E, Er> {
		i32::try_from(v)
			.ok()
			.and_then(E::from_i32)
			.ok_or_else(|| Er::invalid_value(de::Unexpected::Unsigned(v), &self))
	}
}

macro_rules! optional {
	() => {
		None
	};
	($($lit: tt)+) => {
		Some($($lit)*)
	};
}

/// Declare enumerations from a schema table.
///
/// Each entry is `Name => CollectionAlias { Member = value => "LABEL", .. }`,
/// optionally followed by `[catch_all = Member]` after the name. The first
/// member is the default.
macro_rules! ua_enumerations {
	($(
		$(#[$meta:meta])*
		$name:ident => $collection:ident $([catch_all = $other:ident])? {
			$(#[$first_meta:meta])* $first:ident = $first_value:literal => $first_name:literal
			$(, $(#[$variant_meta:meta])* $variant:ident = $value:literal => $variant_name:literal)* $(,)?
		}
	)*) => {$(
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
		#[repr(i32)]
		pub enum $name {
			$(#[$first_meta])*
			#[doc = concat!("`", $first_name, "_", $first_value, "`")]
			#[default]
			$first = $first_value,
			$(
				$(#[$variant_meta])*
				#[doc = concat!("`", $variant_name, "_", $value, "`")]
				$variant = $value,
			)*
		}

		#[doc = concat!("Typed list of [`", stringify!($name), "`] values.")]
		pub type $collection = $crate::types::Collection<$name>;

		impl $crate::types::UaEnumeration for $name {
			const TYPE_NAME: &'static str = stringify!($name);
			const MEMBERS: &'static [Self] = &[Self::$first, $(Self::$variant),*];

			fn to_i32(self) -> i32 {
				self as i32
			}

			fn from_i32(value: i32) -> Option<Self> {
				match value {
					$first_value => Some(Self::$first),
					$($value => Some(Self::$variant),)*
					_ => None,
				}
			}

			fn name(self) -> &'static str {
				match self {
					Self::$first => $first_name,
					$(Self::$variant => $variant_name,)*
				}
			}

			fn label(self) -> &'static str {
				match self {
					Self::$first => concat!($first_name, "_", $first_value),
					$(Self::$variant => concat!($variant_name, "_", $value),)*
				}
			}

			fn catch_all() -> Option<Self> {
				$crate::types::enumeration::optional!($(Self::$other)?)
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str($crate::types::UaEnumeration::label(*self))
			}
		}

		impl std::str::FromStr for $name {
			type Err = $crate::encoding::EncodingError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				<Self as $crate::types::UaEnumeration>::parse_text(s).ok_or_else(|| {
					$crate::encoding::UnknownEnumLabel { type_name: stringify!($name), label: s }.build()
				})
			}
		}

		impl TryFrom<i32> for $name {
			type Error = $crate::encoding::EncodingError;

			fn try_from(value: i32) -> Result<Self, Self::Error> {
				<Self as $crate::types::UaEnumeration>::from_i32(value).ok_or_else(|| {
					$crate::encoding::UnknownEnumValue { type_name: stringify!($name), value }.build()
				})
			}
		}

		impl From<$name> for i32 {
			fn from(value: $name) -> Self {
				value as i32
			}
		}

		impl num_traits::FromPrimitive for $name {
			fn from_i64(n: i64) -> Option<Self> {
				i32::try_from(n).ok().and_then(<Self as $crate::types::UaEnumeration>::from_i32)
			}

			fn from_u64(n: u64) -> Option<Self> {
				i32::try_from(n).ok().and_then(<Self as $crate::types::UaEnumeration>::from_i32)
			}
		}

		impl num_traits::ToPrimitive for $name {
			fn to_i64(&self) -> Option<i64> {
				Some(i64::from(*self as i32))
			}

			fn to_u64(&self) -> Option<u64> {
				u64::try_from(*self as i32).ok()
			}
		}

		impl serde::Serialize for $name {
			fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				$crate::types::enumeration::serialize_enumeration(*self, serializer)
			}
		}

		impl<'de> serde::Deserialize<'de> for $name {
			fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				$crate::types::enumeration::deserialize_enumeration(deserializer)
			}
		}
	)*};
}

pub(crate) use {optional, ua_enumerations};

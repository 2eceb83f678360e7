//! OPC UA XML encoding.
//!
//! Every field is an element named after the field. Enumerations are written
//! as their wire label, a null string or array is an omitted element, and a
//! namespace pushed by a structure is declared on the structure element.

use tracing::instrument;

use crate::{
	encoding::{
		CodecConfig, Decoder, Element, Encodeable, Encoder, EncodingError, InvalidXml, MissingField,
		RawEnumValue, TrailingData, UnexpectedElement,
	},
	types::UaEnumeration,
};

/// Writes fields as OPC UA XML elements.
#[derive(Debug, Default)]
pub struct XmlEncoder {
	output: String,
	/// Namespaces in scope, innermost last.
	namespaces: Vec<String>,
	/// A namespace to declare on the next element.
	pending_namespace: Option<String>,
	/// Whether the last start tag still misses its `>`.
	tag_open: bool,
}

impl XmlEncoder {
	/// An encoder with empty output.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The written XML.
	#[must_use]
	pub fn into_string(mut self) -> String {
		self.close_start_tag();
		self.output
	}

	fn start_element(&mut self, name: &str) {
		self.close_start_tag();
		self.output.push('<');
		self.output.push_str(name);
		if let Some(namespace_uri) = self.pending_namespace.take() {
			self.write_namespace_declaration(&namespace_uri);
		}
		self.tag_open = true;
	}

	fn close_start_tag(&mut self) {
		if self.tag_open {
			self.output.push('>');
			self.tag_open = false;
		}
	}

	fn end_element(&mut self, name: &str) {
		if self.tag_open {
			self.output.push_str("/>");
			self.tag_open = false;
		} else {
			self.output.push_str("</");
			self.output.push_str(name);
			self.output.push('>');
		}
	}

	fn write_text_element(&mut self, name: &str, text: &str) {
		self.start_element(name);
		self.close_start_tag();
		escape_into(&mut self.output, text);
		self.end_element(name);
	}

	fn write_namespace_declaration(&mut self, namespace_uri: &str) {
		self.output.push_str(" xmlns=\"");
		escape_into(&mut self.output, namespace_uri);
		self.output.push('"');
	}
}

impl Encoder for XmlEncoder {
	fn push_namespace(&mut self, namespace_uri: &str) {
		if self.namespaces.last().map(String::as_str) != Some(namespace_uri) {
			if self.tag_open {
				self.write_namespace_declaration(namespace_uri);
			} else {
				self.pending_namespace = Some(namespace_uri.to_owned());
			}
		}
		self.namespaces.push(namespace_uri.to_owned());
	}

	fn pop_namespace(&mut self) {
		self.namespaces.pop();
		self.pending_namespace = None;
	}

	fn write_enumerated<E: UaEnumeration>(&mut self, field: &str, value: E) -> Result<(), EncodingError> {
		self.write_text_element(field, value.label());
		Ok(())
	}

	fn write_string(&mut self, field: &str, value: Option<&str>) -> Result<(), EncodingError> {
		if let Some(value) = value {
			self.write_text_element(field, value);
		}
		Ok(())
	}

	fn write_encodeable<T: Encodeable>(&mut self, field: &str, value: &T) -> Result<(), EncodingError> {
		self.start_element(field);
		value.encode(self)?;
		self.end_element(field);
		Ok(())
	}

	fn write_array<T: Element>(&mut self, field: &str, values: Option<&[T]>) -> Result<(), EncodingError> {
		let Some(values) = values else {
			return Ok(());
		};
		self.start_element(field);
		for value in values {
			value.write_element(self)?;
		}
		self.end_element(field);
		Ok(())
	}
}

fn escape_into(output: &mut String, text: &str) {
	for c in text.chars() {
		match c {
			'&' => output.push_str("&amp;"),
			'<' => output.push_str("&lt;"),
			'>' => output.push_str("&gt;"),
			'"' => output.push_str("&quot;"),
			'\'' => output.push_str("&apos;"),
			c => output.push(c),
		}
	}
}

/// Local part of a possibly prefixed element name.
fn local_name(name: &str) -> &str {
	name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Reads fields from OPC UA XML elements.
///
/// Fields are matched on the local element name. Prefixes and `xmlns`
/// declarations are not checked, so [`Decoder::push_namespace`] and
/// [`Decoder::pop_namespace`] do nothing here. Unknown elements in front of
/// a requested field or at the end of a structure are skipped.
#[derive(Debug)]
pub struct XmlDecoder<'a> {
	input: &'a str,
	position: usize,
	config: &'a CodecConfig,
}

impl<'a> XmlDecoder<'a> {
	/// A decoder reading `input` from the start.
	#[must_use]
	pub const fn new(input: &'a str, config: &'a CodecConfig) -> Self {
		Self { input, position: 0, config }
	}

	/// Check that nothing but whitespace, comments or processing
	/// instructions is left.
	pub fn finish(&mut self) -> Result<(), EncodingError> {
		self.skip_misc()?;
		let remaining = self.input.len() - self.position;
		if remaining != 0 {
			return TrailingData { remaining }.fail();
		}
		Ok(())
	}

	fn rest(&self) -> &'a str {
		&self.input[self.position..]
	}

	fn invalid<T>(&self, reason: &'static str) -> Result<T, EncodingError> {
		InvalidXml { position: self.position, reason }.fail()
	}

	/// Skip whitespace, comments and processing instructions.
	fn skip_misc(&mut self) -> Result<(), EncodingError> {
		loop {
			let rest = self.rest();
			self.position += rest.len() - rest.trim_start().len();
			let rest = self.rest();
			let terminator = if rest.starts_with("<?") {
				"?>"
			} else if rest.starts_with("<!--") {
				"-->"
			} else {
				return Ok(());
			};
			let Some(end) = rest.find(terminator) else {
				return self.invalid("unterminated comment or declaration");
			};
			self.position += end + terminator.len();
		}
	}

	/// Name of the next start tag, if the next token is one.
	fn peek_element(&mut self) -> Result<Option<&'a str>, EncodingError> {
		self.skip_misc()?;
		let rest = self.rest();
		let Some(tag) = rest.strip_prefix('<') else {
			return Ok(None);
		};
		if tag.starts_with('/') {
			return Ok(None);
		}
		let end = tag.find(|c: char| c.is_whitespace() || c == '/' || c == '>').unwrap_or(tag.len());
		if end == 0 {
			return self.invalid("empty element name");
		}
		Ok(Some(&tag[..end]))
	}

	/// Consume the start tag of `field`. Returns whether the element is
	/// empty (`<field/>`).
	fn open_element(&mut self, field: &str) -> Result<bool, EncodingError> {
		match self.peek_element()? {
			None => return MissingField { field }.fail(),
			Some(name) if local_name(name) != field => {
				return UnexpectedElement { expected: field, found: name }.fail();
			}
			Some(_) => {}
		}
		self.consume_start_tag()
	}

	/// Consume a start tag, skipping its attributes.
	fn consume_start_tag(&mut self) -> Result<bool, EncodingError> {
		let mut quote = None;
		let mut previous = '<';
		for (index, c) in self.rest().char_indices() {
			match (quote, c) {
				(Some(q), c) if c == q => quote = None,
				(Some(_), _) => {}
				(None, '"' | '\'') => quote = Some(c),
				(None, '>') => {
					self.position += index + 1;
					return Ok(previous == '/');
				}
				(None, _) => {}
			}
			previous = c;
		}
		self.invalid("unterminated start tag")
	}

	fn read_text(&mut self) -> Result<String, EncodingError> {
		let rest = self.rest();
		let Some(end) = rest.find('<') else {
			return self.invalid("unterminated element");
		};
		let text = unescape(&rest[..end]).or_else(|reason| self.invalid(reason))?;
		self.position += end;
		Ok(text)
	}

	fn close_element(&mut self, field: &str) -> Result<(), EncodingError> {
		self.skip_misc()?;
		let rest = self.rest();
		let Some(tag) = rest.strip_prefix("</") else {
			let found = self.peek_element()?.unwrap_or_default();
			return UnexpectedElement { expected: format!("/{field}"), found }.fail();
		};
		let Some(end) = tag.find('>') else {
			return self.invalid("unterminated end tag");
		};
		let name = tag[..end].trim();
		if local_name(name) != field {
			return UnexpectedElement { expected: format!("/{field}"), found: format!("/{name}") }.fail();
		}
		self.position += 2 + end + 1;
		Ok(())
	}

	/// Skip the next element including all its children.
	///
	/// Open elements are tracked on the heap so the nesting depth of the
	/// input does not bound the stack.
	fn skip_element(&mut self) -> Result<(), EncodingError> {
		let Some(name) = self.peek_element()? else {
			return self.invalid("expected an element");
		};
		tracing::debug!("Skipping unknown element {name}");
		if self.consume_start_tag()? {
			return Ok(());
		}
		let mut open = vec![name];
		while let Some(&innermost) = open.last() {
			if let Some(child) = self.peek_element()? {
				if !self.consume_start_tag()? {
					open.push(child);
				}
			} else if self.rest().starts_with("</") {
				self.close_element(local_name(innermost))?;
				open.pop();
			} else {
				self.read_text()?;
			}
		}
		Ok(())
	}

	fn skip_unknown_children(&mut self) -> Result<(), EncodingError> {
		while self.peek_element()?.is_some() {
			self.skip_element()?;
		}
		Ok(())
	}

	/// Move to the next sibling named `field`, skipping unknown siblings in
	/// front of it. When no such sibling follows nothing is consumed.
	fn seek_field(&mut self, field: &str) -> Result<bool, EncodingError> {
		let start = self.position;
		while let Some(name) = self.peek_element()? {
			if local_name(name) == field {
				return Ok(true);
			}
			self.skip_element()?;
		}
		self.position = start;
		Ok(false)
	}
}

fn unescape(text: &str) -> Result<String, &'static str> {
	let mut output = String::with_capacity(text.len());
	let mut rest = text;
	while let Some(start) = rest.find('&') {
		output.push_str(&rest[..start]);
		rest = &rest[start..];
		let end = rest.find(';').ok_or("unterminated entity")?;
		let entity = &rest[1..end];
		let c = match entity {
			"amp" => '&',
			"lt" => '<',
			"gt" => '>',
			"quot" => '"',
			"apos" => '\'',
			_ => {
				let code = if let Some(hex) = entity.strip_prefix("#x") {
					u32::from_str_radix(hex, 16).ok()
				} else if let Some(decimal) = entity.strip_prefix('#') {
					decimal.parse().ok()
				} else {
					None
				};
				code.and_then(char::from_u32).ok_or("invalid entity")?
			}
		};
		output.push(c);
		rest = &rest[end + 1..];
	}
	output.push_str(rest);
	Ok(output)
}

impl Decoder for XmlDecoder<'_> {
	fn config(&self) -> &CodecConfig {
		self.config
	}

	fn push_namespace(&mut self, _namespace_uri: &str) {}

	fn pop_namespace(&mut self) {}

	fn read_raw_enumerated(&mut self, field: &str) -> Result<RawEnumValue, EncodingError> {
		if !self.seek_field(field)? {
			return MissingField { field }.fail();
		}
		if self.open_element(field)? {
			return Ok(RawEnumValue::Text(String::new()));
		}
		let text = self.read_text()?;
		self.close_element(field)?;
		Ok(RawEnumValue::Text(text.trim().to_owned()))
	}

	#[instrument(level = "debug", skip(self))]
	fn read_string(&mut self, field: &str) -> Result<Option<String>, EncodingError> {
		if !self.seek_field(field)? {
			return Ok(None);
		}
		if self.open_element(field)? {
			return Ok(Some(String::new()));
		}
		let text = self.read_text()?;
		self.config.check_string_length(text.len())?;
		self.close_element(field)?;
		Ok(Some(text))
	}

	fn read_encodeable<T: Encodeable>(&mut self, field: &str) -> Result<T, EncodingError> {
		self.seek_field(field)?;
		if self.open_element(field)? {
			// Decode from nothing so the fields are reported missing instead of
			// being taken from the siblings.
			return T::decode(&mut XmlDecoder::new("", self.config));
		}
		let value = T::decode(self)?;
		self.skip_unknown_children()?;
		self.close_element(field)?;
		Ok(value)
	}

	#[instrument(level = "debug", skip(self))]
	fn read_array<T: Element>(&mut self, field: &str) -> Result<Option<Vec<T>>, EncodingError> {
		if !self.seek_field(field)? {
			return Ok(None);
		}
		if self.open_element(field)? {
			return Ok(Some(Vec::new()));
		}
		let mut values = Vec::new();
		while let Some(name) = self.peek_element()? {
			if local_name(name) == T::ELEMENT_NAME {
				values.push(T::read_element(self)?);
				self.config.check_array_length(values.len())?;
			} else {
				self.skip_element()?;
			}
		}
		self.close_element(field)?;
		Ok(Some(values))
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::types::{AlarmStateType, MtStatistic, StatisticTypeEnum};

	#[test]
	fn test_escaping_round_trip() -> Result<(), EncodingError> {
		let text = "a < b && c > \"d\" 'e'";
		let mut encoder = XmlEncoder::new();
		encoder.write_string("Text", Some(text))?;
		let xml = encoder.into_string();
		assert_eq!(xml, "<Text>a &lt; b &amp;&amp; c &gt; &quot;d&quot; &apos;e&apos;</Text>");

		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new(&xml, &config);
		assert_eq!(decoder.read_string("Text")?.as_deref(), Some(text));
		decoder.finish()
	}

	#[test]
	fn test_null_and_empty_strings() -> Result<(), EncodingError> {
		let mut encoder = XmlEncoder::new();
		encoder.write_string("Null", None)?;
		encoder.write_string("Empty", Some(""))?;
		let xml = encoder.into_string();
		assert_eq!(xml, "<Empty></Empty>");

		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new(&xml, &config);
		assert_eq!(decoder.read_string("Null")?, None);
		assert_eq!(decoder.read_string("Empty")?.as_deref(), Some(""));

		let mut decoder = XmlDecoder::new("<Empty/>", &config);
		assert_eq!(decoder.read_string("Empty")?.as_deref(), Some(""));
		Ok(())
	}

	#[test]
	fn test_alarm_state_labels() -> Result<(), EncodingError> {
		let mut encoder = XmlEncoder::new();
		encoder.write_enumerated("State", AlarmStateType::Cleared)?;
		assert_eq!(encoder.into_string(), "<State>CLEARED_2</State>");

		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new("<State>CLEARED_2</State>", &config);
		let state: AlarmStateType = decoder.read_enumerated("State")?;
		assert_eq!(state.to_i32(), 2);

		let mut decoder = XmlDecoder::new("<State>SILENCED_3</State>", &config);
		let result = decoder.read_enumerated::<AlarmStateType>("State");
		assert!(matches!(result, Err(EncodingError::UnknownEnumLabel { .. })));
		Ok(())
	}

	#[test]
	fn test_tolerant_reading() -> Result<(), EncodingError> {
		let xml = r#"<?xml version="1.0" encoding="utf-8"?>
			<!-- produced by a server -->
			<ua:MTStatisticDataType xmlns:ua="http://opcfoundation.org/UA/MTConnect/v2/" note='a>b'>
				<ua:Statistic> MEDIAN_3 </ua:Statistic>
				<ua:ExtensionStatistic>&#x50;&#57;5</ua:ExtensionStatistic>
				<ua:Comment><Nested>ignored</Nested></ua:Comment>
				<ua:Unknown/>
			</ua:MTStatisticDataType>
		"#;
		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new(xml, &config);
		let value: MtStatistic = decoder.read_encodeable("MTStatisticDataType")?;
		assert_eq!(value, MtStatistic::from_parts(StatisticTypeEnum::Median, Some("P95".to_owned())));
		decoder.finish()
	}

	#[test]
	fn test_unknown_element_between_fields() -> Result<(), EncodingError> {
		let xml = "<MTStatisticDataType><Statistic>OTHER_9</Statistic><Note>x</Note>\
		           <ExtensionStatistic>P95</ExtensionStatistic></MTStatisticDataType>";
		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new(xml, &config);
		let value: MtStatistic = decoder.read_encodeable("MTStatisticDataType")?;
		assert_eq!(value, MtStatistic::other("P95"));
		decoder.finish()
	}

	#[test]
	fn test_absent_optional_field_consumes_nothing() -> Result<(), EncodingError> {
		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new("<Note>x</Note><Text>abc</Text>", &config);
		assert_eq!(decoder.read_string("Missing")?, None);
		assert_eq!(decoder.read_string("Note")?.as_deref(), Some("x"));
		assert_eq!(decoder.read_string("Text")?.as_deref(), Some("abc"));
		decoder.finish()
	}

	#[test]
	fn test_deeply_nested_unknown_element() -> Result<(), EncodingError> {
		let depth = 200_000;
		let xml = format!(
			"<MTStatisticDataType><Statistic>MEDIAN_3</Statistic>{}{}</MTStatisticDataType>",
			"<a>".repeat(depth),
			"</a>".repeat(depth)
		);
		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new(&xml, &config);
		let value: MtStatistic = decoder.read_encodeable("MTStatisticDataType")?;
		assert_eq!(value, MtStatistic::new(StatisticTypeEnum::Median));
		decoder.finish()
	}

	#[test]
	fn test_deeply_nested_unterminated_element() {
		let xml = format!("<MTStatisticDataType><Statistic>MEDIAN_3</Statistic>{}", "<a>".repeat(200_000));
		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new(&xml, &config);
		let result = decoder.read_encodeable::<MtStatistic>("MTStatisticDataType");
		assert!(matches!(result, Err(EncodingError::InvalidXml { .. })));
	}

	#[test]
	fn test_empty_structure_reports_missing_field() {
		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new("<MTStatisticDataType/><Statistic>MEDIAN_3</Statistic>", &config);
		let result = decoder.read_encodeable::<MtStatistic>("MTStatisticDataType");
		assert!(matches!(result, Err(EncodingError::MissingField { .. })));
	}

	#[test]
	fn test_mismatched_end_tag() {
		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new("<Text>abc</Txet>", &config);
		assert!(matches!(decoder.read_string("Text"), Err(EncodingError::UnexpectedElement { .. })));
	}

	#[test]
	fn test_malformed_input() {
		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new("<Text>abc", &config);
		assert!(matches!(decoder.read_string("Text"), Err(EncodingError::InvalidXml { .. })));

		let mut decoder = XmlDecoder::new("<Text>a &bogus; b</Text>", &config);
		assert!(matches!(decoder.read_string("Text"), Err(EncodingError::InvalidXml { .. })));

		let mut decoder = XmlDecoder::new("<Text", &config);
		assert!(matches!(decoder.read_string("Text"), Err(EncodingError::InvalidXml { .. })));
	}

	#[test]
	fn test_array_skips_foreign_elements() -> Result<(), EncodingError> {
		let xml = "<Values><AlarmStateType>ACTIVE_1</AlarmStateType><Foo>1</Foo>\
		           <AlarmStateType>CLEARED</AlarmStateType></Values>";
		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new(xml, &config);
		let values = decoder.read_array::<AlarmStateType>("Values")?;
		assert_eq!(values, Some(vec![AlarmStateType::Active, AlarmStateType::Cleared]));
		decoder.finish()
	}

	#[test]
	fn test_trailing_data() {
		let config = CodecConfig::default();
		let mut decoder = XmlDecoder::new("<A>1</A><B>2</B>", &config);
		assert_eq!(decoder.read_string("A").unwrap().as_deref(), Some("1"));
		assert!(matches!(decoder.finish(), Err(EncodingError::TrailingData { remaining: 8, .. })));
	}
}

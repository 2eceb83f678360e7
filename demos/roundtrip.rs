//! Encode a few MTConnect values in every supported form and decode them
//! back.
//!
//! Run with `RUST_LOG=debug` to see the codec spans.

use mtconnect_ua::{
	CodecConfig, Collection, Decoder, MtDataItemType, MtStatistic, MtStructure, TypeRegistry,
	encoding::{BinaryDecoder, BinaryEncoder, UnknownEnumPolicy, XmlDecoder, XmlEncoder},
	registry::{EncodingFormat, ExtensionObject, MT_STATISTIC_DATA_TYPE},
	types::{DataItemTypeEnum, ExecutionType, StatisticTypeEnum},
};
use snafu::{ResultExt, Whatever};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
	EnvFilter, Layer as _, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

fn main() -> Result<(), Whatever> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));
	let layer = tracing_subscriber::fmt::layer().with_filter(filter);
	tracing_subscriber::registry()
		.with(layer)
		.with(ErrorLayer::default().with_filter(EnvFilter::from("debug")))
		.init();

	let config = CodecConfig::default();

	let structures: Vec<MtStructure> = vec![
		MtDataItemType::new(DataItemTypeEnum::Temperature).into(),
		MtDataItemType::other("x:FLOW_RATE").into(),
		MtStatistic::new(StatisticTypeEnum::RootMeanSquare).into(),
		MtStatistic::other("PERCENTILE_95").into(),
	];

	for structure in &structures {
		for format in [EncodingFormat::Binary, EncodingFormat::Xml] {
			let object = ExtensionObject::encode(structure, format)
				.whatever_context("Failed to encode structure")?;
			let decoded = object.decode(&config).whatever_context("Failed to decode structure")?;
			tracing::info!("{} as {format:?}: {:?} -> {decoded}", object.encoding_id, object.body);
		}
		let json = serde_json::to_string(structure).whatever_context("Failed to serialize")?;
		tracing::info!("JSON: {json}");
	}

	let ids = TypeRegistry::global()
		.encoding_ids(&MT_STATISTIC_DATA_TYPE)
		.whatever_context("Statistic type is not registered")?;
	tracing::info!("{MT_STATISTIC_DATA_TYPE} is encoded as {} or {}", ids.binary, ids.xml);

	let states: Collection<ExecutionType> =
		[ExecutionType::Ready, ExecutionType::Active, ExecutionType::FeedHold].into_iter().collect();
	let mut encoder = BinaryEncoder::new();
	Collection::encode(Some(&states), &mut encoder, "States").whatever_context("Failed to encode")?;
	let bytes = encoder.into_bytes();
	let mut decoder = BinaryDecoder::new(&bytes, &config);
	let decoded = Collection::<ExecutionType>::decode(&mut decoder, "States")
		.whatever_context("Failed to decode")?;
	tracing::info!("Execution states {bytes:02x?} -> {decoded:?}");

	// A server may send a statistic newer than this model.
	let xml = "<MTStatisticDataType><Statistic>PERCENTILE_10</Statistic></MTStatisticDataType>";
	let lenient = CodecConfig { unknown_enum_policy: UnknownEnumPolicy::MapToCatchAll, ..config };
	for config in [&config, &lenient] {
		let mut decoder = XmlDecoder::new(xml, config);
		match decoder.read_encodeable::<MtStatistic>("MTStatisticDataType") {
			Ok(value) => tracing::info!("{:?}: decoded {value}", config.unknown_enum_policy),
			Err(e) => tracing::warn!("{:?}: {e}", config.unknown_enum_policy),
		}
	}

	let mut encoder = XmlEncoder::new();
	Collection::encode(Some(&states), &mut encoder, &Collection::<ExecutionType>::list_name())
		.whatever_context("Failed to encode")?;
	tracing::info!("XML: {}", encoder.into_string());

	Ok(())
}

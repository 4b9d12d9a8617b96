//! Tests for configuration serialization

#[cfg(test)]
mod tests {
    use slimbuf::{
        codec::TextEncoding, stream::DEFAULT_CHUNK_SIZE, PackedBools, PoolConfig, StreamConfig,
        StreamConfigBuilder,
    };

    #[test]
    fn test_pool_config_round_trip() {
        let config = PoolConfig::default()
            .with_max_array_length(4096)
            .with_clear_on_return(true);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: PoolConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed: PoolConfig = serde_json::from_str(r#"{"max_arrays_per_bucket": 4}"#).unwrap();
        assert_eq!(parsed.max_arrays_per_bucket, 4);
        assert_eq!(parsed.max_array_length, PoolConfig::default().max_array_length);

        let stream: StreamConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(stream.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_stream_config_builder_validates() {
        assert!(StreamConfigBuilder::new().chunk_size(0).build().is_err());
        let config = StreamConfigBuilder::new().chunk_size(512).build().unwrap();
        assert_eq!(config.chunk_size, 512);
    }

    #[test]
    fn test_small_types_serialize_plainly() {
        assert_eq!(serde_json::to_string(&TextEncoding::Utf16Be).unwrap(), r#""Utf16Be""#);
        assert_eq!(serde_json::to_string(&PackedBools::new(5)).unwrap(), "5");
        let flags: PackedBools = serde_json::from_str("129").unwrap();
        assert!(flags.get(7).unwrap());
    }
}

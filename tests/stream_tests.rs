//! Tests for the stream chunk bridges

#[cfg(test)]
mod tests {
    use std::io::{self, Read, Seek, SeekFrom, Write};

    use slimbuf::{
        ByteReader, ByteWriter, SlimError, StreamChunkReader, StreamChunkWriter, StreamConfig,
    };

    /// Counts the read calls that reach the inner stream
    struct CountingReader<R> {
        inner: R,
        reads: usize,
    }

    impl<R: Read> Read for CountingReader<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            self.inner.read(buf)
        }
    }

    fn small_chunks(size: usize) -> StreamConfig {
        StreamConfig::default().with_chunk_size(size)
    }

    #[test]
    fn test_reader_spans_without_extra_reads() {
        let source = CountingReader {
            inner: &[1u8, 2, 3, 4, 5][..],
            reads: 0,
        };
        let mut reader = StreamChunkReader::with_config(source, small_chunks(8)).unwrap();

        assert_eq!(reader.acquire_span(3).unwrap(), &[1, 2, 3]);
        assert_eq!(reader.acquire_span(2).unwrap(), &[4, 5]);
        assert_eq!(reader.get_ref().reads, 1);
        assert_eq!(reader.bytes_consumed(), 5);

        let err = reader.read_byte().unwrap_err();
        assert!(err.is_end_of_input());
    }

    #[test]
    fn test_reader_span_larger_than_chunk() {
        let mut reader = StreamChunkReader::with_config(&[0u8; 32][..], small_chunks(4)).unwrap();
        assert!(matches!(
            reader.acquire_span(5),
            Err(SlimError::CapacityExceeded { .. })
        ));
        assert_eq!(reader.acquire_span(4).unwrap().len(), 4);
    }

    #[test]
    fn test_reader_compacts_partial_chunk() {
        let data: Vec<u8> = (0..20).collect();
        let mut reader = StreamChunkReader::with_config(&data[..], small_chunks(6)).unwrap();

        let mut seen = Vec::new();
        seen.extend_from_slice(reader.acquire_span(4).unwrap());
        seen.extend_from_slice(reader.acquire_span(5).unwrap());
        seen.extend_from_slice(reader.acquire_span(6).unwrap());
        seen.extend_from_slice(reader.acquire_span(5).unwrap());
        assert_eq!(seen, data);
    }

    #[test]
    fn test_writer_flushes_at_threshold() {
        let mut writer = StreamChunkWriter::with_config(Vec::new(), small_chunks(4)).unwrap();

        writer.write(&[1, 2, 3, 4]).unwrap();
        assert_eq!(writer.buffered(), 4);
        assert!(writer.get_ref().unwrap().is_empty());

        writer.add(5).unwrap();
        assert_eq!(writer.get_ref().unwrap(), &vec![1, 2, 3, 4]);
        assert_eq!(writer.buffered(), 1);

        let out = writer.into_inner().unwrap();
        assert_eq!(out, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_writer_oversize_write_goes_straight_through() {
        let mut writer = StreamChunkWriter::with_config(Vec::new(), small_chunks(4)).unwrap();
        writer.add(0).unwrap();
        writer.write(&[9; 10]).unwrap();

        assert_eq!(writer.buffered(), 0);
        assert_eq!(writer.bytes_written(), 11);
        assert_eq!(writer.get_ref().unwrap().len(), 11);
    }

    #[test]
    fn test_writer_span_larger_than_chunk() {
        let mut writer = StreamChunkWriter::with_config(io::sink(), small_chunks(4)).unwrap();
        assert!(matches!(
            writer.acquire_span(5),
            Err(SlimError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(StreamChunkWriter::with_config(io::sink(), small_chunks(0)).is_err());
        assert!(StreamChunkReader::with_config(io::empty(), small_chunks(0)).is_err());
    }

    #[test]
    fn test_drop_flushes_pending_bytes() {
        let mut out = Vec::new();
        {
            let mut writer = StreamChunkWriter::with_config(&mut out, small_chunks(64)).unwrap();
            writer.write(b"tail").unwrap();
        }
        assert_eq!(out, b"tail");
    }

    #[test]
    fn test_file_round_trip() {
        let mut file = tempfile::tempfile().unwrap();

        {
            let mut writer = ByteWriter::from_stream(&mut file, small_chunks(32)).unwrap();
            for n in 0..100u32 {
                writer.write_little_endian(n).unwrap();
                writer.write_big_endian(n as u16).unwrap();
            }
            writer.write_string("end").unwrap();
            writer.flush().unwrap();
        }

        file.seek(SeekFrom::Start(0)).unwrap();
        let mut reader = ByteReader::from_stream(&mut file, small_chunks(32)).unwrap();
        for n in 0..100u32 {
            assert_eq!(reader.read_little_endian::<u32>().unwrap(), n);
            assert_eq!(reader.read_big_endian::<u16>().unwrap(), n as u16);
        }
        assert_eq!(reader.read_str(3).unwrap(), "end");
        assert!(reader.read_byte().unwrap_err().is_end_of_input());
    }

    #[test]
    fn test_write_trait_sink_error_surfaces() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk gone"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut writer = StreamChunkWriter::with_config(Broken, small_chunks(2)).unwrap();
        writer.write(&[1, 2]).unwrap();
        assert!(matches!(writer.add(3), Err(SlimError::Io { .. })));
    }
}

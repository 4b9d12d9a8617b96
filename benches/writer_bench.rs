use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use slimbuf::{BufferWriter, ByteReader, ByteWriter, RegionByteBuffer};

fn benchmark_writer_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("BufferWriter_Growth");

    for total in [256usize, 4096, 65536].iter() {
        group.throughput(Throughput::Bytes(*total as u64));
        group.bench_with_input(BenchmarkId::new("stack_start", total), total, |b, &total| {
            let chunk = [7u8; 64];
            b.iter(|| {
                let mut initial = [0u8; 128];
                let mut writer = BufferWriter::new(&mut initial);
                for _ in 0..total / chunk.len() {
                    writer.write(&chunk);
                }
                black_box(writer.written().len());
            });
        });

        group.bench_with_input(BenchmarkId::new("pooled_start", total), total, |b, &total| {
            b.iter(|| {
                let mut writer = BufferWriter::<u8>::with_capacity(16);
                for n in 0..total {
                    writer.add(n as u8);
                }
                black_box(writer.written().len());
            });
        });
    }

    group.finish();
}

fn benchmark_endian_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("ByteCodec");
    let count = 1024;
    group.throughput(Throughput::Elements(count as u64));

    group.bench_function("write_u64_le", |b| {
        b.iter(|| {
            let mut writer = ByteWriter::with_capacity(count * 8);
            for n in 0..count as u64 {
                writer.write_little_endian(n).unwrap();
            }
            black_box(writer.position().unwrap());
        });
    });

    let mut writer = ByteWriter::with_capacity(count * 8);
    for n in 0..count as u64 {
        writer.write_big_endian(n).unwrap();
    }
    let encoded = writer.written().unwrap().to_vec();

    group.bench_function("read_u64_be", |b| {
        b.iter(|| {
            let mut reader = ByteReader::new(&encoded);
            let mut sum = 0u64;
            for _ in 0..count {
                sum = sum.wrapping_add(reader.read_big_endian::<u64>().unwrap());
            }
            black_box(sum);
        });
    });

    group.finish();
}

fn benchmark_region_appends(c: &mut Criterion) {
    let mut group = c.benchmark_group("RegionByteBuffer");

    for regions in [4u32, 64].iter() {
        group.bench_with_input(
            BenchmarkId::new("interleaved_append", regions),
            regions,
            |b, &regions| {
                b.iter(|| {
                    let mut buffer = RegionByteBuffer::new();
                    let ids: Vec<_> = (0..regions).map(|_| buffer.add_region().unwrap()).collect();
                    for round in 0..16u32 {
                        for id in &ids {
                            buffer.append_value(*id, round).unwrap();
                        }
                    }
                    black_box(buffer.data_len());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_writer_growth,
    benchmark_endian_codec,
    benchmark_region_appends
);
criterion_main!(benches);

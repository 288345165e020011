use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use durable_file::{DurableFile, NoopDiagnostics};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use tempfile::tempdir;

/// 测试参数
const REGION_SIZES: [u32; 3] = [
    64 * 1024,       // 64KB
    1024 * 1024,     // 1MB
    8 * 1024 * 1024, // 8MB
];

/// 创建文件：前半部分为数据，后半部分为搬移目标
fn prepare(dir: &tempfile::TempDir, size: u32) -> File {
    let path = dir.path().join(format!("transfer_{size}.bin"));
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .unwrap();

    let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    file.write_all(&data).unwrap();
    file.set_len(size as u64 * 2).unwrap();
    file.sync_all().unwrap();
    file
}

/// 整段读入内存后写回（内存占用随区间大小增长）
fn buffered_copy(file: &mut File, source: u64, destination: u64, len: usize) {
    let mut data = vec![0u8; len];
    file.seek(SeekFrom::Start(source)).unwrap();
    file.read_exact(&mut data).unwrap();
    file.seek(SeekFrom::Start(destination)).unwrap();
    file.write_all(&data).unwrap();
    file.flush().unwrap();
    file.sync_all().unwrap();
}

fn transfer_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer");
    group.sample_size(10);

    let dir = tempdir().unwrap();

    for size in REGION_SIZES {
        group.throughput(Throughput::Bytes(size as u64));
        let label = format!("{}KB", size / 1024);

        // 固定 4KB 栈缓冲区分块搬移
        let mut durable = DurableFile::with_diagnostics(prepare(&dir, size), NoopDiagnostics);
        group.bench_with_input(BenchmarkId::new("transfer_to", &label), &size, |b, &size| {
            b.iter(|| durable.transfer_to(0, size, size).unwrap());
        });

        let mut plain = prepare(&dir, size);
        group.bench_with_input(BenchmarkId::new("buffered_copy", &label), &size, |b, &size| {
            b.iter(|| buffered_copy(&mut plain, 0, size as u64, size as usize));
        });
    }

    group.finish();
}

fn write_zeros_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_zeros");
    group.sample_size(10);

    let dir = tempdir().unwrap();

    for size in REGION_SIZES {
        group.throughput(Throughput::Bytes(size as u64));
        let mut durable = DurableFile::with_diagnostics(prepare(&dir, size), NoopDiagnostics);

        group.bench_with_input(BenchmarkId::from_parameter(format!("{}KB", size / 1024)), &size, |b, &size| {
            b.iter(|| {
                durable.seek(size).unwrap();
                durable.write_zeros(size).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, transfer_benchmark, write_zeros_benchmark);
criterion_main!(benches);

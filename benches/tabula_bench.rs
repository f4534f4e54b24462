use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::HashMap;
use tabula::{Options, PairWriter, Record};

#[derive(Debug, Default, Record)]
#[tabula(rename_all = "PascalCase")]
struct ItemNum {
    cfg_id: i32,
    num: i32,
}

#[derive(Debug, Default, Record)]
#[tabula(rename_all = "PascalCase")]
struct ItemCfg {
    cfg_id: i32,
    name: String,
    unique: bool,
    weights: Vec<f64>,
    rewards: Vec<ItemNum>,
    limits: HashMap<String, u32>,
}

fn pairs_cell(count: usize) -> String {
    let options = Options::default();
    let mut writer = PairWriter::from_options(&options);
    for i in 0..count {
        writer.write_int(&format!("k{}", i), i as i64);
    }
    writer.finish()
}

pub fn parse_pairs_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_pairs");
    for size in [1, 4, 16, 64, 256].iter() {
        let cell = pairs_cell(*size);
        group.throughput(Throughput::Bytes(cell.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &_size| {
            b.iter(|| tabula::parse_pairs(black_box(&cell), "#", "_"))
        });
    }
    group.finish();
}

pub fn parse_nested_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_nested");
    let cell = "CfgId_1#ConsumeItems_{CfgId_1#Num_2;CfgId_2#Num_3}#Rewards_{CfgId_1#Num_1}#CountLimit_2";
    group.throughput(Throughput::Bytes(cell.len() as u64));
    group.bench_function("pairs", |b| {
        b.iter(|| tabula::parse_nested_pairs(black_box(cell), "#", "_", &["ConsumeItems", "Rewards"]))
    });

    let groups = vec!["Name_a#Items_{CfgId_1#Num_1;CfgId_2#Num_1}"; 16].join(";");
    group.throughput(Throughput::Bytes(groups.len() as u64));
    group.bench_function("groups", |b| {
        b.iter(|| tabula::parse_nested_groups(black_box(&groups), "#", "_", ";", &["Items"]))
    });
    group.finish();
}

pub fn read_slice_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_slice");
    for size in [10, 100, 1000].iter() {
        let mut rows = vec![vec![
            String::from("CfgId"),
            String::from("Name"),
            String::from("Unique"),
            String::from("Weights"),
            String::from("Rewards"),
            String::from("Limits"),
        ]];
        for i in 0..*size {
            rows.push(vec![
                i.to_string(),
                format!("item {}", i),
                String::from("true"),
                String::from("0.5;0.25;0.125"),
                String::from("CfgId_1#Num_2;CfgId_2#Num_3"),
                String::from("daily_3#weekly_10"),
            ]);
        }

        let options = Options::default();
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &_size| {
            b.iter(|| {
                let items: Vec<ItemCfg> = tabula::read_slice(black_box(&rows), &options).unwrap();
                items
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    parse_pairs_benchmark,
    parse_nested_benchmark,
    read_slice_benchmark,
);
criterion_main!(benches);

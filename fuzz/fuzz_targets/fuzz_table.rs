#![no_main]
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;
use tabula::{Options, Record};

#[derive(Debug, Default, Record)]
#[tabula(rename_all = "PascalCase")]
struct ItemNum {
    cfg_id: i32,
    num: i64,
}

#[derive(Debug, Default, Record)]
#[tabula(rename_all = "PascalCase")]
struct ItemCfg {
    cfg_id: i32,
    name: String,
    rate: Option<f32>,
    unique: bool,
    items: Vec<ItemNum>,
    limits: HashMap<u8, u16>,
    reward: Box<ItemNum>,
}

fuzz_target!(|data: &str| {
    let rows: Vec<Vec<&str>> = data.lines().map(|line| line.split(',').collect()).collect();
    let options = Options::default();
    let _ = tabula::read_slice::<ItemCfg, _, _>(&rows, &options);
    let _ = tabula::read_map::<HashMap<i32, ItemCfg>, _, _>(&rows, &options);
    let mut cfg = ItemCfg::default();
    let _ = tabula::read_object(&rows, &mut cfg, &options);
});

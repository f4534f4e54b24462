/*!

Maps flat CSV configuration tables onto strongly typed records.

Game and application configuration is often authored in spreadsheets and
exported as CSV: one row per entry, one column per field, and a compact
micro-format inside cells for anything that is not a scalar. Tabula decodes
those rows straight into Rust structs.

## Features

- ✔ Columnar tables into a `Vec` or a map keyed by the first column
- ✔ Key-value tables (`name, value, comment`) into a single settings record
- ✔ Arrays (`1;2;3`), maps (`a_1#b_2`), and nested records in a single cell
- ✔ Converters per column or per type for anything else, such as enums
- ✔ Derive macro with renames and aliases, `#[serde(rename)]` is understood too
- ✔ Never fails on a bad cell: the field keeps its default and the problem is
  logged through [tracing](https://docs.rs/tracing)

## Quick Start

```rust
# #[cfg(feature = "derive")] {
use std::collections::HashMap;
use tabula::{Options, Record};

#[derive(Debug, Default, PartialEq, Record)]
#[tabula(rename_all = "PascalCase")]
struct ItemNum {
    cfg_id: i32,
    num: i32,
}

#[derive(Debug, Default, Record)]
#[tabula(rename_all = "PascalCase")]
struct Reward {
    cfg_id: i32,
    items: Vec<ItemNum>,
    weights: HashMap<String, u32>,
    vip: Option<ItemNum>,
}

let rows = vec![
    vec!["CfgId", "Items", "Weights", "Vip"],
    vec!["1", "CfgId_1#Num_2;CfgId_2#Num_5", "common_90#rare_10", "CfgId_7#Num_1"],
];

let rewards: HashMap<i32, Reward> = tabula::read_map(&rows, &Options::default()).unwrap();
let reward = &rewards[&1];
assert_eq!(reward.items[1], ItemNum { cfg_id: 2, num: 5 });
assert_eq!(reward.weights["rare"], 10);
assert_eq!(reward.vip, Some(ItemNum { cfg_id: 7, num: 1 }));
# }
```

## Cell Format

With the default separators in [`Options`]:

| Field type                 | Cell                          |
|----------------------------|-------------------------------|
| integers, floats, `String` | `42`, `1.5`, `sword`          |
| `bool`                     | `true` or `1`, anything else is false |
| `Vec<T>`                   | `1;2;3`                       |
| `HashMap<K, V>`            | `a_1#b_2`                     |
| a record                   | `CfgId_1#Num_2`               |
| `Vec<Record>`              | `CfgId_1#Num_2;CfgId_2#Num_3` |

Records only nest one level deep. Cells with braced groups such as
`Name_a#Items_{CfgId_1#Num_1}` are split with [`parse_nested_pairs`] and
[`parse_nested_groups`] from within a converter.

## Converters

A column converter replaces the decoding of one column, a type converter the
decoding of every slot of a type. Both receive the record being filled, the
column name and the raw cell:

```rust
# #[cfg(feature = "derive")] {
use tabula::{CellValue, Options, Record};

#[derive(Debug, Default, PartialEq)]
enum Quality {
    #[default]
    Common,
    Rare,
}

impl CellValue for Quality {}

#[derive(Debug, Default, Record)]
struct Item {
    quality: Quality,
    tags: Vec<Quality>,
    flags: u32,
}

let mut options = Options::default();
options
    .register_type_converter::<Quality, _>(|_, _, cell| match cell {
        "rare" => Some(Quality::Rare),
        _ => Some(Quality::Common),
    })
    .register_column_converter("flags", |_, _, cell| {
        Some(cell.split('|').fold(0u32, |acc, bit| acc | 1 << bit.parse::<u32>().unwrap_or(0)))
    });

let rows = vec![vec!["quality", "tags", "flags"], vec!["rare", "rare;common", "0|2"]];
let items: Vec<Item> = tabula::read_slice(&rows, &options).unwrap();
assert_eq!(items[0].quality, Quality::Rare);
assert_eq!(items[0].tags, vec![Quality::Rare, Quality::Common]);
assert_eq!(items[0].flags, 0b101);
# }
```

*/

extern crate self as tabula;

mod convert;
mod errors;
#[cfg(feature = "files")]
mod files;
mod options;
mod pairs;
mod record;
mod scalar;
mod table;
mod value;
mod writer;

pub use self::errors::*;
#[cfg(feature = "files")]
pub use self::files::*;
pub use self::options::Options;
pub use self::pairs::{parse_nested_groups, parse_nested_pairs, parse_pairs, StringPair};
pub use self::record::{alias_map, decode_record, populate_field, Alias, AliasSource, Record};
pub use self::scalar::{Bytes, Scalar, ScalarError};
pub use self::table::{read_map, read_object, read_slice, RecordMap};
pub use self::value::{populate, Cell, CellValue, Kind};
pub use self::writer::{join_array, PairWriter};

#[cfg(feature = "derive")]
pub use tabula_derive::*;

//! Utility to inspect how key-value cells split, one cell per line of stdin.
//!
//! Arguments name the keys whose values are braced groups. With `--groups`
//! every line is treated as an array of groups.
//!
//! ```text
//! echo 'CfgId_1#Rewards_{CfgId_1#Num_1}' | pairs Rewards
//! ```

use std::{
    env, error,
    io::{self, BufRead, BufWriter, Write},
};
use tabula::Options;

fn main() -> Result<(), Box<dyn error::Error>> {
    let mut groups = false;
    let mut nested = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "--groups" {
            groups = true;
        } else {
            nested.push(arg);
        }
    }

    let options = Options::default();
    let stdout = io::stdout().lock();
    let mut writer = BufWriter::new(stdout);
    for line in io::stdin().lock().lines() {
        let line = line?;
        if groups {
            let value = options.parse_nested_groups(&line, &nested);
            serde_json::to_writer(&mut writer, &value)?;
        } else {
            let value = options.parse_nested_pairs(&line, &nested);
            serde_json::to_writer(&mut writer, &value)?;
        }
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

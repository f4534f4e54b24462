use crate::Options;
use std::fmt::Display;

#[cfg(feature = "faster_writer")]
pub(crate) fn push_usize(out: &mut String, value: usize) {
    let mut buffer = itoa::Buffer::new();
    out.push_str(buffer.format(value));
}

#[cfg(not(feature = "faster_writer"))]
pub(crate) fn push_usize(out: &mut String, value: usize) {
    use std::fmt::Write;
    let _ = write!(out, "{}", value);
}

#[cfg(feature = "faster_writer")]
fn push_i64(out: &mut String, value: i64) {
    let mut buffer = itoa::Buffer::new();
    out.push_str(buffer.format(value));
}

#[cfg(not(feature = "faster_writer"))]
fn push_i64(out: &mut String, value: i64) {
    use std::fmt::Write;
    let _ = write!(out, "{}", value);
}

/// Builds a key-value cell, the inverse of [`parse_pairs`](crate::parse_pairs).
///
/// Keys and values are written as is. Keeping the separators out of them is
/// up to the caller, exactly as when the cell is authored by hand.
///
/// ```
/// use tabula::{Options, PairWriter};
///
/// let options = Options::default();
/// let mut writer = PairWriter::from_options(&options);
/// writer.write_int("CfgId", 1);
/// writer.write_group("Rewards", "CfgId_1#Num_1");
/// writer.write_pair("Name", "sword");
/// assert_eq!(writer.finish(), "CfgId_1#Rewards_{CfgId_1#Num_1}#Name_sword");
/// ```
#[derive(Debug, Clone)]
pub struct PairWriter<'a> {
    out: String,
    pair_sep: &'a str,
    kv_sep: &'a str,
}

impl<'a> PairWriter<'a> {
    /// Creates a writer with the given pair and key-value separators
    pub fn new(pair_sep: &'a str, kv_sep: &'a str) -> Self {
        PairWriter {
            out: String::new(),
            pair_sep,
            kv_sep,
        }
    }

    /// Creates a writer with the separators configured in `options`
    pub fn from_options(options: &'a Options) -> Self {
        Self::new(&options.pair_separator, &options.kv_separator)
    }

    fn write_key(&mut self, key: &str) {
        if !self.out.is_empty() {
            self.out.push_str(self.pair_sep);
        }
        self.out.push_str(key);
        self.out.push_str(self.kv_sep);
    }

    /// Appends `key<kv_sep>value`
    pub fn write_pair(&mut self, key: &str, value: &str) -> &mut Self {
        self.write_key(key);
        self.out.push_str(value);
        self
    }

    /// Appends a pair with an integer value
    pub fn write_int(&mut self, key: &str, value: i64) -> &mut Self {
        self.write_key(key);
        push_i64(&mut self.out, value);
        self
    }

    /// Appends a pair whose value is a braced group, `key<kv_sep>{content}`
    pub fn write_group(&mut self, key: &str, content: &str) -> &mut Self {
        self.write_key(key);
        self.out.push('{');
        self.out.push_str(content);
        self.out.push('}');
        self
    }

    /// Returns the cell written so far
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consumes the writer and returns the cell
    pub fn finish(self) -> String {
        self.out
    }
}

/// Joins array elements with the given separator, the inverse of array
/// decoding.
///
/// ```
/// assert_eq!(tabula::join_array(&[1, 2, 3], ";"), "1;2;3");
/// ```
pub fn join_array<I>(items: I, array_sep: &str) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    use std::fmt::Write;
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i != 0 {
            out.push_str(array_sep);
        }
        let _ = write!(out, "{}", item);
    }
    out
}

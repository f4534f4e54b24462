//! Splitting of key-value cells.
//!
//! A key-value cell looks like `CfgId_1#Num_2` with the default separators:
//! `#` between pairs and `_` between a key and its value. A value may hold one
//! level of braced group, `Rewards_{CfgId_1#Num_1}`, whose content is kept
//! verbatim for a later decode.

use std::collections::HashMap;

/// An ordered key and value pulled out of a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringPair {
    pub key: String,
    pub value: String,
}

impl StringPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        StringPair {
            key: key.into(),
            value: value.into(),
        }
    }
}

const GROUP_OPEN: &str = "{";
const GROUP_CLOSE: &str = "}";

fn push_pairs(pairs: &mut Vec<StringPair>, cell: &str, pair_sep: &str, kv_sep: &str) {
    for segment in cell.split(pair_sep) {
        let mut kv = segment.splitn(2, kv_sep);
        if let (Some(key), Some(value)) = (kv.next(), kv.next()) {
            pairs.push(StringPair::new(key, value));
        }
    }
}

/// Split `K1_V1#K2_V2` into `[(K1, V1), (K2, V2)]`.
///
/// Each segment splits on the first key-value separator only, so a value may
/// contain further key-value separators. Segments without one are dropped.
///
/// ```
/// use tabula::{parse_pairs, StringPair};
///
/// let pairs = parse_pairs("a_1#b_2_3#junk", "#", "_");
/// assert_eq!(pairs, vec![StringPair::new("a", "1"), StringPair::new("b", "2_3")]);
/// ```
pub fn parse_pairs(cell: &str, pair_sep: &str, kv_sep: &str) -> Vec<StringPair> {
    let mut pairs = Vec::new();
    push_pairs(&mut pairs, cell, pair_sep, kv_sep);
    pairs
}

/// Locates `name<kv_sep>{...}` in `s`, returning the span of the whole match
/// and the span of the braced content.
///
/// The group closes at the first `}` after the opening keyword.
fn find_group(s: &str, keyword: &str) -> Option<(usize, usize, usize)> {
    let begin = s.find(keyword)?;
    let content = begin + keyword.len();
    let end = content + s[content..].find(GROUP_CLOSE)?;
    Some((begin, content, end))
}

/// Parse a cell where some values are braced groups.
///
/// For every name in `nested`, the first `name<kv_sep>{...}` is cut out of the
/// cell and emitted as a pair whose value is the braced content, untouched.
/// The nested pairs come first, in the order of `nested`, followed by the
/// plain pairs of what remains.
///
/// ```
/// use tabula::{parse_nested_pairs, StringPair};
///
/// let cell = "CfgId_1#Rewards_{CfgId_1#Num_1}#CountLimit_2";
/// let pairs = parse_nested_pairs(cell, "#", "_", &["Rewards"]);
/// assert_eq!(pairs, vec![
///     StringPair::new("Rewards", "CfgId_1#Num_1"),
///     StringPair::new("CfgId", "1"),
///     StringPair::new("CountLimit", "2"),
/// ]);
/// ```
pub fn parse_nested_pairs<S>(
    cell: &str,
    pair_sep: &str,
    kv_sep: &str,
    nested: &[S],
) -> Vec<StringPair>
where
    S: AsRef<str>,
{
    let mut pairs = Vec::new();
    let mut s = cell.to_string();
    for name in nested {
        let name = name.as_ref();
        let keyword = format!("{}{}{}", name, kv_sep, GROUP_OPEN);
        if let Some((begin, content, end)) = find_group(&s, &keyword) {
            pairs.push(StringPair::new(name, &s[content..end]));
            s.replace_range(begin..end + GROUP_CLOSE.len(), "");
        }
    }

    push_pairs(&mut pairs, &s, pair_sep, kv_sep);
    pairs
}

/// Parse a cell holding an array of groups where values may be braced.
///
/// `Name_a#Items_{CfgId_1#Num_1;CfgId_2#Num_1};Name_b#Items_{CfgId_1#Num_2}`
/// yields two groups. Every braced value is first swapped for a numbered
/// placeholder so the separators inside the braces take no part in the
/// splitting, and is restored once the groups are split. A placeholder that
/// does not resolve drops its pair.
///
/// ```
/// use tabula::{parse_nested_groups, StringPair};
///
/// let cell = "Name_a#Items_{CfgId_1;CfgId_2};Name_b";
/// let groups = parse_nested_groups(cell, "#", "_", ";", &["Items"]);
/// assert_eq!(groups, vec![
///     vec![StringPair::new("Name", "a"), StringPair::new("Items", "CfgId_1;CfgId_2")],
///     vec![StringPair::new("Name", "b")],
/// ]);
/// ```
pub fn parse_nested_groups<S>(
    cell: &str,
    pair_sep: &str,
    kv_sep: &str,
    array_sep: &str,
    nested: &[S],
) -> Vec<Vec<StringPair>>
where
    S: AsRef<str>,
{
    let mut placeholders = Placeholders::default();
    let mut s = cell.to_string();
    for name in nested {
        let name = name.as_ref();
        let keyword = format!("{}{}{}", name, kv_sep, GROUP_OPEN);
        while let Some((begin, content, end)) = find_group(&s, &keyword) {
            let id = placeholders.insert(&s[content..end]);
            let mut replacement = String::with_capacity(keyword.len() + 4);
            replacement.push_str(name);
            replacement.push_str(kv_sep);
            crate::writer::push_usize(&mut replacement, id);
            s.replace_range(begin..end + GROUP_CLOSE.len(), &replacement);
        }
    }

    let mut groups = Vec::new();
    for element in s.split(array_sep) {
        let mut pairs = Vec::new();
        for segment in element.split(pair_sep) {
            let mut kv = segment.splitn(2, kv_sep);
            let (key, value) = match (kv.next(), kv.next()) {
                (Some(key), Some(value)) => (key, value),
                _ => continue,
            };

            if nested.iter().any(|x| x.as_ref() == key) {
                if let Some(content) = placeholders.resolve(value) {
                    pairs.push(StringPair::new(key, content));
                }
            } else {
                pairs.push(StringPair::new(key, value));
            }
        }
        groups.push(pairs);
    }

    groups
}

/// Side table of braced content keyed by a per-parse sequence number
#[derive(Debug, Default)]
struct Placeholders {
    next: usize,
    content: HashMap<usize, String>,
}

impl Placeholders {
    fn insert(&mut self, content: &str) -> usize {
        self.next += 1;
        self.content.insert(self.next, content.to_string());
        self.next
    }

    fn resolve(&self, id: &str) -> Option<&str> {
        let id = id.parse::<usize>().ok()?;
        self.content.get(&id).map(|x| x.as_str())
    }
}

use crate::convert::{resolve_column, resolve_type};
use crate::{Bytes, Options, Scalar};
use std::any::{type_name, Any};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// The semantic category of a field, which picks its built-in decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Signed integer of any width
    Int,

    /// Unsigned integer of any width
    Uint,

    /// 32 or 64 bit float
    Float,

    /// `true` or `1`, case insensitive
    Bool,

    /// The cell text verbatim
    String,

    /// The cell bytes verbatim
    Bytes,

    /// `Option<T>` or `Box<T>`, decoded as the pointee
    Optional,

    /// A struct whose fields are filled from a key-value cell
    Record,

    /// Elements separated by the array separator
    Array,

    /// Key-value pairs
    Map,

    /// No built-in decoding, needs a converter
    Other,
}

/// The raw text of one cell and where it is being decoded
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    options: &'a Options,
    column: &'a str,
    text: &'a str,
    nested: bool,
    column_converters: bool,
}

impl<'a> Cell<'a> {
    /// A top level cell of the given column
    pub fn new(options: &'a Options, column: &'a str, text: &'a str) -> Self {
        Cell {
            options,
            column,
            text,
            nested: false,
            column_converters: true,
        }
    }

    pub fn options(&self) -> &'a Options {
        self.options
    }

    /// The column name, or the key inside a key-value cell
    pub fn column(&self) -> &'a str {
        self.column
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Returns if the cell is a field inside a nested record
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// One element of an array cell. Column converters apply to the whole
    /// cell, never to an element.
    pub(crate) fn element<'b>(&self, token: &'b str) -> Cell<'b>
    where
        'a: 'b,
    {
        Cell {
            options: self.options,
            column: self.column,
            text: token,
            nested: self.nested,
            column_converters: false,
        }
    }

    /// A field of a record nested inside this cell
    pub(crate) fn nested_field<'b>(&self, key: &'b str, value: &'b str) -> Cell<'b>
    where
        'a: 'b,
    {
        Cell {
            options: self.options,
            column: key,
            text: value,
            nested: true,
            column_converters: false,
        }
    }
}

/// A type that a cell can be decoded into.
///
/// Implementations exist for integers, floats, `bool`, `String`, [`Bytes`],
/// `Option`, `Box`, `Vec`, `HashMap`, `BTreeMap`, and every
/// `#[derive(Record)]` struct. Any other type can opt in with an empty impl
/// and then be decoded by a registered converter:
///
/// ```
/// use tabula::{CellValue, Options, Record};
///
/// #[derive(Debug, Default, PartialEq)]
/// enum Color {
///     #[default]
///     None,
///     Red,
/// }
///
/// impl CellValue for Color {}
///
/// #[derive(Debug, Default, Record)]
/// struct Paint {
///     color: Color,
/// }
///
/// let mut options = Options::default();
/// options.register_type_converter::<Color, _>(|_, _, cell| match cell {
///     "Red" => Some(Color::Red),
///     _ => Some(Color::None),
/// });
///
/// let rows = vec![vec!["color"], vec!["Red"]];
/// let paints: Vec<Paint> = tabula::read_slice(&rows, &options)?;
/// assert_eq!(paints[0].color, Color::Red);
/// # Ok::<(), tabula::Error>(())
/// ```
pub trait CellValue: Sized + 'static {
    /// How the value decodes when no converter applies
    const KIND: Kind = Kind::Other;

    /// Decode a whole cell into a field, `None` leaves the field untouched
    fn decode(owner: &dyn Any, cell: &Cell<'_>) -> Option<Self> {
        let _ = owner;
        tracing::error!(
            column = cell.column(),
            cell = cell.text(),
            kind = ?Self::KIND,
            ty = type_name::<Self>(),
            "unsupported kind"
        );
        None
    }

    /// Convert a single token, as found in array elements, map keys and map
    /// values
    fn coerce(token: &str) -> Option<Self> {
        tracing::error!(
            token,
            kind = ?Self::KIND,
            ty = type_name::<Self>(),
            "unsupported kind"
        );
        None
    }

    /// Returns if the value is a record or points to one
    fn is_record() -> bool {
        Self::KIND == Kind::Record
    }

    /// Fit a column converter's output to this type
    fn from_converted(value: Box<dyn Any>) -> Result<Self, Box<dyn Any>> {
        value.downcast::<Self>().map(|x| *x)
    }
}

/// Decode `cell` into a value of type `T` the way a field of type `T` is
/// decoded: a column converter first, then a type converter, then the
/// built-in decoding for `T::KIND`.
///
/// `owner` is handed to converters as the record being filled. Inside a
/// nested record no converter is consulted for the record's own fields.
pub fn populate<T: CellValue>(owner: &dyn Any, cell: &Cell<'_>) -> Option<T> {
    if !cell.nested {
        if cell.column_converters {
            if let Some(resolved) = resolve_column(cell.options, cell.column) {
                return resolved.convert::<T>(owner, cell.column, cell.text);
            }
        }

        if let Some(resolved) = resolve_type::<T>(cell.options) {
            return resolved.convert::<T>(owner, cell.column, cell.text);
        }
    }

    T::decode(owner, cell)
}

fn log_int_failure(token: &str, err: &crate::ScalarError) {
    if !matches!(err, crate::ScalarError::Empty) {
        tracing::debug!(token, error = %err, "integer parse error, using zero");
    }
}

macro_rules! int_cell_value {
    ($kind:expr; $($t:ty),*) => {$(
        impl CellValue for $t {
            const KIND: Kind = $kind;

            fn decode(_owner: &dyn Any, cell: &Cell<'_>) -> Option<Self> {
                Self::coerce(cell.text())
            }

            fn coerce(token: &str) -> Option<Self> {
                let value = Scalar::new(token)
                    .to_int::<$t>()
                    .unwrap_or_else(|e| {
                        log_int_failure(token, &e);
                        0
                    });
                Some(value)
            }
        }
    )*};
}

int_cell_value!(Kind::Int; i8, i16, i32, i64, isize);
int_cell_value!(Kind::Uint; u8, u16, u32, u64, usize);

macro_rules! float_cell_value {
    ($($t:ty),*) => {$(
        impl CellValue for $t {
            const KIND: Kind = Kind::Float;

            fn decode(_owner: &dyn Any, cell: &Cell<'_>) -> Option<Self> {
                match Scalar::new(cell.text()).to_float::<$t>() {
                    Ok(x) => Some(x),
                    Err(e) => {
                        tracing::error!(
                            column = cell.column(),
                            cell = cell.text(),
                            error = %e,
                            "float convert error"
                        );
                        None
                    }
                }
            }

            fn coerce(token: &str) -> Option<Self> {
                Some(Scalar::new(token).to_float::<$t>().unwrap_or_default())
            }
        }
    )*};
}

float_cell_value!(f32, f64);

impl CellValue for bool {
    const KIND: Kind = Kind::Bool;

    fn decode(_owner: &dyn Any, cell: &Cell<'_>) -> Option<Self> {
        Self::coerce(cell.text())
    }

    fn coerce(token: &str) -> Option<Self> {
        Some(Scalar::new(token).to_bool())
    }
}

impl CellValue for String {
    const KIND: Kind = Kind::String;

    fn decode(_owner: &dyn Any, cell: &Cell<'_>) -> Option<Self> {
        Self::coerce(cell.text())
    }

    fn coerce(token: &str) -> Option<Self> {
        Some(token.to_string())
    }
}

impl CellValue for Bytes {
    const KIND: Kind = Kind::Bytes;

    fn decode(_owner: &dyn Any, cell: &Cell<'_>) -> Option<Self> {
        Self::coerce(cell.text())
    }

    fn coerce(token: &str) -> Option<Self> {
        Some(Scalar::new(token).to_bytes())
    }
}

/// The pointee is always allocated, even when its own decode fails
impl<T: CellValue + Default> CellValue for Option<T> {
    const KIND: Kind = Kind::Optional;

    fn decode(owner: &dyn Any, cell: &Cell<'_>) -> Option<Self> {
        Some(Some(populate::<T>(owner, cell).unwrap_or_default()))
    }

    fn coerce(token: &str) -> Option<Self> {
        T::coerce(token).map(Some)
    }

    fn is_record() -> bool {
        T::is_record()
    }

    fn from_converted(value: Box<dyn Any>) -> Result<Self, Box<dyn Any>> {
        match value.downcast::<Self>() {
            Ok(x) => Ok(*x),
            Err(value) => T::from_converted(value).map(Some),
        }
    }
}

impl<T: CellValue + Default> CellValue for Box<T> {
    const KIND: Kind = Kind::Optional;

    fn decode(owner: &dyn Any, cell: &Cell<'_>) -> Option<Self> {
        Some(Box::new(populate::<T>(owner, cell).unwrap_or_default()))
    }

    fn coerce(token: &str) -> Option<Self> {
        T::coerce(token).map(Box::new)
    }

    fn is_record() -> bool {
        T::is_record()
    }

    fn from_converted(value: Box<dyn Any>) -> Result<Self, Box<dyn Any>> {
        match value.downcast::<Self>() {
            Ok(x) => Ok(*x),
            Err(value) => T::from_converted(value).map(Box::new),
        }
    }
}

impl<T: CellValue> CellValue for Vec<T> {
    const KIND: Kind = Kind::Array;

    fn decode(owner: &dyn Any, cell: &Cell<'_>) -> Option<Self> {
        if cell.text.is_empty() {
            return None;
        }

        let converter = resolve_type::<T>(cell.options);
        let mut result = Vec::new();
        for token in cell.text.split(cell.options.array_separator.as_str()) {
            if token.is_empty() {
                continue;
            }

            let value = match converter {
                Some(ref converter) => converter.convert::<T>(owner, cell.column, token),
                // a boxed record would come back allocated, so reject before decoding
                None if T::is_record() && cell.nested => {
                    tracing::error!(
                        column = cell.column,
                        cell = cell.text,
                        "a record nested in a nested record is not supported"
                    );
                    None
                }
                None if T::is_record() => T::decode(owner, &cell.element(token)),
                None => T::coerce(token),
            };

            match value {
                Some(value) => result.push(value),
                None => tracing::warn!(
                    column = cell.column,
                    cell = cell.text,
                    token,
                    "array element parse error, skipping"
                ),
            }
        }

        Some(result)
    }
}

/// Walks the pairs of a map cell, handing every decoded entry to `insert`.
/// Returns false for an empty cell.
fn decode_entries<K, V, F>(owner: &dyn Any, cell: &Cell<'_>, mut insert: F) -> bool
where
    K: CellValue,
    V: CellValue,
    F: FnMut(K, V),
{
    if cell.text.is_empty() {
        return false;
    }

    let converter = resolve_type::<V>(cell.options);
    for pair in cell.options.parse_pairs(cell.text) {
        let key = match K::coerce(&pair.key) {
            Some(key) => key,
            None => {
                tracing::warn!(column = cell.column, key = %pair.key, "map key parse error, skipping");
                continue;
            }
        };

        // records are not decoded as map values, their separators would collide
        let value = match converter {
            Some(ref converter) => converter.convert::<V>(owner, cell.column, &pair.value),
            None => V::coerce(&pair.value),
        };

        match value {
            Some(value) => insert(key, value),
            None => tracing::warn!(
                column = cell.column,
                key = %pair.key,
                value = %pair.value,
                "map value parse error, skipping"
            ),
        }
    }

    true
}

impl<K, V> CellValue for HashMap<K, V>
where
    K: CellValue + Eq + Hash,
    V: CellValue,
{
    const KIND: Kind = Kind::Map;

    fn decode(owner: &dyn Any, cell: &Cell<'_>) -> Option<Self> {
        let mut result = HashMap::new();
        decode_entries(owner, cell, |k, v| {
            result.insert(k, v);
        })
        .then_some(result)
    }
}

impl<K, V> CellValue for BTreeMap<K, V>
where
    K: CellValue + Ord,
    V: CellValue,
{
    const KIND: Kind = Kind::Map;

    fn decode(owner: &dyn Any, cell: &Cell<'_>) -> Option<Self> {
        let mut result = BTreeMap::new();
        decode_entries(owner, cell, |k, v| {
            result.insert(k, v);
        })
        .then_some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn decode<T: CellValue>(options: &Options, text: &str) -> Option<T> {
        populate::<T>(&(), &Cell::new(options, "Column", text))
    }

    #[rstest]
    #[case("42", 42)]
    #[case("-3", -3)]
    #[case("", 0)]
    #[case("abc", 0)]
    #[case("1.5", 0)]
    fn test_int_field(#[case] input: &str, #[case] expected: i32) {
        assert_eq!(decode::<i32>(&Options::default(), input), Some(expected));
    }

    #[test]
    fn test_int_width_overflow_is_zero() {
        let options = Options::default();
        assert_eq!(decode::<i8>(&options, "200"), Some(0));
        assert_eq!(decode::<u8>(&options, "200"), Some(200));
        assert_eq!(decode::<u32>(&options, "-1"), Some(0));
    }

    #[test]
    fn test_float_field_failure_leaves_unset() {
        let options = Options::default();
        assert_eq!(decode::<f64>(&options, "1.25"), Some(1.25));
        assert_eq!(decode::<f32>(&options, "oops"), None);
        assert_eq!(f32::coerce("oops"), Some(0.0));
    }

    #[test]
    fn test_bool_and_string_fields() {
        let options = Options::default();
        assert_eq!(decode::<bool>(&options, "TRUE"), Some(true));
        assert_eq!(decode::<bool>(&options, "yes"), Some(false));
        assert_eq!(decode::<String>(&options, "a_1#b"), Some(String::from("a_1#b")));
        assert_eq!(decode::<Bytes>(&options, "ab"), Some(Bytes(b"ab".to_vec())));
    }

    #[test]
    fn test_vec_field() {
        let options = Options::default();
        assert_eq!(decode::<Vec<i32>>(&options, "1;2;3"), Some(vec![1, 2, 3]));
        assert_eq!(decode::<Vec<i32>>(&options, "1;;3;"), Some(vec![1, 3]));
        assert_eq!(decode::<Vec<u8>>(&options, "1;2"), Some(vec![1, 2]));
        assert_eq!(decode::<Vec<String>>(&options, "a;b"), Some(vec![String::from("a"), String::from("b")]));
    }

    #[test]
    fn test_empty_array_cell_is_absent() {
        let options = Options::default();
        assert_eq!(decode::<Vec<i32>>(&options, ""), None);
        assert_eq!(decode::<Vec<String>>(&options, ""), None);
        assert_eq!(decode::<Vec<Bytes>>(&options, ""), None);
    }

    #[test]
    fn test_vec_of_unsupported_skips_elements() {
        let options = Options::default();
        assert_eq!(decode::<Vec<Vec<i32>>>(&options, "1;2"), Some(vec![]));
    }

    #[test]
    fn test_map_field() {
        let options = Options::default();
        let actual = decode::<HashMap<String, i32>>(&options, "a_1#b_2#c_3").unwrap();
        let expected: HashMap<String, i32> = [("a", 1), ("b", 2), ("c", 3)]
            .iter()
            .map(|&(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_map_later_duplicate_wins() {
        let options = Options::default();
        let actual = decode::<BTreeMap<i32, String>>(&options, "1_a#2_b#1_c").unwrap();
        assert_eq!(actual.get(&1).map(|x| x.as_str()), Some("c"));
        assert_eq!(actual.len(), 2);
    }

    #[test]
    fn test_empty_map_cell_is_absent() {
        let options = Options::default();
        assert_eq!(decode::<HashMap<String, i32>>(&options, ""), None);
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    struct Letter(char);

    impl CellValue for Letter {}

    #[test]
    fn test_map_with_type_converter() {
        let mut options = Options::default();
        options.register_type_converter::<Letter, _>(|_, _, cell| cell.chars().next().map(Letter));
        let actual = decode::<BTreeMap<u8, Letter>>(&options, "1_xy#2_z#3_").unwrap();
        assert_eq!(
            actual.into_iter().collect::<Vec<_>>(),
            vec![(1, Letter('x')), (2, Letter('z'))]
        );
    }

    #[test]
    fn test_option_always_allocates() {
        let options = Options::default();
        assert_eq!(decode::<Option<i32>>(&options, "7"), Some(Some(7)));
        assert_eq!(decode::<Option<i32>>(&options, ""), Some(Some(0)));
        assert_eq!(decode::<Option<f64>>(&options, "x"), Some(Some(0.0)));
        assert_eq!(decode::<Box<String>>(&options, "s"), Some(Box::new(String::from("s"))));
    }

    #[test]
    fn test_column_converter_serves_pointee() {
        let mut options = Options::default();
        options.register_column_converter("Column", |_, _, cell| Some(cell.len()));
        assert_eq!(decode::<Option<usize>>(&options, "abc"), Some(Some(3)));
        assert_eq!(decode::<Box<usize>>(&options, "ab"), Some(Box::new(2)));
        assert_eq!(decode::<usize>(&options, "a"), Some(1));
    }

    #[test]
    fn test_type_converter_serves_pointer_field() {
        let mut options = Options::default();
        options.register_type_converter::<Letter, _>(|_, _, cell| cell.chars().last().map(Letter));
        assert_eq!(decode::<Option<Letter>>(&options, "abc"), Some(Some(Letter('c'))));
        assert_eq!(decode::<Letter>(&options, ""), None);
    }

    #[test]
    fn test_converter_absent_leaves_unset() {
        let mut options = Options::default();
        options.register_type_converter::<i32, _>(|_, _, _| None);
        assert_eq!(decode::<i32>(&options, "1"), None);
        assert_eq!(decode::<Vec<i32>>(&options, "1;2"), Some(vec![]));
    }

    #[test]
    fn test_converter_sees_owner() {
        let mut options = Options::default();
        options.register_column_converter("Column", |owner, column, cell| {
            let base = owner.downcast_ref::<i64>().copied().unwrap_or_default();
            Some(format!("{}:{}:{}", base, column, cell))
        });
        let actual = populate::<String>(&10i64, &Cell::new(&options, "Column", "x"));
        assert_eq!(actual, Some(String::from("10:Column:x")));
    }

    #[test]
    fn test_unsupported_kind() {
        #[derive(Debug, PartialEq)]
        struct Opaque;
        impl CellValue for Opaque {}

        let options = Options::default();
        assert_eq!(decode::<Opaque>(&options, "x"), None);
        assert_eq!(Opaque::coerce("x"), None);
        assert_eq!(Opaque::KIND, Kind::Other);
    }
}

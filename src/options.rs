use crate::convert::Converter;
use crate::pairs::{parse_nested_groups, parse_nested_pairs, parse_pairs, StringPair};
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};

/// Layout of a table and the rules for decoding its cells.
///
/// Construct one with [`Options::default`], tweak the public fields, register
/// converters, and pass it by reference to every read. Converters are meant
/// to be registered up front; a populated `Options` is only read from while
/// decoding.
///
/// ```
/// use tabula::Options;
///
/// let mut options = Options::default();
/// options.array_separator = String::from("|");
/// options
///     .register_column_converter("Flags", |_owner, _column, cell| {
///         Some(cell.split('|').count() as u32)
///     })
///     .ignore_columns(["Comment"]);
/// assert!(options.is_ignored("Comment"));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Options {
    /// Row holding the column names
    pub column_name_row: usize,

    /// First data row of a columnar table, must be at least 1
    pub data_begin_row: usize,

    /// First row of a key-value object table, must be at least 1
    pub object_data_begin_row: usize,

    /// Separates array elements, `1;2;3` is `[1, 2, 3]`
    pub array_separator: String,

    /// Separates a key from its value, the `_` in `a_1#b_2`
    pub kv_separator: String,

    /// Separates key-value pairs, the `#` in `a_1#b_2`
    pub pair_separator: String,

    /// Whether names from `#[serde(rename)]` and `#[serde(alias)]` take part
    /// in key-value alias fallback
    pub serde_aliases: bool,

    #[cfg_attr(feature = "serde", serde(skip))]
    column_converters: HashMap<String, Converter>,

    #[cfg_attr(feature = "serde", serde(skip))]
    type_converters: HashMap<TypeId, Converter>,

    #[cfg_attr(feature = "serde", serde(skip))]
    ignored_columns: HashSet<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            column_name_row: 0,
            data_begin_row: 1,
            object_data_begin_row: 1,
            array_separator: String::from(";"),
            kv_separator: String::from("_"),
            pair_separator: String::from("#"),
            serde_aliases: true,
            column_converters: HashMap::new(),
            type_converters: HashMap::new(),
            ignored_columns: HashSet::new(),
        }
    }
}

impl Options {
    /// Decode every cell of the named column with `converter` instead of the
    /// field's own decoding. Takes precedence over type converters.
    ///
    /// The converter receives the record under construction, the column name,
    /// and the raw cell. Returning `None` leaves the field untouched. The
    /// returned value must be the field's type, or for `Option<T>` and
    /// `Box<T>` fields, `T`.
    pub fn register_column_converter<T, F>(&mut self, column: impl Into<String>, converter: F) -> &mut Self
    where
        T: Any,
        F: Fn(&dyn Any, &str, &str) -> Option<T> + Send + Sync + 'static,
    {
        self.column_converters
            .insert(column.into(), Converter::new(converter));
        self
    }

    /// Decode every field, array element, and map value of type `T` with
    /// `converter`.
    ///
    /// A converter registered for `Box<T>` where `T` is a record also serves
    /// plain `T` slots, the box being unwrapped on assignment.
    pub fn register_type_converter<T, F>(&mut self, converter: F) -> &mut Self
    where
        T: Any,
        F: Fn(&dyn Any, &str, &str) -> Option<T> + Send + Sync + 'static,
    {
        self.type_converters
            .insert(TypeId::of::<T>(), Converter::new(converter));
        self
    }

    /// Skip the named columns entirely, such as comment columns
    pub fn ignore_columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_columns
            .extend(columns.into_iter().map(|x| x.into()));
        self
    }

    /// Returns if the column was registered as ignored
    pub fn is_ignored(&self, column: &str) -> bool {
        self.ignored_columns.contains(column)
    }

    pub(crate) fn column_converter(&self, column: &str) -> Option<&Converter> {
        self.column_converters.get(column)
    }

    pub(crate) fn type_converter(&self, id: TypeId) -> Option<&Converter> {
        self.type_converters.get(&id)
    }

    /// [`parse_pairs`] with the configured separators
    pub fn parse_pairs(&self, cell: &str) -> Vec<StringPair> {
        parse_pairs(cell, &self.pair_separator, &self.kv_separator)
    }

    /// [`parse_nested_pairs`] with the configured separators
    pub fn parse_nested_pairs<S: AsRef<str>>(&self, cell: &str, nested: &[S]) -> Vec<StringPair> {
        parse_nested_pairs(cell, &self.pair_separator, &self.kv_separator, nested)
    }

    /// [`parse_nested_groups`] with the configured separators
    pub fn parse_nested_groups<S: AsRef<str>>(
        &self,
        cell: &str,
        nested: &[S],
    ) -> Vec<Vec<StringPair>> {
        parse_nested_groups(
            cell,
            &self.pair_separator,
            &self.kv_separator,
            &self.array_separator,
            nested,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let options = Options::default();
        assert_eq!(options.column_name_row, 0);
        assert_eq!(options.data_begin_row, 1);
        assert_eq!(options.object_data_begin_row, 1);
        assert_eq!(options.array_separator, ";");
        assert_eq!(options.kv_separator, "_");
        assert_eq!(options.pair_separator, "#");
        assert!(options.serde_aliases);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut options = Options::default();
        options
            .register_column_converter("A", |_, _, _| Some(1i32))
            .register_column_converter("A", |_, _, _| Some(2i32));
        let value = options
            .column_converter("A")
            .and_then(|c| c.convert(&(), "A", ""))
            .and_then(|x| x.downcast::<i32>().ok());
        assert_eq!(value.map(|x| *x), Some(2));
    }

    #[test]
    fn test_clone_shares_converters() {
        let mut options = Options::default();
        options.register_type_converter::<u8, _>(|_, _, cell| cell.bytes().next());
        let copy = options.clone();
        assert!(copy.type_converter(TypeId::of::<u8>()).is_some());
        assert!(copy.type_converter(TypeId::of::<u16>()).is_none());
    }

    #[test]
    fn test_separators_flow_into_parsers() {
        let mut options = Options::default();
        options.pair_separator = String::from(",");
        options.kv_separator = String::from("=");
        let pairs = options.parse_pairs("a=1,b=2");
        assert_eq!(pairs, vec![StringPair::new("a", "1"), StringPair::new("b", "2")]);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_options_from_json() {
        let options: Options =
            serde_json::from_str(r#"{ "data_begin_row": 3, "array_separator": "|" }"#).unwrap();
        assert_eq!(options.data_begin_row, 3);
        assert_eq!(options.array_separator, "|");
        assert_eq!(options.kv_separator, "_");
    }
}

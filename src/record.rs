use crate::{Cell, Options};
use std::collections::HashMap;

/// A struct whose fields can be addressed by column name at run time.
///
/// Derive it with `#[derive(Record)]`; the derive generates a `match` over
/// the field names and an alias table from the field attributes.
///
/// ```
/// use tabula::Record;
///
/// #[derive(Debug, Default, Record)]
/// #[tabula(rename_all = "PascalCase")]
/// struct ItemCfg {
///     cfg_id: i32,
///     #[tabula(alias = "title")]
///     name: String,
///     unique: bool,
/// }
///
/// let rows = vec![
///     vec!["CfgId", "Name", "Unique"],
///     vec!["1", "sword", "true"],
/// ];
/// let items: Vec<ItemCfg> = tabula::read_slice(&rows, &Default::default())?;
/// assert_eq!(items[0].cfg_id, 1);
/// assert_eq!(items[0].name, "sword");
/// assert!(items[0].unique);
/// # Ok::<(), tabula::Error>(())
/// ```
pub trait Record: Default + 'static {
    /// Decode `cell` into the field addressed by `name`.
    ///
    /// Returns false when the record has no such field, leaving it untouched.
    fn populate_field(&mut self, name: &str, cell: &Cell<'_>) -> bool;

    /// Alternate names for fields, consulted when a key-value table names a
    /// field that does not exist
    fn aliases() -> &'static [Alias] {
        &[]
    }
}

/// A record behind a pointer is allocated and populated through the pointer
impl<R: Record> Record for Box<R> {
    fn populate_field(&mut self, name: &str, cell: &Cell<'_>) -> bool {
        (**self).populate_field(name, cell)
    }

    fn aliases() -> &'static [Alias] {
        R::aliases()
    }
}

/// Where an alias was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AliasSource {
    /// `#[tabula(alias = "...")]`
    Attribute,

    /// `#[serde(rename = "...")]` or `#[serde(alias = "...")]`
    Serde,
}

/// An alternate name of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alias {
    /// The alternate name
    pub name: &'static str,

    /// The name the field is addressed by in [`Record::populate_field`]
    pub field: &'static str,

    pub source: AliasSource,
}

/// Map of alternate names to field names for `R`, honoring
/// [`Options::serde_aliases`]
///
/// ```
/// use tabula::{alias_map, Options, Record};
///
/// #[derive(Default, Record)]
/// struct Settings {
///     #[tabula(alias = "quality")]
///     #[serde(rename = "image_quality")]
///     image_quality_level: i32,
/// }
///
/// let mut options = Options::default();
/// let aliases = alias_map::<Settings>(&options);
/// assert_eq!(aliases.get("quality"), Some(&"image_quality_level"));
/// assert_eq!(aliases.get("image_quality"), Some(&"image_quality_level"));
///
/// options.serde_aliases = false;
/// assert_eq!(alias_map::<Settings>(&options).get("image_quality"), None);
/// ```
pub fn alias_map<R: Record>(options: &Options) -> HashMap<&'static str, &'static str> {
    R::aliases()
        .iter()
        .filter(|alias| options.serde_aliases || alias.source != AliasSource::Serde)
        .map(|alias| (alias.name, alias.field))
        .collect()
}

/// Decode a key-value cell into a fresh record, one level deep.
///
/// Used by the derived `CellValue` impl. Each pair's key addresses a field;
/// the fields are decoded without converters. A record nested inside a
/// nested record is rejected and leaves its field untouched.
pub fn decode_record<R: Record>(cell: &Cell<'_>) -> Option<R> {
    if cell.is_nested() {
        tracing::error!(
            column = cell.column(),
            cell = cell.text(),
            "a record nested in a nested record is not supported"
        );
        return None;
    }

    let mut record = R::default();
    for pair in cell.options().parse_pairs(cell.text()) {
        let field = cell.nested_field(&pair.key, &pair.value);
        if !record.populate_field(&pair.key, &field) {
            tracing::error!(
                column = cell.column(),
                cell = cell.text(),
                field = %pair.key,
                value = %pair.value,
                "unknown nested field"
            );
        }
    }

    Some(record)
}

/// Decode `text` into the field `name` of `record` as if it were a cell of
/// column `name`.
///
/// Returns false when the record has no such field. This is the building
/// block for converters that assemble records themselves:
///
/// ```
/// use tabula::{populate_field, Options, Record};
///
/// #[derive(Debug, Default, Record)]
/// struct Child {
///     name: String,
///     levels: Vec<u8>,
/// }
///
/// let options = Options::default();
/// let mut child = Child::default();
/// for pair in options.parse_nested_pairs("name_a#levels_{1;2}", &["levels"]) {
///     populate_field(&mut child, &pair.key, &pair.value, &options);
/// }
/// assert_eq!(child.name, "a");
/// assert_eq!(child.levels, vec![1, 2]);
/// ```
pub fn populate_field<R: Record>(record: &mut R, name: &str, text: &str, options: &Options) -> bool {
    let cell = Cell::new(options, name, text);
    record.populate_field(name, &cell)
}

/// Builds one record from a data row, column by column
pub(crate) fn assemble_row<R, H, S>(header: &[H], row: &[S], options: &Options) -> R
where
    R: Record,
    H: AsRef<str>,
    S: AsRef<str>,
{
    let mut record = R::default();
    for (index, column) in header.iter().enumerate() {
        let column = column.as_ref();
        if options.is_ignored(column) {
            continue;
        }

        let text = match row.get(index) {
            Some(text) => text.as_ref(),
            None => {
                tracing::debug!(column, columns = row.len(), "row is shorter than the header");
                break;
            }
        };

        let cell = Cell::new(options, column, text);
        if !record.populate_field(column, &cell) {
            tracing::debug!(column, "unknown column");
        }
    }

    record
}

/// Assigns one `(name, value, comment...)` row of a key-value table.
///
/// `aliases` is built on first use, as most tables never need it.
pub(crate) fn assign_object_row<R, S>(
    record: &mut R,
    row: &[S],
    aliases: &mut Option<HashMap<&'static str, &'static str>>,
    options: &Options,
) where
    R: Record,
    S: AsRef<str>,
{
    let (name, text) = match row {
        [name, text, ..] => (name.as_ref(), text.as_ref()),
        _ => {
            tracing::debug!(cells = row.len(), "key-value row needs a name and a value");
            return;
        }
    };

    let cell = Cell::new(options, name, text);
    if record.populate_field(name, &cell) {
        return;
    }

    let field = aliases
        .get_or_insert_with(|| alias_map::<R>(options))
        .get(name)
        .copied();

    match field {
        Some(field) if record.populate_field(field, &cell) => {}
        _ => tracing::debug!(name, "unknown field"),
    }
}

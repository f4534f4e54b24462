use crate::record::{assemble_row, assign_object_row};
use crate::{CellValue, Error, ErrorKind, Options, Record};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// A map that [`read_map`] can fill, keyed by the first cell of each row
pub trait RecordMap: Default {
    type Key: CellValue;
    type Value: Record;

    /// Inserts an entry, replacing any earlier value under the same key
    fn insert_record(&mut self, key: Self::Key, value: Self::Value);
}

impl<K, V> RecordMap for HashMap<K, V>
where
    K: CellValue + Eq + Hash,
    V: Record,
{
    type Key = K;
    type Value = V;

    fn insert_record(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

impl<K, V> RecordMap for BTreeMap<K, V>
where
    K: CellValue + Ord,
    V: Record,
{
    type Key = K;
    type Value = V;

    fn insert_record(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

/// Returns the column names of a columnar table after checking the layout
fn column_names<'a, Row, S>(rows: &'a [Row], options: &Options) -> Result<&'a [S], Error>
where
    Row: AsRef<[S]>,
    S: AsRef<str>,
{
    if rows.is_empty() {
        return Err(Error::new(ErrorKind::NoRows));
    }

    let header = rows
        .get(options.column_name_row)
        .map(|x| x.as_ref())
        .ok_or_else(|| {
            Error::new(ErrorKind::MissingColumnNames {
                row: options.column_name_row,
                rows: rows.len(),
            })
        })?;

    if header.is_empty() {
        return Err(Error::new(ErrorKind::NoColumns {
            row: options.column_name_row,
        }));
    }

    if options.data_begin_row < 1 || options.data_begin_row <= options.column_name_row {
        return Err(Error::new(ErrorKind::InvalidDataBeginRow {
            row: options.data_begin_row,
            column_name_row: options.column_name_row,
        }));
    }

    Ok(header)
}

fn data_rows<'a, Row>(rows: &'a [Row], begin: usize) -> &'a [Row] {
    rows.get(begin..).unwrap_or_default()
}

/// Reads a columnar table into a map keyed by the first cell of every row.
///
/// The key is decoded on its own, independent of whatever column the header
/// names first, so the key column usually doubles as a field. A row whose key
/// does not decode is skipped and a later row with the same key replaces an
/// earlier one.
///
/// ```
/// use std::collections::HashMap;
/// use tabula::{Options, Record};
///
/// #[derive(Debug, Default, Record)]
/// #[tabula(rename_all = "PascalCase")]
/// struct ItemCfg {
///     cfg_id: i32,
///     name: String,
/// }
///
/// let rows = vec![
///     vec!["CfgId", "Name"],
///     vec!["1", "sword"],
///     vec!["2", "shield"],
/// ];
/// let items: HashMap<i32, ItemCfg> = tabula::read_map(&rows, &Options::default())?;
/// assert_eq!(items[&2].name, "shield");
/// # Ok::<(), tabula::Error>(())
/// ```
pub fn read_map<M, Row, S>(rows: &[Row], options: &Options) -> Result<M, Error>
where
    M: RecordMap,
    Row: AsRef<[S]>,
    S: AsRef<str>,
{
    let header = column_names(rows, options)?;
    let mut result = M::default();
    for (index, row) in data_rows(rows, options.data_begin_row).iter().enumerate() {
        let row = row.as_ref();
        let row_index = options.data_begin_row + index;
        let key = match row.first() {
            Some(cell) => <M::Key as CellValue>::coerce(cell.as_ref()),
            None => {
                tracing::debug!(row = row_index, "empty row, skipping");
                continue;
            }
        };

        let Some(key) = key else {
            tracing::warn!(row = row_index, "row key parse error, skipping");
            continue;
        };

        let value: M::Value = assemble_row(header, row, options);
        result.insert_record(key, value);
    }

    Ok(result)
}

/// Reads a columnar table into one record per data row, in row order.
///
/// Works the same for records and boxed records:
///
/// ```
/// use tabula::{Options, Record};
///
/// #[derive(Debug, Default, Record)]
/// struct Reward {
///     id: u32,
///     items: Vec<u32>,
/// }
///
/// let rows = vec![vec!["id", "items"], vec!["7", "1;2;3"]];
/// let rewards: Vec<Box<Reward>> = tabula::read_slice(&rows, &Options::default())?;
/// assert_eq!(rewards[0].items, vec![1, 2, 3]);
/// # Ok::<(), tabula::Error>(())
/// ```
pub fn read_slice<R, Row, S>(rows: &[Row], options: &Options) -> Result<Vec<R>, Error>
where
    R: Record,
    Row: AsRef<[S]>,
    S: AsRef<str>,
{
    let header = column_names(rows, options)?;
    let result = data_rows(rows, options.data_begin_row)
        .iter()
        .map(|row| assemble_row(header, row.as_ref(), options))
        .collect();
    Ok(result)
}

/// Fills a single record from a key-value table.
///
/// Every row from [`Options::object_data_begin_row`] on holds a field name,
/// the cell, and optionally a comment. A name that is not a field is looked up
/// among the record's aliases.
///
/// ```
/// use tabula::{Options, Record};
///
/// #[derive(Debug, Default, Record)]
/// #[tabula(rename_all = "PascalCase")]
/// struct Settings {
///     #[tabula(alias = "quality")]
///     image_quality: i32,
///     title: String,
/// }
///
/// let rows = vec![
///     vec!["Name", "Value", "Comment"],
///     vec!["quality", "100", "percent"],
///     vec!["Title", "demo", ""],
/// ];
/// let mut settings = Settings::default();
/// tabula::read_object(&rows, &mut settings, &Options::default())?;
/// assert_eq!(settings.image_quality, 100);
/// assert_eq!(settings.title, "demo");
/// # Ok::<(), tabula::Error>(())
/// ```
pub fn read_object<R, Row, S>(rows: &[Row], record: &mut R, options: &Options) -> Result<(), Error>
where
    R: Record,
    Row: AsRef<[S]>,
    S: AsRef<str>,
{
    let first = rows
        .first()
        .map(|x| x.as_ref())
        .ok_or_else(|| Error::new(ErrorKind::NoRows))?;

    if first.len() < 2 {
        return Err(Error::new(ErrorKind::TooFewObjectColumns {
            columns: first.len(),
        }));
    }

    if options.object_data_begin_row < 1 {
        return Err(Error::new(ErrorKind::InvalidObjectBeginRow {
            row: options.object_data_begin_row,
        }));
    }

    let mut aliases = None;
    for row in data_rows(rows, options.object_data_begin_row) {
        assign_object_row(record, row.as_ref(), &mut aliases, options);
    }

    Ok(())
}

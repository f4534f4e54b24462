use crate::{read_map, read_object, read_slice, Error, Options, Record, RecordMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads every row of CSV data as raw cells.
///
/// No row is treated as a header and rows may differ in length, the table
/// layout is left to [`Options`].
pub fn read_rows_from_reader(reader: impl Read) -> Result<Vec<Vec<String>>, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(rows)
}

/// Reads every row of a CSV file as raw cells
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>, Error> {
    let file = File::open(path)?;
    read_rows_from_reader(file)
}

/// [`read_map`] over the rows of a CSV file
pub fn read_file_map<M, P>(path: P, options: &Options) -> Result<M, Error>
where
    M: RecordMap,
    P: AsRef<Path>,
{
    let rows = read_rows(path)?;
    read_map(&rows, options)
}

/// [`read_slice`] over the rows of a CSV file
pub fn read_file_slice<R, P>(path: P, options: &Options) -> Result<Vec<R>, Error>
where
    R: Record,
    P: AsRef<Path>,
{
    let rows = read_rows(path)?;
    read_slice(&rows, options)
}

/// [`read_object`] over the rows of a CSV file
pub fn read_file_object<R, P>(path: P, record: &mut R, options: &Options) -> Result<(), Error>
where
    R: Record,
    P: AsRef<Path>,
{
    let rows = read_rows(path)?;
    read_object(&rows, record, options)
}

use std::fmt;

/// An error that aborts reading a whole table.
///
/// Problems confined to a single cell (an unknown column, a number that does
/// not parse, a converter that gives up) are never reported through this type.
/// They are logged and the affected field keeps its default value.
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Returns the row index that the error refers to (if available)
    pub fn row(&self) -> Option<usize> {
        self.0.row()
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// There were no rows at all
    NoRows,

    /// The configured column name row lies past the last row
    MissingColumnNames { row: usize, rows: usize },

    /// The column name row does not contain a single column
    NoColumns { row: usize },

    /// Data rows must start after the column name row
    InvalidDataBeginRow { row: usize, column_name_row: usize },

    /// Key-value object rows must start at row 1 or later
    InvalidObjectBeginRow { row: usize },

    /// Key-value object tables need a key and a value column
    TooFewObjectColumns { columns: usize },

    /// The row source could not be read
    Io(std::io::Error),

    /// The row source is not valid CSV
    #[cfg(feature = "files")]
    Csv(csv::Error),
}

impl ErrorKind {
    pub fn row(&self) -> Option<usize> {
        match *self {
            ErrorKind::MissingColumnNames { row, .. } => Some(row),
            ErrorKind::NoColumns { row } => Some(row),
            ErrorKind::InvalidDataBeginRow { row, .. } => Some(row),
            ErrorKind::InvalidObjectBeginRow { row } => Some(row),
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Io(ref err) => Some(err),
            #[cfg(feature = "files")]
            ErrorKind::Csv(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::NoRows => write!(f, "no rows, expected at least a column name row"),
            ErrorKind::MissingColumnNames { row, rows } => write!(
                f,
                "column name row {} is out of range, only {} rows present",
                row, rows
            ),
            ErrorKind::NoColumns { row } => write!(f, "column name row {} has no columns", row),
            ErrorKind::InvalidDataBeginRow {
                row,
                column_name_row,
            } => write!(
                f,
                "data begin row {} must be at least 1 and after the column name row {}",
                row, column_name_row
            ),
            ErrorKind::InvalidObjectBeginRow { row } => {
                write!(f, "object data begin row {} must be at least 1", row)
            }
            ErrorKind::TooFewObjectColumns { columns } => write!(
                f,
                "key-value tables need at least 2 columns, found {}",
                columns
            ),
            ErrorKind::Io(ref err) => write!(f, "unable to read rows: {}", err),
            #[cfg(feature = "files")]
            ErrorKind::Csv(ref err) => write!(f, "csv error: {}", err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::new(ErrorKind::Io(error))
    }
}

#[cfg(feature = "files")]
impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::new(ErrorKind::Csv(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_row() {
        let err = Error::new(ErrorKind::NoColumns { row: 2 });
        assert_eq!(err.row(), Some(2));
        assert_eq!(err.to_string(), "column name row 2 has no columns");

        let err = Error::new(ErrorKind::NoRows);
        assert_eq!(err.row(), None);
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error as _;
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err.kind(), ErrorKind::Io(_)));
        assert!(err.source().is_some());
    }
}

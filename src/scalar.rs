use std::error;
use std::fmt;
use std::num::{IntErrorKind, ParseFloatError, ParseIntError};
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

/// An error that can occur when converting a scalar into the requested type.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarError {
    /// The given string is empty
    Empty,

    /// The given string is not a number of the requested type
    NotANumber(String),

    /// The given string is a number outside of the requested type's range
    Overflow(String),
}

impl fmt::Display for ScalarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScalarError::Empty => write!(f, "is empty"),
            ScalarError::NotANumber(x) => write!(f, "is not a number: {}", x),
            ScalarError::Overflow(x) => write!(f, "caused an overflow: {}", x),
        }
    }
}

impl error::Error for ScalarError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

/// A single token of cell text.
///
/// The conversions here are strict and report why a token did not convert.
/// Field decoding is forgiving on top of them: a failed numeric conversion
/// becomes the zero value of the target type.
///
/// ```
/// use tabula::Scalar;
///
/// assert_eq!(Scalar::new("-12").to_i64(), Ok(-12));
/// assert_eq!(Scalar::new("300").to_int::<u8>().is_err(), true);
/// assert!(Scalar::new("TRUE").to_bool());
/// ```
#[derive(PartialEq, Eq, Copy, Clone)]
pub struct Scalar<'a> {
    data: &'a str,
}

impl<'a> Scalar<'a> {
    /// Create a new scalar backed by the given token
    pub fn new(data: &'a str) -> Scalar<'a> {
        Scalar { data }
    }

    /// View the underlying token
    pub fn as_str(&self) -> &'a str {
        self.data
    }

    /// Try converting the scalar to an integer of the given width
    pub fn to_int<T>(&self) -> Result<T, ScalarError>
    where
        T: FromStr<Err = ParseIntError>,
    {
        self.data
            .parse::<T>()
            .map_err(|e| int_error(self.data, &e))
    }

    /// Try converting the scalar to i64
    pub fn to_i64(&self) -> Result<i64, ScalarError> {
        self.to_int::<i64>()
    }

    /// Try converting the scalar to u64
    pub fn to_u64(&self) -> Result<u64, ScalarError> {
        self.to_int::<u64>()
    }

    /// Try converting the scalar to a float of the given width
    pub fn to_float<T>(&self) -> Result<T, ScalarError>
    where
        T: FromStr<Err = ParseFloatError>,
    {
        if self.data.is_empty() {
            return Err(ScalarError::Empty);
        }

        self.data
            .parse::<T>()
            .map_err(|_| ScalarError::NotANumber(self.data.to_string()))
    }

    /// Try converting the scalar to f64
    pub fn to_f64(&self) -> Result<f64, ScalarError> {
        self.to_float::<f64>()
    }

    /// Interpret the scalar as a boolean. Only a case insensitive `true` and
    /// the literal `1` are true, every other token is false.
    ///
    /// ```
    /// use tabula::Scalar;
    ///
    /// assert!(Scalar::new("True").to_bool());
    /// assert!(Scalar::new("1").to_bool());
    /// assert!(!Scalar::new("yes").to_bool());
    /// ```
    pub fn to_bool(&self) -> bool {
        self.data.eq_ignore_ascii_case("true") || self.data == "1"
    }

    /// Copy the raw bytes of the token
    pub fn to_bytes(&self) -> Bytes {
        Bytes(self.data.as_bytes().to_vec())
    }
}

impl<'a> fmt::Debug for Scalar<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar {{ {} }}", self.data)
    }
}

impl<'a> fmt::Display for Scalar<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data)
    }
}

fn int_error(data: &str, err: &ParseIntError) -> ScalarError {
    match err.kind() {
        IntErrorKind::Empty => ScalarError::Empty,
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ScalarError::Overflow(data.to_string())
        }
        _ => ScalarError::NotANumber(data.to_string()),
    }
}

/// A raw byte sequence decoded verbatim from a cell.
///
/// `Vec<u8>` decodes as an array of small integers (`1;2;3`), so a field
/// that wants the cell's bytes uses this wrapper instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Bytes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(data: Vec<u8>) -> Self {
        Bytes(data)
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

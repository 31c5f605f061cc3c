//! Errors and error-related utilities.
//!
//! Only a missing or empty input source is fatal. Row-level problems
//! (malformed rows, unparsable numbers, unresolved columns) never become
//! errors; they are absorbed into [crate::record::Event::valid] and counted
//! in [crate::profile::Diagnostics].

use std::{error, fmt, result};

/// The result type used throughout this library.
pub type Result<T> = result::Result<T, Box<dyn error::Error>>;

/// The input source cannot be opened, or it has no data rows.
#[derive(Debug)]
pub struct SourceUnavailable(pub String);

/// Invalid input (e.g. a malformed symbol rule file).
#[derive(Debug)]
pub struct InvalidInput(pub String);

/// Invalid command line argument.
#[derive(Debug)]
pub struct InvalidArgument(pub String);

impl fmt::Display for SourceUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "source unavailable: {}", self.0)
    }
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid input: {}", self.0)
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid argument: {}", self.0)
    }
}

impl error::Error for SourceUnavailable {}

impl error::Error for InvalidInput {}

impl error::Error for InvalidArgument {}

/// A helper for constructing [SourceUnavailable].
pub fn source_unavailable(s: String) -> Box<dyn error::Error> {
    SourceUnavailable(s).into()
}

/// A helper for constructing [InvalidInput].
pub fn invalid_input(s: String) -> Box<dyn error::Error> {
    InvalidInput(s).into()
}

/// A helper for constructing [InvalidInput].
pub fn invalid_input_ref(s: &str) -> Box<dyn error::Error> {
    InvalidInput(s.to_owned()).into()
}

/// A helper for constructing [InvalidArgument].
pub fn invalid_argument(s: String) -> Box<dyn error::Error> {
    InvalidArgument(s).into()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            format!("{}", source_unavailable("data/x.csv: no data rows".to_owned())),
            "source unavailable: data/x.csv: no data rows"
        );
        assert_eq!(
            format!("{}", invalid_input_ref("empty pattern")),
            "invalid input: empty pattern"
        );
        assert_eq!(
            format!("{}", invalid_argument("delimiter".to_owned())),
            "invalid argument: delimiter"
        );
    }

    #[test]
    fn downcast() {
        let e = source_unavailable("gone".to_owned());
        assert!(e.downcast_ref::<SourceUnavailable>().is_some());
        assert!(e.downcast_ref::<InvalidInput>().is_none());
    }
}

use std::{error::Error, fmt};

/// Wrapper type to print an error followed by its chain of sources on a
/// single line, separated by colons.
pub struct ErrorDisplay<E>(pub E);

impl<E: Error> fmt::Display for ErrorDisplay<E> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)?;

        let mut current_err: &dyn Error = &self.0;
        while let Some(source) = current_err.source() {
            write!(formatter, ": {}", source)?;
            current_err = source;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::copy::{ApplyError, TreeError};

    #[test]
    fn chains_sources() {
        let err = ApplyError::from(TreeError::MissingNode("node#4".to_owned()));

        assert_eq!(
            ErrorDisplay(err).to_string(),
            "target tree could not be read or modified: node node#4 does not exist"
        );
    }
}

//! Configuration for file readers.

use crate::ReaderError;

/// Options applied when scanning a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Whether CSV files start with a header row
    pub has_header: bool,

    /// CSV field delimiter
    pub delimiter: u8,

    /// Read at most this many rows
    pub row_limit: Option<usize>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            row_limit: None,
        }
    }
}

impl ReaderOptions {
    /// Creates a new builder for `ReaderOptions`.
    pub fn builder() -> ReaderOptionsBuilder {
        ReaderOptionsBuilder::default()
    }

    /// Validates the options.
    pub fn validate(&self) -> Result<(), ReaderError> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'\n' | b'\r' | b'"') {
            return Err(ReaderError::ConfigurationError(format!(
                "unusable delimiter byte {:#04x}",
                self.delimiter
            )));
        }

        if self.row_limit == Some(0) {
            return Err(ReaderError::ConfigurationError(
                "row_limit must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for `ReaderOptions`.
#[derive(Debug, Clone, Default)]
pub struct ReaderOptionsBuilder {
    has_header: Option<bool>,
    delimiter: Option<u8>,
    row_limit: Option<usize>,
}

impl ReaderOptionsBuilder {
    /// Sets whether CSV files have a header row.
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = Some(has_header);
        self
    }

    /// Sets the CSV delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Caps the number of rows read.
    pub fn row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }

    /// Builds the `ReaderOptions`.
    ///
    /// Returns an error if the resulting options are invalid.
    pub fn build(self) -> Result<ReaderOptions, ReaderError> {
        let defaults = ReaderOptions::default();
        let options = ReaderOptions {
            has_header: self.has_header.unwrap_or(defaults.has_header),
            delimiter: self.delimiter.unwrap_or(defaults.delimiter),
            row_limit: self.row_limit,
        };

        options.validate()?;
        Ok(options)
    }
}

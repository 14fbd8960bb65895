use crate::error::CityReportError;

/// A normalized city name, kept in both a display form and a URL-safe form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    display: String,
    encoded: String,
}

impl CityQuery {
    /// Build a query from the words given on the command line.
    ///
    /// Words are split on any whitespace and re-joined with single spaces, so
    /// `["  New", "York "]` and `["New York"]` both yield `New York`.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self, CityReportError> {
        let display = words
            .iter()
            .flat_map(|w| w.as_ref().split_whitespace())
            .collect::<Vec<_>>()
            .join(" ");

        if display.is_empty() {
            return Err(CityReportError::InvalidInput);
        }

        let encoded = urlencoding::encode(&display).into_owned();
        Ok(Self { display, encoded })
    }

    /// Human-readable form, e.g. `New York`.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Percent-encoded form for URL embedding, e.g. `New%20York`.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

impl std::fmt::Display for CityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

//! Required-field checks for the artist create and edit forms.

/// One or more required form fields were blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please fill in all required fields.")]
pub struct MissingFields {
    /// Form field names in the order they were checked.
    pub fields: Vec<&'static str>,
}

/// Collects blank required fields so all of them are reported at once.
///
/// ```
/// use artlab_core::validation::RequiredFields;
///
/// let result = RequiredFields::default()
///     .text("name", "Nova")
///     .text("project_name", "  ")
///     .list("values", &[])
///     .finish();
/// assert_eq!(result.unwrap_err().fields, vec!["project_name", "values"]);
/// ```
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    /// Require a text value that is not blank after trimming.
    pub fn text(mut self, field: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.missing.push(field);
        }
        self
    }

    /// Require a list with at least one entry.
    pub fn list(mut self, field: &'static str, values: &[String]) -> Self {
        if values.is_empty() {
            self.missing.push(field);
        }
        self
    }

    pub fn finish(self) -> Result<(), MissingFields> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(MissingFields {
                fields: self.missing,
            })
        }
    }
}

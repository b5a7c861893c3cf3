//! Input validation framework.
//!
//! A request is validated in full before any lock is taken or store is
//! touched; every violated rule is collected so the caller sees all of them
//! at once.

use ticketline_domain::AllocationError;

/// Types that can validate themselves.
pub trait Validatable {
    /// Run every validation rule and collect the failures.
    fn validate_all(&self) -> ValidationResult;
}

/// Accumulated validation failures.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    /// An empty, passing result.
    pub fn success() -> Self {
        Self::default()
    }

    /// Record a failure for a named field.
    pub fn add_field_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(format!("{}: {}", field, message.into()));
    }

    /// Whether no rule failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The collected failure messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Convert failures into an [`AllocationError::InvalidArgument`].
    pub fn ensure_valid(&self) -> Result<(), AllocationError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(AllocationError::InvalidArgument(self.errors.join("; ")))
        }
    }
}

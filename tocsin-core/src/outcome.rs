//! Outcome conversion for listener return values.

use crate::error::BoxError;

/// Trait for converting a listener's return value into an outcome.
///
/// A listener may return nothing or a `Result`. The value itself is ignored;
/// only success or failure matters to the emission.
///
/// # Default Implementations
///
/// - `()` → success
/// - `Result<T, E>` → delegates to `T`, or fails with `E`
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a listener outcome",
    label = "missing `IntoOutcome` implementation",
    note = "Listeners must return `()` or a `Result` whose error converts into `BoxError`."
)]
pub trait IntoOutcome {
    /// Convert the value into success or a boxed failure.
    fn into_outcome(self) -> Result<(), BoxError>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoOutcome,
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<(), BoxError> {
        self.map_err(Into::into)?.into_outcome()
    }
}

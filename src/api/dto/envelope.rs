//! Response envelope contract for schema-validated handlers.

use super::error::ErrorRecord;

/// Access to the optional error list carried by a response envelope.
///
/// The pipeline inspects the list after processing: an empty or absent list
/// means success, anything else turns the response into a 400 error envelope.
///
/// # Example
///
/// ```rust
/// use handlerkit::api::dto::{Envelope, ErrorRecord};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct SumResponse {
///     #[serde(skip_serializing_if = "Option::is_none")]
///     summ: Option<i64>,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     errors: Option<Vec<ErrorRecord>>,
/// }
///
/// impl Envelope for SumResponse {
///     fn errors(&self) -> &[ErrorRecord] {
///         self.errors.as_deref().unwrap_or_default()
///     }
///
///     fn clear_errors(&mut self) {
///         self.errors = None;
///     }
/// }
/// ```
pub trait Envelope {
    /// Error records attached by the processing function.
    fn errors(&self) -> &[ErrorRecord];

    /// Marks the error field absent so it is omitted from the wire form.
    fn clear_errors(&mut self);
}

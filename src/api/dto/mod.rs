//! Data Transfer Objects for handler requests and responses.
//!
//! All wire types use Serde for JSON serialization. Request envelopes declare
//! their field rules with `validator`.

pub mod envelope;
pub mod error;
pub mod reply;

pub use envelope::Envelope;
pub use error::{ErrorRecord, ErrorsBody, UnsupportedMethodBody};
pub use reply::Reply;

//! Response head type used by the header encoder.
//!
//! A handler produces a full `Response<Bytes>`; the encoder splits it and
//! serializes the head and the body separately, since the head needs the body
//! length and the injected headers before anything is written.

use http::Response;

/// The status and headers of a response, with the body detached.
pub type ResponseHead = Response<()>;

//! Bidirectional conversion between canonical types and the Responses API
//!
//! Outbound: [`request::build_request`] (with [`tools`] and [`call_tracker`]).
//! Inbound: [`response::convert_response`] for completed responses and
//! [`stream::StreamTranslator`] for event streams.

pub mod call_tracker;
pub mod request;
pub mod response;
pub mod stream;
pub mod tools;

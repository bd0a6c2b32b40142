//! Wire format types for the vendor HTTP API
//!
//! Pure serde structs matching the JSON the Responses API sends and
//! receives. They are only used at the boundary; everything internal works on
//! the canonical types.

pub mod openai;

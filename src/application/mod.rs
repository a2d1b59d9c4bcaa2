//! Application layer
//!
//! Use cases that orchestrate domain logic for one workflow each. A use case
//! accepts a command DTO from the adapter layer, calls into the domain
//! service, and maps entities back into serializable responses.

pub mod invoice;

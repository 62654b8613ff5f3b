//! Gateway webhook endpoints.

pub(crate) mod acquiring;

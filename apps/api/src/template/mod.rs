// Template intake and marker processing over HTTP.
// All marker logic lives in `crate::markers`; this module only adapts it.

pub mod handlers;

//! HTTP endpoint handlers.

pub mod site;
pub mod system;

//! HTTP request handlers, one module per resource.

pub mod maintenance;
pub mod notification;

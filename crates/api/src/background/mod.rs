//! Long-running background tasks spawned by the server.

pub mod maintenance;

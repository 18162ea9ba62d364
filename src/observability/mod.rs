//! Observability subsystem.
//!
//! Request/response visibility is hook-based: the client installs the
//! structured log hooks from [`logging`] by default, and collaborators can
//! register their own observers alongside them.

pub mod logging;

//! Operations behind the HTTP handlers and CLI commands.

pub mod accounts;
pub mod auto_leave;
pub mod work_updates;

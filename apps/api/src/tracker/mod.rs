// Application tracker: Kanban stages and per-user application records.

pub mod handlers;
pub mod status;
pub mod store;

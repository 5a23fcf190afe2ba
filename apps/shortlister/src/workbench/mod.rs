// Workbench: the in-memory form state (job, candidates, staged files) and the submit flow.
// One workbench per process; nothing here is persisted.

pub mod candidates;
pub mod handlers;
pub mod session;
pub mod staging;

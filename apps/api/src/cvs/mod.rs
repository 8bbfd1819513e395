// CV processing (upload → pipeline → one persisted analysis) and candidate ranking.

pub mod handlers;
pub mod store;

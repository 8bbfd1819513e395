// Job positions: CRUD over the `jobs` table. Deleting a job cascades to its analyses.

pub mod handlers;
pub mod store;

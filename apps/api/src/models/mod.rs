pub mod analysis;
pub mod job;

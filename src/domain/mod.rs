pub mod record;
pub mod routine;
pub mod tracking;

pub mod source;
pub mod tracking;

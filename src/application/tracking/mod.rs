pub mod reconciler;
pub mod routine;

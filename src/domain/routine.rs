use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoutineError {
    #[error("Routine failed: {details}")]
    Transient { details: String },
    #[error("Routine failed permanently: {details}")]
    Terminal { details: String },
}

impl RoutineError {
    pub fn transient<S: Into<String>>(details: S) -> Self {
        RoutineError::Transient {
            details: details.into(),
        }
    }

    pub fn terminal<S: Into<String>>(details: S) -> Self {
        RoutineError::Terminal {
            details: details.into(),
        }
    }

    /// Terminal failures must not be retried: the source schema or the
    /// report workbook is broken and a rerun would fail the same way.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RoutineError::Terminal { .. })
    }
}

#[async_trait::async_trait]
pub trait Routine: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> error_stack::Result<(), RoutineError>;
}

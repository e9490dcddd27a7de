use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("stage '{stage}' failed on `{command}`: {message}")]
    StepExecution {
        stage: String,
        command: String,
        message: String,
    },
}

impl FlowError {
    pub fn usage(message: impl Into<String>) -> Self {
        FlowError::Usage(message.into())
    }

    pub fn step(stage: &str, command: &str, err: &anyhow::Error) -> Self {
        FlowError::StepExecution {
            stage: stage.to_string(),
            command: command.to_string(),
            message: format!("{err:#}"),
        }
    }
}

use std::fmt;

/// Recoverable misuse of the immediate-mode helper.
///
/// These never panic. The recorder keeps the first one raised during a frame
/// and the rest of the frame renders whatever fit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImmediateError {
    /// The vertex buffer is full; further vertices are dropped.
    VerticesFull,
    /// The command or uniform list is full; further draws are dropped.
    CommandsFull,
    /// A matrix or pipeline stack push exceeded its depth.
    StackOverflow,
    /// A matrix or pipeline stack pop hit the bottom entry.
    StackUnderflow,
    /// A draw referenced a pipeline that does not exist (anymore).
    NoPipeline,
}

impl fmt::Display for ImmediateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ImmediateError::VerticesFull => "vertex buffer full",
            ImmediateError::CommandsFull => "command buffer full",
            ImmediateError::StackOverflow => "stack overflow",
            ImmediateError::StackUnderflow => "stack underflow",
            ImmediateError::NoPipeline => "draw references an unknown pipeline",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ImmediateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_human_readable() {
        assert_eq!(ImmediateError::VerticesFull.to_string(), "vertex buffer full");
        assert_eq!(ImmediateError::StackUnderflow.to_string(), "stack underflow");
    }

    #[test]
    fn converts_into_anyhow() {
        let err: anyhow::Error = ImmediateError::NoPipeline.into();
        assert!(err.to_string().contains("unknown pipeline"));
    }
}

/// Failures of the terminal backend
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Raw mode could not be entered.
    #[error("Failed to initialize terminal: {0}")]
    Init(#[source] io::Error),
    /// The alternate screen could not be set up or measured.
    #[error("Failed to create window: {0}")]
    Window(#[source] io::Error),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

//! CLI error handling with user-friendly messages.

use picframe::client::ClientError;
use picframe::prefetch::PrefetchError;
use picframe::screen::ScreenError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Failed to open or drive the screen
    Screen(ScreenError),
    /// Failed to talk to the image server
    Client(ClientError),
    /// Failed to start the prefetcher
    Prefetch(PrefetchError),
    /// Failed to install the signal handler
    Signal(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Screen(ScreenError::Open { .. }) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. Not running on a console: try --headless for testing");
                eprintln!("  2. Permissions: add your user to the 'video' group");
            }
            CliError::Client(_) => {
                eprintln!();
                eprintln!("Check that the image server is reachable at the given --server-url");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "failed to initialize logging: {}", e),
            CliError::Screen(e) => write!(f, "screen error: {}", e),
            CliError::Client(e) => write!(f, "image server error: {}", e),
            CliError::Prefetch(e) => write!(f, "prefetcher error: {}", e),
            CliError::Signal(e) => write!(f, "failed to set signal handler: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

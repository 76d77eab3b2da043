use crate::console::Console;
use crate::domain::CliRequest;
use crate::error::Result;

/// What the service layer gets to see once bootstrap is done.
#[derive(Debug, Clone, Copy)]
pub struct LaunchContext<'a> {
    pub request: &'a CliRequest,
    pub console: &'a Console,
}

/// The host-provided layer the launcher hands off to.
///
/// Returning [`LaunchError::Aborted`](crate::LaunchError::Aborted) ends the
/// invocation with exit code 2; any other error with exit code 1.
pub trait ServiceLayer {
    fn start(&mut self, context: &LaunchContext<'_>) -> Result<()>;

    /// Called once `start` has been attempted, on every exit path.
    fn dispose(&mut self) {}
}

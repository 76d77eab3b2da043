use crate::error::Result;
use crate::ports::{LaunchContext, ServiceLayer};

/// Stand-in service for hosts that bring nothing of their own.
#[derive(Debug, Clone, Default)]
pub struct DefaultService {
    started: bool,
}

impl DefaultService {
    pub const fn new() -> Self {
        Self { started: false }
    }

    pub const fn is_started(&self) -> bool {
        self.started
    }

    fn name() -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

impl ServiceLayer for DefaultService {
    fn start(&mut self, context: &LaunchContext<'_>) -> Result<()> {
        tracing::info!(
            args = ?context.request.command_line.args(),
            "starting {}",
            Self::name()
        );
        context.console.println(format!("Service {} start!", Self::name()));
        self.started = true;
        Ok(())
    }

    fn dispose(&mut self) {
        self.started = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Console;
    use crate::console::testing::Buffer;
    use crate::domain::CliRequest;

    #[test]
    fn test_start_prints_greeting() {
        let out = Buffer::default();
        let console = Console::new(out.writer(), Buffer::default().writer());
        let request = CliRequest::default();
        let mut service = DefaultService::new();

        service
            .start(&LaunchContext {
                request: &request,
                console: &console,
            })
            .unwrap();

        assert!(service.is_started());
        assert_eq!(out.contents(), "Service DefaultService start!\n");

        service.dispose();
        assert!(!service.is_started());
    }
}

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::console::Style;
use tracing::subscriber::DefaultGuard;

use crate::cli::{CommandLineParser, merge};
use crate::config::{Settings, load_project_config};
use crate::console::{Console, SharedWriter, StreamScope};
use crate::domain::build::HOME_PROPERTY;
use crate::domain::{BuildInfo, CliRequest, LaunchOption};
use crate::error::{LaunchError, Result};
use crate::ports::{LaunchContext, ServiceLayer};
use crate::services::{
    LoggingConfig, PropertyResolver, SystemPropertyView, process_env, resolve_toolchains,
};

pub const PROJECT_DIRECTORY_ENV: &str = "LAUNCH_PROJECT_DIRECTORY";
pub const HOME_ENV: &str = "LAUNCH_HOME";

const ERROR_TITLE: &str = "Error executing launch.";
const ABORTED_TITLE: &str = "ABORTED";
const STACK_TRACE_HINT: &str =
    "To see the full stack trace of the errors, re-run with the -e switch.";

/// Runs one invocation from raw arguments to the service layer and maps the
/// outcome to an exit code.
pub struct Launcher<S: ServiceLayer> {
    settings: Settings,
    parser: CommandLineParser,
    build: BuildInfo,
    view: Arc<SystemPropertyView>,
    env: Vec<(String, String)>,
    user_home: Option<PathBuf>,
    console: Console,
    service: S,
}

impl<S: ServiceLayer> Launcher<S> {
    pub fn new(service: S) -> Self {
        Self {
            settings: Settings::default(),
            parser: CommandLineParser::default(),
            build: BuildInfo::current(),
            view: SystemPropertyView::global(),
            env: process_env(),
            user_home: directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()),
            console: Console::stdio(),
            service,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_property_view(mut self, view: Arc<SystemPropertyView>) -> Self {
        self.view = view;
        self
    }

    #[must_use]
    pub fn with_env<I, K, V>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = env.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    #[must_use]
    pub fn with_user_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.user_home = Some(home.into());
        self
    }

    #[must_use]
    pub fn with_build_info(mut self, build: BuildInfo) -> Self {
        self.build = build;
        self
    }

    #[must_use]
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub const fn service(&self) -> &S {
        &self.service
    }

    pub fn into_service(self) -> S {
        self.service
    }

    /// Entry point for the binary: process working directory and stdio.
    pub fn main<I, A>(&mut self, args: I) -> i32
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.do_main(CliRequest::new(args))
    }

    /// Entry point for hosts that run the launcher in-process with their own
    /// streams.
    pub fn run_embedded<I, A>(
        &mut self,
        args: I,
        working_directory: impl Into<PathBuf>,
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
    ) -> i32
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let base = Console::new(SharedWriter::new(out), SharedWriter::new(err));
        let request = CliRequest::new(args).with_working_directory(working_directory);
        self.run(request, &base)
    }

    pub fn do_main(&mut self, request: CliRequest) -> i32 {
        let base = self.console.clone();
        self.run(request, &base)
    }

    fn run(&mut self, mut request: CliRequest, base: &Console) -> i32 {
        let mut scope = StreamScope::acquire(base);
        let mut log_guard = None;
        request.flag_precedence = self.settings.flag_precedence;

        let code = match self.bootstrap(&mut request, &mut scope, &mut log_guard) {
            Ok(()) => 0,
            Err(e) => report(&e, &request, scope.console()),
        };

        drop(log_guard);
        code
    }

    fn bootstrap(
        &mut self,
        request: &mut CliRequest,
        scope: &mut StreamScope,
        log_guard: &mut Option<DefaultGuard>,
    ) -> Result<()> {
        self.initialize(request)?;
        self.cli(request, scope.console())?;
        self.properties(request)?;

        let logging = LoggingConfig::derive(request)?;
        logging.apply_to(request);
        logging.redirect(scope.console_mut());
        *log_guard = Some(logging.install(scope.console(), self.settings.log_filter.as_deref()));
        tracing::debug!(
            debug = request.debug,
            quiet = request.quiet,
            color = request.color_enabled,
            "logging configured"
        );

        if request.debug || request.has_option(LaunchOption::ShowVersion) {
            scope.console().println(self.version_report(request));
        }

        request.toolchains = Some(resolve_toolchains(request, self.user_home.as_deref())?);

        let context = LaunchContext {
            request,
            console: scope.console(),
        };
        let started = self.service.start(&context);
        self.service.dispose();
        started
    }

    fn initialize(&self, request: &mut CliRequest) -> Result<()> {
        if request.working_directory.is_none() {
            request.working_directory = Some(std::env::current_dir()?);
        }

        let project_directory = request
            .project_directory
            .clone()
            .or_else(|| self.env_var(PROJECT_DIRECTORY_ENV).map(PathBuf::from))
            .or_else(|| request.working_directory.clone());
        request.project_directory = project_directory.map(|dir| absolute(&dir, true));

        if let Some(home) = self.env_var(HOME_ENV) {
            let home = absolute(Path::new(home), false);
            request
                .system_properties
                .set(HOME_PROPERTY, home.to_string_lossy());
        }

        tracing::debug!(
            working_directory = ?request.working_directory,
            project_directory = ?request.project_directory,
            "initialized"
        );
        Ok(())
    }

    fn cli(&self, request: &mut CliRequest, console: &Console) -> Result<()> {
        let base = request
            .project_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config = match load_project_config(&base, &self.settings.config_file, &self.parser) {
            Ok(config) => config,
            Err(e @ (LaunchError::ConfigParse { .. } | LaunchError::ConfigArguments { .. })) => {
                let message = match &e {
                    LaunchError::ConfigParse { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                console.eprintln(format!("Unable to parse launch.config: {message}"));
                console.println(self.parser.help());
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let parsed = self.parser.parse(request.args.iter()).map_err(|e| {
            console.eprintln(format!("Unable to parse command line options: {e}"));
            console.println(self.parser.help());
            LaunchError::Parse(e)
        })?;

        request.command_line = merge(parsed, config);

        if request.has_option(LaunchOption::Help) {
            console.println(self.parser.help());
            return Err(LaunchError::Exit(0));
        }
        if request.has_option(LaunchOption::Version) {
            console.println(self.version_report(request));
            return Err(LaunchError::Exit(0));
        }
        Ok(())
    }

    fn properties(&self, request: &mut CliRequest) -> Result<()> {
        let resolver = PropertyResolver::new(self.env.iter().cloned(), &self.build, &self.view);
        let (system, user) = resolver.resolve(&request.command_line)?;

        request.system_properties.extend_from(&system);
        request.user_properties = user;
        Ok(())
    }

    fn version_report(&self, request: &CliRequest) -> String {
        self.build
            .version_report(request.system_properties.get(HOME_PROPERTY))
    }

    fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

fn absolute(path: &Path, canonical: bool) -> PathBuf {
    let resolved = if canonical {
        std::fs::canonicalize(path).or_else(|_| std::path::absolute(path))
    } else {
        std::path::absolute(path)
    };
    resolved.unwrap_or_else(|_| path.to_path_buf())
}

fn report(error: &LaunchError, request: &CliRequest, console: &Console) -> i32 {
    match error {
        LaunchError::Exit(code) => return *code,
        e if e.is_unrecognized_option() => {}
        LaunchError::Aborted(_) => show_error(console, ABORTED_TITLE, error, request),
        _ => show_error(console, ERROR_TITLE, error, request),
    }
    error.exit_code()
}

fn show_error(console: &Console, title: &str, error: &LaunchError, request: &CliRequest) {
    if request.color_enabled {
        let style = Style::new().red().bold().force_styling(true);
        console.eprintln(style.apply_to(title));
    } else {
        console.eprintln(title);
    }
    console.eprintln(error);

    if request.show_errors {
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            console.eprintln(format!("Caused by: {cause}"));
            source = cause.source();
        }
    } else {
        console.eprintln(STACK_TRACE_HINT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::testing::Buffer;
    use crate::error::ParseError;

    fn console() -> (Console, Buffer) {
        let err = Buffer::default();
        (Console::new(Buffer::default().writer(), err.writer()), err)
    }

    #[test]
    fn test_report_exit_is_silent() {
        let (console, err) = console();
        let code = report(&LaunchError::Exit(0), &CliRequest::default(), &console);
        assert_eq!(code, 0);
        assert_eq!(err.contents(), "");
    }

    #[test]
    fn test_report_unrecognized_option_is_silent() {
        let (console, err) = console();
        let error = LaunchError::Parse(ParseError::UnrecognizedOption("-Z".into()));
        assert_eq!(report(&error, &CliRequest::default(), &console), 1);
        assert_eq!(err.contents(), "");
    }

    #[test]
    fn test_report_abort_without_show_errors() {
        let (console, err) = console();
        let error = LaunchError::Aborted("stopped by service".into());
        assert_eq!(report(&error, &CliRequest::default(), &console), 2);
        assert_eq!(
            err.contents(),
            format!("ABORTED\nstopped by service\n{STACK_TRACE_HINT}\n")
        );
    }

    #[test]
    fn test_report_prints_cause_chain_with_show_errors() {
        let (console, err) = console();
        let error = LaunchError::ConfigParse {
            path: PathBuf::from(".launch/launch.config"),
            source: ParseError::MalformedOption {
                option: "-l".into(),
                reason: "missing value".into(),
            },
        };
        let request = CliRequest {
            show_errors: true,
            ..Default::default()
        };

        assert_eq!(report(&error, &request, &console), 1);
        let printed = err.contents();
        assert!(printed.starts_with("Error executing launch.\n"));
        assert!(printed.contains("Caused by: Malformed option -l: missing value"));
        assert!(!printed.contains(STACK_TRACE_HINT));
    }

    #[test]
    fn test_colored_title() {
        let (console, err) = console();
        let request = CliRequest {
            color_enabled: true,
            ..Default::default()
        };
        show_error(&console, ERROR_TITLE, &LaunchError::Settings("x".into()), &request);
        assert!(err.contents().starts_with("\u{1b}["));
    }

    #[test]
    fn test_absolute_keeps_unresolvable_paths() {
        let path = Path::new("/definitely/not/here");
        assert_eq!(absolute(path, true), PathBuf::from("/definitely/not/here"));
    }
}

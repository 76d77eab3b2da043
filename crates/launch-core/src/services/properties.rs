use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::domain::build::{BUILD_VERSION_PROPERTY, VERSION_PROPERTY};
use crate::domain::{BuildInfo, LaunchOption, ParsedCommandLine, PropertySet};
use crate::error::{LaunchError, Result};

/// Prefix for environment variables imported as system properties.
pub const ENV_PREFIX: &str = "env.";

static GLOBAL_VIEW: LazyLock<Arc<SystemPropertyView>> =
    LazyLock::new(|| Arc::new(SystemPropertyView::new()));

/// Process-wide property table. Every `-D` assignment is mirrored here for
/// consumers that do not have the request at hand. Resolution only writes to
/// it; a request never reads earlier invocations back out of it.
#[derive(Debug, Default)]
pub struct SystemPropertyView {
    inner: RwLock<PropertySet>,
}

impl SystemPropertyView {
    pub const fn new() -> Self {
        Self {
            inner: RwLock::new(PropertySet::new()),
        }
    }

    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_VIEW)
    }

    pub fn set(&self, name: &str, value: &str) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(name, value);
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(str::to_string)
    }

    pub fn snapshot(&self) -> PropertySet {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Turns a merged command line into the system and user property sets.
///
/// Consumers look properties up as user, then build metadata, then
/// environment; the resolver guarantees the last two by overlaying build
/// metadata onto the system set after everything else.
#[derive(Debug)]
pub struct PropertyResolver<'a> {
    env: Vec<(String, String)>,
    build: &'a BuildInfo,
    view: &'a SystemPropertyView,
}

impl<'a> PropertyResolver<'a> {
    pub fn new<I, K, V>(env: I, build: &'a BuildInfo, view: &'a SystemPropertyView) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            env: env.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            build,
            view,
        }
    }

    pub fn resolve(&self, command_line: &ParsedCommandLine) -> Result<(PropertySet, PropertySet)> {
        let mut system = PropertySet::new();
        let mut user = PropertySet::new();

        add_env_vars(&mut system, &self.env);

        for definition in command_line.values_of(LaunchOption::SetSystemProperty) {
            let (name, value) = parse_property_definition(definition)?;
            tracing::debug!(%name, %value, "user property");
            self.view.set(&name, &value);
            user.set(name, value);
        }

        system.set(VERSION_PROPERTY, self.build.version.as_str());
        system.set(BUILD_VERSION_PROPERTY, self.build.version_string());

        Ok((system, user))
    }
}

/// The process environment, with non-UTF-8 names and values converted lossily.
pub fn process_env() -> Vec<(String, String)> {
    std::env::vars_os()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })
        .collect()
}

fn add_env_vars(target: &mut PropertySet, env: &[(String, String)]) {
    for (key, value) in env {
        let key = if cfg!(windows) {
            key.to_uppercase()
        } else {
            key.clone()
        };
        target.set(format!("{ENV_PREFIX}{key}"), value.as_str());
    }
}

/// `name=value` sets `value`, a bare `name` sets `"true"`.
pub fn parse_property_definition(definition: &str) -> Result<(String, String)> {
    let (name, value) = match definition.split_once('=') {
        Some((name, value)) => (name.trim(), value),
        None => (definition.trim(), "true"),
    };

    if name.is_empty() {
        return Err(LaunchError::InvalidPropertyDefinition(definition.to_string()));
    }

    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CommandLineParser, merge};
    use pretty_assertions::assert_eq;

    fn build() -> BuildInfo {
        BuildInfo {
            name: "launch".to_string(),
            version: "9.9.9".to_string(),
            revision: None,
            timestamp: None,
        }
    }

    fn parse(tokens: &[&str]) -> ParsedCommandLine {
        CommandLineParser::default()
            .parse(tokens.iter().copied())
            .unwrap()
    }

    #[test]
    fn test_parse_property_definition() {
        assert_eq!(
            parse_property_definition("x=1").unwrap(),
            ("x".to_string(), "1".to_string())
        );
        assert_eq!(
            parse_property_definition("flag").unwrap(),
            ("flag".to_string(), "true".to_string())
        );
        assert_eq!(
            parse_property_definition(" spaced = kept ").unwrap(),
            ("spaced".to_string(), " kept ".to_string())
        );
        assert_eq!(
            parse_property_definition("url=a=b").unwrap(),
            ("url".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_property_definition("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
    }

    #[test]
    fn test_empty_property_name_rejected() {
        for bad in ["=value", "  =x", "", "   "] {
            assert!(matches!(
                parse_property_definition(bad),
                Err(LaunchError::InvalidPropertyDefinition(_))
            ));
        }
    }

    #[test]
    fn test_env_vars_are_prefixed() {
        let build = build();
        let view = SystemPropertyView::new();
        let resolver = PropertyResolver::new([("HOME", "/home/me")], &build, &view);

        let (system, user) = resolver.resolve(&ParsedCommandLine::new()).unwrap();
        assert_eq!(system.get("env.HOME"), Some("/home/me"));
        assert!(user.is_empty());
    }

    #[test]
    fn test_cli_property_beats_config_property() {
        let build = build();
        let view = SystemPropertyView::new();
        let resolver = PropertyResolver::new(Vec::<(String, String)>::new(), &build, &view);

        let merged = merge(parse(&["-Dx=1"]), Some(parse(&["-Dx=2"])));
        let (_, user) = resolver.resolve(&merged).unwrap();
        assert_eq!(user.get("x"), Some("1"));
    }

    #[test]
    fn test_bare_property_is_true() {
        let build = build();
        let view = SystemPropertyView::new();
        let resolver = PropertyResolver::new(Vec::<(String, String)>::new(), &build, &view);

        let (_, user) = resolver.resolve(&parse(&["-Dflag"])).unwrap();
        assert_eq!(user.get("flag"), Some("true"));
    }

    #[test]
    fn test_user_properties_are_mirrored() {
        let build = build();
        let view = SystemPropertyView::new();
        let resolver = PropertyResolver::new(Vec::<(String, String)>::new(), &build, &view);

        let (system, _) = resolver.resolve(&parse(&["-Dmirrored=yes"])).unwrap();
        assert_eq!(view.get("mirrored").as_deref(), Some("yes"));
        assert_eq!(system.get("mirrored"), None);
    }

    #[test]
    fn test_view_does_not_feed_later_resolutions() {
        let build = build();
        let view = SystemPropertyView::new();
        let resolver = PropertyResolver::new(Vec::<(String, String)>::new(), &build, &view);

        resolver.resolve(&parse(&["-Dleak=1"])).unwrap();
        let (system, user) = resolver.resolve(&ParsedCommandLine::new()).unwrap();

        assert!(view.snapshot().contains("leak"));
        assert!(!system.contains("leak"));
        assert!(user.is_empty());
    }

    #[test]
    fn test_build_metadata_is_final() {
        let build = build();
        let view = SystemPropertyView::new();
        let resolver = PropertyResolver::new([("IGNORED", "x")], &build, &view);

        let (system, user) = resolver
            .resolve(&parse(&["-Dlaunch.version=0.0.1"]))
            .unwrap();
        assert_eq!(system.get(VERSION_PROPERTY), Some("9.9.9"));
        assert_eq!(system.get(BUILD_VERSION_PROPERTY), Some("launch 9.9.9"));
        assert_eq!(user.get(VERSION_PROPERTY), Some("0.0.1"));
    }

    #[test]
    fn test_invalid_definition_aborts_resolution() {
        let build = build();
        let view = SystemPropertyView::new();
        let resolver = PropertyResolver::new(Vec::<(String, String)>::new(), &build, &view);

        let result = resolver.resolve(&parse(&["-D", "=oops"]));
        assert!(matches!(
            result,
            Err(LaunchError::InvalidPropertyDefinition(_))
        ));
    }
}

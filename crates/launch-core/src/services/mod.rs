mod default_service;
mod logging;
mod paths;
mod properties;
mod toolchains;

pub use default_service::DefaultService;
pub use logging::{ColorMode, LoggingConfig, STYLE_COLOR_PROPERTY};
pub use paths::resolve_file;
pub use properties::{
    ENV_PREFIX, PropertyResolver, SystemPropertyView, parse_property_definition, process_env,
};
pub use toolchains::{GLOBAL_TOOLCHAINS_FILE, USER_TOOLCHAINS_FILE, resolve_toolchains};

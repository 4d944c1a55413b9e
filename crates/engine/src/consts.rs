// Application constants
pub const APP_NAME:        &str = env!("CARGO_PKG_NAME");
pub const APP_VERSION:     &str = env!("CARGO_PKG_VERSION");
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

// Directory triple handed to `directories::ProjectDirs`
pub const APP_QUALIFIER:    &str = "org";
pub const APP_ORGANIZATION: &str = "Aurora";
pub const APP_DIR_NAME:     &str = "Aurora";

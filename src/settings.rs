//! Settings come from, in increasing priority: the defaults below, an
//! optional `settings.toml`, `SPLITTER__SECTION__KEY` variables, and the
//! plain `MONGODB_URI` and `PORT` variables.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    Mongo,
    Memory,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
    pub debug_routes: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Database {
    pub uri: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Log {
    pub level: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Validation {
    pub strict_participants: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub storage: Storage,
    pub database: Database,
    pub log: Log,
    pub validation: Validation,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.debug_routes", false)?
            .set_default("storage", "mongo")?
            .set_default("database.name", "BillSplitter")?
            .set_default("log.level", "info")?
            .set_default("validation.strict_participants", false)?
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("SPLITTER")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.uri", std::env::var("MONGODB_URI").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        settings.try_deserialize()
    }
}

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Without a database section the service keeps everything in memory.
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub jobs: JobsConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub seed_on_startup: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JobsConfig {
    #[serde(default = "default_risk_alert")]
    pub risk_alert_interval_secs: u64,
}

fn default_risk_alert() -> u64 {
    60
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            risk_alert_interval_secs: default_risk_alert(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorConfig {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Simulated samples kept in memory per zone for live analysis.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    #[serde(default)]
    pub autostart_zones: Vec<String>,
}

fn default_tick_interval() -> u64 {
    1500
}

fn default_history_window() -> usize {
    60
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            history_window: default_history_window(),
            autostart_zones: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("RACKWATCH")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("simulator.autostart_zones")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        Ok(app_config)
    }
}

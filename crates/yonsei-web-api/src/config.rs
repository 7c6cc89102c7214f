use std::net::IpAddr;

use tokio::fs;

pub async fn read() -> anyhow::Result<Config> {
    let config_path = "cafeteria_api.toml";

    let canon = tokio::fs::canonicalize(".").await?;
    tracing::info!("try reading config file {config_path} at {canon:?}");

    let config = if fs::try_exists(config_path).await? {
        tracing::info!("found config");

        let config = fs::read_to_string(config_path).await?;
        let config = toml::from_str(&config)?;
        tracing::info!("read config");
        config
    } else {
        tracing::info!("config does not exist, using default config");
        Config::default()
    };

    tracing::info!("using config: {config:#?}");
    Ok(config)
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub menu_source: MenuSourceConfig,
}

#[derive(Debug, serde::Deserialize)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        #[cfg(not(debug_assertions))]
        tracing::warn!("using default server config in release");

        ServerConfig {
            address: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MenuSourceConfig {
    /// page whose script block carries the weekly menu data
    pub url: String,
    pub user_agent: String,
    pub referer: String,
}

impl Default for MenuSourceConfig {
    fn default() -> Self {
        Self {
            url: format!("https://www.yonsei.ac.kr/_custom/yonsei/m/menu.jsp"),
            user_agent: format!("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"),
            referer: format!("https://yonseicoop.co.kr/"),
        }
    }
}

use serde::Deserialize;

use crate::error::Result;
use crate::sun::Observer;

/// Site configuration, read from `DANCALENDAR_*` environment variables.
/// Defaults to Copenhagen.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,
}

fn default_latitude() -> f64 {
    55.6761
}

fn default_longitude() -> f64 {
    12.5683
}

fn default_calendar_name() -> String {
    "Danmark".into()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(envy::prefixed("DANCALENDAR_").from_env::<Config>()?)
    }

    pub fn observer(&self) -> Observer {
        Observer {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            latitude: default_latitude(),
            longitude: default_longitude(),
            calendar_name: default_calendar_name(),
        }
    }
}

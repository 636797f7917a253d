use std::{
  env::{self, VarError},
  fmt::Display,
  path::PathBuf,
  str::FromStr,
};

use libbrushmatch::prelude::*;

use crate::errors::AppError;

#[derive(Clone, Debug)]
pub struct Config {
  pub env: Env,

  // Sources
  pub scoring_config: ConfigSource,
  pub catalogs: CatalogSource,

  // Output
  pub pretty: bool,
}

impl Config {
  pub fn from_env() -> Result<Config, AppError> {
    let config = Config {
      env: Env::from(env::var("ENV").unwrap_or("dev".into())),
      scoring_config: match parse_env::<PathBuf>("SCORING_CONFIG", PathBuf::new())? {
        path if path.as_os_str().is_empty() => ConfigSource::Embedded,
        path => ConfigSource::File(path),
      },
      catalogs: match parse_env::<PathBuf>("CATALOG_DIR", PathBuf::new())? {
        dir if dir.as_os_str().is_empty() => CatalogSource::Embedded,
        dir => CatalogSource::Directory(dir),
      },
      pretty: env::var("PRETTY").unwrap_or_default() == "1",
    };

    if let CatalogSource::Directory(dir) = &config.catalogs
      && !dir.is_dir()
    {
      return Err(AppError::ConfigError(format!("CATALOG_DIR {} is not a directory", dir.display())));
    }

    Ok(config)
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Env {
  Dev,
  Production,
}

impl From<String> for Env {
  fn from(value: String) -> Self {
    match value.as_ref() {
      "production" => Env::Production,
      _ => Env::Dev,
    }
  }
}

pub fn parse_env<T>(name: &str, default: T) -> Result<T, AppError>
where
  T: FromStr,
  T::Err: Display,
{
  match env::var(name) {
    Ok(value) if value.is_empty() => Ok(default),
    Ok(value) => value.parse::<T>().map_err(|err| AppError::ConfigError(format!("could not read {name}: {err}"))),
    Err(VarError::NotPresent) => Ok(default),
    Err(err) => Err(AppError::ConfigError(format!("could not read {name}: {err}"))),
  }
}

use std::{
  env::{self, VarError},
  fmt::Display,
  path::PathBuf,
  str::FromStr,
};

use libslutpris::prelude::*;

use crate::errors::AppError;

#[derive(Clone, Debug, Default)]
pub struct Config {
  pub env: Env,

  // Inputs and output
  pub booli_path: PathBuf,
  pub hemnet_path: PathBuf,
  pub output_path: Option<PathBuf>,
  pub sanitize_hemnet: bool,

  // Match settings
  pub params: MergeParams,
}

impl Config {
  pub fn from_env() -> Result<Config, AppError> {
    let defaults = MergeParams::default();

    let params = MergeParams {
      max_date_diff_days: parse_env("MAX_DATE_DIFF_DAYS", defaults.max_date_diff_days)?,
      max_final_price_diff_pct: parse_env("MAX_FINAL_PRICE_DIFF_PCT", defaults.max_final_price_diff_pct)?,
      max_score: parse_env("MAX_MATCH_SCORE", defaults.max_score)?,
    };

    let config = Config {
      env: Env::from(env::var("ENV").unwrap_or("dev".into())),
      booli_path: env::var("BOOLI_PATH").unwrap_or("booli.json".into()).into(),
      hemnet_path: env::var("HEMNET_PATH").unwrap_or("hemnet.json".into()).into(),
      output_path: env::var("OUTPUT_PATH").ok().filter(|path| !path.is_empty()).map(PathBuf::from),
      sanitize_hemnet: env::var("SANITIZE_HEMNET").unwrap_or_default() == "1",
      params: params.checked().map_err(|err| AppError::ConfigError(err.to_string()))?,
    };

    Ok(config)
  }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Env {
  #[default]
  Dev,
  Production,
}

impl From<String> for Env {
  fn from(value: String) -> Self {
    match value.as_ref() {
      "dev" => Env::Dev,
      "production" => Env::Production,
      _ => Env::Dev,
    }
  }
}

pub fn parse_env<T>(name: &str, default: T) -> anyhow::Result<T>
where
  T: FromStr,
  T::Err: Display,
{
  match env::var(name) {
    Ok(value) if value.is_empty() => Ok(default),
    Ok(value) => Ok(value.parse::<T>().map_err(|err| AppError::ConfigError(format!("could not read {name}: {err}")))?),
    Err(err) => match err {
      VarError::NotPresent => Ok(default),
      _ => Err(AppError::ConfigError(format!("could not read {name}: {err}")).into()),
    },
  }
}

#[cfg(test)]
mod tests {
  use std::{env, path::PathBuf};

  use crate::errors::AppError;

  use super::{Config, Env};

  const VARIABLES: &[&str] = &[
    "ENV",
    "BOOLI_PATH",
    "HEMNET_PATH",
    "OUTPUT_PATH",
    "SANITIZE_HEMNET",
    "MAX_DATE_DIFF_DAYS",
    "MAX_FINAL_PRICE_DIFF_PCT",
    "MAX_MATCH_SCORE",
  ];

  fn clear_env() {
    for name in VARIABLES {
      unsafe {
        env::remove_var(name);
      }
    }
  }

  #[test]
  #[serial_test::serial]
  fn default_config() {
    clear_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.env, Env::Dev);
    assert_eq!(config.booli_path, PathBuf::from("booli.json"));
    assert_eq!(config.hemnet_path, PathBuf::from("hemnet.json"));
    assert_eq!(config.output_path, None);
    assert!(!config.sanitize_hemnet);
    assert_eq!(config.params.max_score, 3.0);
  }

  #[test]
  #[serial_test::serial]
  fn parse_config_from_env() {
    unsafe {
      env::set_var("ENV", "production");
      env::set_var("BOOLI_PATH", "/data/booli.json");
      env::set_var("HEMNET_PATH", "/data/hemnet.json");
      env::set_var("OUTPUT_PATH", "/data/combined.json");
      env::set_var("SANITIZE_HEMNET", "1");
      env::set_var("MAX_DATE_DIFF_DAYS", "3.5");
      env::set_var("MAX_FINAL_PRICE_DIFF_PCT", "");
      env::set_var("MAX_MATCH_SCORE", "4");
    }

    let config = Config::from_env().unwrap();

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.booli_path, PathBuf::from("/data/booli.json"));
    assert_eq!(config.hemnet_path, PathBuf::from("/data/hemnet.json"));
    assert_eq!(config.output_path, Some(PathBuf::from("/data/combined.json")));
    assert!(config.sanitize_hemnet);
    assert_eq!(config.params.max_date_diff_days, 3.5);
    assert_eq!(config.params.max_final_price_diff_pct, 3.0);
    assert_eq!(config.params.max_score, 4.0);

    clear_env();
  }

  #[test]
  #[serial_test::serial]
  fn invalid_params() {
    clear_env();

    unsafe {
      env::set_var("MAX_MATCH_SCORE", "beaucoup");
    }

    assert!(Config::from_env().is_err());

    unsafe {
      env::set_var("MAX_MATCH_SCORE", "-1");
    }

    assert!(matches!(Config::from_env(), Err(AppError::ConfigError(_))));

    clear_env();
  }

  #[test]
  #[serial_test::serial]
  fn parse_env() {
    unsafe {
      env::set_var("INT", "42");
      env::set_var("BOOL", "true");
    }

    assert_eq!(super::parse_env::<u32>("INT", 0).unwrap(), 42);
    assert!(super::parse_env::<bool>("BOOL", false).unwrap());
    assert_eq!(super::parse_env::<f64>("SLUTPRIS_UNSET_VARIABLE", 1.5).unwrap(), 1.5);

    assert!(super::parse_env::<u32>("BOOL", 0).is_err());
  }
}

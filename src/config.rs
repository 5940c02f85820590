use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 6;
pub const DEFAULT_APPLICATIONS_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub min_password_len: usize,
    pub applications_page_size: u32,
    pub operator_email: Option<String>,
    pub operator_password: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
            applications_page_size: DEFAULT_APPLICATIONS_PAGE_SIZE,
            operator_email: None,
            operator_password: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            api_url: get_env("PORTAL_API_URL")?,
            request_timeout_secs: get_env_parse_or("PORTAL_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            min_password_len: get_env_parse_or(
                "PORTAL_MIN_PASSWORD_LEN",
                DEFAULT_MIN_PASSWORD_LEN,
            )?,
            applications_page_size: get_env_parse_or(
                "PORTAL_APPLICATIONS_PAGE_SIZE",
                DEFAULT_APPLICATIONS_PAGE_SIZE,
            )?,
            operator_email: env::var("PORTAL_EMAIL").ok().filter(|v| !v.trim().is_empty()),
            operator_password: env::var("PORTAL_PASSWORD").ok().filter(|v| !v.is_empty()),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}

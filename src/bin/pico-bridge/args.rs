use std::ffi::OsString;

use anyhow::{Context as _, Result, bail};
use clap::Parser;
use safety_bridge::sink::TableName;

#[derive(Debug, Parser)]
#[command(version, about = "Forwards safety monitor readings from a serial port to a table store")]
pub struct Args {
    /// Serial port of the monitor; auto-detected when omitted.
    #[arg(long, env = "SERIAL_PORT")]
    pub port: Option<String>,

    #[arg(long, env = "BAUD_RATE", default_value_t = 115200)]
    pub baud_rate: u32,

    #[arg(long, env = "TABLE_NAME", default_value = "sensor_readings")]
    pub table: TableName,

    #[arg(long, env = "INSERT_TIMEOUT_SECS", default_value_t = 10)]
    pub insert_timeout_secs: u64,

    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,

    /// Print the available serial ports and exit.
    #[arg(long)]
    pub list_ports: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum BackendConfig {
    Postgres { database_url: String },
    Rest { url: String, api_key: String },
}

impl Args {
    /// Parses the command line. `--help` and `--version` are printed here and
    /// give `None`; every other clap error is returned so the caller exits 1.
    pub fn from_cli_args<I, T>(itr: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(itr) {
            Ok(args) => Ok(Some(args)),
            Err(err) if !err.use_stderr() => {
                err.print().context("failed to print usage")?;
                Ok(None)
            }
            Err(err) => Err(anyhow::Error::from(err).context("invalid arguments")),
        }
    }

    pub fn backend(&self) -> Result<BackendConfig> {
        match (&self.database_url, &self.supabase_url, &self.supabase_key) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                bail!("configure either DATABASE_URL or SUPABASE_URL/SUPABASE_KEY, not both")
            }
            (Some(database_url), None, None) => Ok(BackendConfig::Postgres {
                database_url: database_url.clone(),
            }),
            (None, Some(url), Some(api_key)) => Ok(BackendConfig::Rest {
                url: url.clone(),
                api_key: api_key.clone(),
            }),
            (None, Some(_), None) => bail!("SUPABASE_KEY is required with SUPABASE_URL"),
            (None, None, Some(_)) => bail!("SUPABASE_URL is required with SUPABASE_KEY"),
            (None, None, None) => {
                bail!("no sink configured: set DATABASE_URL or SUPABASE_URL and SUPABASE_KEY")
            }
        }
    }
}

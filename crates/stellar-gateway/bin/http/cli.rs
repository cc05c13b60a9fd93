use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use stellar_telemetry::LogFormat;

pub const LISTEN_ADDR_ENV: &str = "STELLAR_GATEWAY_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "STELLAR_GATEWAY_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "STELLAR_GATEWAY_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "STELLAR_GATEWAY_MYSQL_DSN";
pub const MYSQL_MAX_CONNECTIONS_ENV: &str = "STELLAR_GATEWAY_MYSQL_MAX_CONNECTIONS";
pub const MYSQL_ACQUIRE_TIMEOUT_ENV: &str = "STELLAR_GATEWAY_MYSQL_ACQUIRE_TIMEOUT_SECS";
pub const MYSQL_INIT_SCHEMA_ENV: &str = "STELLAR_GATEWAY_MYSQL_INIT_SCHEMA";
pub const GENERATOR_ENV: &str = "STELLAR_GATEWAY_GENERATOR";
pub const ID_LENGTH_ENV: &str = "STELLAR_GATEWAY_ID_LENGTH";
pub const MAX_ATTEMPTS_ENV: &str = "STELLAR_GATEWAY_MAX_ATTEMPTS_PER_LENGTH";
pub const MAX_ID_LENGTH_ENV: &str = "STELLAR_GATEWAY_MAX_ID_LENGTH";
pub const CORS_ORIGINS_ENV: &str = "STELLAR_GATEWAY_CORS_ALLOWED_ORIGINS";
pub const LOG_FORMAT_ENV: &str = "STELLAR_GATEWAY_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratorArg {
    #[value(name = "random")]
    Random,
    #[value(name = "sequential")]
    Sequential,
}

impl Display for GeneratorArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorArg::Random => write!(f, "random"),
            GeneratorArg::Sequential => write!(f, "sequential"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "stellar-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix of the short URLs handed back to clients.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(long, env = MYSQL_MAX_CONNECTIONS_ENV, default_value_t = 10)]
    pub mysql_max_connections: u32,

    #[arg(long, env = MYSQL_ACQUIRE_TIMEOUT_ENV, default_value_t = 5)]
    pub mysql_acquire_timeout_secs: u64,

    /// Create the `short_urls` table on startup if it is missing.
    #[arg(long, env = MYSQL_INIT_SCHEMA_ENV)]
    pub mysql_init_schema: bool,

    #[arg(
        long,
        env = GENERATOR_ENV,
        value_enum,
        default_value_t = GeneratorArg::Random
    )]
    pub generator: GeneratorArg,

    #[arg(long, env = ID_LENGTH_ENV, default_value_t = 6)]
    pub id_length: usize,

    #[arg(long, env = MAX_ATTEMPTS_ENV, default_value_t = 8)]
    pub max_attempts_per_length: u32,

    #[arg(long, env = MAX_ID_LENGTH_ENV, default_value_t = 12)]
    pub max_id_length: usize,

    /// Comma separated; CORS is disabled when empty.
    #[arg(long, env = CORS_ORIGINS_ENV, value_delimiter = ',')]
    pub cors_allowed_origins: Vec<String>,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,
}

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use crate::delivery::SmtpSettings;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/eventreg";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_DELIVERY_QUEUE_CAPACITY: usize = 256;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_MAIL_FROM: &str = "EventReg <no-reply@eventreg.local>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTransportKind {
    Smtp,
    Log,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub store_backend: StoreBackend,
    pub delivery_queue_capacity: usize,
    pub mail_transport: MailTransportKind,
    pub smtp: SmtpSettings,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Missing or unparsable values
    /// fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parsed_var(&lookup, "SERVER_HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = parsed_var(&lookup, "SERVER_PORT", DEFAULT_PORT);

        let store_backend = match lookup("STORE_BACKEND").as_deref() {
            Some("memory") => StoreBackend::Memory,
            Some("postgres") | None => StoreBackend::Postgres,
            Some(other) => {
                tracing::warn!("Config: Unknown STORE_BACKEND '{}', using postgres", other);
                StoreBackend::Postgres
            }
        };

        let mail_transport = match lookup("MAIL_TRANSPORT").as_deref() {
            Some("smtp") => MailTransportKind::Smtp,
            Some("log") | None => MailTransportKind::Log,
            Some(other) => {
                tracing::warn!("Config: Unknown MAIL_TRANSPORT '{}', using log", other);
                MailTransportKind::Log
            }
        };

        let credentials = match (lookup("SMTP_USERNAME"), lookup("SMTP_PASSWORD")) {
            (Some(username), Some(password)) if !username.is_empty() => {
                Some((username, password))
            }
            _ => None,
        };

        Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: parsed_var(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            ),
            bind_addr: SocketAddr::new(host, port),
            store_backend,
            delivery_queue_capacity: parsed_var(
                &lookup,
                "DELIVERY_QUEUE_CAPACITY",
                DEFAULT_DELIVERY_QUEUE_CAPACITY,
            ),
            mail_transport,
            smtp: SmtpSettings {
                host: lookup("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: parsed_var(&lookup, "SMTP_PORT", DEFAULT_SMTP_PORT),
                credentials,
                from: lookup("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            },
        }
    }
}

fn parsed_var<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Config: Invalid {} '{}', using {}", key, raw, default);
            default
        }),
        None => default,
    }
}

use std::{env, io::Write};

use dk_common::Secret;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use razorpay_tools::RazorpayConfig;
use serde_json::json;
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_DKS_HOST: &str = "127.0.0.1";
const DEFAULT_DKS_PORT: u16 = 8360;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// Razorpay API credentials. When absent, checkout still works for cash-on-delivery but online payments are
    /// reported as not configured.
    pub razorpay: RazorpayConfig,
    /// The pre-shared secret the gateway signs webhook bodies with. When absent, webhook deliveries are rejected
    /// as a configuration error rather than accepted unverified.
    pub webhook_secret: Secret<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DKS_HOST.to_string(),
            port: DEFAULT_DKS_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            razorpay: RazorpayConfig::default(),
            webhook_secret: Secret::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("DKS_HOST").ok().unwrap_or_else(|| DEFAULT_DKS_HOST.into());
        let port = env::var("DKS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for DKS_PORT. {e} Using the default, {DEFAULT_DKS_PORT}, instead."
                    );
                    DEFAULT_DKS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_DKS_PORT);
        let database_url = env::var("DK_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ DK_DATABASE_URL is not set. Please set it to the URL for the storefront database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let razorpay = RazorpayConfig::new_from_env_or_default();
        let webhook_secret = Secret::new(env::var("DK_RAZORPAY_WEBHOOK_SECRET").unwrap_or_else(|_| {
            warn!(
                "🪛️ DK_RAZORPAY_WEBHOOK_SECRET is not set. Incoming gateway webhooks will be rejected until it is \
                 configured."
            );
            String::default()
        }));
        Self { host, port, database_url, auth, razorpay, webhook_secret }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The secret used to sign and verify access tokens (HS256).
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. DO NOT \
             operate on production like this since every issued token dies with the process. 🚨️🚨️🚨️"
        );
        let secret: String = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "jwt_secret": secret }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The JWT secret for this session was written to {}. If this is a production instance, \
                         you are doing it wrong! Set the DKS_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the JWT secret to the temporary file. {e}"),
                }
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT secret.");
            },
        }
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("DKS_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [DKS_JWT_SECRET]")))?;
        if secret.len() < 32 {
            return Err(ServerError::ConfigurationError(
                "DKS_JWT_SECRET must be at least 32 characters long.".to_string(),
            ));
        }
        Ok(Self { jwt_secret: Secret::new(secret) })
    }
}

use envconfig::Envconfig;
use secrecy::SecretString;
use std::fmt::{Display, Formatter, Result};

// Keep in sync with the PARSE_SERVER_URL default below.
pub const DEFAULT_SERVER_URL: &str = "https://api.parse.com/1/";

#[derive(Envconfig, Clone)] // Intentionally no Debug so keys are not printed
pub struct ParseConfig {
    #[envconfig(from = "PARSE_SERVER_URL", default = "https://api.parse.com/1/")]
    pub server_url: String,
    #[envconfig(from = "PARSE_APPLICATION_ID")]
    pub application_id: String,
    #[envconfig(from = "PARSE_REST_API_KEY")]
    pub rest_api_key: SecretString,
    #[envconfig(from = "PARSE_MASTER_KEY")]
    pub master_key: Option<SecretString>,
    #[envconfig(from = "PARSE_SESSION_TOKEN")]
    pub session_token: Option<SecretString>,
    #[envconfig(from = "PARSE_REQUEST_TIMEOUT_SECS", default = "30")]
    pub request_timeout_secs: u64,
}

impl ParseConfig {
    pub fn new(application_id: &str, rest_api_key: &str) -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            application_id: application_id.to_owned(),
            rest_api_key: SecretString::new(rest_api_key.to_owned()),
            master_key: None,
            session_token: None,
            request_timeout_secs: 30,
        }
    }

    pub fn with_server_url(mut self, server_url: &str) -> Self {
        self.server_url = server_url.to_owned();
        self
    }

    pub fn with_master_key(mut self, master_key: &str) -> Self {
        self.master_key = Some(SecretString::new(master_key.to_owned()));
        self
    }

    pub fn with_session_token(mut self, session_token: &str) -> Self {
        self.session_token = Some(SecretString::new(session_token.to_owned()));
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }
}

fn masked<T>(value: &Option<T>) -> &'static str {
    match value {
        Some(_) => "****",
        None => "-",
    }
}

impl Display for ParseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "PARSE_SERVER_URL: {}", self.server_url)?;
        writeln!(f, "PARSE_APPLICATION_ID: {}", self.application_id)?;
        writeln!(f, "PARSE_REST_API_KEY: ****")?;
        writeln!(f, "PARSE_MASTER_KEY: {}", masked(&self.master_key))?;
        writeln!(f, "PARSE_SESSION_TOKEN: {}", masked(&self.session_token))?;
        writeln!(f, "PARSE_REQUEST_TIMEOUT_SECS: {}", self.request_timeout_secs)
    }
}

use crate::model::ConfigError;
use std::fmt;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::info;

pub const CREDENTIAL_FILE: &str = "ps.txt";

const LOGIN_LABEL: &str = "Your login: ";
const SECRET_LABEL: &str = "Password or token: ";

/// Login and password (or access token) for one hosting account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub user: String,
    pub secret: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("user", &self.user)
            .field("secret", &"***")
            .finish()
    }
}

// Create
impl Credential {
    pub fn new(user: impl ToString, secret: impl ToString) -> Self {
        Self {
            user: user.to_string(),
            secret: secret.to_string(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Trying to load user and secret from {}...", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Asks on the terminal. The secret is read from the tty without echo.
    pub fn prompt() -> Result<Self, ConfigError> {
        let user = ask(&mut io::stdin().lock(), &mut io::stderr(), LOGIN_LABEL)?;
        let secret = hidden(rpassword::prompt_password(SECRET_LABEL))?;
        Ok(Self::new(user, secret))
    }

    fn prompt_from(input: &mut impl BufRead, output: &mut impl Write) -> Result<Self, ConfigError> {
        let user = ask(input, output, LOGIN_LABEL)?;
        let secret = hidden(rpassword::prompt_password_from_bufread(input, output, SECRET_LABEL))?;
        Ok(Self::new(user, secret))
    }
}

// Store
impl Credential {
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, format!("{},{}", self.user, self.secret))?;
        info!("saved to {}", path.display());
        Ok(())
    }
}

// Parser
impl Credential {
    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::MalformedCredential(path.display().to_string());
        let line = content.lines().next().unwrap_or_default().trim();
        let Some((user, secret)) = line.split_once(',') else {
            return Err(malformed());
        };
        let (user, secret) = (user.trim(), secret.trim());
        if user.is_empty() || secret.is_empty() {
            return Err(malformed());
        }
        Ok(Self::new(user, secret))
    }
}

fn hidden(read: io::Result<String>) -> Result<String, ConfigError> {
    match read {
        Ok(secret) => Ok(secret),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Err(ConfigError::PromptClosed),
        Err(err) => Err(err.into()),
    }
}

fn ask(input: &mut impl BufRead, output: &mut impl Write, label: &str) -> Result<String, ConfigError> {
    write!(output, "{label}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ConfigError::PromptClosed);
    }
    Ok(line.trim().to_string())
}

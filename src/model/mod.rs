mod account;
mod credential;
mod error;
mod repository;

use std::error::Error;

pub use account::Account;
pub use credential::{Credential, CREDENTIAL_FILE};
pub use error::ConfigError;
pub use repository::{GiteaRepository, Repository};

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

use crate::gitea::{GiteaHosting, HostingQuery};
use crate::model::{ConfigError, Credential};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// An authenticated account handle passed to the reports.
pub struct Session {
    pub hosting: GiteaHosting,
    pub login: String,
}

impl Session {
    /// Logs in with the stored credential, falling back to the terminal until the
    /// platform accepts one. A credential that only worked after prompting is
    /// written back to `credentials` when `persist` is set.
    pub async fn login(url: &str, credentials: &Path, persist: bool) -> Result<Self, ConfigError> {
        let mut prompted = false;
        let mut pending = match Credential::load(credentials) {
            Ok(credential) => Some(credential),
            Err(err) => {
                debug!("no usable stored credential: {err}");
                None
            }
        };

        loop {
            let credential = match pending.take() {
                Some(credential) => credential,
                None => {
                    prompted = true;
                    Credential::prompt()?
                }
            };

            let hosting = GiteaHosting::new(url, &credential);
            match hosting.current_login().await {
                Ok(login) => {
                    info!("Login Success! ({login} @ {})", hosting.url());
                    if prompted && persist {
                        if let Err(err) = credential.save(credentials) {
                            warn!("credential not saved: {err}");
                        }
                    }
                    return Ok(Self { hosting, login });
                }
                Err(err) => error!("login as `{}` failed: {err}", credential.user),
            }
        }
    }
}

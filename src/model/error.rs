use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Not found '{field}' field for `{entry}`")]
    MissingField { entry: String, field: &'static str },
    #[error("no accounts configured in `{0}`")]
    NoAccounts(String),
    #[error("credential file `{0}` must hold `user,secret` on its first line")]
    MalformedCredential(String),
    #[error("input closed before a login was entered")]
    PromptClosed,
    #[error("no server url: pass --url or set GITEA_URL")]
    MissingUrl,
    #[error("`{0}` has no repository with commits")]
    NoRepositories(String),
}

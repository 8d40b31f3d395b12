use crate::model::ConfigError;
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::fs;
use std::path::PathBuf;

/// One hosting account whose activity joins the streak report.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Account {
    pub name: String,
    pub url: String,
    pub credentials: PathBuf,
}

// Create
impl Account {
    pub fn from_config(path: &str) -> Result<Vec<Self>, ConfigError> {
        let json_str = fs::read_to_string(path)?;
        let accounts = Self::parse(&json_str)?;
        if accounts.is_empty() {
            return Err(ConfigError::NoAccounts(path.to_string()));
        }
        Ok(accounts)
    }

    pub fn new(name: impl ToString, url: impl ToString, credentials: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string().trim_end_matches('/').to_string(),
            credentials: credentials.into(),
        }
    }
}

// Parser
impl Account {
    fn parse(json_str: &str) -> Result<Vec<Self>, ConfigError> {
        let elements: IndexMap<String, Value> = from_str(json_str)?;
        let mut result = Vec::new();
        for (name, details) in elements {
            let Some(url) = details["url"].as_str() else {
                return Err(ConfigError::MissingField { entry: name, field: "url" });
            };
            let Some(credentials) = details["credentials"].as_str() else {
                return Err(ConfigError::MissingField {
                    entry: name,
                    field: "credentials",
                });
            };
            let new = Self::new(&name, url, credentials);
            result.push(new);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accounts_keep_file_order() {
        let json = r#"{
            "work": { "url": "https://git.work.example/", "credentials": "work.txt" },
            "home": { "url": "https://gitea.home.example", "credentials": "home.txt" }
        }"#;

        let accounts = Account::parse(json).unwrap();

        assert_eq!(
            accounts,
            vec![
                Account::new("work", "https://git.work.example", "work.txt"),
                Account::new("home", "https://gitea.home.example", "home.txt"),
            ]
        );
    }

    #[test]
    fn missing_field_names_the_entry() {
        let json = r#"{ "work": { "url": "https://git.work.example" } }"#;

        let err = Account::parse(json).unwrap_err();

        assert_eq!(err.to_string(), "Not found 'credentials' field for `work`");
    }

    #[test]
    fn empty_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        fs::write(&path, "{}").unwrap();

        let result = Account::from_config(path.to_str().unwrap());

        assert!(matches!(result, Err(ConfigError::NoAccounts(_))));
    }
}

pub type GiteaRepository = gitea_sdk::model::repos::Repository;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Repository {
    pub name: String,
    pub owner: String,
    pub full_name: String,
    pub empty: bool,
}

// New
impl Repository {
    pub fn new(name: impl ToString, owner: impl ToString) -> Self {
        let name = name.to_string();
        let owner = owner.to_string();
        Self {
            full_name: format!("{owner}/{name}"),
            name,
            owner,
            empty: false,
        }
    }
}

impl From<GiteaRepository> for Repository {
    fn from(repo: GiteaRepository) -> Self {
        let mut new = Self::new(repo.name, repo.owner.login);
        if !repo.full_name.is_empty() {
            new.full_name = repo.full_name;
        }
        new.empty = repo.empty;
        new
    }
}

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Product, User};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid seed file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid seed data: {0}")]
    Invalid(String),
}

/// Users and catalog loaded into the stores at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl SeedData {
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, SeedError> {
        let seed: SeedData = serde_json::from_str(content)?;
        seed.validate()?;
        Ok(seed)
    }

    fn validate(&self) -> Result<(), SeedError> {
        let mut ids = HashSet::new();
        for user in &self.users {
            if !ids.insert(user.id) {
                return Err(SeedError::Invalid(format!("duplicate user id {}", user.id)));
            }
        }
        let mut ids = HashSet::new();
        for product in &self.products {
            if !ids.insert(product.id) {
                return Err(SeedError::Invalid(format!("duplicate product id {}", product.id)));
            }
            if product.price.is_sign_negative() {
                return Err(SeedError::Invalid(format!("product {} has a negative price", product.id)));
            }
        }
        Ok(())
    }

    pub fn user(&self, id: uuid::Uuid) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }
}

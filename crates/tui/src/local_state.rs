use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// UI state persisted between runs, the terminal analog of the web
/// dashboard's browser storage. Currently only the language choice.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalState {
    pub language: Option<String>,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }
}

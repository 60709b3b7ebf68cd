//! Skill descriptors - declarative, reloadable text bundles.
//!
//! Each YAML file in the skills directory binds a command name to one of
//! the four core operations (observe, plan, control, loop). Skills are
//! configuration data consumed at initialization; the coordinator's state
//! machine never reads them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PilotError, Result};

/// The four core operations a skill can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreOperation {
    Observe,
    Plan,
    Control,
    Loop,
}

/// One externally supplied task descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    /// Command name the operator invokes
    pub name: String,

    /// Which core operation this skill runs
    pub operation: CoreOperation,

    /// Operator-facing description
    #[serde(default)]
    pub description: String,

    /// Optional usage hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

/// All skills loaded from one directory, reloadable at runtime.
#[derive(Debug, Clone)]
pub struct SkillSet {
    dir: PathBuf,
    skills: BTreeMap<String, Skill>,
}

impl SkillSet {
    /// Load every `.yml`/`.yaml` descriptor in the directory. A missing
    /// directory yields an empty set (skills are optional).
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut set = Self {
            dir: dir.as_ref().to_path_buf(),
            skills: BTreeMap::new(),
        };
        set.reload()?;
        Ok(set)
    }

    /// Re-read the directory, replacing the current set.
    pub fn reload(&mut self) -> Result<()> {
        let mut skills = BTreeMap::new();

        if self.dir.is_dir() {
            for entry in fs::read_dir(&self.dir)? {
                let path = entry?.path();
                let is_yaml = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e == "yml" || e == "yaml");
                if !is_yaml {
                    continue;
                }

                let content = fs::read_to_string(&path)?;
                let skill: Skill = serde_yaml::from_str(&content).map_err(|e| {
                    PilotError::Skill(format!("{}: {}", path.display(), e))
                })?;
                if skills.insert(skill.name.clone(), skill).is_some() {
                    log::warn!("duplicate skill name in {}, later file wins", path.display());
                }
            }
        } else {
            log::info!("skills directory {} not found, loading none", self.dir.display());
        }

        self.skills = skills;
        Ok(())
    }

    /// Look up a skill by command name.
    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.get(name)
    }

    /// All loaded skills, ordered by name.
    pub fn list(&self) -> Vec<&Skill> {
        self.skills.values().collect()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

//! Process-wide configuration, consumed (never produced) by the core.
//!
//! Loaded from YAML with a fallback chain:
//! 1. Explicit path if provided
//! 2. .screenpilot.yml in the current directory
//! 3. ~/.config/screenpilot/screenpilot.yml
//! 4. Defaults
//!
//! The device identifier lives here and is threaded into the executor and
//! observer constructors - it is never a global mutable binding.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use screenpilot::planner::SensitivePolicy;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub device: DeviceConfig,
    pub planner: PlannerConfig,
    pub executor: ExecutorConfig,
    pub observer: ObserverConfig,
    pub coordinator: CoordinatorConfig,
    pub sensitive: SensitivePolicy,
    pub skills: SkillsConfig,
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// adb serial of the one target device
    pub serial: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            serial: "192.168.1.15:41937".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8081/v1".to_string(),
            model: "autoglm-phone-9b".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Agent argv template; {instruction} and {device} are substituted,
    /// and the instruction is appended when no placeholder is present
    pub command: Vec<String>,
    /// Working directory for the agent process
    pub workdir: Option<PathBuf>,
    /// Hard wall-clock timeout per invocation
    pub timeout_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            command: vec![
                "./venv/bin/python".to_string(),
                "main.py".to_string(),
                "--base-url".to_string(),
                "http://127.0.0.1:8081/v1".to_string(),
                "--model".to_string(),
                "autoglm-phone-9b".to_string(),
            ],
            workdir: None,
            timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Bridge argv template printing one snapshot as JSON; {device} is
    /// substituted
    pub command: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            command: vec![
                "./venv/bin/python".to_string(),
                "observe.py".to_string(),
                "--json".to_string(),
            ],
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    pub default_max_rounds: u32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            default_max_rounds: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    pub dir: PathBuf,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("skills"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9001,
        }
    }
}

impl Config {
    /// Load configuration with the fallback chain.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        let project_config = PathBuf::from(".screenpilot.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .screenpilot.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .screenpilot.yml: {}", e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("screenpilot").join("screenpilot.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.device.serial.trim().is_empty() {
            eyre::bail!("device.serial must not be empty");
        }
        if self.coordinator.default_max_rounds == 0 {
            eyre::bail!("coordinator.default_max_rounds must be > 0");
        }
        if self.executor.timeout_secs == 0 {
            eyre::bail!("executor.timeout_secs must be > 0");
        }
        if self.observer.timeout_secs == 0 {
            eyre::bail!("observer.timeout_secs must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.device.serial, "192.168.1.15:41937");
        assert_eq!(config.executor.timeout_secs, 300);
        assert_eq!(config.coordinator.default_max_rounds, 3);
        assert_eq!(config.gateway.port, 9001);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pilot.yml");
        fs::write(
            &path,
            "device:\n  serial: \"10.0.0.2:5555\"\ncoordinator:\n  default_max_rounds: 5\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.device.serial, "10.0.0.2:5555");
        assert_eq!(config.coordinator.default_max_rounds, 5);
        // Untouched sections keep defaults
        assert_eq!(config.executor.timeout_secs, 300);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/pilot.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_rounds() {
        let mut config = Config::default();
        config.coordinator.default_max_rounds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_serial() {
        let mut config = Config::default();
        config.device.serial = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sensitive_categories_from_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pilot.yml");
        fs::write(
            &path,
            "sensitive:\n  categories:\n    power: [\"factory reset\"]\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(config.sensitive.is_sensitive("factory reset now"));
        assert!(!config.sensitive.is_sensitive("send message"));
    }
}

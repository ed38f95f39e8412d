use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the destination registry host.
pub const REGISTRY_ENV: &str = "ALIYUN_REGISTRY";

/// Environment variable holding the destination namespace.
pub const NAMESPACE_ENV: &str = "ALIYUN_NAME_SPACE";

/// Default single-image sync script.
pub const DEFAULT_SYNC_SCRIPT: &str = "./scripts/sync_single_image.sh";

/// Process-wide settings, built once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Destination registry
    pub registry: RegistrySettings,

    /// Per-command time budgets
    pub timeouts: Timeouts,

    /// Script performing a single pull/retag/push
    pub sync_script: PathBuf,

    /// Docker client program
    pub docker: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry: RegistrySettings::default(),
            timeouts: Timeouts::default(),
            sync_script: PathBuf::from(DEFAULT_SYNC_SCRIPT),
            docker: "docker".to_string(),
        }
    }
}

impl Settings {
    /// Settings with registry values taken from the process environment.
    pub fn from_env() -> Self {
        Self {
            registry: RegistrySettings::from_lookup(|key| std::env::var(key).ok()),
            ..Default::default()
        }
    }
}

/// Destination registry coordinates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Registry host (e.g. "registry.cn-hangzhou.aliyuncs.com")
    pub registry: Option<String>,

    /// Namespace within the registry
    pub namespace: Option<String>,
}

impl RegistrySettings {
    /// Resolve settings through a variable lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            registry: read(REGISTRY_ENV),
            namespace: read(NAMESPACE_ENV),
        }
    }

    /// `<registry>/<namespace>/<name>:<tag>`, if both coordinates are known.
    pub fn qualify(&self, name: &str, tag: &str) -> Option<String> {
        match (&self.registry, &self.namespace) {
            (Some(registry), Some(namespace)) => {
                Some(format!("{}/{}/{}:{}", registry, namespace, name, tag))
            }
            _ => None,
        }
    }
}

/// Command timeouts in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeouts {
    /// `docker manifest inspect`
    pub check_secs: u64,

    /// Sync script run
    pub sync_secs: u64,

    /// `docker build`
    pub build_secs: u64,

    /// `docker push`
    pub push_secs: u64,

    /// `docker rmi`
    pub cleanup_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            check_secs: 30,
            sync_secs: 600,
            build_secs: 1800,
            push_secs: 600,
            cleanup_secs: 120,
        }
    }
}

impl Timeouts {
    pub fn check(&self) -> Duration {
        Duration::from_secs(self.check_secs)
    }

    pub fn sync(&self) -> Duration {
        Duration::from_secs(self.sync_secs)
    }

    pub fn build(&self) -> Duration {
        Duration::from_secs(self.build_secs)
    }

    pub fn push(&self) -> Duration {
        Duration::from_secs(self.push_secs)
    }

    pub fn cleanup(&self) -> Duration {
        Duration::from_secs(self.cleanup_secs)
    }
}

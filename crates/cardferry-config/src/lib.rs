use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use cardferry_core::domain::{
    validate_batch_size, validate_group_label, DEFAULT_BATCH_SIZE, DEFAULT_GROUP,
};
use cardferry_core::IndexPolicy;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "cardferry";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_VCF_PATH: &str = "outlook_contacts.vcf";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub import: ImportConfig,
}

#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub group: String,
    pub vcf_path: PathBuf,
    pub index_policy: IndexPolicy,
    pub batch_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            import: ImportConfig {
                group: DEFAULT_GROUP.to_string(),
                vcf_path: PathBuf::from(DEFAULT_VCF_PATH),
                index_policy: IndexPolicy::default(),
                batch_size: DEFAULT_BATCH_SIZE,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid import.group value: group label cannot be empty")]
    InvalidGroup,
    #[error("invalid import.vcf_path value: path cannot be empty")]
    InvalidVcfPath,
    #[error("invalid import.batch_size value: {0}")]
    InvalidBatchSize(usize),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    import: Option<ImportFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImportFile {
    group: Option<String>,
    vcf_path: Option<PathBuf>,
    index_policy: Option<IndexPolicy>,
    batch_size: Option<usize>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    let Some(import) = parsed.import else {
        return Ok(config);
    };

    if let Some(group) = import.group {
        config.import.group = validate_group_label(&group).map_err(|_| ConfigError::InvalidGroup)?;
    }

    if let Some(path) = import.vcf_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidVcfPath);
        }
        config.import.vcf_path = path;
    }

    if let Some(policy) = import.index_policy {
        config.import.index_policy = policy;
    }

    if let Some(size) = import.batch_size {
        config.import.batch_size =
            validate_batch_size(size).map_err(|_| ConfigError::InvalidBatchSize(size))?;
    }

    Ok(config)
}

//! Configuration loading and management.

mod file;
mod paths;
mod types;
mod validate;

pub use file::{load_config, load_config_file, resolve_config_path, save_config};
pub use paths::{config_dir, config_file_path, data_dir};
pub use types::{
    ClassifierModelConfig, ClassifiersConfig, Config, ModelKind, PipelineConfig,
    ReferenceConfig, StorageConfig,
};
pub use validate::{remote_budget_secs, validate_config};

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Loads settings from `configuration/{base,test}.yaml` relative to the
/// current directory, overridable field by field with `APP_`-prefixed
/// environment variables (`APP_API__HOST=...`). The directory itself can be
/// relocated with `APP_CONFIGURATION_DIRECTORY`.
pub fn config<Settings: DeserializeOwned>() -> anyhow::Result<Settings> {
    let configuration_directory = match std::env::var("APP_CONFIGURATION_DIRECTORY") {
        Ok(directory) => std::path::PathBuf::from(directory),
        Err(_) => {
            let base_path =
                std::env::current_dir().context("Failed to determine the current directory")?;
            base_path.join("configuration")
        }
    };
    let file = if cfg!(test) { "test.yaml" } else { "base.yaml" };
    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join(file)))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .context("Failed to build configuration")?;

    settings
        .try_deserialize::<Settings>()
        .context("Failed to deserialize settings")
}

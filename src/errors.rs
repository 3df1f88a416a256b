use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum HarnessError {
    #[error("Build failed for {variant} (`{command}`, {}):\n{output}", describe_code(*code))]
    BuildFailed {
        variant: String,
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {detail}")]
    ConfigParse { path: PathBuf, detail: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("Variant '{name}' is registered more than once")]
    DuplicateVariant { name: String },
}

pub(crate) fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("exit status {c}"),
        None => "terminated by signal".to_string(),
    }
}

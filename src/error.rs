//! Fatal configuration errors raised before any API traffic.

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid sorting option '{value}': choose between 'top', 'hot', or 'new'")]
    InvalidSortMode { value: String },

    #[error("missing credential {0} (set it in the environment, a .env file, or on the command line)")]
    MissingCredential(&'static str),
}

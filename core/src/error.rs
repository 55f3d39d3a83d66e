use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Configuration errors (load time, always fatal) ─────────
    #[error("Snapshot is missing required section '{section}'")]
    MissingSection { section: &'static str },

    #[error("Invalid {section} entry '{name}': {message}")]
    InvalidEntry {
        section: &'static str,
        name:    String,
        message: String,
    },

    #[error("Invalid value for {path}: {message}")]
    InvalidField { path: String, message: String },

    #[error("Unknown resource '{resource}' referenced by {context}")]
    UnknownResource { context: String, resource: String },

    #[error("Unknown career '{career}' referenced by {context}")]
    UnknownCareer { context: String, career: String },

    #[error("Market must contain the '{resource}' resource")]
    MissingMarketResource { resource: &'static str },

    #[error("Operation '{operation}' of career '{career}' must take at least one tick")]
    ZeroDuration { career: String, operation: String },

    #[error("Snapshot defines no careers")]
    NoCareers,

    // ── Runtime invariant violations ───────────────────────────
    #[error("Invalid quantity {qty} for resource '{resource}'")]
    InvalidQuantity { resource: String, qty: i64 },

    #[error("Engine is paused; resume the clock or use run_ticks")]
    Paused,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;

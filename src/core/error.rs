//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A reserved field key was set through the public mutator
    #[error("Field key '{key}' is reserved")]
    ReservedKey { key: String },

    /// Field iteration was requested without a visitor
    #[error("Invalid field visitor")]
    InvalidVisitor,

    /// Text could not be decoded as a log level
    #[error("Error unmarshaling '{text}' as loglevel")]
    UnmarshalLevel { text: String },

    /// An output with the same name is already registered
    #[error("Output '{name}' is already registered")]
    DuplicateName { name: String },

    /// Output names must be non-empty
    #[error("Invalid output name '{name}'")]
    InvalidName { name: String },

    /// A sink's writer failed while delivering an event
    #[error("Output '{name}' write failed: {source}")]
    SinkWrite {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A sink's formatter or writer panicked while delivering an event
    #[error("Output '{name}' panicked: {message}")]
    SinkPanicked { name: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl LoggerError {
    /// Create a reserved key error
    pub fn reserved_key(key: impl Into<String>) -> Self {
        LoggerError::ReservedKey { key: key.into() }
    }

    /// Create a level decoding error
    pub fn unmarshal_level(text: impl Into<String>) -> Self {
        LoggerError::UnmarshalLevel { text: text.into() }
    }

    /// Create a duplicate output name error
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        LoggerError::DuplicateName { name: name.into() }
    }

    /// Create an invalid output name error
    pub fn invalid_name(name: impl Into<String>) -> Self {
        LoggerError::InvalidName { name: name.into() }
    }

    /// Create a sink write error
    pub fn sink_write(name: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::SinkWrite {
            name: name.into(),
            source,
        }
    }

    /// Create a sink panic error
    pub fn sink_panicked(name: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkPanicked {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Name of the output involved, for delivery errors
    pub fn output_name(&self) -> Option<&str> {
        match self {
            LoggerError::SinkWrite { name, .. } | LoggerError::SinkPanicked { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }
}

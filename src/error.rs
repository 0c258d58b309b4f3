use std::fmt;

pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Express whether the error seems to be caused by what the user asked for or
/// by the data we were handed by the generator.
#[derive(Debug)]
pub enum ErrorLayer {
    /// The request itself has structural issues, like a command line that
    /// names a type that isn't in the graph.  Navigation misses are not errors
    /// at all; a stale fragment just restores as far as it can.
    BadInput,
    /// The type graph (or the config file) could not be read or parsed.
    DataLayer,
    /// Template or output problems where we can't tell who is to blame.
    UnknownLayer,
}

/// Payload describing what went wrong for investigation purposes.
#[derive(Debug)]
pub struct ErrorDetails {
    pub layer: ErrorLayer,
    /// Stringified version of the lower level error.
    pub message: String,
}

#[derive(Debug)]
pub enum ExplorerError {
    /// Reading or writing a file failed.
    Io(ErrorDetails),
    /// The input could not be understood.
    Malformed(ErrorDetails),
    /// Rendering the page failed.
    Render(ErrorDetails),
}

impl ExplorerError {
    pub fn bad_input(message: impl Into<String>) -> ExplorerError {
        ExplorerError::Malformed(ErrorDetails {
            layer: ErrorLayer::BadInput,
            message: message.into(),
        })
    }

    pub fn details(&self) -> &ErrorDetails {
        match self {
            ExplorerError::Io(d) | ExplorerError::Malformed(d) | ExplorerError::Render(d) => d,
        }
    }
}

impl fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ExplorerError::Io(_) => "I/O error",
            ExplorerError::Malformed(_) => "malformed input",
            ExplorerError::Render(_) => "render error",
        };
        let details = self.details();
        write!(f, "{} ({:?}): {}", kind, details.layer, details.message)
    }
}

impl std::error::Error for ExplorerError {}

impl From<std::io::Error> for ExplorerError {
    fn from(err: std::io::Error) -> ExplorerError {
        ExplorerError::Io(ErrorDetails {
            layer: ErrorLayer::DataLayer,
            message: err.to_string(),
        })
    }
}

// JSON parse errors are problems with the generator's output.
impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> ExplorerError {
        ExplorerError::Malformed(ErrorDetails {
            layer: ErrorLayer::DataLayer,
            message: err.to_string(),
        })
    }
}

impl From<toml::de::Error> for ExplorerError {
    fn from(err: toml::de::Error) -> ExplorerError {
        ExplorerError::Malformed(ErrorDetails {
            layer: ErrorLayer::BadInput,
            message: err.to_string(),
        })
    }
}

impl From<liquid::Error> for ExplorerError {
    fn from(err: liquid::Error) -> ExplorerError {
        ExplorerError::Render(ErrorDetails {
            layer: ErrorLayer::UnknownLayer,
            message: err.to_string(),
        })
    }
}

#[test]
fn test_error_display_names_layer() {
    let err = ExplorerError::bad_input("no such type: v1.Nope");
    assert_eq!(
        err.to_string(),
        "malformed input (BadInput): no such type: v1.Nope"
    );
}

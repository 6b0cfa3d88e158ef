use std::fmt;

/// A failure reported by a `MarkdownRenderer`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A failure reported by a `QueryHost`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct QueryError {
    pub message: String,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Which entity a render was for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderTarget {
    Lane { id: String },
    Item { id: String },
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderTarget::Lane { id } => write!(f, "lane {}", id),
            RenderTarget::Item { id } => write!(f, "item {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HydrateError {
    #[error("Failed to render title of {target}: {source}")]
    Render {
        target: RenderTarget,
        #[source]
        source: RenderError,
    },
}

impl HydrateError {
    pub fn lane_render(id: &str, source: RenderError) -> Self {
        HydrateError::Render {
            target: RenderTarget::Lane { id: id.to_string() },
            source,
        }
    }

    pub fn item_render(id: &str, source: RenderError) -> Self {
        HydrateError::Render {
            target: RenderTarget::Item { id: id.to_string() },
            source,
        }
    }
}

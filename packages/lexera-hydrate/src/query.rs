/// Embedded query blocks inside item titles.
///
/// The parser stores a fenced code block as a single `<br>` separated line:
/// the first segment is the language tag (`queryjs` or `query`), the rest is
/// the code.

pub const LINE_BREAK: &str = "<br>";
pub const SCRIPT_MARKER: &str = "queryjs";
pub const QUERY_MARKER: &str = "query";

pub const HOST_UNAVAILABLE_MESSAGE: &str = "Please install/enable dataview for this to work";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedQuery {
    /// Script code, newline joined.
    Script(String),
    /// Query string, the single segment after the tag.
    Query(String),
}

/// A source that looked like a query block but could not be split into code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryParseError {
    #[error("Something went wrong parsing: {0}")]
    Script(String),
    #[error("Something went wrong parsing dql: {0}")]
    Query(String),
}

impl EmbeddedQuery {
    /// `Ok(None)` when the source is not a query block at all.
    pub fn parse(source: &str) -> Result<Option<EmbeddedQuery>, QueryParseError> {
        if source.starts_with(SCRIPT_MARKER) {
            let mut segments: Vec<&str> = source.split(LINE_BREAK).skip(1).collect();
            if segments.last() == Some(&"") {
                segments.pop();
            }
            if segments.len() < 2 {
                return Err(QueryParseError::Script(source.to_string()));
            }
            return Ok(Some(EmbeddedQuery::Script(segments.join("\n"))));
        }

        if source.starts_with(QUERY_MARKER) {
            // Only the segment right after the language tag is the query.
            return match source.split(LINE_BREAK).nth(1) {
                Some(body) if !body.is_empty() => Ok(Some(EmbeddedQuery::Query(body.to_string()))),
                _ => Err(QueryParseError::Query(source.to_string())),
            };
        }

        Ok(None)
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WeatherError>;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected provider response: missing {field}")]
    Format { field: &'static str },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

impl WeatherError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        WeatherError::Config(msg.into())
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        WeatherError::UnknownTool { name: name.into() }
    }

    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        WeatherError::InvalidArguments(msg.into())
    }

    /// Fixed error-kind to JSON-RPC code table, applied at the dispatch
    /// boundary. Unknown tool names share -32601 with unknown methods,
    /// argument problems are -32602, anything that fails inside a handler
    /// collapses to -32603.
    pub fn rpc_code(&self) -> i32 {
        match self {
            WeatherError::UnknownTool { .. } => -32601,
            WeatherError::InvalidArguments(_) => -32602,
            _ => -32603,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_code_table() {
        assert_eq!(WeatherError::unknown_tool("nope").rpc_code(), -32601);
        assert_eq!(WeatherError::invalid_arguments("bad").rpc_code(), -32602);
        assert_eq!(
            WeatherError::Upstream {
                status: 404,
                body: "city not found".into()
            }
            .rpc_code(),
            -32603
        );
        assert_eq!(
            WeatherError::Format { field: "main.temp" }.rpc_code(),
            -32603
        );
    }

    #[test]
    fn format_error_names_field() {
        let err = WeatherError::Format { field: "main.temp" };
        assert!(err.to_string().contains("main.temp"));
    }
}

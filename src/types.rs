/// A failure as it comes back from an RPC node, a wallet, or an SDK call,
/// before classification.
///
/// The variants are the shapes the classifier knows how to inspect. Anything
/// that exposes neither logs nor text ends up as [`RawFailure::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFailure {
    /// Broadcast or preflight failure that carries simulation logs.
    Send {
        /// Top-level message reported alongside the logs.
        message: String,
        /// Program/runtime log lines in emission order.
        logs: Vec<String>,
    },
    /// Any failure that only exposes a message.
    Message(String),
    /// Nothing inspectable (null, a number, an empty object).
    Unknown,
}

impl RawFailure {
    pub fn send(message: impl Into<String>, logs: Vec<String>) -> Self {
        Self::Send {
            message: message.into(),
            logs,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// The failure a wallet accessor reports when no wallet is attached.
    pub fn wallet_not_connected() -> Self {
        Self::Message("Wallet not connected".to_string())
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Send { message, .. } | Self::Message(message) => Some(message),
            Self::Unknown => None,
        }
    }

    pub fn logs(&self) -> &[String] {
        match self {
            Self::Send { logs, .. } => logs,
            Self::Message(_) | Self::Unknown => &[],
        }
    }

    /// Decide the shape of an untyped failure (a JS error object, a fixture row).
    ///
    /// An object with a `logs` array is a send failure, an object with a string
    /// `message` or a bare string is a message failure, everything else is unknown.
    /// Non-string log entries are skipped.
    pub fn from_json(value: &serde_json::Value) -> Self {
        if let Some(text) = value.as_str() {
            return Self::Message(text.to_string());
        }

        let Some(obj) = value.as_object() else {
            return Self::Unknown;
        };

        let message = obj
            .get("message")
            .and_then(|v| v.as_str())
            .map(String::from);

        if let Some(logs) = obj.get("logs").and_then(|v| v.as_array()) {
            let logs = logs
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect();
            return Self::Send {
                message: message.unwrap_or_default(),
                logs,
            };
        }

        match message {
            Some(m) => Self::Message(m),
            None => Self::Unknown,
        }
    }
}

impl From<&str> for RawFailure {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<String> for RawFailure {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl std::fmt::Display for RawFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Send { message, logs } => write!(f, "{message} ({} log lines)", logs.len()),
            Self::Message(message) => f.write_str(message),
            Self::Unknown => f.write_str("unknown failure"),
        }
    }
}

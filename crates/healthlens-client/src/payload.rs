use serde::Deserialize;
use serde_json::Value;

use crate::FetchError;

/// Service call kinds, used to pick fallback error text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Insights,
    TimeSeries,
}

impl Operation {
    fn fallback_message(&self) -> &'static str {
        match self {
            Operation::Upload => "File upload failed",
            Operation::Insights => "Could not fetch insights. Is data loaded?",
            Operation::TimeSeries => "Could not fetch time series data.",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Operation::Upload => "Upload",
            Operation::Insights => "Insights request",
            Operation::TimeSeries => "Time series request",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Build the error for a non-2xx response from its raw body.
///
/// `detail` wins over `message`. Validation responses carry `detail` as a
/// list of `{msg}` objects; those are joined. A body that is not a JSON
/// object yields a status-code message.
pub(crate) fn service_error(status: u16, body: &str, op: Operation) -> FetchError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .detail
            .as_ref()
            .and_then(detail_text)
            .or(parsed.message.filter(|m| !m.trim().is_empty()))
            .unwrap_or_else(|| op.fallback_message().to_string()),
        Err(_) => format!("{} failed with status {}", op.name(), status),
    };

    FetchError::Service { status, message }
}

fn detail_text(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(obj) => obj.get("msg").and_then(Value::as_str).map(String::from),
                    _ => None,
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

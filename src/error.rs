use thiserror::Error;

/// Failures from the question bank. The session core itself never errors;
/// loading the embedded data is the one fallible edge.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("malformed embedded bank `{name}`: {source}")]
    MalformedData {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("embedded bank `{0}` is empty")]
    EmptyBank(&'static str),

    #[error("full-test sampling produced an empty section {0} times in a row")]
    SamplingExhausted(u32),
}

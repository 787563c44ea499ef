pub mod patterns;
pub mod table;

use strum::IntoEnumIterator;

use crate::classify::patterns::LogMatch;
use crate::error::Error;
use crate::inject::random::RandomSource;
use crate::types::RawFailure;

/// Stable failure category. The kebab-case string form is what UIs and logs see.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorCode {
    ExpiredBlockhash,
    InsufficientFeeFunds,
    InsufficientRentFunds,
    InvalidAccountData,
    AccountNotFound,
    SignatureVerificationFailed,
    CustomProgramError,
    InvalidInstructionData,
    InvalidArgument,
    ComputeBudgetExceeded,
    WalletNotConnected,
    WalletConnectionRejected,
    SignatureRejected,
    NetworkError,
    RpcError,
    Unknown,
}

impl ErrorCode {
    pub fn user_message(self) -> &'static str {
        table::user_message(self)
    }

    pub fn is_retryable(self) -> bool {
        table::is_retryable(self)
    }

    /// Parse a kebab-case code name as it appears in logs and serialized errors.
    pub fn from_name(name: &str) -> Result<Self, Error> {
        name.parse().map_err(|_| Error::Parse {
            reason: format!("unknown error code \"{name}\""),
        })
    }

    /// Pick one code uniformly over the whole taxonomy.
    pub fn random(source: &mut impl RandomSource) -> Self {
        let mut codes = Self::iter();
        let idx = source.next_index(codes.len());
        codes.nth(idx).unwrap_or(Self::Unknown)
    }
}

/// A classified failure, ready to be rendered by a UI.
///
/// Built once where a raw failure is caught and never changed afterwards.
/// `user_message` and `retryable` are always derived from `code`, except that a
/// custom program error carries the detail extracted from the program logs.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{code}: {message}")]
pub struct NormalizedError {
    code: ErrorCode,
    message: String,
    user_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tx_signature: Option<String>,
    retryable: bool,
    logs: Vec<String>,
}

impl NormalizedError {
    pub fn new(
        code: ErrorCode,
        message: impl Into<String>,
        tx_signature: Option<String>,
        logs: Vec<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            user_message: code.user_message().to_string(),
            tx_signature,
            retryable: code.is_retryable(),
            logs,
        }
    }

    fn program_error(
        line: &str,
        detail: &str,
        tx_signature: Option<String>,
        logs: Vec<String>,
    ) -> Self {
        let detail = if detail.is_empty() {
            "Unknown program error"
        } else {
            detail
        };
        Self {
            user_message: format!("Program error: {detail}"),
            ..Self::new(ErrorCode::CustomProgramError, line, tx_signature, logs)
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn tx_signature(&self) -> Option<&str> {
        self.tx_signature.as_deref()
    }

    pub fn retryable(&self) -> bool {
        self.retryable
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }
}

/// Classify a raw failure, falling back to [`ErrorCode::Unknown`].
pub fn classify(failure: &RawFailure, tx_signature: Option<&str>) -> NormalizedError {
    classify_with_fallback(failure, tx_signature, ErrorCode::Unknown)
}

/// Classify an untyped failure, see [`RawFailure::from_json`].
pub fn classify_json(value: &serde_json::Value, tx_signature: Option<&str>) -> NormalizedError {
    classify(&RawFailure::from_json(value), tx_signature)
}

/// Classify a raw failure; `fallback` is used when no rule matches.
///
/// Log rules are tried first, then message cues. The first match wins.
pub fn classify_with_fallback(
    failure: &RawFailure,
    tx_signature: Option<&str>,
    fallback: ErrorCode,
) -> NormalizedError {
    decide(failure, fallback).into_error(
        tx_signature.map(String::from),
        failure.logs().to_vec(),
        None,
    )
}

/// Classify a failure raised while waiting for a broadcast transaction.
///
/// The transaction may still land, so the record keeps `signature` and its
/// message tells the user where to look. Rules only ever see the original
/// failure, never the signature text.
pub fn classify_unconfirmed(failure: &RawFailure, signature: &str) -> NormalizedError {
    let context = format!(
        "Transaction sent but confirmation failed. Check explorer for status: {signature}"
    );
    decide(failure, ErrorCode::Unknown).into_error(
        Some(signature.to_string()),
        failure.logs().to_vec(),
        Some(&context),
    )
}

const UNKNOWN_MESSAGE: &str = "Unknown error";

enum Verdict<'a> {
    Code { code: ErrorCode, message: &'a str },
    ProgramError { line: &'a str, detail: &'a str },
}

fn decide(failure: &RawFailure, fallback: ErrorCode) -> Verdict<'_> {
    let message = failure
        .text()
        .filter(|text| !text.is_empty())
        .unwrap_or(UNKNOWN_MESSAGE);

    if let RawFailure::Send { logs, .. } = failure {
        match patterns::match_logs(logs) {
            Some(LogMatch::Code(code)) => return Verdict::Code { code, message },
            Some(LogMatch::ProgramError { line, detail }) => {
                return Verdict::ProgramError { line, detail };
            }
            None => {}
        }
    }

    let code = patterns::match_message(message).unwrap_or_else(|| {
        tracing::debug!(%fallback, raw = message, "no classification rule matched");
        fallback
    });
    Verdict::Code { code, message }
}

impl Verdict<'_> {
    fn into_error(
        self,
        tx_signature: Option<String>,
        logs: Vec<String>,
        context: Option<&str>,
    ) -> NormalizedError {
        let with_context = |message: &str| match context {
            Some(context) => format!("{context}: {message}"),
            None => message.to_string(),
        };
        match self {
            Self::Code { code, message } => {
                NormalizedError::new(code, with_context(message), tx_signature, logs)
            }
            Self::ProgramError { line, detail } => {
                NormalizedError::program_error(&with_context(line), detail, tx_signature, logs)
            }
        }
    }
}

const SIGNATURE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Build a fully classified error for `code` without any failing call behind it.
///
/// Carries a throwaway `mock…` signature and one synthetic log line. Only meant
/// for fault injection and tests.
pub fn synthetic_error(code: ErrorCode, source: &mut impl RandomSource) -> NormalizedError {
    let suffix: String = (0..13)
        .map(|_| {
            let idx = source.next_index(SIGNATURE_ALPHABET.len()) % SIGNATURE_ALPHABET.len();
            char::from(SIGNATURE_ALPHABET[idx])
        })
        .collect();
    NormalizedError::new(
        code,
        format!("Mock error: {code}"),
        Some(format!("mock{suffix}")),
        vec![format!("Program log: Mock {code} error")],
    )
}

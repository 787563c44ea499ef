use crate::classify::ErrorCode;

/// Markers that identify a fee payer who cannot cover the transaction.
pub const FEE_FUNDS_MARKERS: &[&str] = &[
    "InsufficientFundsForFee",
    "insufficient balance",
    "insufficient funds",
    "insufficient lamports",
];

pub const BLOCKHASH_MARKERS: &[&str] = &["BlockhashNotFound"];

/// Prefix of an error line emitted by an Anchor program via `msg!`.
pub const PROGRAM_ERROR_MARKER: &str = "Program log: Error:";

/// Phrase cues in a failure message, checked in order, case-insensitively.
pub const MESSAGE_PHRASES: &[(&str, ErrorCode)] = &[
    ("wallet not connected", ErrorCode::WalletNotConnected),
    ("user rejected", ErrorCode::SignatureRejected),
    ("failed to fetch", ErrorCode::NetworkError),
    ("network request failed", ErrorCode::NetworkError),
];

/// Verbatim markers of an RPC/service failure, checked after every phrase cue.
pub const RPC_MARKERS: &[&str] = &["RPC", "429", "503"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMatch<'a> {
    Code(ErrorCode),
    ProgramError { line: &'a str, detail: &'a str },
}

fn any_log_contains(logs: &[String], markers: &[&str]) -> bool {
    logs.iter()
        .any(|log| markers.iter().any(|marker| log.contains(marker)))
}

/// Scan simulation logs in rule priority order.
///
/// The rules are checked one after another over the whole log list, so a
/// fee-funds marker on the last line still beats a blockhash marker on the
/// first one.
pub fn match_logs(logs: &[String]) -> Option<LogMatch<'_>> {
    if any_log_contains(logs, FEE_FUNDS_MARKERS) {
        return Some(LogMatch::Code(ErrorCode::InsufficientFeeFunds));
    }
    if any_log_contains(logs, BLOCKHASH_MARKERS) {
        return Some(LogMatch::Code(ErrorCode::ExpiredBlockhash));
    }

    logs.iter().find_map(|log| {
        let (_, tail) = log.split_once(PROGRAM_ERROR_MARKER)?;
        Some(LogMatch::ProgramError {
            line: log.as_str(),
            detail: tail.trim(),
        })
    })
}

pub fn match_message(message: &str) -> Option<ErrorCode> {
    let lowered = message.to_lowercase();
    if let Some((_, code)) = MESSAGE_PHRASES
        .iter()
        .find(|(phrase, _)| lowered.contains(phrase))
    {
        return Some(*code);
    }

    RPC_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
        .then_some(ErrorCode::RpcError)
}

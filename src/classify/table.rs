use crate::classify::ErrorCode;

/// Codes whose failures cannot be fixed by trying again: the user has to add
/// funds or approve the wallet prompt first.
pub const NON_RETRYABLE: &[ErrorCode] = &[
    ErrorCode::InsufficientFeeFunds,
    ErrorCode::SignatureRejected,
];

/// Static user-facing sentence for a code.
///
/// This table is the contract with any UI that renders `userMessage` verbatim,
/// so every entry is a complete sentence.
pub fn user_message(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::ExpiredBlockhash => "Transaction expired. Please try again.",
        ErrorCode::InsufficientFeeFunds => {
            "Insufficient SOL for transaction fee. Please add more SOL to your wallet."
        }
        ErrorCode::InsufficientRentFunds => {
            "Insufficient SOL for account rent. Please add more SOL to your wallet."
        }
        ErrorCode::InvalidAccountData => {
            "Invalid account data. Please check your inputs and try again."
        }
        ErrorCode::AccountNotFound => {
            "Account not found. The program account may not be initialized."
        }
        ErrorCode::SignatureVerificationFailed => {
            "Signature verification failed. Please try again."
        }
        ErrorCode::CustomProgramError => "Program error. Please check your inputs and try again.",
        ErrorCode::InvalidInstructionData => "Invalid instruction data. Please check your inputs.",
        ErrorCode::InvalidArgument => "Invalid argument provided to the program.",
        ErrorCode::ComputeBudgetExceeded => {
            "Compute budget exceeded. Try simplifying your transaction."
        }
        ErrorCode::WalletNotConnected => {
            "Wallet not connected. Please connect your wallet and try again."
        }
        ErrorCode::WalletConnectionRejected => {
            "Wallet connection rejected. Please approve the connection request."
        }
        ErrorCode::SignatureRejected => {
            "Transaction signing rejected. Please approve the transaction in your wallet."
        }
        ErrorCode::NetworkError => {
            "Network error. Please check your internet connection and try again."
        }
        ErrorCode::RpcError => {
            "RPC error. The Solana network may be congested. Please try again later."
        }
        ErrorCode::Unknown => "An error occurred. Please try again later.",
    }
}

pub fn is_retryable(code: ErrorCode) -> bool {
    !NON_RETRYABLE.contains(&code)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_code_has_a_sentence() {
        for code in ErrorCode::iter() {
            let message = user_message(code);
            assert!(!message.trim().is_empty(), "{code} has no user message");
            assert!(message.ends_with('.'), "{code} message is not a sentence");
        }
    }

    #[test]
    fn only_fee_funds_and_rejected_signatures_are_final() {
        for code in ErrorCode::iter() {
            let expected = !matches!(
                code,
                ErrorCode::InsufficientFeeFunds | ErrorCode::SignatureRejected
            );
            assert_eq!(is_retryable(code), expected, "{code}");
        }
    }

    #[test]
    fn expired_blockhash_and_unknown_share_the_retry_wording() {
        let expired = user_message(ErrorCode::ExpiredBlockhash);
        assert!(expired.contains("try again"));
        assert!(user_message(ErrorCode::Unknown).contains("try again"));
    }
}

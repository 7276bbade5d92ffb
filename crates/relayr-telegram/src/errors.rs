// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps teloxide request errors into the delivery error taxonomy.

use relayr_core::SendError;
use teloxide::{ApiError, RequestError};

/// Classifies a failed platform call for the delivery engine.
///
/// Rate limits carry the platform-requested wait; errors that mean the bot
/// can never write to the target are terminal; network-level failures are
/// transient and retryable.
pub fn map_send_error(err: RequestError) -> SendError {
    match err {
        RequestError::RetryAfter(seconds) => SendError::RateLimited {
            wait: seconds.duration(),
        },
        RequestError::Api(api) => match api {
            ApiError::NotEnoughRightsToPostMessages
            | ApiError::BotBlocked
            | ApiError::BotKicked
            | ApiError::BotKickedFromSupergroup
            | ApiError::CantInitiateConversation => SendError::PermissionDenied,
            other => SendError::Unknown(other.to_string()),
        },
        RequestError::Network(e) => SendError::Transient(e.to_string()),
        RequestError::Io(e) => SendError::Transient(e.to_string()),
        other => SendError::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use teloxide::types::Seconds;

    #[test]
    fn retry_after_maps_to_rate_limited_with_wait() {
        let mapped = map_send_error(RequestError::RetryAfter(Seconds::from_seconds(42)));
        match mapped {
            SendError::RateLimited { wait } => assert_eq!(wait, Duration::from_secs(42)),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn rights_errors_are_terminal() {
        let mapped = map_send_error(RequestError::Api(ApiError::NotEnoughRightsToPostMessages));
        assert!(matches!(mapped, SendError::PermissionDenied));
        assert!(!mapped.is_retryable());

        let mapped = map_send_error(RequestError::Api(ApiError::BotKicked));
        assert!(matches!(mapped, SendError::PermissionDenied));
    }

    #[test]
    fn other_api_errors_are_unknown_and_retryable() {
        let mapped = map_send_error(RequestError::Api(ApiError::MessageNotModified));
        assert!(matches!(mapped, SendError::Unknown(_)));
        assert!(mapped.is_retryable());
    }
}

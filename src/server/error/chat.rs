//! Errors reported by the chat platform client.

use thiserror::Error;

/// JSON error code Discord returns for a message that no longer exists.
const UNKNOWN_MESSAGE_CODE: isize = 10008;

/// Failure of a single chat platform call.
///
/// The display controller only distinguishes two cases: the target message is gone,
/// which clears the session's message reference, and everything else, which is
/// treated as transient and retried by the next tick or `present()` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The message being edited or deleted no longer exists.
    #[error("Message not found")]
    NotFound,

    /// Network or service failure; the call may succeed later.
    #[error("Chat platform error: {0}")]
    Platform(String),
}

impl ChatError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Classifies a Serenity error into message-gone versus transient failures.
impl From<serenity::Error> for ChatError {
    fn from(err: serenity::Error) -> Self {
        if let serenity::Error::Http(http_err) = &err {
            if is_missing_message(http_err) {
                return ChatError::NotFound;
            }
        }

        ChatError::Platform(err.to_string())
    }
}

fn is_missing_message(err: &serenity::http::HttpError) -> bool {
    match err {
        serenity::http::HttpError::UnsuccessfulRequest(response) => {
            response.status_code.as_u16() == 404 || response.error.code == UNKNOWN_MESSAGE_CODE
        }
        _ => false,
    }
}

//! Failure taxonomy for a chat submission.

/// Why a submission did not produce a completion.
///
/// None of these escape the session: [`ChatSession::settle`] turns each one
/// into an assistant entry via [`ChatError::diagnostic`].
///
/// [`ChatSession::settle`]: super::ChatSession::settle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// No credential was found when the request was about to be sent.
    #[error("API key is not configured. Please set GROQ_API_KEY or add groq_api_key to your config file.")]
    MissingCredential,

    /// The completion service answered with a non-success status.
    #[error("API Error: {message}")]
    Upstream { status: u16, message: String },

    /// Network failure, or a success response whose body could not be read.
    #[error("{0}")]
    Transport(String),
}

impl ChatError {
    /// Text shown to the user in place of an assistant reply.
    pub fn diagnostic(&self) -> String {
        match self {
            ChatError::MissingCredential => format!("Error: {}", self),
            ChatError::Transport(detail) if detail.trim().is_empty() => {
                "Error: An unknown error occurred. Please check your API key and try again."
                    .to_string()
            }
            _ => format!("Error: {}. Please check your API key and try again.", self),
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Transport(err.to_string())
    }
}

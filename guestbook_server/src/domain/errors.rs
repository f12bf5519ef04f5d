use std::fmt;

// Domain-level errors for guestbook workflows.
// Each variant carries the raw collaborator message; handlers echo it back.
#[derive(Debug)]
pub enum GuestbookError {
    Storage(String),
    Render(String),
    SessionStorage(String),
}

impl fmt::Display for GuestbookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuestbookError::Storage(message)
            | GuestbookError::Render(message)
            | GuestbookError::SessionStorage(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for GuestbookError {}

// Failures while resolving the current caller.
#[derive(Debug)]
pub enum IdentityError {
    Unavailable(String),
    Decode(String),
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::Unavailable(message) => write!(f, "identity unavailable: {message}"),
            IdentityError::Decode(message) => write!(f, "identity decode error: {message}"),
        }
    }
}

impl std::error::Error for IdentityError {}

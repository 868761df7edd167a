/// Externally visible category of a domain failure.
///
/// Chosen where the error is raised so the HTTP boundary can map it to a
/// status code without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or rule-breaking input
    Validation,
    /// Username or email already taken
    Conflict,
    /// Wrong password or unknown identity
    InvalidCredentials,
    /// Token malformed, forged, expired, of the wrong kind or for a vanished subject
    InvalidToken,
    /// Caller is authenticated but does not own the resource
    Forbidden,
    NotFound,
    Internal,
}

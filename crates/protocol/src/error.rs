/// The kind of error that occurred while talking to the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never produced a response (connection refused,
    /// timeout, broken pipe).
    Transport,
    /// The backend answered with a non-success status code.
    Status,
    /// The backend answered, but the body is not the expected JSON.
    MalformedBody,
    /// Any other errors.
    Other,
}

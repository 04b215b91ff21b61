use serde::Deserialize;

/// Result of a mark-mailed request.
///
/// `ok` mirrors the HTTP success range; the numeric status is kept so the
/// caller can distinguish 401 / 404 / conflict responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkMailed {
    pub ok: bool,
    pub status: u16,
}

/// Envelope returned by `GET /api/v1/letters/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct LetterResponse {
    pub letter: Letter,
}

/// A letter as reported by the upstream service.
#[derive(Debug, Clone, Deserialize)]
pub struct Letter {
    pub id: String,
    pub status: String,
}

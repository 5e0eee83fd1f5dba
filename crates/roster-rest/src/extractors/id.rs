//! Integer id path extractor.

use crate::responses::not_found;
use roster_core::UserId;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// The `{id}` segment of a route, parsed as an unsigned decimal integer.
///
/// Anything else (signs, letters, overflow) is treated as an unmatched
/// route and answered with 404 `{message: "Not Found"}`.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub UserId);

/// Rejection for [`IdPath`].
#[derive(Debug)]
pub struct IdPathRejection;

impl IntoResponse for IdPathRejection {
    fn into_response(self) -> Response {
        not_found()
    }
}

/// Parses a path segment the way an integer route converter would.
pub fn parse_id_segment(segment: &str) -> Option<UserId> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    UserId::parse(segment).ok()
}

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = IdPathRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| IdPathRejection)?;

        parse_id_segment(&segment).map(IdPath).ok_or(IdPathRejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_segment() {
        assert_eq!(parse_id_segment("0"), Some(UserId::new(0)));
        assert_eq!(parse_id_segment("42"), Some(UserId::new(42)));
        assert_eq!(parse_id_segment("-1"), None);
        assert_eq!(parse_id_segment("+1"), None);
        assert_eq!(parse_id_segment("abc"), None);
        assert_eq!(parse_id_segment(""), None);
        assert_eq!(parse_id_segment("99999999999999999999"), None);
    }
}

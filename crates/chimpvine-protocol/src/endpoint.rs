//! The four backend routes and how their URLs are built.

use chimpvine_transport::Method;

use crate::GameId;

/// Header that carries the WordPress REST nonce.
pub const NONCE_HEADER: &str = "X-WP-Nonce";

const NONCE_PATH: &str = "/wp-admin/admin-ajax.php?action=get_rest_nonce";
const PROGRESS_PATH: &str = "/wp-json/chimpvine/v1/get-game-result";
const START_REPORT_PATH: &str = "/wp-json/chimpvine/v1/submit-game-result";
const END_REPORT_PATH: &str = "/wp-json/chimpvine/v1/update-game-result";

/// One of the backend's fixed endpoints.
///
/// ```rust
/// use chimpvine_protocol::{Endpoint, GameId};
///
/// let url = Endpoint::Progress(GameId(5)).url("http://test");
/// assert_eq!(url, "http://test/wp-json/chimpvine/v1/get-game-result?gameid=5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET` a REST nonce.
    Nonce,
    /// `GET` saved progress for a game.
    Progress(GameId),
    /// `POST` the start-of-level report.
    StartReport,
    /// `POST` the end-of-level report.
    EndReport,
}

impl Endpoint {
    pub fn method(self) -> Method {
        match self {
            Self::Nonce | Self::Progress(_) => Method::Get,
            Self::StartReport | Self::EndReport => Method::Post,
        }
    }

    /// Path (and query, where fixed) relative to the origin.
    pub fn path(self) -> &'static str {
        match self {
            Self::Nonce => NONCE_PATH,
            Self::Progress(_) => PROGRESS_PATH,
            Self::StartReport => START_REPORT_PATH,
            Self::EndReport => END_REPORT_PATH,
        }
    }

    /// Whether the request must carry [`NONCE_HEADER`].
    pub fn requires_nonce(self) -> bool {
        !matches!(self, Self::Nonce)
    }

    /// Full URL under `origin`. The origin is joined as-is, so it should
    /// not end with `/`.
    pub fn url(self, origin: &str) -> String {
        match self {
            Self::Progress(game_id) => {
                format!("{origin}{}?gameid={game_id}", self.path())
            }
            _ => format!("{origin}{}", self.path()),
        }
    }

    /// Short name for log fields.
    pub fn name(self) -> &'static str {
        match self {
            Self::Nonce => "nonce",
            Self::Progress(_) => "progress",
            Self::StartReport => "start_report",
            Self::EndReport => "end_report",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_url() {
        assert_eq!(
            Endpoint::Nonce.url("http://localhost/wordpress"),
            "http://localhost/wordpress/wp-admin/admin-ajax.php?action=get_rest_nonce"
        );
    }

    #[test]
    fn test_progress_url_carries_game_id() {
        assert_eq!(
            Endpoint::Progress(GameId(5)).url("http://test"),
            "http://test/wp-json/chimpvine/v1/get-game-result?gameid=5"
        );
    }

    #[test]
    fn test_report_urls() {
        assert_eq!(
            Endpoint::StartReport.url("https://site.example"),
            "https://site.example/wp-json/chimpvine/v1/submit-game-result"
        );
        assert_eq!(
            Endpoint::EndReport.url("https://site.example"),
            "https://site.example/wp-json/chimpvine/v1/update-game-result"
        );
    }

    #[test]
    fn test_methods() {
        assert_eq!(Endpoint::Nonce.method(), Method::Get);
        assert_eq!(Endpoint::Progress(GameId(1)).method(), Method::Get);
        assert_eq!(Endpoint::StartReport.method(), Method::Post);
        assert_eq!(Endpoint::EndReport.method(), Method::Post);
    }

    #[test]
    fn test_only_nonce_is_unauthenticated() {
        assert!(!Endpoint::Nonce.requires_nonce());
        assert!(Endpoint::Progress(GameId(1)).requires_nonce());
        assert!(Endpoint::StartReport.requires_nonce());
        assert!(Endpoint::EndReport.requires_nonce());
    }
}

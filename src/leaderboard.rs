//! Global leaderboard client
//!
//! JSON over HTTP against the leaderboard service. The HTTP stack itself sits
//! behind `LeaderboardTransport` so hosts can plug in whatever client they
//! have (and tests can script responses).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Minimum username length (characters)
pub const USERNAME_MIN_LEN: usize = 3;
/// Maximum username length (characters)
pub const USERNAME_MAX_LEN: usize = 15;
/// Entries fetched when no limit is given
pub const DEFAULT_GLOBAL_LIMIT: u32 = 100;

/// Achievement tiers, highest first: (minimum score, title)
pub const ACHIEVEMENTS: [(u32, &str); 8] = [
    (1000, "👑 Ocean Deity"),
    (700, "🌌 Abyssal Master"),
    (500, "🌟 Legendary Swimmer"),
    (300, "🐠 Fish Whisperer"),
    (200, "⭐ Deep Sea Explorer"),
    (100, "🥇 Gold Swimmer"),
    (50, "🥈 Silver Swimmer"),
    (20, "🥉 Bronze Swimmer"),
];
pub const NOVICE_ACHIEVEMENT: &str = "🐟 Novice Swimmer";

/// Title earned by a score
pub fn achievement_for(score: u32) -> &'static str {
    ACHIEVEMENTS
        .iter()
        .find(|(min, _)| score >= *min)
        .map_or(NOVICE_ACHIEVEMENT, |(_, title)| *title)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("username must be between 3 and 15 characters")]
    Length,
    #[error("username can only contain letters, digits and spaces")]
    Charset,
}

/// Check a username and return it trimmed
pub fn validate_username(raw: &str) -> Result<&str, UsernameError> {
    let len = raw.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(UsernameError::Length);
    }
    if !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ') {
        return Err(UsernameError::Charset);
    }
    Ok(raw.trim())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub username: String,
    pub score: u32,
    pub achievement: String,
}

impl SubmitRequest {
    pub fn new(username: &str, score: u32) -> Result<Self, UsernameError> {
        let username = validate_username(username)?;
        Ok(Self {
            username: username.to_owned(),
            score,
            achievement: achievement_for(score).to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub username: String,
    pub score: u32,
    pub achievement: String,
    /// ISO 8601, as sent by the server
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameCheck {
    pub username: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRank {
    pub username: String,
    /// 1-based
    pub rank: u32,
    pub score: u32,
    pub achievement: String,
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("invalid base url: {0}")]
    Url(#[from] url::ParseError),
    #[error("base url cannot take a path")]
    BaseUrl,
    #[error(transparent)]
    Username(#[from] UsernameError),
    #[error("transport: {0}")]
    Transport(String),
    #[error("server returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("not found")]
    NotFound,
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
}

/// HTTP seam. Implementations return the response body of a 2xx reply and
/// map other statuses to `LeaderboardError::Status` (404 to `NotFound`).
pub trait LeaderboardTransport {
    fn get(&mut self, url: &Url) -> Result<String, LeaderboardError>;
    fn post(&mut self, url: &Url, body: &str) -> Result<String, LeaderboardError>;
}

pub struct LeaderboardClient<T: LeaderboardTransport> {
    base: Url,
    transport: T,
}

impl<T: LeaderboardTransport> LeaderboardClient<T> {
    /// `base_url` is the service root, e.g. `https://example.com`
    pub fn new(base_url: &str, transport: T) -> Result<Self, LeaderboardError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(LeaderboardError::BaseUrl);
        }
        Ok(Self { base, transport })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, LeaderboardError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| LeaderboardError::BaseUrl)?
            .pop_if_empty()
            .extend(["api", "leaderboard"])
            .extend(segments);
        Ok(url)
    }

    /// Submit a score; the server keeps the best score per username
    pub fn submit_score(
        &mut self,
        username: &str,
        score: u32,
    ) -> Result<LeaderboardEntry, LeaderboardError> {
        let request = SubmitRequest::new(username, score)?;
        let url = self.endpoint(&["submit"])?;
        let body = serde_json::to_string(&request)?;
        let reply = self.transport.post(&url, &body)?;
        let entry: LeaderboardEntry = serde_json::from_str(&reply)?;
        log::info!("Submitted {} for {}, server has {}", score, entry.username, entry.score);
        Ok(entry)
    }

    /// Top entries, best first
    pub fn global(&mut self, limit: u32) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut url = self.endpoint(&["global"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let reply = self.transport.get(&url)?;
        Ok(serde_json::from_str(&reply)?)
    }

    pub fn check_username(&mut self, username: &str) -> Result<UsernameCheck, LeaderboardError> {
        let username = validate_username(username)?;
        let mut url = self.endpoint(&["check-username"])?;
        url.query_pairs_mut().append_pair("username", username);
        let reply = self.transport.get(&url)?;
        Ok(serde_json::from_str(&reply)?)
    }

    /// Rank of a username, `None` if it never submitted
    pub fn rank(&mut self, username: &str) -> Result<Option<UserRank>, LeaderboardError> {
        let url = self.endpoint(&["rank", username])?;
        match self.transport.get(&url) {
            Ok(reply) => Ok(Some(serde_json::from_str(&reply)?)),
            Err(LeaderboardError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedTransport {
        replies: VecDeque<Result<String, LeaderboardError>>,
        requests: Vec<(String, Option<String>)>,
    }

    impl ScriptedTransport {
        fn reply(mut self, body: &str) -> Self {
            self.replies.push_back(Ok(body.to_owned()));
            self
        }

        fn fail(mut self, err: LeaderboardError) -> Self {
            self.replies.push_back(Err(err));
            self
        }

        fn next(&mut self) -> Result<String, LeaderboardError> {
            self.replies
                .pop_front()
                .unwrap_or(Err(LeaderboardError::Transport("no reply scripted".into())))
        }
    }

    impl LeaderboardTransport for ScriptedTransport {
        fn get(&mut self, url: &Url) -> Result<String, LeaderboardError> {
            self.requests.push((url.to_string(), None));
            self.next()
        }

        fn post(&mut self, url: &Url, body: &str) -> Result<String, LeaderboardError> {
            self.requests.push((url.to_string(), Some(body.to_owned())));
            self.next()
        }
    }

    const ENTRY: &str = r#"{"id":"a1","username":"Nemo","score":120,"achievement":"🥇 Gold Swimmer","timestamp":"2025-01-01T00:00:00Z"}"#;

    #[test]
    fn achievement_tiers() {
        assert_eq!(achievement_for(0), "🐟 Novice Swimmer");
        assert_eq!(achievement_for(19), "🐟 Novice Swimmer");
        assert_eq!(achievement_for(20), "🥉 Bronze Swimmer");
        assert_eq!(achievement_for(99), "🥈 Silver Swimmer");
        assert_eq!(achievement_for(100), "🥇 Gold Swimmer");
        assert_eq!(achievement_for(999), "🌌 Abyssal Master");
        assert_eq!(achievement_for(5000), "👑 Ocean Deity");
    }

    #[test]
    fn username_rules() {
        assert_eq!(validate_username("Nemo"), Ok("Nemo"));
        assert_eq!(validate_username("Big Fish 7"), Ok("Big Fish 7"));
        assert_eq!(validate_username("ab"), Err(UsernameError::Length));
        assert_eq!(validate_username("a".repeat(16).as_str()), Err(UsernameError::Length));
        assert_eq!(validate_username("dory!"), Err(UsernameError::Charset));
        assert_eq!(validate_username("fïsh"), Err(UsernameError::Charset));
    }

    #[test]
    fn submit_posts_achievement() {
        let transport = ScriptedTransport::default().reply(ENTRY);
        let mut client = LeaderboardClient::new("https://scores.test", transport).expect("client");
        let entry = client.submit_score("Nemo", 120).expect("submit");
        assert_eq!(entry.score, 120);

        let (url, body) = &client.transport().requests[0];
        assert_eq!(url, "https://scores.test/api/leaderboard/submit");
        let sent: SubmitRequest = serde_json::from_str(body.as_deref().expect("body")).expect("json");
        assert_eq!(sent.achievement, "🥇 Gold Swimmer");
    }

    #[test]
    fn invalid_username_never_hits_network() {
        let mut client =
            LeaderboardClient::new("https://scores.test", ScriptedTransport::default()).expect("client");
        let err = client.submit_score("x", 5).expect_err("rejected");
        assert!(matches!(err, LeaderboardError::Username(UsernameError::Length)));
        assert!(client.transport().requests.is_empty());
    }

    #[test]
    fn global_passes_limit() {
        let body = format!("[{ENTRY}]");
        let transport = ScriptedTransport::default().reply(&body);
        let mut client = LeaderboardClient::new("https://scores.test/", transport).expect("client");
        let entries = client.global(DEFAULT_GLOBAL_LIMIT).expect("global");
        assert_eq!(entries.len(), 1);
        assert_eq!(
            client.transport().requests[0].0,
            "https://scores.test/api/leaderboard/global?limit=100"
        );
    }

    #[test]
    fn query_and_path_are_encoded() {
        let transport = ScriptedTransport::default()
            .reply(r#"{"username":"Big Fish","available":true}"#)
            .reply(r#"{"username":"Big Fish","rank":3,"score":88,"achievement":"🥈 Silver Swimmer"}"#);
        let mut client = LeaderboardClient::new("https://scores.test", transport).expect("client");

        assert!(client.check_username("Big Fish").expect("check").available);
        let rank = client.rank("Big Fish").expect("rank").expect("ranked");
        assert_eq!(rank.rank, 3);

        let urls: Vec<_> = client.transport().requests.iter().map(|r| r.0.as_str()).collect();
        assert_eq!(
            urls,
            [
                "https://scores.test/api/leaderboard/check-username?username=Big+Fish",
                "https://scores.test/api/leaderboard/rank/Big%20Fish",
            ]
        );
    }

    #[test]
    fn unknown_user_has_no_rank() {
        let transport = ScriptedTransport::default().fail(LeaderboardError::NotFound);
        let mut client = LeaderboardClient::new("https://scores.test", transport).expect("client");
        assert_eq!(client.rank("Nobody").expect("rank"), None);
    }

    #[test]
    fn server_errors_propagate() {
        let transport = ScriptedTransport::default().fail(LeaderboardError::Status {
            status: 500,
            detail: "db down".into(),
        });
        let mut client = LeaderboardClient::new("https://scores.test", transport).expect("client");
        assert!(matches!(
            client.global(10),
            Err(LeaderboardError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn rejects_non_base_url() {
        assert!(matches!(
            LeaderboardClient::new("mailto:fish@sea", ScriptedTransport::default()),
            Err(LeaderboardError::BaseUrl)
        ));
    }
}

//! Stream-server selection and playback classification.
//!
//! Servers attached to a record (or one of its episodes) are grouped by
//! language for presentation, flattened back into one index-addressable
//! list for selection, and each URL is classified into a playback mode by
//! string inspection alone. No probing happens here.

use serde::Serialize;
use url::Url;

use crate::models::catalog::{CatalogItem, StreamServer};

/// Label applied to servers that carry no language tag.
pub const DEFAULT_LANGUAGE: &str = "Español Latino";

/// Synthetic entry used when a record has no usable servers at all, so
/// players always have a source list.
#[must_use]
pub fn demo_server() -> StreamServer {
    StreamServer {
        name: "Demo".to_string(),
        url: "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4"
            .to_string(),
        quality: Some("720p".to_string()),
        language: Some(DEFAULT_LANGUAGE.to_string()),
    }
}

/// The list a player actually works with: episode-level servers when the
/// episode is addressed and has any, else the record-level servers, else
/// the demo entry. Empty-URL entries are filtered at write time and only
/// re-filtered here as a belt against legacy rows.
#[must_use]
pub fn effective_servers(
    item: &CatalogItem,
    season: Option<i32>,
    episode: Option<i32>,
) -> Vec<StreamServer> {
    if let (Some(season_number), Some(episode_number)) = (season, episode) {
        let episode_servers = item
            .seasons
            .iter()
            .find(|s| s.season_number == season_number)
            .and_then(|s| {
                s.episodes
                    .iter()
                    .find(|e| e.episode_number == episode_number)
            })
            .map(|e| e.stream_servers.clone())
            .unwrap_or_default();

        let usable: Vec<StreamServer> = episode_servers
            .into_iter()
            .filter(|s| !s.url.trim().is_empty())
            .collect();
        if !usable.is_empty() {
            return usable;
        }
    }

    let usable: Vec<StreamServer> = item
        .stream_servers
        .iter()
        .filter(|s| !s.url.trim().is_empty())
        .cloned()
        .collect();
    if usable.is_empty() {
        vec![demo_server()]
    } else {
        usable
    }
}

/// Servers of one language, in their original relative order.
#[derive(Debug, Clone, Serialize)]
pub struct ServerGroup {
    pub language: String,
    pub servers: Vec<StreamServer>,
}

/// Group servers by language, first-seen group order, preserving in-group
/// insertion order.
#[must_use]
pub fn group_by_language(servers: &[StreamServer]) -> Vec<ServerGroup> {
    let mut groups: Vec<ServerGroup> = Vec::new();

    for server in servers {
        let language = server
            .language
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        match groups.iter_mut().find(|g| g.language == language) {
            Some(group) => group.servers.push(server.clone()),
            None => groups.push(ServerGroup {
                language,
                servers: vec![server.clone()],
            }),
        }
    }

    groups
}

/// The grouped view plus a flat list addressed by `selected_index`.
#[derive(Debug, Clone, Serialize)]
pub struct ServerSelection {
    pub groups: Vec<ServerGroup>,
    pub selected_index: usize,
}

impl ServerSelection {
    #[must_use]
    pub fn new(servers: &[StreamServer]) -> Self {
        Self {
            groups: group_by_language(servers),
            selected_index: 0,
        }
    }

    /// Flat list in group order, the indexing space for selection.
    #[must_use]
    pub fn flat(&self) -> Vec<&StreamServer> {
        self.groups.iter().flat_map(|g| g.servers.iter()).collect()
    }

    /// Bounds-checked index set. Out-of-range selections are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        let len = self.groups.iter().map(|g| g.servers.len()).sum::<usize>();
        if index < len {
            self.selected_index = index;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&StreamServer> {
        self.flat().get(self.selected_index).copied()
    }
}

/// How a URL should be played, decided from the string alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlaybackMode {
    /// Direct `.mp4`: native video element.
    Native,
    /// YouTube link, rewritten to an embeddable URL.
    Youtube { embed_url: String },
    /// Known embed host or an embed-looking path: iframe.
    Embed,
    /// Anything else: generic video element with multi-format sources.
    Fallback,
}

const EMBED_HOSTS: &[&str] = &[
    "streamtape",
    "filemoon",
    "doodstream",
    "dood",
    "voe.sx",
    "uqload",
    "vidmoly",
    "streamwish",
    "mixdrop",
    "ok.ru",
];

fn youtube_video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if host.ends_with("youtu.be") {
        return url
            .path_segments()
            .and_then(|mut segments| segments.next().map(str::to_string))
            .filter(|id| !id.is_empty());
    }
    if host.ends_with("youtube.com") {
        if url.path() == "/watch" {
            return url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned());
        }
        if let Some(id) = url.path().strip_prefix("/embed/") {
            return Some(id.to_string()).filter(|id| !id.is_empty());
        }
    }
    None
}

/// Classify a playback URL.
#[must_use]
pub fn classify_playback(raw_url: &str) -> PlaybackMode {
    if raw_url.ends_with(".mp4") {
        return PlaybackMode::Native;
    }

    if let Ok(url) = Url::parse(raw_url) {
        if let Some(id) = youtube_video_id(&url) {
            return PlaybackMode::Youtube {
                embed_url: format!("https://www.youtube.com/embed/{id}"),
            };
        }
        if let Some(host) = url.host_str() {
            if EMBED_HOSTS.iter().any(|h| host.contains(h)) {
                return PlaybackMode::Embed;
            }
        }
    }

    let lower = raw_url.to_lowercase();
    if lower.contains("embed") || lower.contains("player") || lower.contains("/e/") {
        return PlaybackMode::Embed;
    }

    PlaybackMode::Fallback
}

/// Player lifecycle: `Idle -> Loading -> Ready <-> Playing <-> Paused`,
/// with `Error` reachable from any active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Error,
}

/// Extension guesses the archive-style player walks through on error.
const EXTENSION_GUESSES: &[&str] = &[".mp4", ".mkv", ".avi", ".webm"];

/// Candidate-source cascade for the archive-style player.
///
/// Derives one candidate URL per extension guess and advances to the
/// next on playback error. When the list is exhausted the player stays
/// in `Error`; there is no further fallback.
#[derive(Debug, Clone)]
pub struct SourceCascade {
    candidates: Vec<String>,
    index: usize,
    pub state: PlayerState,
}

impl SourceCascade {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let stem = EXTENSION_GUESSES
            .iter()
            .find_map(|ext| base_url.strip_suffix(ext))
            .unwrap_or(base_url);

        let candidates = EXTENSION_GUESSES
            .iter()
            .map(|ext| format!("{stem}{ext}"))
            .collect();

        Self {
            candidates,
            index: 0,
            state: PlayerState::Idle,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.candidates.get(self.index).map(String::as_str)
    }

    pub fn start(&mut self) {
        if self.state == PlayerState::Idle {
            self.state = PlayerState::Loading;
        }
    }

    pub fn on_ready(&mut self) {
        if self.state == PlayerState::Loading {
            self.state = PlayerState::Ready;
        }
    }

    pub fn play(&mut self) {
        if matches!(self.state, PlayerState::Ready | PlayerState::Paused) {
            self.state = PlayerState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlayerState::Playing {
            self.state = PlayerState::Paused;
        }
    }

    /// Advance to the next candidate source. Returns the new current URL,
    /// or `None` once every guess has failed.
    pub fn on_error(&mut self) -> Option<&str> {
        self.state = PlayerState::Error;
        if self.index + 1 < self.candidates.len() {
            self.index += 1;
            self.state = PlayerState::Loading;
            self.current()
        } else {
            None
        }
    }
}

use crate::types::{NowPlaying, PlaylistItem, SpotifyArtist, SpotifyTrack, Track};

/// Renders a duration in milliseconds as `M:SS`.
///
/// Seconds are truncated, never rounded, and minutes do not roll over into
/// hours: one hour renders as `60:00`.
pub fn format_duration(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    format!("{}:{:02}", minutes, seconds)
}

pub fn join_artists(artists: &[SpotifyArtist]) -> String {
    artists
        .iter()
        .map(|artist| artist.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Projects an upstream track onto the shape passengers consume.
pub fn to_track(track: SpotifyTrack) -> Track {
    Track {
        artist: join_artists(&track.artists),
        album_art: track.album.images.into_iter().next().map(|image| image.url),
        duration: format_duration(track.duration_ms),
        id: track.id,
        uri: track.uri,
        name: track.name,
        album: track.album.name,
    }
}

pub fn to_tracks(tracks: Vec<SpotifyTrack>) -> Vec<Track> {
    tracks.into_iter().map(to_track).collect()
}

/// Projects playlist entries, dropping the ones whose track was removed.
pub fn playlist_to_tracks(items: Vec<PlaylistItem>) -> Vec<Track> {
    items
        .into_iter()
        .filter_map(|item| item.track)
        .map(to_track)
        .collect()
}

pub fn to_now_playing(track: Option<SpotifyTrack>) -> NowPlaying {
    match track {
        Some(track) => NowPlaying {
            playing: true,
            artist: Some(join_artists(&track.artists)),
            album_art: track.album.images.into_iter().next().map(|image| image.url),
            name: Some(track.name),
        },
        None => NowPlaying {
            playing: false,
            name: None,
            artist: None,
            album_art: None,
        },
    }
}

/// Turns a passenger supplied track reference into a playable URI.
///
/// Accepts either a bare track id or a complete `spotify:track:` URI. Returns
/// `None` when nothing usable was given.
pub fn track_uri(track: &str) -> Option<String> {
    let track = track.trim();
    let id = track.strip_prefix("spotify:track:").unwrap_or(track);

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(format!("spotify:track:{}", id))
}

/// Clamps an optional `limit` query value into the range the upstream accepts.
pub fn clamp_limit(limit: Option<u32>, default: u32, max: u32) -> u32 {
    limit.unwrap_or(default).clamp(1, max)
}

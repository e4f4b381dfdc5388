/// A playlist entry. Identity is the `url`; duplicates are allowed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub url: String,
    pub title: String,
    pub thumbnail: Option<String>,
}

impl Track {
    pub fn new(url: impl Into<String>, title: impl Into<String>, thumbnail: Option<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            thumbnail,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<Track>,
    cursor: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The track under the cursor.
    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.tracks.get(i))
    }

    /// Append `track`. Returns true when it became the current track, i.e.
    /// the playlist had no cursor before.
    pub fn push(&mut self, track: Track) -> bool {
        self.tracks.push(track);
        if self.cursor.is_none() {
            self.cursor = Some(0);
            return true;
        }
        false
    }

    /// Remove the entry at `index` and reclamp the cursor.
    ///
    /// The cursor keeps its numeric value unless it fell off the end. Out of
    /// range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }
        let removed = self.tracks.remove(index);
        if let Some(c) = self.cursor {
            if c >= self.tracks.len() {
                self.cursor = self.tracks.len().checked_sub(1);
            }
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.cursor = None;
    }

    /// Move the cursor to `index` and return the track there.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.cursor = Some(index);
        self.tracks.get(index)
    }

    /// Index after the cursor, wrapping at the end. Without a cursor, the first entry.
    pub fn next_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        Some(match self.cursor {
            Some(i) => (i + 1) % len,
            None => 0,
        })
    }

    /// Index before the cursor, wrapping at the start. Without a cursor, the last entry.
    pub fn prev_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        Some(match self.cursor {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        })
    }

    pub fn advance(&mut self) -> Option<&Track> {
        let i = self.next_index()?;
        self.select(i)
    }

    pub fn retreat(&mut self) -> Option<&Track> {
        let i = self.prev_index()?;
        self.select(i)
    }

    /// Index of the entry a URL refers to: the current track when its URL
    /// matches, otherwise the first entry with that URL.
    pub fn index_of(&self, url: &str) -> Option<usize> {
        match self.cursor {
            Some(c) if self.tracks.get(c).is_some_and(|t| t.url == url) => Some(c),
            _ => self.tracks.iter().position(|t| t.url == url),
        }
    }

    pub fn find(&self, url: &str) -> Option<&Track> {
        self.index_of(url).and_then(|i| self.tracks.get(i))
    }

    /// Entry to back-fill metadata into; see [`Playlist::index_of`].
    pub fn find_for_update(&mut self, url: &str) -> Option<&mut Track> {
        let index = self.index_of(url)?;
        self.tracks.get_mut(index)
    }
}

//! Session reconstruction.
//!
//! Groups frames into bidirectional sessions keyed by the unordered pair of
//! endpoints plus the transport protocol. Frames are borrowed, not copied, so
//! a [`SessionTable`] lives only as long as the frame list it was built from.

use std::collections::HashMap;

use crate::frame::{Endpoint, Frame, TransportKind};

/// Normalized session key (lower endpoint first for consistent lookup).
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct SessionKey {
    protocol: TransportKind,
    a: Endpoint,
    b: Endpoint,
}

impl SessionKey {
    /// Create a normalized session key.
    /// Ensures `a <= b` by (address, port), so both directions map to one key.
    pub fn new(protocol: TransportKind, src: Endpoint, dst: Endpoint) -> Self {
        let (a, b) = if src <= dst { (src, dst) } else { (dst, src) };
        Self { protocol, a, b }
    }

    /// Key for a frame, if it carries both a network and a transport layer.
    pub fn for_frame(frame: &Frame) -> Option<Self> {
        let protocol = frame.transport_kind()?;
        Some(Self::new(protocol, frame.source()?, frame.destination()?))
    }

    pub fn protocol(&self) -> TransportKind {
        self.protocol
    }

    /// Both endpoints, lower one first.
    pub fn endpoints(&self) -> (Endpoint, Endpoint) {
        (self.a, self.b)
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} <-> {}", self.protocol, self.a, self.b)
    }
}

/// One bidirectional session and its frames in capture order.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    key: SessionKey,
    frames: Vec<&'a Frame>,
    first_timestamp: f64,
    last_timestamp: f64,
}

impl<'a> Session<'a> {
    fn new(key: SessionKey, frame: &'a Frame) -> Self {
        Self {
            key,
            frames: vec![frame],
            first_timestamp: frame.timestamp,
            last_timestamp: frame.timestamp,
        }
    }

    fn push(&mut self, frame: &'a Frame) {
        self.first_timestamp = self.first_timestamp.min(frame.timestamp);
        self.last_timestamp = self.last_timestamp.max(frame.timestamp);
        self.frames.push(frame);
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Frames in capture order.
    pub fn frames(&self) -> &[&'a Frame] {
        &self.frames
    }

    /// Number of frames in the session.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false: a session is created with its first frame.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Earliest timestamp in the session.
    pub fn first_timestamp(&self) -> f64 {
        self.first_timestamp
    }

    /// Latest timestamp in the session.
    pub fn last_timestamp(&self) -> f64 {
        self.last_timestamp
    }

    pub fn duration(&self) -> f64 {
        self.last_timestamp - self.first_timestamp
    }
}

/// Sessions in first-seen order with O(1) lookup by key.
#[derive(Debug, Clone, Default)]
pub struct SessionTable<'a> {
    index: HashMap<SessionKey, usize>,
    sessions: Vec<Session<'a>>,
}

impl<'a> SessionTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from frames in one pass. Frames without a key are skipped.
    pub fn from_frames<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = &'a Frame>,
    {
        let mut table = Self::new();
        let mut skipped = 0usize;
        for frame in frames {
            if !table.insert(frame) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "frames without a session key");
        }
        table
    }

    /// Append a frame to its session, creating the session on first sight.
    ///
    /// Returns `false` (and stores nothing) when the frame has no network or
    /// transport layer.
    pub fn insert(&mut self, frame: &'a Frame) -> bool {
        let Some(key) = SessionKey::for_frame(frame) else {
            return false;
        };

        match self.index.get(&key) {
            Some(&idx) => self.sessions[idx].push(frame),
            None => {
                tracing::trace!(%key, frame = frame.number, "new session");
                self.index.insert(key, self.sessions.len());
                self.sessions.push(Session::new(key, frame));
            }
        }
        true
    }

    /// Number of distinct sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Look up a session by key.
    pub fn get(&self, key: &SessionKey) -> Option<&Session<'a>> {
        self.index.get(key).map(|&idx| &self.sessions[idx])
    }

    /// Sessions in the order their first frame was seen.
    pub fn iter(&self) -> impl Iterator<Item = &Session<'a>> {
        self.sessions.iter()
    }

    /// Frames across all sessions.
    pub fn total_frames(&self) -> usize {
        self.sessions.iter().map(Session::len).sum()
    }
}

impl<'t, 'a> IntoIterator for &'t SessionTable<'a> {
    type Item = &'t Session<'a>;
    type IntoIter = std::slice::Iter<'t, Session<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sessions.iter()
    }
}

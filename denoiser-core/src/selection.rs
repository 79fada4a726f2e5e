use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Monotonic tag for file selections. Zero means nothing has been selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user's chosen input file. Bytes are shared, never copied.
#[derive(Clone, Debug)]
pub struct InputAudio {
    name: String,
    bytes: Arc<[u8]>,
    generation: Generation,
}

impl InputAudio {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Client-side filter matching the file picker's `accept=".wav"`: the
/// extension decides, so a bare `.wav` passes just as it does in the picker.
pub fn is_accepted_file_name(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// Owns the current input file and the generation counter.
#[derive(Debug, Default)]
pub struct FileSelectionTracker {
    current: Option<InputAudio>,
    generation: Generation,
}

impl FileSelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current file. Always bumps the generation, even when the
    /// same name and bytes are picked again.
    pub fn select_file(&mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Generation {
        self.generation = self.generation.next();
        let audio = InputAudio {
            name: name.into(),
            bytes: bytes.into(),
            generation: self.generation,
        };
        log::debug!(
            "Selected {} ({} bytes), generation {}",
            audio.name,
            audio.len(),
            self.generation
        );
        self.current = Some(audio);
        self.generation
    }

    pub fn current(&self) -> Option<&InputAudio> {
        self.current.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.current.is_some() && self.generation == generation
    }
}

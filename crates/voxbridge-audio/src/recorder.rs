/// A finalized utterance, ready for the upload pipeline. Ownership of
/// the bytes transfers out of the recorder on finalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceClip {
    pub data: Vec<u8>,
    pub mime: &'static str,
}

/// Accumulates encoded audio chunks between StartUtterance and
/// StopUtterance, then concatenates them into a single clip.
///
/// Chunks arrive asynchronously from the capture side, in delivery
/// order, with arbitrary sizes; zero-length chunks are discarded. After
/// `finalize` the buffer is empty and the recorder is reusable.
pub struct UtteranceRecorder {
    chunks: Vec<Vec<u8>>,
    active: bool,
}

impl Default for UtteranceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceRecorder {
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin a new empty chunk sequence.
    pub fn begin(&mut self) {
        self.chunks.clear();
        self.active = true;
    }

    /// Append a chunk in arrival order. Empty chunks are dropped.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        if chunk.is_empty() {
            return;
        }
        self.chunks.push(chunk);
    }

    /// Concatenate everything accumulated so far, byte for byte, into a
    /// WAV-tagged clip and reset the buffer.
    pub fn finalize(&mut self) -> UtteranceClip {
        let total: usize = self.chunks.iter().map(Vec::len).sum();
        let mut data = Vec::with_capacity(total);
        for chunk in self.chunks.drain(..) {
            data.extend_from_slice(&chunk);
        }
        self.active = false;

        UtteranceClip {
            data,
            mime: "audio/wav",
        }
    }
}

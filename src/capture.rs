use std::collections::VecDeque;
use std::io::BufRead;

/// A lazy, restartable stream of transcript updates. Each item is the
/// full transcript so far for the current utterance; consumers keep only
/// the latest value, never a history. The stream runs until explicitly
/// stopped or exhausted.
pub trait TranscriptSource {
    /// Next transcript update, or `None` when the stream ends.
    fn next_transcript(&mut self) -> anyhow::Result<Option<String>>;
}

/// Reads transcript updates as lines from stdin. Stands in for a speech
/// recognizer in the terminal: each typed line replaces the transcript.
pub struct StdinSource;

impl StdinSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptSource for StdinSource {
    fn next_transcript(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        let bytes = std::io::stdin().lock().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None); // EOF
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Fixed sequence of transcript updates, for tests and demos.
pub struct ScriptedSource {
    updates: VecDeque<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(updates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            updates: updates.into_iter().map(Into::into).collect(),
        }
    }
}

impl TranscriptSource for ScriptedSource {
    fn next_transcript(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.updates.pop_front())
    }
}

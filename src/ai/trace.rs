//! Human-readable score breakdowns
//!
//! Tracing is opt-in per pass. With a [`TraceSink::Disabled`] sink the note
//! closures are never called, so considerations can describe their reasoning
//! freely without paying for it in normal play.

use std::fmt;

use serde::Serialize;

/// Collects notes from one consideration evaluation
#[derive(Debug, Default)]
pub enum TraceSink {
    #[default]
    Disabled,
    Enabled(Vec<String>),
}

impl TraceSink {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            TraceSink::Enabled(Vec::new())
        } else {
            TraceSink::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, TraceSink::Enabled(_))
    }

    /// Record a note; `note` only runs when tracing is on
    pub fn note<F>(&mut self, note: F)
    where
        F: FnOnce() -> String,
    {
        if let TraceSink::Enabled(notes) = self {
            notes.push(note());
        }
    }

    /// Notes collected so far, None when disabled
    pub fn into_notes(self) -> Option<Vec<String>> {
        match self {
            TraceSink::Disabled => None,
            TraceSink::Enabled(notes) => Some(notes),
        }
    }
}

/// Why one (decision, path) pair scored what it did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub decision: String,
    pub raw: f64,
    pub weight: f64,
    pub bonus: f64,
    pub score: f64,
    pub notes: Vec<String>,
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.3} = raw {:.3} x weight {:.2} x bonus {:.2}",
            self.decision, self.score, self.raw, self.weight, self.bonus
        )?;
        for note in &self.notes {
            write!(f, "\n  - {}", note)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_sink_never_builds_notes() {
        let mut sink = TraceSink::new(false);
        let mut calls = 0;
        sink.note(|| {
            calls += 1;
            "expensive".to_string()
        });
        assert_eq!(calls, 0);
        assert!(sink.into_notes().is_none());
    }

    #[test]
    fn test_enabled_sink_collects_in_order() {
        let mut sink = TraceSink::new(true);
        sink.note(|| "first".to_string());
        sink.note(|| "second".to_string());
        assert_eq!(
            sink.into_notes(),
            Some(vec!["first".to_string(), "second".to_string()])
        );
    }

    #[test]
    fn test_trace_display() {
        let trace = Trace {
            decision: "attack".to_string(),
            raw: 4.8,
            weight: 1.0,
            bonus: 1.0,
            score: 4.8,
            notes: vec!["enemy in medium range".to_string()],
        };
        let text = trace.to_string();
        assert!(text.starts_with("attack: 4.800"));
        assert!(text.contains("- enemy in medium range"));
    }
}

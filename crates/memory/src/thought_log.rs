use crate::types::{Thought, ThoughtKind};
use std::collections::VecDeque;

pub const MAX_THOUGHTS: usize = 100;

/// In-memory stream of the agent's reasoning, oldest evicted first.
#[derive(Debug, Default)]
pub struct ThoughtLog {
    thoughts: VecDeque<Thought>,
}

impl ThoughtLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: ThoughtKind, content: impl Into<String>, confidence: f32) {
        let thought = Thought {
            kind,
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            confidence: confidence.clamp(0.0, 1.0),
        };

        tracing::debug!("{}", thought);

        self.thoughts.push_back(thought);
        if self.thoughts.len() > MAX_THOUGHTS {
            self.thoughts.pop_front();
        }
    }

    pub fn all(&self) -> Vec<Thought> {
        self.thoughts.iter().cloned().collect()
    }

    pub fn recent(&self, count: usize) -> Vec<Thought> {
        let skip = self.thoughts.len().saturating_sub(count);
        self.thoughts.iter().skip(skip).cloned().collect()
    }

    pub fn last(&self) -> Option<&Thought> {
        self.thoughts.back()
    }

    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }

    pub fn clear(&mut self) {
        self.thoughts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thought_cap() {
        let mut log = ThoughtLog::new();
        for i in 0..150 {
            log.add(ThoughtKind::Analysis, format!("thought {}", i), 0.5);
        }

        assert_eq!(log.len(), MAX_THOUGHTS);
        assert_eq!(log.all()[0].content, "thought 50");
        assert_eq!(log.last().unwrap().content, "thought 149");
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mut log = ThoughtLog::new();
        log.add(ThoughtKind::Analysis, "a", 1.0);
        log.add(ThoughtKind::Plan, "b", 0.8);
        log.add(ThoughtKind::Decision, "c", 0.9);

        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content, "b");
        assert_eq!(recent[1].kind, ThoughtKind::Decision);
        assert_eq!(log.recent(10).len(), 3);
    }

    #[test]
    fn test_confidence_clamped() {
        let mut log = ThoughtLog::new();
        log.add(ThoughtKind::Reflection, "x", 1.7);
        assert_eq!(log.last().unwrap().confidence, 1.0);
    }
}

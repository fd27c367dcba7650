use std::collections::HashMap;

use crate::render::RenderedMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Replaced,
}

/// Rendered messages of the active context in first-seen order.
///
/// Re-rendering an id replaces its block where it stands. `revision` bumps on
/// every change so callers can tell whether the transcript was touched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript {
    order: Vec<u64>,
    blocks: HashMap<u64, RenderedMessage>,
    revision: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, message: RenderedMessage) -> Upsert {
        self.revision += 1;
        let id = message.id;
        if self.blocks.insert(id, message).is_some() {
            Upsert::Replaced
        } else {
            self.order.push(id);
            Upsert::Created
        }
    }

    pub fn clear(&mut self) {
        if self.order.is_empty() {
            return;
        }
        self.order.clear();
        self.blocks.clear();
        self.revision += 1;
    }

    pub fn get(&self, id: u64) -> Option<&RenderedMessage> {
        self.blocks.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderedMessage> {
        self.order.iter().filter_map(|id| self.blocks.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::{Transcript, Upsert};
    use crate::message::{LogEntry, MessageKind};
    use crate::render::HandlerRegistry;

    fn rendered(no: u64, content: &str) -> crate::render::RenderedMessage {
        HandlerRegistry::standard().render(&LogEntry::new(no, MessageKind::Info, "", content))
    }

    #[test]
    fn rerendering_an_id_replaces_in_place() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.upsert(rendered(1, "first")), Upsert::Created);
        assert_eq!(transcript.upsert(rendered(2, "second")), Upsert::Created);
        assert_eq!(transcript.upsert(rendered(1, "first, edited")), Upsert::Replaced);

        let ids: Vec<_> = transcript.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(
            transcript.get(1).map(|m| m.sections[0].text.as_str()),
            Some("first, edited")
        );
        assert_eq!(transcript.revision(), 3);
    }

    #[test]
    fn clearing_an_empty_transcript_is_not_a_change() {
        let mut transcript = Transcript::new();
        transcript.clear();
        assert_eq!(transcript.revision(), 0);

        transcript.upsert(rendered(5, "x"));
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.revision(), 2);
    }
}

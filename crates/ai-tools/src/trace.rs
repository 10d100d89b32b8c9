#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A small decision-trace record.
///
/// Deliberately plain data so controllers can emit it every tick and tooling can render it
/// later. `tag` names the decision (`"state"`, `"target"`, ...); `subject` is the entity the
/// decision concerns, and `value` carries its score or amount.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub agent: u64,
    pub tag: Cow<'static, str>,
    pub subject: Option<u64>,
    pub value: f32,
    pub detail: Option<Cow<'static, str>>,
}

impl TraceEvent {
    pub fn new(tick: u64, agent: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            agent,
            tag: tag.into(),
            subject: None,
            value: 0.0,
            detail: None,
        }
    }

    pub fn with_subject(mut self, subject: u64) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }

    pub fn with_detail(mut self, detail: impl Into<Cow<'static, str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Shared, cloneable log; every clone appends to the same buffer.
///
/// Useful when a controller owns the sink but a test or debugger still wants to read it.
#[derive(Debug, Default, Clone)]
pub struct TraceLog {
    events: std::rc::Rc<std::cell::RefCell<Vec<TraceEvent>>>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn snapshot(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }

    /// Events whose tag equals `tag`, in emission order.
    pub fn with_tag(&self, tag: &str) -> Vec<TraceEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.tag == tag)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.events.borrow_mut().push(event);
    }
}

//! Event types and sinks for observing mission builds.
//!
//! [`GenerationEvent`]s are emitted by [`crate::generator::MissionGenerator`] and the
//! objective pipeline. Sinks choose what to receive through [`EventSink::wants`], so
//! expensive event payloads are only built when someone listens.
use crate::database::UnitFamily;
use crate::geometry::Coordinates;

/// Describes events emitted while generating a mission.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    /// Emitted when a build starts.
    BuildStarted {
        /// Number of top-level objectives in the template.
        objective_count: usize,
    },

    /// Emitted when an objective or sub-task starts processing.
    ObjectiveStarted {
        /// Objective index, counting sub-tasks.
        index: usize,
        /// Task id of the objective.
        task: String,
        /// Whether this is a sub-task of a preceding objective.
        sub_task: bool,
    },

    /// Emitted after a spawn point or parking allocation succeeded.
    Allocated {
        /// Objective index the allocation belongs to.
        index: usize,
        /// What was allocated (anchor, pickup, parking, ...).
        what: String,
        /// Allocated position.
        coordinates: Coordinates,
    },

    /// Emitted when an objective or sub-task completed.
    ObjectiveFinished {
        /// Objective index, counting sub-tasks.
        index: usize,
        /// Generated objective name.
        name: String,
        /// Unit family of the target group.
        family: UnitFamily,
        /// Final objective coordinates.
        coordinates: Coordinates,
    },

    /// Emitted when the whole build finishes successfully.
    BuildFinished {
        /// Total objectives generated, counting sub-tasks.
        objective_count: usize,
        /// Total waypoints generated.
        waypoint_count: usize,
    },

    /// Non-fatal warning generated during the build.
    Warning {
        /// Context string (e.g. objective name, airbase id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of a [`GenerationEvent`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationEventKind {
    BuildStarted,
    ObjectiveStarted,
    Allocated,
    ObjectiveFinished,
    BuildFinished,
    Warning,
}

impl GenerationEvent {
    pub fn kind(&self) -> GenerationEventKind {
        match self {
            GenerationEvent::BuildStarted { .. } => GenerationEventKind::BuildStarted,
            GenerationEvent::ObjectiveStarted { .. } => GenerationEventKind::ObjectiveStarted,
            GenerationEvent::Allocated { .. } => GenerationEventKind::Allocated,
            GenerationEvent::ObjectiveFinished { .. } => GenerationEventKind::ObjectiveFinished,
            GenerationEvent::BuildFinished { .. } => GenerationEventKind::BuildFinished,
            GenerationEvent::Warning { .. } => GenerationEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`GenerationEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: GenerationEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&mut self, _kind: GenerationEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = GenerationEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: GenerationEvent) {}

    #[inline]
    fn wants(&mut self, _kind: GenerationEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally only some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<GenerationEvent>,
    only: Option<Vec<GenerationEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that only accepts the listed kinds.
    pub fn filtered(kinds: impl IntoIterator<Item = GenerationEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<GenerationEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[GenerationEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: GenerationEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        self.events.push(event);
    }

    fn wants(&mut self, kind: GenerationEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: GenerationEvent) {
        let kind = event.kind();
        let targets: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some((&last, rest)) = targets.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&mut self, kind: GenerationEventKind) -> bool {
        self.sinks.iter_mut().any(|s| s.wants(kind))
    }
}

/// Minimal adapter trait for types that can expose an [`EventSink`].
pub trait AsEventSink {
    fn as_event_sink(&mut self) -> &mut dyn EventSink;
}

impl AsEventSink for VecSink {
    fn as_event_sink(&mut self) -> &mut dyn EventSink {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(context: &str) -> GenerationEvent {
        GenerationEvent::Warning {
            context: context.into(),
            message: "msg".into(),
        }
    }

    #[test]
    fn unit_sink_wants_nothing() {
        let mut sink = ();
        assert!(!sink.wants(GenerationEventKind::Warning));
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(warning("b"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.count(GenerationEventKind::Warning), 2);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn filtered_vec_sink_declines_other_kinds() {
        let mut sink = VecSink::filtered([GenerationEventKind::BuildFinished]);
        assert!(sink.wants(GenerationEventKind::BuildFinished));
        assert!(!sink.wants(GenerationEventKind::Warning));
    }

    #[test]
    fn multi_sink_fans_out_to_interested_sinks() {
        let mut multi = MultiSink::with_sinks(vec![
            VecSink::new(),
            VecSink::filtered([GenerationEventKind::BuildStarted]),
            VecSink::new(),
        ]);
        assert!(multi.wants(GenerationEventKind::Warning));
        multi.send(warning("ctx"));
        assert_eq!(multi.sinks[0].len(), 1);
        assert_eq!(multi.sinks[1].len(), 0);
        assert_eq!(multi.sinks[2].len(), 1);
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("ctx"));
        assert_eq!(count, 1);
    }

    #[test]
    fn event_kind_matches_variant() {
        let event = GenerationEvent::BuildStarted { objective_count: 2 };
        assert_eq!(event.kind(), GenerationEventKind::BuildStarted);
    }
}

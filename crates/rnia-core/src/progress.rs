//! Progress event stream shared by the pipeline and its collaborators

/// A single progress update emitted during a run.
///
/// `step` is monotonically non-decreasing within one run and the total is
/// fixed before the first event, so consumers can render a stable
/// denominator. A terminal event with `step == total` is emitted exactly
/// once on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub step: usize,
    pub total: usize,
    pub message: String,
    /// Raw fragment of a subprocess's interleaved stdout/stderr, present
    /// when the active step streams an external command. Not necessarily
    /// line-aligned on the consumer side.
    pub log_chunk: Option<String>,
}

impl ProgressEvent {
    /// Event marking a step transition.
    pub fn step(step: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            step,
            total,
            message: message.into(),
            log_chunk: None,
        }
    }

    /// Event carrying a fragment of subprocess output, attributed to the
    /// currently active step.
    pub fn log(step: usize, total: usize, message: impl Into<String>, chunk: impl Into<String>) -> Self {
        Self {
            step,
            total,
            message: message.into(),
            log_chunk: Some(chunk.into()),
        }
    }
}

/// Consumer of progress events, owned by the presentation layer.
///
/// The core never requires a sink: every producer takes an
/// `Option<&dyn ProgressSink>` and treats `None` as a no-op.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Forward an event to an optional sink.
pub(crate) fn emit(sink: Option<&dyn ProgressSink>, event: ProgressEvent) {
    if let Some(sink) = sink {
        sink.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closure_acts_as_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |event: ProgressEvent| seen.lock().unwrap().push(event);
        emit(Some(&sink), ProgressEvent::step(0, 5, "start"));
        emit(Some(&sink), ProgressEvent::log(0, 5, "start", "line\n"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].log_chunk, None);
        assert_eq!(seen[1].log_chunk.as_deref(), Some("line\n"));
    }

    #[test]
    fn missing_sink_is_a_no_op() {
        emit(None, ProgressEvent::step(0, 1, "ignored"));
    }
}

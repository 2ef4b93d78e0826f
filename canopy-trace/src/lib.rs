//! Trace events recorded while trees tick.
//!
//! Events are routed through the agent's blackboard so that recording stays opt-in and
//! deterministic: install a [`TraceLog`] under [`TRACE_LOG`] and/or a boxed [`TraceSink`] under
//! [`TRACE_SINK`], and every [`emit`] call lands there. Rendering belongs in separate tooling.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{
    emit, NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink, TRACE_LOG, TRACE_SINK,
};

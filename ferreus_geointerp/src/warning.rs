/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines warning messages and sinks for non-fatal issues raised during queries.
//
// Created on: 21 Jul 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Warning reporting primitives.
//!
//! The numerical core performs no I/O; non-fatal conditions are delivered to
//! the caller through a [`WarningSink`], which the embedding layer is free
//! to route to its own logging or warning machinery.

use crate::temporal_axis::Resolution;
use std::fmt::Debug;
use std::sync::{mpsc, Arc};
use std::thread;

/// Warning events emitted during queries.
#[derive(Debug, Clone)]
pub enum WarningMsg {
    /// A temporal cast lost sub-unit precision (e.g. microseconds truncated
    /// to seconds).
    ResolutionTruncation { from: Resolution, to: Resolution },

    /// Arbitrary informational message.
    Message { message: String },
}

/// Sink that consumes warning messages.
pub trait WarningSink: Send + Sync + Debug {
    fn emit(&self, msg: WarningMsg);
}

/// Sink that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl WarningSink for NullSink {
    #[inline]
    fn emit(&self, _: WarningMsg) {}
}

/// Warning sink that forwards messages over a channel.
#[derive(Debug)]
pub struct ClosureSink {
    tx: mpsc::SyncSender<WarningMsg>,
}

impl WarningSink for ClosureSink {
    #[inline]
    fn emit(&self, msg: WarningMsg) {
        let _ = self.tx.try_send(msg);
    }
}

/// Spawns a listener thread that runs a handler closure for each warning.
pub fn closure_sink<F>(
    buffer: usize,
    mut handler: F,
) -> (Arc<dyn WarningSink>, thread::JoinHandle<()>)
where
    F: FnMut(WarningMsg) + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel::<WarningMsg>(buffer.max(1));
    let sink: Arc<dyn WarningSink> = Arc::new(ClosureSink { tx });

    let handle = thread::spawn(move || {
        while let Ok(msg) = rx.recv() {
            handler(msg);
        }
    });

    (sink, handle)
}

//! # The settle detector: quiescence as a one-shot future.
//!
//! After an asynchronous step the engine must not advance until the subject
//! has truly gone quiet — no fixed wall-clock delay is correct. [`Settle`]
//! expresses that wait as an explicit one-shot future instead of a timer
//! callback: it stays pending for a small number of scheduler passes
//! (waking itself each time) and then completes.
//!
//! Paired with a `biased` select that polls the subject's outbound channel
//! first, the detector can only win once the channel has nothing queued and
//! every other ready task (the subject's own continuations) has had a turn.
//! Re-arming is replacement: the engine stores the detector in an
//! `Option<Settle>`, and writing a fresh one drops the pending one — that
//! replacement is the debounce, and it guarantees at most one pending
//! detector per engine.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Scheduler passes a detector defers before completing.
const SETTLE_PASSES: u8 = 2;

/// One-shot quiescence future; see the module docs.
#[derive(Debug)]
pub struct Settle {
    passes: u8,
}

impl Settle {
    pub(crate) fn new() -> Self {
        Self {
            passes: SETTLE_PASSES,
        }
    }
}

impl Future for Settle {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.passes == 0 {
            Poll::Ready(())
        } else {
            self.passes -= 1;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settle_completes_on_its_own() {
        // must resolve without any external wakeup
        Settle::new().await;
    }

    #[tokio::test]
    async fn test_queued_messages_win_over_settle() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.send("queued").expect("send");

        let mut settle = Settle::new();
        let won = tokio::select! {
            biased;
            msg = rx.recv() => msg.expect("message"),
            _ = &mut settle => "settled",
        };
        assert_eq!(won, "queued");

        // with the queue drained, the settle detector fires
        let won = tokio::select! {
            biased;
            msg = rx.recv() => msg.expect("message"),
            _ = &mut settle => "settled",
        };
        assert_eq!(won, "settled");
    }
}

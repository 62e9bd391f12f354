//! Heartbeat injection for quiet streams.

use crate::frame::SseFrame;
use async_stream::stream;
use futures::{pin_mut, Stream, StreamExt};
use std::time::Duration;
use tokio::time::timeout;

/// How long a stream may stay silent before a heartbeat goes out.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Merge a session's frames with a recurring heartbeat.
///
/// The timer restarts after every emitted frame, heartbeat or not, so a
/// heartbeat appears whenever `frames` has produced nothing for a whole
/// `period`. When a data frame and the timer are ready at the same moment the
/// data frame wins. The merged stream ends when `frames` ends; no trailing
/// heartbeat is emitted.
pub fn with_heartbeat<S>(frames: S, period: Duration) -> impl Stream<Item = SseFrame>
where
    S: Stream<Item = SseFrame>,
{
    stream! {
        pin_mut!(frames);
        loop {
            match timeout(period, frames.next()).await {
                Ok(Some(frame)) => yield frame,
                Ok(None) => break,
                Err(_) => yield SseFrame::Heartbeat,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, Instant};

    #[tokio::test(start_paused = true)]
    async fn a_silent_stream_heartbeats_once_per_period() {
        let merged = with_heartbeat(futures::stream::pending::<SseFrame>(), HEARTBEAT_INTERVAL);
        pin_mut!(merged);

        let start = Instant::now();
        for beat in 1..=5u32 {
            assert_eq!(merged.next().await, Some(SseFrame::Heartbeat));
            assert_eq!(start.elapsed(), HEARTBEAT_INTERVAL * beat);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn prompt_frames_pass_through_without_heartbeats() {
        let frames = futures::stream::iter([
            SseFrame::data("a"),
            SseFrame::data("b"),
            SseFrame::data("c"),
        ]);
        let merged = with_heartbeat(frames, HEARTBEAT_INTERVAL);
        pin_mut!(merged);

        assert_eq!(merged.next().await, Some(SseFrame::data("a")));
        assert_eq!(merged.next().await, Some(SseFrame::data("b")));
        assert_eq!(merged.next().await, Some(SseFrame::data("c")));
        assert_eq!(merged.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeats_fill_the_gaps_between_frames() {
        let (tx, mut rx) = mpsc::channel::<SseFrame>(4);
        let inner = stream! {
            while let Some(frame) = rx.recv().await {
                yield frame;
            }
        };
        tokio::spawn(async move {
            sleep(Duration::from_millis(2500)).await;
            tx.send(SseFrame::data("late")).await.unwrap();
            // Dropping the sender afterwards ends the inner stream.
        });

        let merged = with_heartbeat(inner, HEARTBEAT_INTERVAL);
        pin_mut!(merged);

        // Quiet for 2.5s: heartbeats at 1s and 2s, then the data frame.
        assert_eq!(merged.next().await, Some(SseFrame::Heartbeat));
        assert_eq!(merged.next().await, Some(SseFrame::Heartbeat));
        assert_eq!(merged.next().await, Some(SseFrame::data("late")));
        // The sender is gone by now, so the inner stream ends the merged one.
        assert_eq!(merged.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn an_ended_stream_stops_without_a_trailing_heartbeat() {
        let merged = with_heartbeat(futures::stream::empty::<SseFrame>(), HEARTBEAT_INTERVAL);
        pin_mut!(merged);
        assert_eq!(merged.next().await, None);
    }
}

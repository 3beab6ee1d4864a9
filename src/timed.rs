use pin_project::pin_project;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::{Duration, Instant},
};

/// Measures a future from its first poll until it resolves.
#[pin_project]
pub struct Timed<Fut: Future> {
    start: Option<Instant>,
    #[pin]
    fut: Fut,
}

impl<Fut: Future> Future for Timed<Fut> {
    type Output = (Fut::Output, Duration);

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let start = *this.start.get_or_insert_with(Instant::now);
        match this.fut.poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(output) => Poll::Ready((output, start.elapsed())),
        }
    }
}

pub trait TimedExt: Future + Sized {
    fn timed(self) -> Timed<Self> {
        Timed {
            start: None,
            fut: self,
        }
    }
}

impl<F: Future> TimedExt for F {}

#[cfg(test)]
mod tests {
    use super::TimedExt;
    use std::time::Duration;

    #[tokio::test]
    async fn reports_output_and_elapsed() {
        let (val, _) = async { 42 }.timed().await;
        assert_eq!(val, 42);

        let (_, elapsed) = tokio::time::sleep(Duration::from_millis(20)).timed().await;
        assert!(elapsed >= Duration::from_millis(20), "{elapsed:?}");
    }
}

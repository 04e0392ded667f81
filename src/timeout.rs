//! Advisory timeout warning: a cancellable timer that flips a channel
//! shortly before the declared execution budget runs out, standing in for
//! the platform's imminent-timeout notification. Cooperative only - the
//! handler keeps running and the process exits normally.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::warn;

/// How long before the declared timeout the warning fires.
const WARNING_LEAD: Duration = Duration::from_millis(50);

pub struct TimeoutWarning {
    timer: Option<JoinHandle<()>>,
    receiver: watch::Receiver<bool>,
}

impl TimeoutWarning {
    /// Arms the timer for `timeout` minus the warning lead.
    pub fn arm(timeout: Duration) -> Self {
        let (sender, receiver) = watch::channel(false);
        let delay = timeout.saturating_sub(WARNING_LEAD);

        let timer = tokio::spawn(async move {
            sleep(delay).await;
            warn!("Execution is about to exceed the configured timeout");
            // receivers may be gone if the invocation already completed
            let _ = sender.send(true);
        });

        Self {
            timer: Some(timer),
            receiver,
        }
    }

    /// A channel that flips to true when the warning fires.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.receiver.clone()
    }

    /// Stops the timer. Safe to call any number of times, before or after
    /// the warning fired.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for TimeoutWarning {
    fn drop(&mut self) {
        // every exit path releases the timer, armed or not
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test]
    async fn fires_ahead_of_the_deadline() {
        let warning = TimeoutWarning::arm(Duration::from_millis(100));
        let mut armed = warning.subscribe();

        timeout(Duration::from_millis(500), armed.changed())
            .await
            .expect("warning did not fire in time")
            .unwrap();

        assert!(*armed.borrow());
    }

    #[tokio::test]
    async fn cancelled_timer_never_fires() {
        let mut warning = TimeoutWarning::arm(Duration::from_millis(100));
        let armed = warning.subscribe();
        warning.cancel();

        sleep(Duration::from_millis(200)).await;
        assert!(!*armed.borrow());
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let mut warning = TimeoutWarning::arm(Duration::from_millis(60));
        let mut armed = warning.subscribe();

        // let it fire first, then cancel repeatedly
        timeout(Duration::from_millis(500), armed.changed())
            .await
            .expect("warning did not fire in time")
            .unwrap();
        warning.cancel();
        warning.cancel();
    }

    #[tokio::test]
    async fn dropping_the_warning_cancels_the_timer() {
        let armed = {
            let warning = TimeoutWarning::arm(Duration::from_millis(100));
            warning.subscribe()
        };

        sleep(Duration::from_millis(200)).await;
        assert!(!*armed.borrow());
    }
}

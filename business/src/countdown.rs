//! The reset-password countdown task.
//!
//! One timer at a time: starting a countdown cancels whichever one is
//! still in flight before spawning the next, so rapid resend requests
//! can never race each other's decrements. The task stops itself when
//! the counter reaches zero.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use crate::ResetPasswordState;

/// Handle to the at-most-one running countdown task.
#[derive(Debug, Default)]
pub struct ResetCountdown {
    cancel: Option<CancellationToken>,
}

impl ResetCountdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any in-flight timer, then spawns a 1 Hz task that
    /// decrements `shared.countdown_seconds` until it reaches zero and
    /// flips `can_resend`.
    pub fn start(&mut self, shared: Arc<Mutex<ResetPasswordState>>) {
        if let Some(previous) = self.cancel.take() {
            previous.cancel();
        }

        let token = CancellationToken::new();
        self.cancel = Some(token.clone());

        tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(1));
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the countdown starts
            // one second in.
            tick.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tick.tick() => {
                        let finished = {
                            let mut state =
                                shared.lock().unwrap_or_else(|e| e.into_inner());
                            if state.countdown_seconds > 0 {
                                state.countdown_seconds -= 1;
                            }
                            if state.countdown_seconds == 0 {
                                state.can_resend = true;
                                true
                            } else {
                                false
                            }
                        };
                        if finished {
                            // Mark the handle finished so `is_running`
                            // reads false after a natural stop.
                            token.cancel();
                            return;
                        }
                    }
                }
            }
        });
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.cancel.as_ref().is_some_and(|token| !token.is_cancelled())
    }
}

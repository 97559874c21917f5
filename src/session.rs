//! The ad-insertion state machine.
//!
//! One `PlaybackSession` exists per video view. It consumes discrete events
//! (position updates, finish notifications, button presses), consults the
//! session's ad schedule and the process-wide debt queue, and answers with
//! the player command to issue — at most one load per transition. The debt
//! queue is passed in by the caller rather than owned here, which keeps the
//! machine testable without a storage backend.

use crate::catalog::VideoMeta;
use crate::debt::DebtQueue;
use crate::mode::AdMode;
use crate::schedule::AdSchedule;
use crate::snooze::SnoozeDelay;
use log::{debug, info};

/// How far ahead of an ad's deadline the countdown appears (ms).
pub const COUNTDOWN_WINDOW_MILLIS: u64 = 5_000;

/// Where the session currently is.
///
/// A single enum instead of separate show-flags: the countdown is a
/// sub-state of playing the main video, and the snooze panel excludes both
/// by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Main video rolling; `countdown` marks the pre-ad warning window.
    PlayingMain { countdown: bool },
    /// Snooze panel open, playback paused (snooze mode only).
    SnoozePanelOpen,
    /// An ad rolling; `paying_debt` marks a debt-payoff run (debt mode only).
    PlayingAd { paying_debt: bool },
}

/// Command issued to the media player control surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Load {
        uri: String,
        start_position_millis: u64,
        autoplay: bool,
    },
    Play,
    Pause,
}

impl PlayerCommand {
    fn load(uri: &str, start_position_millis: u64) -> Self {
        PlayerCommand::Load {
            uri: uri.to_string(),
            start_position_millis,
            autoplay: true,
        }
    }
}

#[derive(Debug)]
pub struct PlaybackSession {
    video_id: String,
    main_uri: String,
    schedule: AdSchedule,
    state: SessionState,
    mode: AdMode,
    /// Main-video position to resume at after an ad (or payoff run) ends.
    resume_position_millis: u64,
    /// Last position update seen while the main video was rolling.
    last_main_position_millis: u64,
}

impl PlaybackSession {
    pub fn new(video: &VideoMeta, mode: AdMode) -> Self {
        PlaybackSession {
            video_id: video.id.clone(),
            main_uri: video.uri.clone(),
            schedule: AdSchedule::from_spots(&video.ads),
            state: SessionState::PlayingMain { countdown: false },
            mode,
            resume_position_millis: 0,
            last_main_position_millis: 0,
        }
    }

    /// The load command that starts the session (main video from the top).
    pub fn initial_load(&self) -> PlayerCommand {
        PlayerCommand::load(&self.main_uri, 0)
    }

    /// Feed one position/status update through the transition rules.
    ///
    /// Returns the player command to issue, if the update caused a source
    /// switch. Updates that arrive for a state they no longer apply to
    /// (an extra tick right after a transition) fall through the guards and
    /// do nothing.
    pub fn handle_status(
        &mut self,
        position_millis: u64,
        did_just_finish: bool,
        debt: &mut DebtQueue,
    ) -> Option<PlayerCommand> {
        match self.state {
            SessionState::PlayingAd { paying_debt } if did_just_finish => {
                if paying_debt {
                    if let Some(uri) = debt.dequeue_front() {
                        info!("[{}] paying next debt ad '{}'", self.video_id, uri);
                        return Some(PlayerCommand::load(&uri, 0));
                    }
                    debug!("[{}] debt paid off", self.video_id);
                }
                self.state = SessionState::PlayingMain { countdown: false };
                info!(
                    "[{}] ad finished, resuming main at {}ms",
                    self.video_id, self.resume_position_millis
                );
                Some(PlayerCommand::load(
                    &self.main_uri,
                    self.resume_position_millis,
                ))
            }
            // Mid-ad ticks and updates while paused carry no decisions.
            SessionState::PlayingAd { .. } | SessionState::SnoozePanelOpen => None,
            SessionState::PlayingMain { countdown } => {
                self.last_main_position_millis = position_millis;
                let head = self.schedule.head()?;

                if head.insert_at <= position_millis {
                    // Deadline reached: the ad preempts the main video even
                    // when the debt queue is full.
                    self.resume_position_millis = position_millis;
                    let entry = self.schedule.pop_head()?;
                    self.state = SessionState::PlayingAd { paying_debt: false };
                    info!(
                        "[{}] ad break at {}ms -> '{}'",
                        self.video_id, position_millis, entry.uri
                    );
                    return Some(PlayerCommand::load(&entry.uri, 0));
                }

                if !countdown && head.insert_at - position_millis <= COUNTDOWN_WINDOW_MILLIS {
                    debug!(
                        "[{}] countdown: ad due at {}ms, now {}ms",
                        self.video_id, head.insert_at, position_millis
                    );
                    self.state = SessionState::PlayingMain { countdown: true };
                }
                None
            }
        }
    }

    /// Seconds shown on the countdown overlay, rounded to the nearest
    /// integer. `None` while the countdown is not visible.
    pub fn countdown_seconds(&self, position_millis: u64) -> Option<u32> {
        if self.state != (SessionState::PlayingMain { countdown: true }) {
            return None;
        }
        let head = self.schedule.head()?;
        let remaining = head.insert_at.saturating_sub(position_millis);
        Some(((remaining + 500) / 1_000) as u32)
    }

    /// The countdown overlay's action button: "Snooze" in snooze mode,
    /// "Pay Later" in debt mode. Meaningless outside the countdown window.
    pub fn countdown_action(&mut self, debt: &mut DebtQueue) -> Option<PlayerCommand> {
        if self.state != (SessionState::PlayingMain { countdown: true }) {
            return None;
        }
        match self.mode {
            AdMode::Snooze => {
                self.state = SessionState::SnoozePanelOpen;
                Some(PlayerCommand::Pause)
            }
            AdMode::Debt => {
                if debt.is_full() {
                    debug!("[{}] debt full, pay-later ignored", self.video_id);
                    return None;
                }
                let uri = self.schedule.head()?.uri.clone();
                if debt.enqueue(&uri) {
                    self.schedule.pop_head();
                    self.state = SessionState::PlayingMain { countdown: false };
                    info!(
                        "[{}] deferred '{}' into debt ({} owed)",
                        self.video_id,
                        uri,
                        debt.len()
                    );
                }
                None
            }
        }
    }

    /// Confirm the snooze panel with a chosen delay: the head ad's deadline
    /// moves back by exactly that long and playback resumes.
    pub fn confirm_snooze(&mut self, delay: SnoozeDelay) -> Option<PlayerCommand> {
        if self.state != SessionState::SnoozePanelOpen {
            return None;
        }
        self.schedule.snooze_head(delay.millis());
        self.state = SessionState::PlayingMain { countdown: false };
        if let Some(head) = self.schedule.head() {
            info!(
                "[{}] snoozed {} -> ad now due at {}ms",
                self.video_id, delay, head.insert_at
            );
        }
        Some(PlayerCommand::Play)
    }

    /// Close the snooze panel without snoozing. The deadline is unchanged,
    /// so the countdown stays up.
    pub fn cancel_snooze(&mut self) -> Option<PlayerCommand> {
        if self.state != SessionState::SnoozePanelOpen {
            return None;
        }
        self.state = SessionState::PlayingMain { countdown: true };
        Some(PlayerCommand::Play)
    }

    /// The debt indicator's "pay now" button. Starts a payoff run from the
    /// main video; pressed again during a payoff it only cancels the run
    /// flag (the loaded ad plays out).
    pub fn pay_now(&mut self, debt: &mut DebtQueue) -> Option<PlayerCommand> {
        if self.mode != AdMode::Debt {
            return None;
        }
        if self.state == (SessionState::PlayingAd { paying_debt: true }) {
            self.state = SessionState::PlayingAd { paying_debt: false };
            debug!("[{}] payoff cancelled mid-ad", self.video_id);
            return None;
        }
        if !matches!(self.state, SessionState::PlayingMain { .. }) {
            return None;
        }
        let uri = debt.dequeue_front()?;
        self.resume_position_millis = self.last_main_position_millis;
        self.state = SessionState::PlayingAd { paying_debt: true };
        info!(
            "[{}] paying debt now, starting with '{}' ({} left)",
            self.video_id,
            uri,
            debt.len()
        );
        Some(PlayerCommand::load(&uri, 0))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> AdMode {
        self.mode
    }

    pub fn schedule(&self) -> &AdSchedule {
        &self.schedule
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn main_uri(&self) -> &str {
        &self.main_uri
    }

    pub fn resume_position_millis(&self) -> u64 {
        self.resume_position_millis
    }
}

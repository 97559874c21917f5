//! Headless playback simulator.
//!
//! Drives a `PlaybackSession` against a virtual player over virtual time:
//! synthetic position updates at a fixed tick, fixed ad durations, and
//! scripted user actions. The CLI uses it to demo a session end-to-end and
//! the integration tests use it to replay whole-scenario scripts.

use crate::debt::DebtQueue;
use crate::mode::AdMode;
use crate::session::{PlaybackSession, PlayerCommand, SessionState};
use crate::snooze::SnoozeDelay;
use chrono::Local;

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    /// Virtual milliseconds between position updates.
    pub tick_millis: u64,
    /// Virtual length of the main video.
    pub main_duration_millis: u64,
    /// Virtual length of every ad clip.
    pub ad_duration_millis: u64,
    /// Press the countdown action ("Pay Later") at every countdown
    /// (debt mode).
    pub defer_countdowns: bool,
    /// Snooze once, with this delay, at the first countdown (snooze mode).
    pub snooze: Option<SnoozeDelay>,
    /// Press "pay now" once the main video reaches this position
    /// (debt mode).
    pub pay_now_at: Option<u64>,
    /// Hard stop in ticks, against scripts that never let the video end.
    pub max_ticks: usize,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        SimulationOptions {
            tick_millis: 250,
            main_duration_millis: 60_000,
            ad_duration_millis: 8_000,
            defer_countdowns: false,
            snooze: None,
            pay_now_at: None,
            max_ticks: 100_000,
        }
    }
}

/// What happened over one simulated session.
#[derive(Debug, Clone, Default)]
pub struct SimulationReport {
    /// Chronological, timestamped transition log.
    pub log: Vec<String>,
    /// Ad URIs actually played, in order.
    pub ads_played: Vec<String>,
    /// Ad URIs deferred into debt during this session.
    pub ads_deferred: Vec<String>,
    /// Number of snoozes confirmed.
    pub snoozes: u32,
    /// Debt length when the session ended.
    pub final_debt: usize,
    /// Whether the main video reached its end (false = tick cap hit).
    pub main_finished: bool,
}

/// The fake media player: one loaded source, a position, a play flag.
struct VirtualPlayer {
    uri: String,
    position_millis: u64,
    duration_millis: u64,
    playing: bool,
}

impl VirtualPlayer {
    fn apply(&mut self, cmd: &PlayerCommand, main_uri: &str, opts: &SimulationOptions) {
        match cmd {
            PlayerCommand::Load {
                uri,
                start_position_millis,
                autoplay,
            } => {
                self.uri = uri.clone();
                self.position_millis = *start_position_millis;
                self.duration_millis = if uri == main_uri {
                    opts.main_duration_millis
                } else {
                    opts.ad_duration_millis
                };
                self.playing = *autoplay;
            }
            PlayerCommand::Play => self.playing = true,
            PlayerCommand::Pause => self.playing = false,
        }
    }
}

/// Run a session to the end of its main video (or the tick cap).
pub fn run(
    session: &mut PlaybackSession,
    debt: &mut DebtQueue,
    opts: &SimulationOptions,
) -> SimulationReport {
    let mut report = SimulationReport::default();
    let main_uri = session.main_uri().to_string();

    let mut player = VirtualPlayer {
        uri: String::new(),
        position_millis: 0,
        duration_millis: 0,
        playing: false,
    };
    let initial = session.initial_load();
    player.apply(&initial, &main_uri, opts);
    log_line(&mut report, format!("loaded main video '{}'", main_uri));

    let mut snoozed = false;
    let mut paid_now = false;

    for _ in 0..opts.max_ticks {
        if player.playing {
            player.position_millis += opts.tick_millis;
        }
        let finished = player.position_millis >= player.duration_millis;
        let position = player.position_millis.min(player.duration_millis);

        if finished && player.uri == main_uri {
            report.main_finished = true;
            log_line(&mut report, "main video finished".to_string());
            break;
        }

        if let Some(cmd) = session.handle_status(position, finished, debt) {
            note_command(&mut report, &cmd, &main_uri);
            player.apply(&cmd, &main_uri, opts);
            continue;
        }

        // Scripted user actions, evaluated after the rules so they see the
        // state the UI would.
        if session.state() == (SessionState::PlayingMain { countdown: true }) {
            if session.mode() == AdMode::Debt && opts.defer_countdowns {
                let head = session.schedule().head().map(|e| e.uri.clone());
                if session.countdown_action(debt).is_none() {
                    if let Some(uri) = head {
                        if session.schedule().head().map(|e| &e.uri) != Some(&uri) {
                            log_line(&mut report, format!("deferred '{}' into debt", uri));
                            report.ads_deferred.push(uri);
                        }
                    }
                }
            } else if session.mode() == AdMode::Snooze && !snoozed {
                if let Some(delay) = opts.snooze {
                    if let Some(cmd) = session.countdown_action(debt) {
                        player.apply(&cmd, &main_uri, opts);
                    }
                    if let Some(cmd) = session.confirm_snooze(delay) {
                        player.apply(&cmd, &main_uri, opts);
                    }
                    snoozed = true;
                    report.snoozes += 1;
                    log_line(&mut report, format!("snoozed ad by {}", delay));
                }
            }
        }

        if let Some(at) = opts.pay_now_at {
            if !paid_now
                && player.uri == main_uri
                && player.position_millis >= at
                && matches!(session.state(), SessionState::PlayingMain { .. })
            {
                if let Some(cmd) = session.pay_now(debt) {
                    paid_now = true;
                    log_line(&mut report, "pay now pressed".to_string());
                    note_command(&mut report, &cmd, &main_uri);
                    player.apply(&cmd, &main_uri, opts);
                } else {
                    // Nothing owed; stop retrying every tick.
                    paid_now = true;
                }
            }
        }
    }

    report.final_debt = debt.len();
    report
}

fn note_command(report: &mut SimulationReport, cmd: &PlayerCommand, main_uri: &str) {
    if let PlayerCommand::Load {
        uri,
        start_position_millis,
        ..
    } = cmd
    {
        if uri == main_uri {
            log_line(
                report,
                format!("resumed main video at {}ms", start_position_millis),
            );
        } else {
            log_line(report, format!("playing ad '{}'", uri));
            report.ads_played.push(uri.clone());
        }
    }
}

fn log_line(report: &mut SimulationReport, line: String) {
    let timestamp = Local::now().format("%H:%M:%S");
    report.log.push(format!("[{}] {}", timestamp, line));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AdSpot, VideoMeta};
    use crate::store::MemoryStorage;
    use std::rc::Rc;

    fn video_with_ad() -> VideoMeta {
        VideoMeta {
            id: "sim".to_string(),
            title: "Sim".to_string(),
            uri: "main.mp4".to_string(),
            ads: vec![AdSpot {
                uri: "ad_a.mp4".to_string(),
                insert_at: 5000,
            }],
            thumbnail: "t.jpg".to_string(),
            channel_name: "Sim".to_string(),
        }
    }

    fn make_debt() -> DebtQueue {
        DebtQueue::load(Rc::new(MemoryStorage::new()))
    }

    #[test]
    fn plain_run_plays_the_scheduled_ad() {
        let mut session = PlaybackSession::new(&video_with_ad(), AdMode::Snooze);
        let mut debt = make_debt();
        let opts = SimulationOptions {
            main_duration_millis: 20_000,
            ..SimulationOptions::default()
        };
        let report = run(&mut session, &mut debt, &opts);
        assert!(report.main_finished);
        assert_eq!(report.ads_played, vec!["ad_a.mp4".to_string()]);
        assert_eq!(report.snoozes, 0);
    }

    #[test]
    fn snooze_script_delays_the_ad_past_a_short_video() {
        let mut session = PlaybackSession::new(&video_with_ad(), AdMode::Snooze);
        let mut debt = make_debt();
        let opts = SimulationOptions {
            main_duration_millis: 20_000,
            snooze: Some(SnoozeDelay::try_new(1, 0).unwrap()),
            ..SimulationOptions::default()
        };
        let report = run(&mut session, &mut debt, &opts);
        // Snoozed to 65s, video ends at 20s: the ad never plays.
        assert!(report.main_finished);
        assert!(report.ads_played.is_empty());
        assert_eq!(report.snoozes, 1);
    }

    #[test]
    fn defer_script_banks_the_ad_as_debt() {
        let mut session = PlaybackSession::new(&video_with_ad(), AdMode::Debt);
        let mut debt = make_debt();
        let opts = SimulationOptions {
            main_duration_millis: 20_000,
            defer_countdowns: true,
            ..SimulationOptions::default()
        };
        let report = run(&mut session, &mut debt, &opts);
        assert!(report.main_finished);
        assert!(report.ads_played.is_empty());
        assert_eq!(report.ads_deferred, vec!["ad_a.mp4".to_string()]);
        assert_eq!(report.final_debt, 1);
    }

    #[test]
    fn pay_now_script_plays_owed_ads_and_finishes() {
        let mut session = PlaybackSession::new(
            &VideoMeta {
                ads: vec![],
                ..video_with_ad()
            },
            AdMode::Debt,
        );
        let mut debt = make_debt();
        debt.enqueue("x.mp4");
        debt.enqueue("y.mp4");
        let opts = SimulationOptions {
            main_duration_millis: 30_000,
            pay_now_at: Some(10_000),
            ..SimulationOptions::default()
        };
        let report = run(&mut session, &mut debt, &opts);
        assert!(report.main_finished);
        assert_eq!(
            report.ads_played,
            vec!["x.mp4".to_string(), "y.mp4".to_string()]
        );
        assert_eq!(report.final_debt, 0);
    }

    #[test]
    fn tick_cap_bounds_the_run() {
        let mut session = PlaybackSession::new(&video_with_ad(), AdMode::Snooze);
        let mut debt = make_debt();
        let opts = SimulationOptions {
            max_ticks: 10,
            ..SimulationOptions::default()
        };
        let report = run(&mut session, &mut debt, &opts);
        assert!(!report.main_finished);
    }
}

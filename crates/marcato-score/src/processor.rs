use std::sync::Arc;

use log::debug;
use marcato_chart::{Chart, ChartTimeMs, KeyMask, TimeMs};
use marcato_ruleset::{HoldBehaviour, Ruleset, judge_delta, osu_hold_judgement};

use crate::classify::{grade_id, lamp_id};
use crate::event::{HitAction, HitEvent};
use crate::health::HealthState;
use crate::hit_data::{HitData, HitStatus};
use crate::snapshot::{Snapshot, SnapshotSampler};
use crate::totals::ScoreTotals;

/// Per-lane hold tracking, tagged with the hit-data index of the head row.
/// Distinguishes a hold that was never hit from one whose head was hit and
/// whose key was released too soon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldState {
    Nothing,
    /// Head hit, key still down.
    Holding(usize),
    /// Head hit, key released before the tail.
    Dropped(usize),
    /// Head retired unhit.
    MissedHead(usize),
    /// Head retired unhit, key pressed afterwards inside the hold.
    MissedHeadThenHeld(usize),
}

impl HoldState {
    fn head(self) -> Option<usize> {
        match self {
            Self::Nothing => None,
            Self::Holding(i)
            | Self::Dropped(i)
            | Self::MissedHead(i)
            | Self::MissedHeadThenHeld(i) => Some(i),
        }
    }
}

type Subscriber = Box<dyn FnMut(&HitEvent) + Send>;

/// The scoring state machine: resolves key edges and passing time against
/// the hit-data ledger, interprets the outcomes under the ruleset, and
/// accumulates events, totals, health and snapshots.
///
/// One processor owns one run. The ruleset is shared read-only; everything
/// else is private to the run.
pub struct ScoreProcessor {
    ruleset: Arc<Ruleset>,
    keys: u8,
    rate: f64,
    first_note_ms: TimeMs,
    /// Miss window scaled into chart time.
    miss_window_ct: f64,
    /// Cbrush window scaled into chart time.
    cbrush_window_ct: f64,

    hit_data: HitData,
    /// Next row the miss sweep will look at.
    passive_cursor: usize,
    /// First row a press could still match.
    active_cursor: usize,
    hold_states: Vec<HoldState>,
    /// Most recent hold-head judgement per lane, for rulesets that defer
    /// the head's judgement to the release.
    head_judgements: Vec<Option<usize>>,
    head_deltas: Vec<f64>,
    /// Key state as of the frame currently being consumed.
    key_state: KeyMask,

    totals: ScoreTotals,
    health: HealthState,
    events: Vec<HitEvent>,
    snapshots: Vec<Snapshot>,
    sampler: SnapshotSampler,
    subscriber: Option<Subscriber>,
}

impl ScoreProcessor {
    pub fn new(ruleset: Arc<Ruleset>, chart: &Chart, rate: f64) -> Self {
        debug_assert!(rate > 0.0);
        debug!(
            "scoring run: {} keys, {} rows, rate {:.2}, ruleset {}",
            chart.keys(),
            chart.rows().len(),
            rate,
            ruleset.name
        );

        let keys = chart.keys();
        let hit_data = HitData::from_chart(chart, ruleset.miss_window_ms);
        let totals = ScoreTotals::new(ruleset.judgement_count());
        let health = HealthState::new(&ruleset.health);
        let sampler = SnapshotSampler::new(chart.duration_ms());

        Self {
            miss_window_ct: ruleset.miss_window_ms * rate,
            cbrush_window_ct: ruleset.cbrush_window_ms * rate,
            ruleset,
            keys,
            rate,
            first_note_ms: chart.first_note_ms(),
            hit_data,
            passive_cursor: 0,
            active_cursor: 0,
            hold_states: vec![HoldState::Nothing; keys as usize],
            head_judgements: vec![None; keys as usize],
            head_deltas: vec![0.0; keys as usize],
            key_state: KeyMask::EMPTY,
            totals,
            health,
            events: Vec::new(),
            snapshots: Vec::new(),
            sampler,
            subscriber: None,
        }
    }

    /// Register the (single) event subscriber. Called synchronously on the
    /// scoring thread for every event; must not re-enter the engine.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&HitEvent) + Send + 'static) {
        self.subscriber = Some(Box::new(subscriber));
    }

    pub fn keys(&self) -> u8 {
        self.keys
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn totals(&self) -> &ScoreTotals {
        &self.totals
    }

    pub fn health(&self) -> &HealthState {
        &self.health
    }

    pub fn events(&self) -> &[HitEvent] {
        &self.events
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn hit_data(&self) -> &HitData {
        &self.hit_data
    }

    /// True once the miss sweep has retired every row.
    pub fn finished(&self) -> bool {
        self.passive_cursor == self.hit_data.len()
    }

    pub fn accuracy(&self) -> f64 {
        self.totals.accuracy()
    }

    /// Grade for the current accuracy, -1 = F.
    pub fn grade(&self) -> i32 {
        grade_id(self.accuracy(), &self.ruleset)
    }

    /// Lamp for the current counters, -1 = none.
    pub fn lamp(&self) -> i32 {
        lamp_id(&self.totals, &self.ruleset)
    }

    pub fn failed(&self) -> bool {
        self.health.failed()
    }

    pub(crate) fn set_key_state(&mut self, keys: KeyMask) {
        self.key_state = keys;
    }

    /// Retire every row that passed beyond recovery before `chart_time_ms`,
    /// sampling snapshots as bucket boundaries are crossed.
    pub(crate) fn handle_passive(&mut self, chart_time_ms: ChartTimeMs) {
        let target = self.first_note_ms + chart_time_ms - self.miss_window_ct;

        while self.passive_cursor < self.hit_data.len()
            && self.hit_data.row(self.passive_cursor).time_ms <= target
        {
            let index = self.passive_cursor;
            self.passive_cursor += 1;

            let retire_ct =
                self.hit_data.row(index).time_ms - self.first_note_ms + self.miss_window_ct;
            self.take_snapshots(retire_ct);
            self.retire_row(index, retire_ct);
        }

        self.take_snapshots(chart_time_ms);
    }

    /// Resolve everything a passed row still required: unhit taps and hold
    /// heads become misses, unreleased tails resolve with their overhold
    /// and dropped flags.
    fn retire_row(&mut self, index: usize, event_time_ms: ChartTimeMs) {
        for k in 0..self.keys as usize {
            let cell = self.hit_data.row(index).cells[k];
            match cell.status {
                HitStatus::HitRequired => {
                    self.hit_data.row_mut(index).cells[k].status = HitStatus::HitAccepted;
                    self.apply_hit(event_time_ms, k as u8, cell.delta_ms, true, false);
                }
                HitStatus::HoldHeadRequired => {
                    self.hit_data.row_mut(index).cells[k].status = HitStatus::HitAccepted;
                    self.hold_states[k] = HoldState::MissedHead(index);
                    self.apply_hit(event_time_ms, k as u8, cell.delta_ms, true, true);
                }
                HitStatus::ReleaseRequired => {
                    self.hit_data.row_mut(index).cells[k].status = HitStatus::ReleaseAccepted;
                    let overhold = matches!(
                        self.hold_states[k],
                        HoldState::Holding(_) | HoldState::Dropped(_)
                    ) && self.key_state.has(k as u8);
                    let dropped = matches!(
                        self.hold_states[k],
                        HoldState::Dropped(_)
                            | HoldState::MissedHead(_)
                            | HoldState::MissedHeadThenHeld(_)
                    );
                    self.apply_release(
                        event_time_ms,
                        k as u8,
                        cell.delta_ms,
                        true,
                        overhold,
                        dropped,
                    );
                    // Forget the hold unless a newer head already took over.
                    if self.hold_states[k].head().is_some_and(|h| h <= index) {
                        self.hold_states[k] = HoldState::Nothing;
                    }
                }
                _ => {}
            }
        }
    }

    /// Match a key press to a note (or swallow it). See the decision rules
    /// on `accept`: the nearest note still needing the press wins, unless
    /// the press sits closer to an earlier note that was already hit well
    /// early, in which case it is absorbed as a clean-up of that fumble.
    pub(crate) fn handle_key_down(&mut self, chart_time_ms: ChartTimeMs, lane: u8) {
        self.handle_passive(chart_time_ms);

        let now = self.first_note_ms + chart_time_ms;
        let k = lane as usize;

        while self.active_cursor < self.hit_data.len()
            && self.hit_data.row(self.active_cursor).time_ms < now - self.miss_window_ct
        {
            self.active_cursor += 1;
        }

        let mut best_delta = self.miss_window_ct;
        let mut best_index: Option<usize> = None;
        let mut absorb_delta = self.miss_window_ct;

        let mut i = self.active_cursor;
        while i < self.hit_data.len() && self.hit_data.row(i).time_ms < now + self.miss_window_ct {
            let row = self.hit_data.row(i);
            let cell = row.cells[k];
            let d = now - row.time_ms;

            match cell.status {
                HitStatus::HitRequired | HitStatus::HoldHeadRequired => {
                    if d.abs() < best_delta.abs() {
                        best_delta = d;
                        best_index = Some(i);
                    }
                }
                // An earlier note already hit significantly early can claim
                // this press instead.
                HitStatus::HitAccepted if cell.delta_ms < -self.ruleset.cbrush_window_ms => {
                    if d.abs() < absorb_delta.abs() {
                        absorb_delta = d;
                    }
                }
                _ => {}
            }

            // A candidate this close wins outright; scanning further would
            // only lock the column.
            if best_delta.abs() < self.cbrush_window_ct {
                break;
            }
            i += 1;
        }

        match best_index {
            Some(index) if absorb_delta.abs() >= best_delta.abs() => {
                self.accept_press(chart_time_ms, lane, index, best_delta);
            }
            Some(_) => {
                // Swallowed by the earlier early hit.
            }
            None => {
                if let HoldState::MissedHead(head) = self.hold_states[k] {
                    self.hold_states[k] = HoldState::MissedHeadThenHeld(head);
                }
            }
        }
    }

    fn accept_press(&mut self, chart_time_ms: ChartTimeMs, lane: u8, index: usize, delta_ct: f64) {
        let k = lane as usize;
        let delta_ms = delta_ct / self.rate;
        let row = self.hit_data.row_mut(index);
        let is_hold = row.cells[k].status == HitStatus::HoldHeadRequired;
        row.cells[k].status = HitStatus::HitAccepted;
        row.cells[k].delta_ms = delta_ms;

        if is_hold {
            self.hold_states[k] = HoldState::Holding(index);
        }
        self.apply_hit(chart_time_ms, lane, delta_ms, false, is_hold);
    }

    /// Match a key release to the pending hold's tail, or mark the hold
    /// dropped when the tail is still too far away.
    pub(crate) fn handle_key_up(&mut self, chart_time_ms: ChartTimeMs, lane: u8) {
        self.handle_passive(chart_time_ms);

        let k = lane as usize;
        let head = match self.hold_states[k] {
            HoldState::Holding(i) | HoldState::Dropped(i) | HoldState::MissedHeadThenHeld(i) => i,
            // No finger was meaningfully down on a hold.
            HoldState::MissedHead(_) | HoldState::Nothing => return,
        };

        let now = self.first_note_ms + chart_time_ms;
        let mut found: Option<(usize, f64)> = None;
        let mut i = head;
        while i < self.hit_data.len() && self.hit_data.row(i).time_ms < now + self.miss_window_ct {
            let row = self.hit_data.row(i);
            if row.cells[k].status == HitStatus::ReleaseRequired {
                found = Some((i, now - row.time_ms));
                break;
            }
            i += 1;
        }

        match found {
            Some((index, delta_ct)) => {
                let dropped = matches!(
                    self.hold_states[k],
                    HoldState::Dropped(_) | HoldState::MissedHeadThenHeld(_)
                );
                let delta_ms = delta_ct / self.rate;
                let row = self.hit_data.row_mut(index);
                row.cells[k].status = HitStatus::ReleaseAccepted;
                row.cells[k].delta_ms = delta_ms;
                self.hold_states[k] = HoldState::Nothing;
                self.apply_release(chart_time_ms, lane, delta_ms, false, false, dropped);
            }
            None => match self.hold_states[k] {
                HoldState::Holding(h) => {
                    self.hold_states[k] = HoldState::Dropped(h);
                    if matches!(self.ruleset.hold_behaviour, HoldBehaviour::OsuStyle { .. }) {
                        // osu punishes the drop the moment it happens.
                        self.totals.break_combo(false);
                    }
                }
                HoldState::MissedHeadThenHeld(h) => {
                    self.hold_states[k] = HoldState::MissedHead(h);
                }
                _ => {}
            },
        }
    }

    /// Turn a press outcome into judgement, points, combo and health, then
    /// publish the event. Hold heads defer their judgement to the release
    /// under rulesets that judge the hold as a whole.
    fn apply_hit(
        &mut self,
        chart_time_ms: ChartTimeMs,
        lane: u8,
        delta_ms: f64,
        missed: bool,
        is_hold: bool,
    ) {
        let k = lane as usize;
        let resolved = if missed {
            self.ruleset.default_judgement
        } else {
            self.ruleset.judge_delta(delta_ms)
        };

        let judgement = if is_hold {
            self.head_judgements[k] = Some(resolved);
            self.head_deltas[k] = delta_ms;
            match self.ruleset.hold_behaviour {
                HoldBehaviour::BreakComboOnly | HoldBehaviour::JudgeReleases { .. } => {
                    Some(resolved)
                }
                HoldBehaviour::OsuStyle { .. }
                | HoldBehaviour::Normal { .. }
                | HoldBehaviour::OnlyJudgeReleases => None,
            }
        } else {
            Some(resolved)
        };

        if let Some(j) = judgement {
            self.award(delta_ms, j);
        }

        self.push_event(HitEvent {
            chart_time_ms,
            lane,
            action: HitAction::Hit {
                judgement,
                delta_ms,
                missed,
                is_hold,
            },
        });
    }

    /// Turn a release outcome into judgement, points, combo and health per
    /// the hold behaviour, then publish the event.
    fn apply_release(
        &mut self,
        chart_time_ms: ChartTimeMs,
        lane: u8,
        delta_ms: f64,
        missed: bool,
        overhold: bool,
        dropped: bool,
    ) {
        let k = lane as usize;
        let head_judgement = self.head_judgements[k]
            .take()
            .unwrap_or(self.ruleset.default_judgement);
        let head_delta = self.head_deltas[k];

        let judgement = match &self.ruleset.hold_behaviour {
            HoldBehaviour::BreakComboOnly => {
                if !overhold && (missed || dropped) {
                    self.totals.break_combo(true);
                } else {
                    self.totals.incr_combo();
                }
                None
            }
            HoldBehaviour::OsuStyle { od } => Some(osu_hold_judgement(
                head_delta, delta_ms, *od, overhold, dropped,
            )),
            HoldBehaviour::JudgeReleases { timegates } => Some(if missed {
                self.ruleset.default_judgement
            } else {
                judge_delta(timegates, self.ruleset.default_judgement, delta_ms)
            }),
            HoldBehaviour::Normal {
                judgement_if_dropped,
                judgement_if_overheld,
            } => Some(if overhold && !dropped {
                head_judgement.max(*judgement_if_overheld)
            } else if missed || dropped {
                head_judgement.max(*judgement_if_dropped)
            } else {
                head_judgement
            }),
            HoldBehaviour::OnlyJudgeReleases => Some(if missed {
                self.ruleset.default_judgement
            } else {
                self.ruleset.judge_delta(delta_ms)
            }),
        };

        if let Some(j) = judgement {
            self.award(delta_ms, j);
        }

        self.push_event(HitEvent {
            chart_time_ms,
            lane,
            action: HitAction::Release {
                judgement,
                delta_ms,
                missed,
                overhold,
                dropped,
            },
        });
    }

    fn award(&mut self, delta_ms: f64, judgement: usize) {
        self.totals
            .add(self.ruleset.points_for(delta_ms, judgement), judgement);
        if self.ruleset.breaks_combo(judgement) {
            self.totals.break_combo(true);
        } else {
            self.totals.incr_combo();
        }
        if let Some(&delta) = self.ruleset.health.deltas.get(judgement) {
            self.health.apply(delta);
        }
    }

    fn push_event(&mut self, event: HitEvent) {
        log::trace!("event: {event:?}");
        if let Some(subscriber) = &mut self.subscriber {
            subscriber(&event);
        }
        self.events.push(event);
    }

    fn take_snapshots(&mut self, chart_time_ms: ChartTimeMs) {
        while let Some(time_ms) = self.sampler.due(chart_time_ms) {
            self.snapshots.push(Snapshot {
                time_ms,
                points_scored: self.totals.points_scored,
                max_points_scored: self.totals.max_points_scored,
                combo: self.totals.current_combo,
                lamp: lamp_id(&self.totals, &self.ruleset),
            });
        }
    }
}

use std::sync::Arc;

use marcato_chart::{Chart, ChartTimeMs, KeyMask};
use marcato_replay::{ReplayError, ReplayFrame};
use marcato_ruleset::Ruleset;

use crate::processor::ScoreProcessor;

/// Owns the replay frame stream and turns frames into key edges,
/// dispatched to the processor in lane-ascending order.
pub struct ReplayCursor<I: Iterator<Item = ReplayFrame>> {
    frames: I,
    /// Frame read past the drain target, held for the next call.
    pending: Option<ReplayFrame>,
    last_mask: KeyMask,
    last_time_ms: f64,
}

impl<I: Iterator<Item = ReplayFrame>> ReplayCursor<I> {
    pub fn new(frames: I) -> Self {
        Self {
            frames,
            pending: None,
            last_mask: KeyMask::EMPTY,
            last_time_ms: f64::NEG_INFINITY,
        }
    }

    /// Consume frames up to and including `chart_time_ms`, dispatching each
    /// edge. Frames must be time-nondecreasing; the engine never reorders
    /// input.
    pub fn drain_to(
        &mut self,
        chart_time_ms: ChartTimeMs,
        processor: &mut ScoreProcessor,
    ) -> Result<(), ReplayError> {
        loop {
            let frame = match self.pending.take().or_else(|| self.frames.next()) {
                Some(frame) => frame,
                None => return Ok(()),
            };
            if frame.time_ms > chart_time_ms {
                self.pending = Some(frame);
                return Ok(());
            }
            if frame.time_ms < self.last_time_ms {
                return Err(ReplayError::OutOfOrderFrame {
                    prev_ms: self.last_time_ms,
                    time_ms: frame.time_ms,
                });
            }
            self.last_time_ms = frame.time_ms;

            let pressed = frame.keys.just_pressed(self.last_mask);
            let released = frame.keys.just_released(self.last_mask);
            for lane in 0..processor.keys() {
                if pressed.has(lane) {
                    processor.handle_key_down(frame.time_ms, lane);
                }
                if released.has(lane) {
                    processor.handle_key_up(frame.time_ms, lane);
                }
            }

            self.last_mask = frame.keys;
            processor.set_key_state(frame.keys);
        }
    }
}

/// A complete scoring run: replay cursor plus processor, driven by
/// `update(chart_time)` as playback advances (or once with `finish` for
/// batch scoring).
pub struct ScoreRun<I: Iterator<Item = ReplayFrame>> {
    cursor: ReplayCursor<I>,
    processor: ScoreProcessor,
}

impl<I: Iterator<Item = ReplayFrame>> ScoreRun<I> {
    pub fn new(ruleset: Arc<Ruleset>, chart: &Chart, rate: f64, frames: I) -> Self {
        Self {
            cursor: ReplayCursor::new(frames),
            processor: ScoreProcessor::new(ruleset, chart, rate),
        }
    }

    /// Advance the run: consume replay frames up to `chart_time_ms`, then
    /// retire notes that passed beyond recovery.
    pub fn update(&mut self, chart_time_ms: ChartTimeMs) -> Result<(), ReplayError> {
        self.cursor.drain_to(chart_time_ms, &mut self.processor)?;
        self.processor.handle_passive(chart_time_ms);
        Ok(())
    }

    /// Consume the remaining replay and retire every outstanding note.
    pub fn finish(&mut self) -> Result<(), ReplayError> {
        self.update(f64::INFINITY)
    }

    pub fn finished(&self) -> bool {
        self.processor.finished()
    }

    pub fn processor(&self) -> &ScoreProcessor {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut ScoreProcessor {
        &mut self.processor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marcato_chart::ChartBuilder;
    use marcato_replay::StoredReplay;
    use marcato_ruleset::standard;

    #[test]
    fn test_out_of_order_frames_are_fatal() {
        let chart = ChartBuilder::new(4).tap(1000.0, 0).build().unwrap();
        let mut replay = StoredReplay::new(1.0);
        replay.frame(100.0, KeyMask::single(0));
        replay.frame(50.0, KeyMask::EMPTY);

        let mut run = ScoreRun::new(Arc::new(standard(4)), &chart, 1.0, replay.frames());
        assert!(matches!(
            run.finish(),
            Err(ReplayError::OutOfOrderFrame { .. })
        ));
    }

    #[test]
    fn test_equal_timestamps_are_allowed() {
        let chart = ChartBuilder::new(4).tap(1000.0, 0).tap(1000.0, 1).build();
        let chart = chart.unwrap();
        let mut replay = StoredReplay::new(1.0);
        replay.frame(0.0, KeyMask::single(0));
        replay.frame(0.0, KeyMask::single(0).with(1));

        let mut run = ScoreRun::new(Arc::new(standard(4)), &chart, 1.0, replay.frames());
        run.finish().unwrap();
        assert!(run.finished());
    }

    #[test]
    fn test_partial_drain_keeps_later_frames() {
        let chart = ChartBuilder::new(4).tap(0.0, 0).tap(2000.0, 0).build().unwrap();
        let mut replay = StoredReplay::new(1.0);
        replay.press(0.0, 0);
        replay.release(50.0, 0);
        replay.press(2000.0, 0);
        replay.release(2050.0, 0);

        let mut run = ScoreRun::new(Arc::new(standard(4)), &chart, 1.0, replay.frames());
        run.update(1000.0).unwrap();
        assert_eq!(run.processor().totals().total_judged(), 1);

        run.finish().unwrap();
        assert_eq!(run.processor().totals().total_judged(), 2);
        assert_eq!(run.processor().totals().best_combo, 2);
    }
}

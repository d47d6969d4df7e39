use serde::{Deserialize, Serialize};

/// Signed upper bound converting a timing delta into a judgement.
///
/// Gates are stored ascending by window; a delta resolves to the first gate
/// it falls under, so the earliest (most negative) gates catch very early
/// hits and the latest gates catch late ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timegate {
    pub window_ms: f64,
    pub judgement: usize,
}

impl Timegate {
    pub fn new(window_ms: f64, judgement: usize) -> Self {
        Self {
            window_ms,
            judgement,
        }
    }
}

/// Builds the signed ascending gate list from symmetric absolute windows.
///
/// `windows` pairs an absolute window with the judgement awarded inside it,
/// ascending by window: `[(22.5, 0), (45.0, 1), (90.0, 2)]` awards judgement
/// 0 within ±22.5 ms, 1 within ±45 ms and 2 within ±90 ms.
pub fn symmetric_gates(windows: &[(f64, usize)]) -> Vec<Timegate> {
    let mut gates = Vec::with_capacity(windows.len() * 2);
    for i in (1..windows.len()).rev() {
        gates.push(Timegate::new(-windows[i - 1].0, windows[i].1));
    }
    for &(window_ms, judgement) in windows {
        gates.push(Timegate::new(window_ms, judgement));
    }
    gates
}

/// Judgement for a signed delta: the first gate with `delta < window`, or
/// `default_judgement` when the delta falls past every gate.
pub fn judge_delta(gates: &[Timegate], default_judgement: usize, delta_ms: f64) -> usize {
    gates
        .iter()
        .find(|gate| delta_ms < gate.window_ms)
        .map(|gate| gate.judgement)
        .unwrap_or(default_judgement)
}

//! Injected random source for move selection.

/// A source of uniform draws in `[0, 1)`.
pub trait Roll {
    fn roll(&mut self) -> f64;
}

impl Roll for fastrand::Rng {
    fn roll(&mut self) -> f64 {
        self.f64()
    }
}

/// Returns the same draw every time. Useful to replay a decision exactly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedRoll(pub f64);

impl Roll for FixedRoll {
    fn roll(&mut self) -> f64 {
        self.0
    }
}

/// Uniform pick driven by a single draw.
pub fn pick<T: Copy>(items: &[T], roll: f64) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let i = ((roll * items.len() as f64) as usize).min(items.len() - 1);
    Some(items[i])
}

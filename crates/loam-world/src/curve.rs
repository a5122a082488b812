use serde::Deserialize;

/// Piecewise-linear response curve over sorted `(t, value)` keys.
///
/// Inputs outside the key range clamp to the first or last value. An empty curve
/// evaluates to zero.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<[f32; 2]>")]
pub struct ResponseCurve {
    keys: Vec<[f32; 2]>,
}

impl ResponseCurve {
    pub fn new(mut keys: Vec<[f32; 2]>) -> Self {
        keys.retain(|k| k[0].is_finite() && k[1].is_finite());
        keys.sort_by(|a, b| a[0].total_cmp(&b[0]));
        Self { keys }
    }

    pub fn constant(value: f32) -> Self {
        Self::new(vec![[0.0, value]])
    }

    pub fn keys(&self) -> &[[f32; 2]] {
        &self.keys
    }

    pub fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if t <= first[0] {
            return first[1];
        }
        if t >= last[0] {
            return last[1];
        }
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b[0] {
                let span = b[0] - a[0];
                if span <= f32::EPSILON {
                    return b[1];
                }
                let f = (t - a[0]) / span;
                return a[1] + (b[1] - a[1]) * f;
            }
        }
        last[1]
    }
}

impl From<Vec<[f32; 2]>> for ResponseCurve {
    fn from(keys: Vec<[f32; 2]>) -> Self {
        Self::new(keys)
    }
}

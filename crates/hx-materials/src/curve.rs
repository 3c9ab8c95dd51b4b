//! Validated conductivity sample curves.

use crate::error::{MaterialError, MaterialResult};
use crate::interp::{InterpError, InterpolationMode, interpolate};
use hx_core::{Real, ensure_finite};
use serde::{Deserialize, Serialize};

/// One `(temperature, conductivity)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KtPoint {
    /// Temperature (°C)
    pub t_c: Real,
    /// Thermal conductivity (W/m·K)
    pub k: Real,
}

impl KtPoint {
    pub fn new(t_c: Real, k: Real) -> Self {
        Self { t_c, k }
    }
}

/// Conductivity samples with strictly increasing temperatures and positive
/// conductivities. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<KtPoint>", into = "Vec<KtPoint>")]
pub struct KtCurve {
    points: Vec<KtPoint>,
}

impl KtCurve {
    /// Build a curve from samples that are already sorted by temperature.
    pub fn new(points: Vec<KtPoint>) -> MaterialResult<Self> {
        for p in &points {
            ensure_finite(p.t_c, "sample temperature")?;
            ensure_finite(p.k, "sample conductivity")?;
            if p.k <= 0.0 {
                return Err(MaterialError::NonPositiveConductivity { t_c: p.t_c, k: p.k });
            }
        }
        for pair in points.windows(2) {
            let (prev, next) = (pair[0].t_c, pair[1].t_c);
            if next == prev {
                return Err(MaterialError::DuplicateTemperature { t_c: next });
            }
            if next < prev {
                return Err(MaterialError::UnsortedTemperatures { prev, next });
            }
        }
        Ok(Self { points })
    }

    /// Sort raw samples by temperature first. Duplicates are still rejected.
    pub fn from_unordered(mut points: Vec<KtPoint>) -> MaterialResult<Self> {
        points.sort_by(|a, b| a.t_c.total_cmp(&b.t_c));
        Self::new(points)
    }

    pub fn points(&self) -> &[KtPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sampled temperature domain `(min, max)`, `None` for an empty curve.
    pub fn domain(&self) -> Option<(Real, Real)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.t_c, last.t_c)),
            _ => None,
        }
    }

    pub fn evaluate(&self, t_c: Real, mode: InterpolationMode) -> Result<Real, InterpError> {
        interpolate(&self.points, t_c, mode)
    }
}

impl TryFrom<Vec<KtPoint>> for KtCurve {
    type Error = MaterialError;

    fn try_from(points: Vec<KtPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<KtCurve> for Vec<KtPoint> {
    fn from(curve: KtCurve) -> Self {
        curve.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<KtPoint> {
        raw.iter().map(|&(t, k)| KtPoint::new(t, k)).collect()
    }

    #[test]
    fn accepts_sorted_unique_samples() {
        let curve = KtCurve::new(pts(&[(0.0, 0.03), (100.0, 0.05), (200.0, 0.08)])).unwrap();
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.domain(), Some((0.0, 200.0)));
    }

    #[test]
    fn rejects_duplicate_temperature() {
        let err = KtCurve::new(pts(&[(0.0, 0.03), (0.0, 0.04)])).unwrap_err();
        assert!(matches!(err, MaterialError::DuplicateTemperature { t_c } if t_c == 0.0));
    }

    #[test]
    fn rejects_unsorted_temperatures() {
        let err = KtCurve::new(pts(&[(100.0, 0.05), (0.0, 0.03)])).unwrap_err();
        assert!(matches!(err, MaterialError::UnsortedTemperatures { .. }));
    }

    #[test]
    fn rejects_non_positive_conductivity() {
        let err = KtCurve::new(pts(&[(0.0, 0.0)])).unwrap_err();
        assert!(matches!(err, MaterialError::NonPositiveConductivity { .. }));
    }

    #[test]
    fn from_unordered_sorts_but_keeps_duplicate_check() {
        let curve = KtCurve::from_unordered(pts(&[(100.0, 0.05), (0.0, 0.03)])).unwrap();
        assert_eq!(curve.points()[0].t_c, 0.0);

        assert!(KtCurve::from_unordered(pts(&[(5.0, 0.05), (5.0, 0.03)])).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok: KtCurve = serde_json::from_str(r#"[{"t_c":0.0,"k":0.03},{"t_c":50.0,"k":0.04}]"#)
            .unwrap();
        assert_eq!(ok.len(), 2);

        let bad = serde_json::from_str::<KtCurve>(r#"[{"t_c":50.0,"k":0.03},{"t_c":0.0,"k":0.04}]"#);
        assert!(bad.is_err());
    }

    #[test]
    fn empty_curve_has_no_domain() {
        assert_eq!(KtCurve::default().domain(), None);
    }
}

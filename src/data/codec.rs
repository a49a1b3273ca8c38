//! Feature scaling and label encoding learned from the training partition.

use std::collections::BTreeSet;

use log::warn;

use crate::error::{ensure_width, NnError, Result};

/// Min-max feature scaler plus a dense label encoder.
///
/// Both halves are fitted on training data only and then applied unchanged
/// to any other partition.
#[derive(Debug, Clone, Default)]
pub struct FeatureCodec {
    /// Per-column `(min, max)` seen by `fit_normalize`.
    bounds: Option<Vec<(f64, f64)>>,
    /// Sorted class names; a label's code is its index here.
    classes: Option<Vec<String>>,
}

impl FeatureCodec {
    pub fn new() -> FeatureCodec {
        FeatureCodec::default()
    }

    /// Learns column bounds from `x` and scales it into `[0, 1]`.
    pub fn fit_normalize(&mut self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let first = x
            .first()
            .ok_or_else(|| NnError::Data("cannot fit the scaler on an empty matrix".into()))?;
        let width = first.len();
        let mut bounds = vec![(f64::INFINITY, f64::NEG_INFINITY); width];
        for row in x {
            ensure_width("feature row", row.len(), width)?;
            for (b, &v) in bounds.iter_mut().zip(row) {
                b.0 = b.0.min(v);
                b.1 = b.1.max(v);
            }
        }
        for (col, (lo, hi)) in bounds.iter().enumerate() {
            if lo == hi {
                warn!("feature column {col} is constant ({lo}); it will normalize to 0");
            }
        }
        self.bounds = Some(bounds);
        self.apply_normalize(x)
    }

    /// Scales `x` with the bounds learned by `fit_normalize`. Values outside
    /// the training range land outside `[0, 1]`; they are not clipped.
    pub fn apply_normalize(&self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let bounds = self.bounds.as_ref().ok_or(NnError::NotFitted("feature scaler"))?;
        x.iter()
            .map(|row| -> Result<Vec<f64>> {
                ensure_width("feature row", row.len(), bounds.len())?;
                Ok(row
                    .iter()
                    .zip(bounds)
                    .map(|(&v, &(lo, hi))| if hi > lo { (v - lo) / (hi - lo) } else { 0.0 })
                    .collect())
            })
            .collect()
    }

    /// Learns the class list (sorted) and encodes `labels` to `0..K-1`.
    pub fn fit_encode<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<Vec<usize>> {
        if labels.is_empty() {
            return Err(NnError::Data("cannot fit the label encoder on no labels".into()));
        }
        let classes: BTreeSet<&str> = labels.iter().map(|l| l.as_ref()).collect();
        self.classes = Some(classes.into_iter().map(str::to_string).collect());
        self.apply_encode(labels)
    }

    /// Encodes with the classes learned by `fit_encode`.
    pub fn apply_encode<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        let classes = self.classes.as_ref().ok_or(NnError::NotFitted("label encoder"))?;
        labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                classes
                    .binary_search_by(|c| c.as_str().cmp(label))
                    .map_err(|_| NnError::UnseenCategory(label.to_string()))
            })
            .collect()
    }

    /// Maps codes back to their class names.
    pub fn decode(&self, codes: &[usize]) -> Result<Vec<String>> {
        let classes = self.classes.as_ref().ok_or(NnError::NotFitted("label encoder"))?;
        codes
            .iter()
            .map(|&code| {
                classes
                    .get(code)
                    .cloned()
                    .ok_or(NnError::UnknownLabel { code, known: classes.len() })
            })
            .collect()
    }

    /// Row `i` is all zeros except a 1 at column `codes[i]`.
    pub fn one_hot(codes: &[usize], num_classes: usize) -> Result<Vec<Vec<f64>>> {
        codes
            .iter()
            .map(|&code| {
                if code >= num_classes {
                    return Err(NnError::DimensionMismatch {
                        what: "one-hot code (must be below the class count)",
                        got: code,
                        expected: num_classes,
                    });
                }
                let mut row = vec![0.0; num_classes];
                row[code] = 1.0;
                Ok(row)
            })
            .collect()
    }

    /// Classes learned by `fit_encode`; empty before fitting.
    pub fn classes(&self) -> &[String] {
        self.classes.as_deref().unwrap_or(&[])
    }

    pub fn num_classes(&self) -> usize {
        self.classes().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::argmax;

    #[test]
    fn normalizes_training_columns_into_unit_range() {
        let mut codec = FeatureCodec::new();
        let x = vec![vec![1.0, 10.0], vec![3.0, 20.0], vec![2.0, 15.0]];
        let n = codec.fit_normalize(&x).unwrap();
        assert_eq!(n, vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.5, 0.5]]);
    }

    #[test]
    fn apply_uses_training_bounds() {
        let mut codec = FeatureCodec::new();
        codec.fit_normalize(&[vec![0.0], vec![4.0]]).unwrap();
        let n = codec.apply_normalize(&[vec![1.0], vec![6.0]]).unwrap();
        assert_eq!(n, vec![vec![0.25], vec![1.5]]);
    }

    #[test]
    fn constant_column_maps_to_zero() {
        let mut codec = FeatureCodec::new();
        let n = codec.fit_normalize(&[vec![2.0, 1.0], vec![2.0, 3.0]]).unwrap();
        assert_eq!(n, vec![vec![0.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn normalize_requires_fit_and_width() {
        let mut codec = FeatureCodec::new();
        assert!(matches!(codec.apply_normalize(&[vec![1.0]]), Err(NnError::NotFitted(_))));
        assert!(codec.fit_normalize(&[]).is_err());
        assert!(codec.fit_normalize(&[vec![1.0, 2.0], vec![1.0]]).is_err());
        codec.fit_normalize(&[vec![1.0, 2.0]]).unwrap();
        assert!(matches!(
            codec.apply_normalize(&[vec![1.0]]),
            Err(NnError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn encode_decode_round_trip() {
        let labels = ["Iris-virginica", "Iris-setosa", "Iris-versicolor", "Iris-setosa"];
        let mut codec = FeatureCodec::new();
        let codes = codec.fit_encode(&labels).unwrap();
        assert_eq!(codes, vec![2, 0, 1, 0]);
        assert_eq!(codec.classes(), ["Iris-setosa", "Iris-versicolor", "Iris-virginica"]);
        assert_eq!(codec.decode(&codes).unwrap(), labels);
    }

    #[test]
    fn unknown_codes_and_unseen_labels_fail() {
        let mut codec = FeatureCodec::new();
        assert!(matches!(codec.decode(&[0]), Err(NnError::NotFitted(_))));
        codec.fit_encode(&["a", "b"]).unwrap();
        assert!(matches!(
            codec.decode(&[0, 2]),
            Err(NnError::UnknownLabel { code: 2, known: 2 })
        ));
        assert!(matches!(codec.apply_encode(&["c"]), Err(NnError::UnseenCategory(l)) if l == "c"));
    }

    #[test]
    fn one_hot_marks_exactly_the_code() {
        let codes = [2, 0, 1, 1];
        let rows = FeatureCodec::one_hot(&codes, 3).unwrap();
        for (row, &code) in rows.iter().zip(&codes) {
            assert_eq!(argmax(row), code);
            assert_eq!(row.iter().sum::<f64>(), 1.0);
        }
        assert!(FeatureCodec::one_hot(&[3], 3).is_err());
    }
}

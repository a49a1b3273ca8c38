//! Tabular dataset loading and stratified train/test splitting.

use std::fs::File;
use std::io::Read;

use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::error::{NnError, Result};

/// Numeric feature rows with a parallel vector of raw class labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<String>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of distinct labels.
    pub fn num_classes(&self) -> usize {
        self.rows_by_class().len()
    }

    /// Loads a headed CSV file. See `from_reader`.
    pub fn from_csv_path(
        path: &str,
        label_column: &str,
        id_column: Option<&str>,
    ) -> Result<Dataset> {
        let file = File::open(path)?;
        Dataset::from_reader(file, label_column, id_column)
    }

    /// Parses headed CSV. `label_column` holds the class, `id_column` (when
    /// present in the header) is dropped, every other column is a numeric
    /// feature kept in file order.
    pub fn from_reader<R: Read>(
        reader: R,
        label_column: &str,
        id_column: Option<&str>,
    ) -> Result<Dataset> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let label_idx = headers
            .iter()
            .position(|h| h == label_column)
            .ok_or_else(|| NnError::Data(format!("no '{label_column}' column in header")))?;
        let feature_idx: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|&(i, h)| i != label_idx && Some(h) != id_column)
            .map(|(i, _)| i)
            .collect();
        if feature_idx.is_empty() {
            return Err(NnError::Data("no feature columns left after removing label and id".into()));
        }
        let feature_names = feature_idx.iter().map(|&i| headers[i].to_string()).collect();

        let mut features = Vec::new();
        let mut labels = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let feats = feature_idx
                .iter()
                .map(|&i| {
                    record[i].parse::<f64>().map_err(|_| {
                        NnError::Data(format!(
                            "row {}: '{}' in column '{}' is not a number",
                            row + 1,
                            &record[i],
                            &headers[i]
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            features.push(feats);
            labels.push(record[label_idx].to_string());
        }

        if features.is_empty() {
            return Err(NnError::Data("CSV contains no data rows".into()));
        }
        debug!("loaded {} rows with features {:?}", features.len(), feature_names);
        Ok(Dataset { feature_names, features, labels })
    }

    /// Splits into `(train, test)` keeping class proportions.
    ///
    /// Every class sends `round(count * test_fraction)` rows to the test side,
    /// at least one and never all of them when it has two or more rows.
    /// The same `seed` always yields the same partitions.
    pub fn stratified_split(&self, test_fraction: f64, seed: u64) -> Result<(Dataset, Dataset)> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(NnError::InvalidHyperparameter(format!(
                "test fraction must lie strictly between 0 and 1, got {test_fraction}"
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut train_idx = Vec::new();
        let mut test_idx = Vec::new();

        for (_, mut rows) in self.rows_by_class() {
            rows.shuffle(&mut rng);
            let n = rows.len();
            let n_test = if n < 2 {
                0
            } else {
                ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1)
            };
            test_idx.extend_from_slice(&rows[..n_test]);
            train_idx.extend_from_slice(&rows[n_test..]);
        }

        if train_idx.is_empty() || test_idx.is_empty() {
            return Err(NnError::InvalidHyperparameter(format!(
                "splitting {} rows with test fraction {test_fraction} leaves an empty partition",
                self.len()
            )));
        }

        train_idx.shuffle(&mut rng);
        test_idx.shuffle(&mut rng);
        debug!("stratified split: {} train / {} test", train_idx.len(), test_idx.len());
        Ok((self.subset(&train_idx), self.subset(&test_idx)))
    }

    /// Row indices grouped by label, classes in order of first appearance.
    fn rows_by_class(&self) -> Vec<(&str, Vec<usize>)> {
        let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
        for (i, label) in self.labels.iter().enumerate() {
            match groups.iter_mut().find(|(l, _)| *l == label.as_str()) {
                Some((_, rows)) => rows.push(i),
                None => groups.push((label.as_str(), vec![i])),
            }
        }
        groups
    }

    fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i].clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CSV: &str = "\
Id,SepalLengthCm,SepalWidthCm,PetalLengthCm,PetalWidthCm,Species
1,5.1,3.5,1.4,0.2,Iris-setosa
2,7.0,3.2,4.7,1.4,Iris-versicolor
3,6.3,3.3,6.0,2.5,Iris-virginica
";

    #[test]
    fn drops_id_and_separates_label() {
        let ds = Dataset::from_reader(Cursor::new(CSV), "Species", Some("Id")).unwrap();
        assert_eq!(
            ds.feature_names,
            ["SepalLengthCm", "SepalWidthCm", "PetalLengthCm", "PetalWidthCm"]
        );
        assert_eq!(ds.features[1], vec![7.0, 3.2, 4.7, 1.4]);
        assert_eq!(ds.labels, ["Iris-setosa", "Iris-versicolor", "Iris-virginica"]);
        assert_eq!(ds.num_classes(), 3);
    }

    #[test]
    fn missing_id_column_is_fine() {
        let csv = "a,b,Species\n1,2,x\n3,4,y\n";
        let ds = Dataset::from_reader(Cursor::new(csv), "Species", Some("Id")).unwrap();
        assert_eq!(ds.feature_names, ["a", "b"]);
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn reports_bad_cells_and_missing_label() {
        let bad = "a,Species\nnope,x\n";
        assert!(matches!(
            Dataset::from_reader(Cursor::new(bad), "Species", None),
            Err(NnError::Data(msg)) if msg.contains("row 1")
        ));
        assert!(matches!(
            Dataset::from_reader(Cursor::new("a,b\n1,2\n"), "Species", None),
            Err(NnError::Data(_))
        ));
        assert!(matches!(
            Dataset::from_reader(Cursor::new("a,Species\n"), "Species", None),
            Err(NnError::Data(_))
        ));
    }

    fn balanced(per_class: usize) -> Dataset {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for class in ["a", "b", "c"] {
            for i in 0..per_class {
                features.push(vec![i as f64]);
                labels.push(class.to_string());
            }
        }
        Dataset { feature_names: vec!["x".into()], features, labels }
    }

    #[test]
    fn split_preserves_class_proportions() {
        let ds = balanced(50);
        let (train, test) = ds.stratified_split(0.2, 42).unwrap();
        assert_eq!((train.len(), test.len()), (120, 30));
        assert_eq!((train.num_classes(), test.num_classes()), (3, 3));
        for class in ["a", "b", "c"] {
            assert_eq!(test.labels.iter().filter(|l| *l == class).count(), 10);
            assert_eq!(train.labels.iter().filter(|l| *l == class).count(), 40);
        }
    }

    #[test]
    fn split_is_deterministic_per_seed() {
        let ds = balanced(20);
        let first = ds.stratified_split(0.25, 7).unwrap();
        assert_eq!(first, ds.stratified_split(0.25, 7).unwrap());
        assert_ne!(first.1, ds.stratified_split(0.25, 8).unwrap().1);
    }

    #[test]
    fn split_rejects_bad_fraction() {
        let ds = balanced(4);
        for f in [0.0, 1.0, -0.5, 1.5] {
            assert!(ds.stratified_split(f, 0).is_err());
        }
    }
}

use smallvec::SmallVec;

/// Per-cell accumulator of candidate codeword values
///
/// Each cell of the barcode matrix collects every value detected for it
/// across the image rows that map to the cell. Resolving the cell yields the
/// most frequent candidates: an empty result is an erasure, a single result
/// is a confident read, and multiple results mark the cell as ambiguous for
/// the backtracking search.
#[derive(Debug, Clone, Default)]
pub struct BarcodeValue {
    votes: SmallVec<[(u16, u32); 2]>,
}

impl BarcodeValue {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `value`
    pub fn set_value(&mut self, value: u16) {
        for vote in self.votes.iter_mut() {
            if vote.0 == value {
                vote.1 += 1;
                return;
            }
        }
        self.votes.push((value, 1));
    }

    /// The most frequent candidate values, ascending
    pub fn value(&self) -> SmallVec<[u16; 2]> {
        let max_count = self.votes.iter().map(|&(_, count)| count).max().unwrap_or(0);
        let mut result: SmallVec<[u16; 2]> = self
            .votes
            .iter()
            .filter(|&&(_, count)| count == max_count)
            .map(|&(value, _)| value)
            .collect();
        result.sort_unstable();
        result
    }

    /// How often `value` was recorded
    pub fn confidence(&self, value: u16) -> u32 {
        self.votes
            .iter()
            .find(|&&(v, _)| v == value)
            .map(|&(_, count)| count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell_is_erasure() {
        let cell = BarcodeValue::new();
        assert!(cell.value().is_empty());
        assert_eq!(cell.confidence(3), 0);
    }

    #[test]
    fn test_majority_wins() {
        let mut cell = BarcodeValue::new();
        cell.set_value(10);
        cell.set_value(7);
        cell.set_value(10);
        assert_eq!(cell.value().as_slice(), &[10]);
        assert_eq!(cell.confidence(10), 2);
        assert_eq!(cell.confidence(7), 1);
    }

    #[test]
    fn test_tie_reports_all_candidates() {
        let mut cell = BarcodeValue::new();
        cell.set_value(42);
        cell.set_value(7);
        assert_eq!(cell.value().as_slice(), &[7, 42]);
    }
}

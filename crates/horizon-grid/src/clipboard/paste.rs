use crate::clipboard::PasteError;
use crate::options::RaggedPaste;

/// Identifies one paste gesture.
///
/// Tickets are handed out in increasing order; only the newest one may
/// finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PasteTicket(pub(crate) u64);

impl PasteTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Parsed paste payload: rows of cell texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteData {
    rows: Vec<Vec<String>>,
}

impl PasteData {
    /// Check the payload shape against `policy`.
    ///
    /// Fails with [`PasteError::Empty`] when there is no cell at all, and
    /// with [`PasteError::IrregularShape`] for ragged rows under
    /// [`RaggedPaste::Reject`].
    pub fn new(rows: Vec<Vec<String>>, policy: RaggedPaste) -> Result<Self, PasteError> {
        if rows.iter().all(Vec::is_empty) {
            return Err(PasteError::Empty);
        }
        if policy == RaggedPaste::Reject {
            let expected = rows[0].len();
            if let Some((row, cells)) = rows
                .iter()
                .enumerate()
                .find(|(_, cells)| cells.len() != expected)
            {
                return Err(PasteError::IrregularShape {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }
        Ok(Self { rows })
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_single_row(&self) -> bool {
        self.rows.len() == 1
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Replace the texts of one payload column with `transform` applied to
    /// all of them at once.
    ///
    /// Rows too short to have the column are skipped. If the transform
    /// returns fewer values, the remaining cells keep their text.
    pub fn map_column<F>(&mut self, col: usize, transform: F)
    where
        F: FnOnce(Vec<String>) -> Vec<String>,
    {
        let targets: Vec<usize> = (0..self.rows.len())
            .filter(|&row| col < self.rows[row].len())
            .collect();
        let values = targets
            .iter()
            .map(|&row| std::mem::take(&mut self.rows[row][col]))
            .collect::<Vec<_>>();
        let originals = values.clone();
        let mut transformed = transform(values).into_iter();
        for (&row, original) in targets.iter().zip(originals) {
            self.rows[row][col] = transformed.next().unwrap_or(original);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(
            PasteData::new(vec![], RaggedPaste::Tolerate),
            Err(PasteError::Empty)
        );
        assert_eq!(
            PasteData::new(vec![vec![]], RaggedPaste::Tolerate),
            Err(PasteError::Empty)
        );
    }

    #[test]
    fn test_ragged_policy() {
        let ragged = rows(&[&["a", "b"], &["c"]]);
        let data = PasteData::new(ragged.clone(), RaggedPaste::Tolerate).unwrap();
        assert_eq!(data.width(), 2);
        assert_eq!(data.cell(1, 1), None);
        assert_eq!(
            PasteData::new(ragged, RaggedPaste::Reject),
            Err(PasteError::IrregularShape {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_map_column_sees_whole_column() {
        let mut data =
            PasteData::new(rows(&[&["a", "1"], &["b"], &["c", "3"]]), RaggedPaste::Tolerate)
                .unwrap();
        data.map_column(1, |values| {
            assert_eq!(values, vec!["1".to_string(), "3".to_string()]);
            values.into_iter().map(|v| format!("#{v}")).collect()
        });
        assert_eq!(data.cell(0, 1), Some("#1"));
        assert_eq!(data.cell(2, 1), Some("#3"));
        assert_eq!(data.cell(0, 0), Some("a"));
    }

    #[test]
    fn test_map_column_short_result_keeps_text() {
        let mut data = PasteData::new(rows(&[&["a"], &["b"]]), RaggedPaste::Tolerate).unwrap();
        data.map_column(0, |_| vec!["z".to_string()]);
        assert_eq!(data.cell(0, 0), Some("z"));
        assert_eq!(data.cell(1, 0), Some("b"));
    }
}

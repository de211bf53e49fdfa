use derive_new::new;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { value: T },
    Insert { value: T },
    Equal { value: T },
}

impl<T> Edit<T>
where
    T: Clone + Into<String>,
{
    pub fn as_string(&self) -> String {
        match self {
            Edit::Delete { value } => format!("-{}", value.clone().into()),
            Edit::Insert { value } => format!("+{}", value.clone().into()),
            Edit::Equal { value } => format!(" {}", value.clone().into()),
        }
    }
}

impl<T> Display for Edit<T>
where
    T: Clone + Into<String>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// Longest-common-subsequence diff between two sequences.
///
/// The full `(m+1) x (n+1)` length table is computed, then walked back from
/// the corner. On a tie between directions the insertion side wins, which
/// pins down one canonical edit script: deletions come out before the
/// insertions that replace them.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct LcsDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<T: Eq + Clone> LcsDiff<'_, T> {
    fn lcs_table(&self) -> Vec<Vec<usize>> {
        let (m, n) = (self.a.len(), self.b.len());
        let mut table = vec![vec![0; n + 1]; m + 1];

        for i in 1..=m {
            for j in 1..=n {
                table[i][j] = if self.a[i - 1] == self.b[j - 1] {
                    table[i - 1][j - 1] + 1
                } else {
                    table[i][j - 1].max(table[i - 1][j])
                };
            }
        }

        table
    }

    pub fn diff(&self) -> Vec<Edit<T>> {
        let table = self.lcs_table();
        let (mut i, mut j) = (self.a.len(), self.b.len());
        let mut edits = Vec::new();

        while i > 0 || j > 0 {
            if i > 0 && j > 0 && self.a[i - 1] == self.b[j - 1] {
                edits.push(Edit::Equal {
                    value: self.a[i - 1].clone(),
                });
                i -= 1;
                j -= 1;
            } else if j > 0 && (i == 0 || table[i][j - 1] >= table[i - 1][j]) {
                edits.push(Edit::Insert {
                    value: self.b[j - 1].clone(),
                });
                j -= 1;
            } else {
                edits.push(Edit::Delete {
                    value: self.a[i - 1].clone(),
                });
                i -= 1;
            }
        }

        edits.reverse();
        edits
    }

    pub fn format_diff(&self) -> String
    where
        T: Into<String>,
    {
        self.diff()
            .iter()
            .map(|edit| edit.as_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

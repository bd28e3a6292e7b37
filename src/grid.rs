//! Grid of permutations searched over by the optimizer
//!
//! A [`Configuration`] has one row per category of its [`Schema`] and one
//! column per slot. Every row is a permutation of the category's values.

use std::{fmt, sync::Arc};

use rand::seq::SliceRandom;

use crate::error::SearchError;

/// A named category and its fixed list of values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    name: String,
    values: Vec<String>,
}

impl Category {
    /// name of the category, e.g. `"drink"`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// values of the category in schema order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// index of `value` in the category
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }
}

/// Immutable description of the rows of a configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schema {
    categories: Vec<Category>,
    n_cols: usize,
}

impl Schema {
    /// Build a schema from `(name, values)` pairs.
    ///
    /// Every category must be non-empty, free of duplicates and have the same
    /// number of values. Category names must be unique.
    pub fn new<I, N, V, S>(categories: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories = categories
            .into_iter()
            .map(|(name, values)| Category {
                name: name.into(),
                values: values.into_iter().map(Into::into).collect(),
            })
            .collect::<Vec<_>>();

        let Some(first) = categories.first() else {
            return Err(SearchError::InvalidSchema(
                "schema needs at least one category".to_string(),
            ));
        };
        let n_cols = first.values.len();
        if n_cols == 0 {
            return Err(SearchError::InvalidSchema(format!(
                "category {:?} has no values",
                first.name
            )));
        }

        for (i, category) in categories.iter().enumerate() {
            if categories[..i].iter().any(|c| c.name == category.name) {
                return Err(SearchError::InvalidSchema(format!(
                    "duplicate category {:?}",
                    category.name
                )));
            }
            if category.values.len() != n_cols {
                return Err(SearchError::InvalidSchema(format!(
                    "category {:?} has {} values, expected {}",
                    category.name,
                    category.values.len(),
                    n_cols
                )));
            }
            for (j, value) in category.values.iter().enumerate() {
                if category.values[..j].contains(value) {
                    return Err(SearchError::InvalidSchema(format!(
                        "duplicate value {:?} in category {:?}",
                        value, category.name
                    )));
                }
            }
        }

        Ok(Self { categories, n_cols })
    }

    /// number of categories (rows)
    pub fn n_rows(&self) -> usize {
        self.categories.len()
    }

    /// number of slots (columns)
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// all categories in row order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// row index of the category called `name`
    pub fn row_index(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    /// Resolve a `(category, value)` pair into `(row, value index)`.
    pub fn resolve(&self, category: &str, value: &str) -> Result<(usize, usize), SearchError> {
        self.row_index(category)
            .and_then(|row| self.categories[row].index_of(value).map(|v| (row, v)))
            .ok_or_else(|| SearchError::UnknownValue {
                category: category.to_string(),
                value: value.to_string(),
            })
    }
}

/// Assignment of category values to slots
///
/// Cells store value indices into the schema's category lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Configuration {
    schema: Arc<Schema>,
    rows: Vec<Vec<usize>>,
}

impl Configuration {
    /// Every row in schema order.
    pub fn identity(schema: Arc<Schema>) -> Self {
        let rows = (0..schema.n_rows())
            .map(|_| (0..schema.n_cols()).collect())
            .collect();
        Self { schema, rows }
    }

    /// Every row independently shuffled.
    pub fn random<R: rand::Rng + ?Sized>(schema: Arc<Schema>, rng: &mut R) -> Self {
        let mut configuration = Self::identity(schema);
        for row in configuration.rows.iter_mut() {
            row.shuffle(rng);
        }
        configuration
    }

    /// Build a configuration from value names, one list per category in
    /// schema order. The result is validated.
    pub fn from_rows<I, R, S>(schema: Arc<Schema>, rows: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut indices = Vec::with_capacity(schema.n_rows());
        for (i, row) in rows.into_iter().enumerate() {
            let category = schema.categories.get(i).ok_or_else(|| {
                SearchError::InvalidConfiguration {
                    row: i,
                    reason: format!("schema only has {} rows", schema.n_rows()),
                }
            })?;
            let row = row
                .into_iter()
                .map(|value| {
                    let value = value.as_ref();
                    category
                        .index_of(value)
                        .ok_or_else(|| SearchError::InvalidConfiguration {
                            row: i,
                            reason: format!(
                                "{value:?} is not a value of category {:?}",
                                category.name
                            ),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            indices.push(row);
        }

        let configuration = Self::from_indices(schema, indices);
        configuration.validate()?;
        Ok(configuration)
    }

    /// Build a configuration from raw value indices.
    ///
    /// The rows are not checked; call [`Configuration::validate`] or let the
    /// optimizer reject it.
    pub fn from_indices(schema: Arc<Schema>, rows: Vec<Vec<usize>>) -> Self {
        Self { schema, rows }
    }

    /// Check that every row is a permutation of its category.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.rows.len() != self.schema.n_rows() {
            return Err(SearchError::InvalidConfiguration {
                row: self.rows.len().min(self.schema.n_rows()),
                reason: format!(
                    "expected {} rows, found {}",
                    self.schema.n_rows(),
                    self.rows.len()
                ),
            });
        }

        let n_cols = self.schema.n_cols();
        let mut seen = vec![false; n_cols];
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(SearchError::InvalidConfiguration {
                    row: i,
                    reason: format!("expected {} columns, found {}", n_cols, row.len()),
                });
            }
            seen.fill(false);
            for &v in row {
                if v >= n_cols {
                    return Err(SearchError::InvalidConfiguration {
                        row: i,
                        reason: format!("value index {v} is out of range"),
                    });
                }
                if seen[v] {
                    return Err(SearchError::InvalidConfiguration {
                        row: i,
                        reason: format!(
                            "value {:?} appears more than once",
                            self.schema.categories[i].values[v]
                        ),
                    });
                }
                seen[v] = true;
            }
        }
        Ok(())
    }

    /// schema shared by this configuration
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// number of rows
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// number of columns
    pub fn n_cols(&self) -> usize {
        self.schema.n_cols()
    }

    /// value indices of the row named `name`
    pub fn row(&self, name: &str) -> Option<&[usize]> {
        self.schema.row_index(name).map(|i| self.rows[i].as_slice())
    }

    /// value indices of row `row`
    ///
    /// # Panics
    /// Panics if `row >= self.n_rows()`.
    pub fn row_at(&self, row: usize) -> &[usize] {
        &self.rows[row]
    }

    /// Mutable access to a row.
    ///
    /// Callers are responsible for leaving the row a permutation; prefer
    /// [`Configuration::shuffle_row`] and [`Configuration::swap`].
    ///
    /// # Panics
    /// Panics if `row >= self.n_rows()`.
    pub fn row_mut(&mut self, row: usize) -> &mut [usize] {
        &mut self.rows[row]
    }

    /// Shuffle one row uniformly at random.
    ///
    /// # Panics
    /// Panics if `row >= self.n_rows()`.
    pub fn shuffle_row<R: rand::Rng + ?Sized>(&mut self, row: usize, rng: &mut R) {
        self.rows[row].shuffle(rng);
    }

    /// Swap the cells at columns `a` and `b` of row `row`.
    ///
    /// # Panics
    /// Panics if `row` or either column is out of range.
    pub fn swap(&mut self, row: usize, a: usize, b: usize) {
        self.rows[row].swap(a, b);
    }

    /// value name at `(row, col)`
    ///
    /// # Panics
    /// Panics if `row` or `col` is out of range; see [`Configuration::column_of`]
    /// for a checked lookup by name.
    pub fn value(&self, row: usize, col: usize) -> &str {
        &self.schema.categories[row].values[self.rows[row][col]]
    }

    /// value names of column `col`, one per row
    ///
    /// # Panics
    /// Panics if `col >= self.n_cols()`.
    pub fn column(&self, col: usize) -> Vec<&str> {
        (0..self.rows.len()).map(|row| self.value(row, col)).collect()
    }

    /// column holding value index `value` in row `row`
    ///
    /// # Panics
    /// Panics if `row >= self.n_rows()`.
    pub fn position(&self, row: usize, value: usize) -> Option<usize> {
        self.rows[row].iter().position(|&v| v == value)
    }

    /// column holding `value` of `category`
    pub fn column_of(&self, category: &str, value: &str) -> Option<usize> {
        let (row, value) = self.schema.resolve(category, value).ok()?;
        self.position(row, value)
    }

    /// boolean row that is true where `value` sits in `row`
    ///
    /// # Panics
    /// Panics if `row >= self.n_rows()`.
    pub fn mask(&self, row: usize, value: usize) -> Vec<bool> {
        self.rows[row].iter().map(|&v| v == value).collect()
    }

    /// value names, one list per row
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        (0..self.rows.len())
            .map(|row| {
                (0..self.n_cols())
                    .map(|col| self.value(row, col).to_string())
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .schema
            .categories
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0);
        let cell_width = self
            .schema
            .categories
            .iter()
            .flat_map(|c| c.values.iter().map(String::len))
            .max()
            .unwrap_or(0);

        for (row, category) in self.schema.categories.iter().enumerate() {
            write!(f, "{:<name_width$} |", category.name)?;
            for col in 0..self.n_cols() {
                write!(f, " {:<cell_width$}", self.value(row, col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new([
                ("letter", vec!["A", "B", "C"]),
                ("symbol", vec!["X", "Y", "Z"]),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_schema_rejects_ragged_categories() {
        let err = Schema::new([("a", vec!["1", "2"]), ("b", vec!["1"])]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidSchema(_)));
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        assert!(Schema::new([("a", vec!["1", "1"])]).is_err());
        assert!(Schema::new([("a", vec!["1"]), ("a", vec!["2"])]).is_err());
        assert!(Schema::new(Vec::<(&str, Vec<&str>)>::new()).is_err());
    }

    #[test]
    fn test_from_rows_and_queries() {
        let cfg = Configuration::from_rows(schema(), [["A", "B", "C"], ["Z", "Y", "X"]]).unwrap();
        assert_eq!(cfg.n_rows(), 2);
        assert_eq!(cfg.n_cols(), 3);
        assert_eq!(cfg.row("symbol"), Some(&[2, 1, 0][..]));
        assert_eq!(cfg.row("missing"), None);
        assert_eq!(cfg.column(0), vec!["A", "Z"]);
        assert_eq!(cfg.column_of("symbol", "X"), Some(2));
        assert_eq!(cfg.mask(1, 1), vec![false, true, false]);
        assert_eq!(
            cfg.to_rows(),
            vec![vec!["A", "B", "C"], vec!["Z", "Y", "X"]]
        );
    }

    #[test]
    fn test_from_rows_rejects_duplicate_value() {
        let err =
            Configuration::from_rows(schema(), [["A", "A", "C"], ["X", "Y", "Z"]]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfiguration { row: 0, .. }));
    }

    #[test]
    fn test_from_rows_rejects_unknown_value() {
        let err =
            Configuration::from_rows(schema(), [["A", "B", "C"], ["X", "Y", "Q"]]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfiguration { row: 1, .. }));
    }

    #[test]
    fn test_validate_indices() {
        let schema = schema();
        let ok = Configuration::from_indices(schema.clone(), vec![vec![2, 0, 1], vec![0, 1, 2]]);
        assert!(ok.validate().is_ok());

        let missing = Configuration::from_indices(schema.clone(), vec![vec![0, 1, 2]]);
        assert!(missing.validate().is_err());

        let short = Configuration::from_indices(schema.clone(), vec![vec![0, 1], vec![0, 1, 2]]);
        assert!(short.validate().is_err());

        let out_of_range = Configuration::from_indices(schema, vec![vec![0, 1, 3], vec![0, 1, 2]]);
        assert!(out_of_range.validate().is_err());
    }

    #[test]
    #[should_panic]
    fn test_row_at_out_of_range_panics() {
        let cfg = Configuration::identity(schema());
        cfg.row_at(2);
    }

    #[test]
    #[should_panic]
    fn test_column_out_of_range_panics() {
        let cfg = Configuration::identity(schema());
        cfg.column(3);
    }

    #[test]
    fn test_display() {
        let cfg = Configuration::identity(schema());
        let text = cfg.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("letter | A B C"));
    }
}

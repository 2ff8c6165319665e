use std::collections::HashSet;
use std::path::Path;

use interview_core::model::{Category, Difficulty, Question, QuestionId};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::CatalogError;
use crate::record::QuestionRecord;

const BUILTIN_JSON: &str = include_str!("../data/questions.json");

/// Read-only, ordered collection of authored questions.
///
/// Every question was validated on the way in and ids are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Builds a catalog, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(CatalogError::DuplicateId(question.id().clone()));
            }
        }
        Ok(Self { questions })
    }

    /// The question bank shipped with the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded bank is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_JSON)
    }

    /// Parses a JSON array of question records.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Json` for malformed input,
    /// `CatalogError::InvalidQuestion` for records that break authoring rules,
    /// and `CatalogError::DuplicateId` for repeated ids.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<QuestionRecord> = serde_json::from_str(json)?;
        let questions = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .into_question()
                    .map_err(|source| CatalogError::InvalidQuestion { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    /// Reads and parses a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, otherwise the
    /// errors of [`QuestionCatalog::from_json_str`].
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            questions = catalog.len(),
            "loaded question catalog"
        );
        Ok(catalog)
    }

    #[must_use]
    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Questions of one category, in catalog order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.category() == category)
    }

    /// Questions of one difficulty, in catalog order.
    pub fn by_difficulty(&self, difficulty: Difficulty) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(move |q| q.difficulty() == difficulty)
    }

    /// The first `n` questions whose category is in `categories`, in
    /// catalog order. Fewer matches yield a shorter list.
    #[must_use]
    pub fn first_matching(&self, categories: &[Category], n: usize) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| categories.contains(&q.category()))
            .take(n)
            .cloned()
            .collect()
    }

    /// Distinct categories present, in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for question in &self.questions {
            if !seen.contains(&question.category()) {
                seen.push(question.category());
            }
        }
        seen
    }

    /// Up to `n` questions drawn uniformly without replacement.
    ///
    /// Asking for at least the catalog size returns the whole catalog, shuffled.
    pub fn random_sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<Question> {
        sample_without_replacement(self.questions.clone(), n, rng)
    }
}

/// Shuffles `pool` and keeps the first `n` items.
pub fn sample_without_replacement<T, R: Rng + ?Sized>(
    mut pool: Vec<T>,
    n: usize,
    rng: &mut R,
) -> Vec<T> {
    pool.as_mut_slice().shuffle(rng);
    pool.truncate(n);
    pool
}

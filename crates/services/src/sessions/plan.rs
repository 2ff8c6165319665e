use rand::Rng;

use catalog::QuestionCatalog;
use catalog::catalog::sample_without_replacement;
use interview_core::model::{Category, Difficulty, Question};

/// How the questions of a plan were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// First matches of a category filter, in catalog order.
    Filtered,
    /// Uniform random sample without replacement.
    Random,
}

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub questions: Vec<Question>,
    pub selection: Selection,
}

impl SessionPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Picks the questions for a new session from a catalog.
pub struct SessionBuilder<'a> {
    catalog: &'a QuestionCatalog,
    categories: &'a [Category],
    difficulty: Option<Difficulty>,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(catalog: &'a QuestionCatalog) -> Self {
        Self {
            catalog,
            categories: &[],
            difficulty: None,
        }
    }

    /// Restrict to these categories. An empty slice means "any category,
    /// sampled at random".
    #[must_use]
    pub fn with_categories(mut self, categories: &'a [Category]) -> Self {
        self.categories = categories;
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Build a plan of at most `count` questions.
    ///
    /// - With categories: the first `count` matching questions in catalog
    ///   order. Fewer matches means a shorter plan.
    /// - Without: `count` questions sampled from the catalog, capped at its size.
    ///
    /// A difficulty, when set, narrows the pool in both cases.
    pub fn build<R: Rng + ?Sized>(self, count: usize, rng: &mut R) -> SessionPlan {
        let categories = self.categories;

        if categories.is_empty() {
            let questions = match self.difficulty {
                None => self.catalog.random_sample(count, rng),
                Some(d) => {
                    let pool: Vec<Question> = self.catalog.by_difficulty(d).cloned().collect();
                    sample_without_replacement(pool, count, rng)
                }
            };
            return SessionPlan {
                questions,
                selection: Selection::Random,
            };
        }

        let questions = match self.difficulty {
            None => self.catalog.first_matching(categories, count),
            Some(d) => self
                .catalog
                .by_difficulty(d)
                .filter(|q| categories.contains(&q.category()))
                .take(count)
                .cloned()
                .collect(),
        };
        SessionPlan {
            questions,
            selection: Selection::Filtered,
        }
    }
}

use crate::error::MatchError;
use crate::options::MatchOptions;

/// Per-sentence work limit shared by both passes.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    max_depth: usize,
    max_steps: usize,
    steps: usize,
}

impl SearchBudget {
    pub fn new(max_depth: usize, max_steps: usize) -> Self {
        Self {
            max_depth,
            max_steps,
            steps: 0,
        }
    }

    pub fn from_options(options: &MatchOptions) -> Self {
        Self::new(options.max_depth, options.max_steps)
    }

    /// Counts one extension step.
    pub fn step(&mut self) -> Result<(), MatchError> {
        self.steps += 1;
        if self.steps > self.max_steps {
            return Err(MatchError::StepBudgetExceeded { limit: self.max_steps });
        }
        Ok(())
    }

    pub fn enter(&self, depth: usize) -> Result<(), MatchError> {
        if depth > self.max_depth {
            return Err(MatchError::DepthExceeded { limit: self.max_depth });
        }
        Ok(())
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceilings() {
        let mut budget = SearchBudget::new(2, 3);
        for _ in 0..3 {
            budget.step().unwrap();
        }
        assert_eq!(budget.step(), Err(MatchError::StepBudgetExceeded { limit: 3 }));
        assert!(budget.enter(2).is_ok());
        assert_eq!(budget.enter(3), Err(MatchError::DepthExceeded { limit: 2 }));
    }
}

use super::error::EngineError;
use std::ops::Range;

/// Upper bound on the test set when no explicit test size is configured.
pub const MAX_DEFAULT_TEST_SIZE: usize = 1500;

/// Index ranges of a training prefix and a test suffix. The two never overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSplit {
    pub training: Range<usize>,
    pub test: Range<usize>,
}

impl DataSplit {
    /// Training uses the first `training_size` entries, test the last `test_size` entries.
    /// Without an explicit test size, all remaining entries are used, capped at
    /// [`MAX_DEFAULT_TEST_SIZE`].
    pub fn new(
        available: usize,
        training_size: usize,
        test_size: Option<usize>,
    ) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidSplit {
            training_size,
            test_size,
            available,
        };

        if training_size == 0 || training_size >= available {
            return Err(invalid());
        }
        let remaining = available - training_size;
        let test_size = match test_size {
            Some(0) => return Err(invalid()),
            Some(size) if size > remaining => return Err(invalid()),
            Some(size) => size,
            None => remaining.min(MAX_DEFAULT_TEST_SIZE),
        };

        Ok(Self {
            training: 0..training_size,
            test: (available - test_size)..available,
        })
    }

    pub fn training_size(&self) -> usize {
        self.training.len()
    }

    pub fn test_size(&self) -> usize {
        self.test.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_test_set_is_the_remaining_suffix() {
        let split = DataSplit::new(20, 15, None).unwrap();
        assert_eq!(split.training, 0..15);
        assert_eq!(split.test, 15..20);
    }

    #[test]
    fn default_test_set_is_capped() {
        let split = DataSplit::new(7000, 1000, None).unwrap();
        assert_eq!(split.test_size(), MAX_DEFAULT_TEST_SIZE);
        assert_eq!(split.test, 5500..7000);
    }

    #[test]
    fn explicit_test_set_is_taken_from_the_end() {
        let split = DataSplit::new(100, 50, Some(10)).unwrap();
        assert_eq!(split.training_size(), 50);
        assert_eq!(split.test, 90..100);
    }

    #[test]
    fn invalid_sizes_are_rejected() {
        for (available, training, test) in [
            (10, 0, None),
            (10, 10, None),
            (10, 12, None),
            (10, 8, Some(3)),
            (10, 5, Some(0)),
        ] {
            assert!(
                matches!(
                    DataSplit::new(available, training, test),
                    Err(EngineError::InvalidSplit { .. })
                ),
                "({available}, {training}, {test:?}) should be rejected"
            );
        }
    }
}

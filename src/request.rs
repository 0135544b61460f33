use std::num::NonZeroUsize;

use crate::error::FactorialError;

/// Validated input of a single factorial computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FactorialRequest {
    n: u64,
    chunk_size: Option<u64>,
}

impl FactorialRequest {
    pub fn new(n: i64, chunk_size: Option<i64>) -> Result<Self, FactorialError> {
        let n = check_n(n)?;
        let chunk_size = chunk_size.map(check_chunk_size).transpose()?;
        Ok(Self { n, chunk_size })
    }

    pub fn from_unsigned(n: u64, chunk_size: Option<u64>) -> Result<Self, FactorialError> {
        if chunk_size == Some(0) {
            return Err(FactorialError::invalid("chunk_size", 0));
        }
        Ok(Self { n, chunk_size })
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn chunk_size(&self) -> Option<u64> {
        self.chunk_size
    }

    pub fn chunk_size_or(&self, config: &ParallelConfig) -> u64 {
        self.chunk_size.unwrap_or(config.default_chunk_size)
    }
}

pub(crate) fn check_n(n: i64) -> Result<u64, FactorialError> {
    u64::try_from(n).map_err(|_| FactorialError::invalid("n", n))
}

pub(crate) fn check_chunk_size(chunk_size: i64) -> Result<u64, FactorialError> {
    if chunk_size < 1 {
        return Err(FactorialError::invalid("chunk_size", chunk_size));
    }
    Ok(chunk_size as u64)
}

/// Knobs of the partition-parallel strategies.
///
/// The worker count bounds how many chunks are in flight at once and is
/// independent of how many chunks the partition produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelConfig {
    pub workers: usize,
    pub default_chunk_size: u64,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(4),
            default_chunk_size: 16,
        }
    }
}

impl ParallelConfig {
    pub(crate) fn checked_workers(&self) -> Result<usize, FactorialError> {
        match self.workers {
            0 => Err(FactorialError::invalid("workers", 0)),
            workers => Ok(workers),
        }
    }

    pub fn with_workers(mut self, workers: i64) -> Result<Self, FactorialError> {
        if workers < 1 {
            return Err(FactorialError::invalid("workers", workers));
        }
        self.workers = workers as usize;
        Ok(self)
    }

    pub fn with_default_chunk_size(mut self, chunk_size: i64) -> Result<Self, FactorialError> {
        self.default_chunk_size = check_chunk_size(chunk_size)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validation() {
        assert_eq!(
            FactorialRequest::new(5, Some(2)),
            Ok(FactorialRequest {
                n: 5,
                chunk_size: Some(2)
            })
        );
        assert_eq!(
            FactorialRequest::new(-1, None),
            Err(FactorialError::invalid("n", -1))
        );
        assert_eq!(
            FactorialRequest::new(3, Some(0)),
            Err(FactorialError::invalid("chunk_size", 0))
        );
    }

    #[test]
    fn test_unsigned_request_validation() {
        let request = FactorialRequest::from_unsigned(u64::MAX, Some(u64::MAX)).unwrap();
        assert_eq!(request.n(), u64::MAX);
        assert_eq!(request.chunk_size(), Some(u64::MAX));
        assert_eq!(
            FactorialRequest::from_unsigned(5, Some(0)),
            Err(FactorialError::invalid("chunk_size", 0))
        );
        assert_eq!(FactorialRequest::from_unsigned(0, None).unwrap().chunk_size(), None);
    }

    #[test]
    fn test_default_chunk_size_fallback() {
        let config = ParallelConfig::default().with_default_chunk_size(4).unwrap();
        let request = FactorialRequest::new(10, None).unwrap();
        assert_eq!(request.chunk_size_or(&config), 4);
        let request = FactorialRequest::new(10, Some(3)).unwrap();
        assert_eq!(request.chunk_size_or(&config), 3);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(ParallelConfig::default()
            .with_workers(0)
            .unwrap_err()
            .is_invalid_argument());
        assert_eq!(ParallelConfig::default().with_workers(3).unwrap().workers, 3);
        assert!(ParallelConfig::default().workers >= 1);
    }
}

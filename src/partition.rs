use std::ops::RangeInclusive;

use num_bigint::BigUint;

use crate::error::FactorialError;

/// Ordered, disjoint, contiguous chunks covering `[1, n]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    n: u64,
    chunk_size: u64,
    chunks: Vec<RangeInclusive<u64>>,
}

pub fn partition(n: u64, chunk_size: u64) -> Result<Partition, FactorialError> {
    if chunk_size == 0 {
        return Err(FactorialError::invalid("chunk_size", 0));
    }
    let mut chunks = Vec::with_capacity(n.div_ceil(chunk_size) as usize);
    let mut start = 1;
    while start <= n {
        let end = start.saturating_add(chunk_size - 1).min(n);
        chunks.push(start..=end);
        let Some(next) = end.checked_add(1) else {
            break;
        };
        start = next;
    }
    Ok(Partition {
        n,
        chunk_size,
        chunks,
    })
}

impl Partition {
    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn chunks(&self) -> &[RangeInclusive<u64>] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn into_chunks(self) -> Vec<RangeInclusive<u64>> {
        self.chunks
    }
}

pub fn chunk_product(chunk: RangeInclusive<u64>) -> BigUint {
    chunk.fold(BigUint::from(1u32), |acc, i| acc * i)
}

/// Multiplies chunk products in partition order.
pub fn combine(products: impl IntoIterator<Item = BigUint>) -> BigUint {
    products
        .into_iter()
        .fold(BigUint::from(1u32), |acc, product| acc * product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequential::iterative_unchecked;

    #[test]
    fn test_partition_shape() {
        let partition = partition(10, 3).unwrap();
        assert_eq!(partition.chunks(), &[1..=3, 4..=6, 7..=9, 10..=10]);
        assert_eq!(partition.len(), 4);
    }

    #[test]
    fn test_partition_of_zero_is_empty() {
        assert!(partition(0, 4).unwrap().is_empty());
    }

    #[test]
    fn test_chunk_larger_than_range() {
        assert_eq!(partition(3, 8).unwrap().chunks(), &[1..=3]);
    }

    #[test]
    fn test_partition_covers_range_exactly_once() {
        for n in [1, 7, 20, 33] {
            for chunk_size in [1, 2, 5, n, n + 5] {
                let partition = partition(n, chunk_size).unwrap();
                let covered: Vec<u64> = partition.chunks().iter().cloned().flatten().collect();
                assert_eq!(covered, (1..=n).collect::<Vec<_>>());
                let (last, rest) = partition.chunks().split_last().unwrap();
                assert!(rest.iter().all(|chunk| chunk.clone().count() as u64 == chunk_size));
                assert!(last.clone().count() as u64 <= chunk_size);
            }
        }
    }

    #[test]
    fn test_combined_products_equal_factorial() {
        let partition = partition(20, 6).unwrap();
        let products = partition.into_chunks().into_iter().map(chunk_product);
        assert_eq!(combine(products), iterative_unchecked(20));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(partition(5, 0).unwrap_err().is_invalid_argument());
    }
}

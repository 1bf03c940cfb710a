//! Parallel processing of independent images.
//!
//! Each image is processed on the rayon thread pool. Results keep the input
//! order and a failure on one image never affects the others.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};

/// Per-image outcomes of a batch run, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport<T> {
    results: Vec<Result<T>>,
}

impl<T> BatchReport<T> {
    /// All results in input order.
    pub fn results(&self) -> &[Result<T>] {
        &self.results
    }

    pub fn into_results(self) -> Vec<Result<T>> {
        self.results
    }

    /// Successful outputs with their input index.
    pub fn successes(&self) -> impl Iterator<Item = (usize, &T)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(index, result)| result.as_ref().ok().map(|value| (index, value)))
    }

    /// Errors with their input index.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &EngineError)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(index, result)| result.as_ref().err().map(|error| (index, error)))
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|result| result.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|result| result.is_ok())
    }
}

/// Run `op` on every item in parallel.
///
/// # Arguments
/// * `items` - Independent inputs, typically pixel buffers
/// * `op` - Operation applied to each item
///
/// # Returns
/// A [`BatchReport`] with one result per item, in input order.
///
/// # Example
/// ```
/// use trimframe_core::batch::process_batch;
/// use trimframe_core::{smart_crop, CropOptions, PixelBuffer};
///
/// let images = vec![PixelBuffer::rgb(2, 2, vec![0; 12]).unwrap()];
/// let options = CropOptions::new();
/// let report = process_batch(&images, |image| smart_crop(image, &options));
/// assert_eq!(report.success_count(), 1);
/// ```
pub fn process_batch<I, T, F>(items: &[I], op: F) -> BatchReport<T>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> Result<T> + Sync + Send,
{
    let results: Vec<Result<T>> = items.par_iter().map(&op).collect();

    let report = BatchReport { results };
    for (index, error) in report.failures() {
        warn!(index, %error, "Batch item failed");
    }
    debug!(
        total = report.len(),
        failed = report.failure_count(),
        "Processed batch"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{solid_rgb, transparent_with_block};
    use crate::trim::plan_trim_and_fit;
    use crate::{CropOptions, PixelBuffer, Rect};

    #[test]
    fn test_results_keep_input_order() {
        let items: Vec<u32> = (0..100).collect();
        let report = process_batch(&items, |n| Ok(n * 2));
        let doubled: Vec<u32> = report.successes().map(|(_, value)| *value).collect();
        assert_eq!(doubled, (0..100).map(|n| n * 2).collect::<Vec<_>>());
        assert!(report.all_succeeded());
    }

    #[test]
    fn test_failure_does_not_abort_siblings() {
        let options = CropOptions::new();
        let images: Vec<PixelBuffer> = vec![
            transparent_with_block(50, 50, Rect::new(5, 5, 10, 10)),
            solid_rgb(20, 20, [9, 9, 9]),
            transparent_with_block(40, 40, Rect::new(0, 0, 40, 20)),
        ];
        // Zero target height fails only for the second image
        let report = process_batch(&images, |image| {
            let height = if image.width() == 20 { 0 } else { 100 };
            plan_trim_and_fit(image, &options, 100, height)
        });

        assert_eq!(report.len(), 3);
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failure_count(), 1);

        let failed: Vec<usize> = report.failures().map(|(index, _)| index).collect();
        assert_eq!(failed, vec![1]);
        assert!(matches!(
            report.results()[1],
            Err(EngineError::InvalidDimensions { .. })
        ));
        assert_eq!(
            report.results()[0].as_ref().unwrap().source,
            Rect::new(5, 5, 10, 10)
        );
    }

    #[test]
    fn test_empty_batch() {
        let items: Vec<PixelBuffer> = Vec::new();
        let report = process_batch(&items, |image| Ok(image.width()));
        assert!(report.is_empty());
        assert!(report.all_succeeded());
        assert_eq!(report.failure_count(), 0);
    }

    #[test]
    fn test_into_results() {
        let report = process_batch(&[1, 2, 3], |n| {
            if *n == 2 {
                Err(EngineError::InvalidPresetName)
            } else {
                Ok(*n)
            }
        });
        let results = report.into_results();
        assert_eq!(results, vec![Ok(1), Err(EngineError::InvalidPresetName), Ok(3)]);
    }
}

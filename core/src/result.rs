//! Batch outcome bookkeeping.

/// Result of processing one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Record identifier (image id or Dockerfile path)
    pub id: String,
    /// Spec string or fully-qualified image name
    pub spec: String,
    /// Human-readable failure reason, `None` on success
    pub error: Option<String>,
}

/// Aggregate result of one batch pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    /// Successes that needed no transfer (already present at the destination).
    pub skipped: usize,
    pub succeeded: Vec<Outcome>,
    pub failures: Vec<Outcome>,
}

impl BatchResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, id: impl Into<String>, spec: impl Into<String>) {
        self.success += 1;
        self.succeeded.push(Outcome {
            id: id.into(),
            spec: spec.into(),
            error: None,
        });
    }

    /// Count a record found at the destination as a success without transfer.
    pub fn record_skipped(&mut self, id: impl Into<String>, spec: impl Into<String>) {
        self.skipped += 1;
        self.record_success(id, spec);
    }

    pub fn record_failure(
        &mut self,
        id: impl Into<String>,
        spec: impl Into<String>,
        error: impl Into<String>,
    ) {
        self.failed += 1;
        self.failures.push(Outcome {
            id: id.into(),
            spec: spec.into(),
            error: Some(error.into()),
        });
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut result = BatchResult::new(3);
        result.record_success("a", "nginx:latest");
        result.record_failure("b", "missing:latest", "exit code: 1");
        result.record_skipped("c", "alpine:3.18");

        assert_eq!(result.total, 3);
        assert_eq!(result.success, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.succeeded.len(), 2);
        assert_eq!(result.failures[0].error.as_deref(), Some("exit code: 1"));
        assert!(!result.is_success());
    }

    #[test]
    fn test_empty_batch_is_success() {
        assert!(BatchResult::new(0).is_success());
    }
}

//! Request outcome type

/// Outcome of a resolution, parse, or compile request.
///
/// Missing sources and failed toolchain invocations are expected,
/// reportable outcomes rather than driver malfunctions, so callers branch
/// on the variant instead of catching errors. Diagnostics accompanying a
/// `Failed` outcome live in the sink the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// The request produced a result.
    Found(T),
    /// No source exists for the requested name, including after
    /// enclosing-type fallback exhausts.
    NotFound,
    /// The toolchain ran (or could not be driven) and produced no usable
    /// result.
    Failed,
}

impl<T> Resolution<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolution::NotFound)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Resolution::Failed)
    }

    /// The result, discarding the outcome kind.
    pub fn found(self) -> Option<T> {
        match self {
            Resolution::Found(value) => Some(value),
            _ => None,
        }
    }

    /// Map the carried result, preserving the outcome kind.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Found(value) => Resolution::Found(f(value)),
            Resolution::NotFound => Resolution::NotFound,
            Resolution::Failed => Resolution::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(Resolution::Found(1).is_found());
        assert!(Resolution::<i32>::NotFound.is_not_found());
        assert!(Resolution::<i32>::Failed.is_failed());
    }

    #[test]
    fn test_found_and_map() {
        assert_eq!(Resolution::Found(2).map(|v| v * 2).found(), Some(4));
        assert_eq!(Resolution::<i32>::NotFound.map(|v| v).found(), None);
        assert_eq!(
            Resolution::<i32>::Failed.map(|v| v * 2),
            Resolution::Failed
        );
    }
}

//! Transformer trait for item-by-item data transformation

use eyre::Result;

/// Transformer trait for transforming data items
///
/// # Example
/// ```
/// use query_tool::etl::Transformer;
/// use eyre::Result;
///
/// struct Upper;
///
/// impl Transformer for Upper {
///     type Input = String;
///     type Output = String;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         Ok(input.to_uppercase())
///     }
/// }
///
/// assert_eq!(Upper.transform("ax".to_string()).unwrap(), "AX");
/// ```
pub trait Transformer: Send + Sync {
    /// Input item type
    type Input: Send;

    /// Output item type after transformation
    type Output: Send;

    /// Transform a single item
    ///
    /// # Errors
    /// Returns an error if transformation fails (validation, conversion, etc.)
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;

    /// Transform multiple items, stopping at the first failure
    fn transform_many(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>> {
        inputs.into_iter().map(|i| self.transform(i)).collect()
    }
}

/// Identity transformer that passes items through unchanged
///
/// Export writes records exactly as the service returned them, so its
/// pipeline uses this in the transform slot.
pub struct IdentityTransformer<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for IdentityTransformer<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> IdentityTransformer<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Send + Sync> Transformer for IdentityTransformer<T> {
    type Input = T;
    type Output = T;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transformer() {
        let transformer = IdentityTransformer::<&str>::new();
        let input = vec!["AX - Devices", "Windows Hosts"];
        let output = transformer.transform_many(input.clone()).unwrap();
        assert_eq!(input, output);
    }

    struct RejectEmpty;

    impl Transformer for RejectEmpty {
        type Input = String;
        type Output = String;

        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            if input.is_empty() {
                eyre::bail!("empty input");
            }
            Ok(input)
        }
    }

    #[test]
    fn test_transform_many_stops_on_error() {
        let result = RejectEmpty.transform_many(vec!["a".to_string(), String::new()]);
        assert!(result.is_err());
    }
}

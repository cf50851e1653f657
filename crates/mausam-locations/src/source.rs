use std::future::Future;
use std::sync::Arc;

use crate::index::{LocationIndex, DEFAULT_LIMIT};
use crate::types::LookupError;

/// Where the suggestion engine gets its answers from.
///
/// Implementations cap their answers at ten entries.
pub trait LocationSource: Send + Sync + 'static {
    fn find_regions(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<String>, LookupError>> + Send;

    fn find_places(
        &self,
        region: &str,
        query: &str,
    ) -> impl Future<Output = Result<Vec<String>, LookupError>> + Send;
}

impl LocationSource for LocationIndex {
    async fn find_regions(&self, query: &str) -> Result<Vec<String>, LookupError> {
        Ok(self.list_regions(query, DEFAULT_LIMIT))
    }

    async fn find_places(&self, region: &str, query: &str) -> Result<Vec<String>, LookupError> {
        Ok(self.list_places(region, query, DEFAULT_LIMIT))
    }
}

impl<T: LocationSource> LocationSource for Arc<T> {
    fn find_regions(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<String>, LookupError>> + Send {
        (**self).find_regions(query)
    }

    fn find_places(
        &self,
        region: &str,
        query: &str,
    ) -> impl Future<Output = Result<Vec<String>, LookupError>> + Send {
        (**self).find_places(region, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocationEntry;

    #[tokio::test]
    async fn test_index_as_source() {
        let index = LocationIndex::new(vec![
            LocationEntry::new("Jaipur", "Rajasthan"),
            LocationEntry::new("Udaipur", "Rajasthan"),
        ]);

        let regions = index.find_regions("raj").await.unwrap();
        assert_eq!(regions, vec!["Rajasthan"]);

        let places = index.find_places("Rajasthan", "pur").await.unwrap();
        assert_eq!(places, vec!["Jaipur", "Udaipur"]);

        let none = index.find_places("", "pur").await.unwrap();
        assert!(none.is_empty());
    }
}

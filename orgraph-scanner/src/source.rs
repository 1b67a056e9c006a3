use crate::error::Result;
use crate::record::{EntityRecord, MandateSummary, PersonQuery};
use futures::future::BoxFuture;

/// Where entity records come from.
///
/// Any error returned here is treated by the crawler as a skipped item; the
/// status code is only kept for diagnostics.
pub trait EntitySource: Send + Sync {
    fn fetch_entity<'a>(&'a self, siren: &'a str) -> BoxFuture<'a, Result<EntityRecord>>;

    /// Other entities where the person holds a mandate.
    fn search_mandates<'a>(
        &'a self,
        person: &'a PersonQuery,
    ) -> BoxFuture<'a, Result<Vec<MandateSummary>>>;
}

use crate::error::AppError;
use crate::models::ApplicationId;
use std::collections::btree_set;
use std::collections::BTreeSet;

/// Applications that trigger an intervention. Always replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchList(BTreeSet<ApplicationId>);

impl WatchList {
    /// Parse raw identifiers; duplicates collapse, any invalid entry fails the whole list.
    pub fn from_ids<I, S>(ids: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .map(|id| ApplicationId::parse(id.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn contains(&self, app: &ApplicationId) -> bool {
        self.0.contains(app)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, ApplicationId> {
        self.0.iter()
    }
}

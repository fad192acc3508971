use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    hash::BuildHasher,
};

///
/// RequestContext
///
/// Answers whether the current request supplied a value for a filter id.
/// Filters whose id is absent are skipped whatever their resolved value.
///

pub trait RequestContext {
    fn has(&self, id: &str) -> bool;
}

impl<V, S: BuildHasher> RequestContext for HashMap<String, V, S> {
    fn has(&self, id: &str) -> bool {
        self.contains_key(id)
    }
}

impl<V> RequestContext for BTreeMap<String, V> {
    fn has(&self, id: &str) -> bool {
        self.contains_key(id)
    }
}

impl<S: BuildHasher> RequestContext for HashSet<String, S> {
    fn has(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl RequestContext for BTreeSet<String> {
    fn has(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl RequestContext for [&str] {
    fn has(&self, id: &str) -> bool {
        self.iter().any(|candidate| *candidate == id)
    }
}

use std::collections::HashMap;

/// Category id to display name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryLookup {
    names: HashMap<String, String>,
}

impl CategoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CategoryLookup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut lookup = Self::new();
        for (id, name) in iter {
            lookup.insert(id, name);
        }
        lookup
    }
}

use super::{Name, Object};

/// Dictionary that keeps entries in insertion order.
///
/// Output must be byte-identical between runs, so a hash map is not an option
/// here. Dictionaries in this crate have a handful of keys; lookups are linear.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary(Vec<(Name, Object)>);

impl Dictionary {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or overwrite an entry. An overwritten entry keeps its position.
    pub fn insert(&mut self, key: impl Into<Name>, value: impl Into<Object>) -> Option<Object> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    /// Builder form of [`Dictionary::insert`].
    pub fn with(mut self, key: impl Into<Name>, value: impl Into<Object>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &[u8]) -> Option<&Object> {
        self.0.iter().find(|(k, _)| &k[..] == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Object)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Name> {
        self.0.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<Name>, V: Into<Object>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut dict = Dictionary::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

impl std::fmt::Display for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Dictionary {{")?;
        for (k, v) in self.iter() {
            write!(f, "\n  {}: {}", k, v)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order_and_position() {
        let mut d = Dictionary::new();
        d.insert("Type", Name::from("Page"));
        d.insert("Count", 1);
        assert_eq!(d.insert("Type", Name::from("Pages")), Some(Object::Name(Name::from("Page"))));
        let keys: Vec<_> = d.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["Type", "Count"]);
        assert_eq!(d.get(b"Type"), Some(&Object::Name(Name::from("Pages"))));
        assert!(d.get(b"Kids").is_none());
    }
}

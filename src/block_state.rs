use smol_str::SmolStr;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A block descriptor: a namespaced name plus property assignments, e.g.
/// `minecraft:oak_stairs[facing=north,half=top]`.
///
/// This is only a descriptor; resolving it to a numeric state id is the job
/// of the hosting world's [`BlockRegistry`](crate::world::BlockRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    pub name: SmolStr,
    pub properties: Vec<(SmolStr, SmolStr)>,
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.properties.is_empty() {
            write!(f, "[")?;
            for (i, (key, value)) in self.properties.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}={}", key, value)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl Hash for BlockState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        for (k, v) in &self.properties {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl BlockState {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        BlockState {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Parses a palette descriptor. The part before the first `[` is the
    /// block name; an optional bracketed list holds `key=value` pairs.
    /// Malformed pairs are skipped rather than rejected.
    pub fn parse(descriptor: &str) -> Self {
        match descriptor.split_once('[') {
            Some((name, rest)) => {
                let body = rest.strip_suffix(']').unwrap_or(rest);
                let mut state = BlockState::new(name);
                for pair in body.split(',') {
                    if let Some((key, value)) = pair.split_once('=') {
                        state.set_property(key.trim(), value.trim());
                    }
                }
                state
            }
            None => BlockState::new(descriptor),
        }
    }

    pub fn with_property(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) {
        let key = key.into();
        let value = value.into();
        for (k, v) in &mut self.properties {
            if *k == key {
                *v = value;
                return;
            }
        }
        self.properties.push((key, value));
    }

    pub fn get_property(&self, key: &str) -> Option<&SmolStr> {
        for (k, v) in &self.properties {
            if k == key {
                return Some(v);
            }
        }
        None
    }
}

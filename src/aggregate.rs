//! Running extremum accumulators
//!
//! `Best` keeps the first entry to reach the extreme value. `Tied` keeps every
//! entry sharing it, in the order they were offered.

/// Single best-so-far entry; ties keep the earlier one
#[derive(Debug, Clone, PartialEq)]
pub struct Best<V> {
    name: String,
    value: V,
}

impl<V: PartialOrd + Copy> Best<V> {
    /// Starts from a sentinel value with no name
    pub fn seeded(value: V) -> Self {
        Self {
            name: String::new(),
            value,
        }
    }

    /// Replaces the best entry if `value` is strictly greater
    pub fn offer_max(&mut self, name: &str, value: V) -> bool {
        self.offer(name, value, |candidate, best| candidate > best)
    }

    /// Replaces the best entry if `value` is strictly smaller
    pub fn offer_min(&mut self, name: &str, value: V) -> bool {
        self.offer(name, value, |candidate, best| candidate < best)
    }

    fn offer(&mut self, name: &str, value: V, beats: impl Fn(V, V) -> bool) -> bool {
        if beats(value, self.value) {
            self.value = value;
            self.name = name.to_string();
            true
        } else {
            false
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> V {
        self.value
    }
}

/// Best-so-far value with every entry that shares it
#[derive(Debug, Clone, PartialEq)]
pub struct Tied<V> {
    names: Vec<String>,
    value: V,
}

impl<V: PartialOrd + Copy> Tied<V> {
    /// Starts from a sentinel value with no names
    pub fn seeded(value: V) -> Self {
        Self {
            names: Vec::new(),
            value,
        }
    }

    /// Resets to `name` on a strictly greater value, appends it on an equal one
    pub fn offer_max(&mut self, name: &str, value: V) {
        if value > self.value {
            self.value = value;
            self.names.clear();
            self.names.push(name.to_string());
        } else if value == self.value {
            self.names.push(name.to_string());
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn value(&self) -> V {
        self.value
    }

    /// Names joined with ", "
    pub fn joined(&self) -> String {
        self.names.join(", ")
    }
}

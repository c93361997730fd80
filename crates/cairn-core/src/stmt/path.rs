use std::fmt;

/// A chain of member names starting at the builder's root entity, such as
/// `location.country.short_name`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pub steps: Vec<String>,
}

impl Path {
    pub fn new(member: impl Into<String>) -> Self {
        Self {
            steps: vec![member.into()],
        }
    }

    pub fn from_steps<S: Into<String>>(steps: impl IntoIterator<Item = S>) -> Self {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends `other` to the end of this path.
    pub fn chain(&mut self, other: &Path) {
        self.steps.extend(other.steps.iter().cloned());
    }

    pub fn push(&mut self, member: impl Into<String>) {
        self.steps.push(member.into());
    }

    pub fn first(&self) -> Option<&str> {
        self.steps.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.steps.join("."))
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

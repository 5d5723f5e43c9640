use std::fmt;
use std::hash::{Hash, Hasher};

/// Visit marker carried by every node. The shortest-path solver never reads it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    #[default]
    White,
    Grey,
    Black,
}

/// A graph node identified by its label.
///
/// Two nodes are equal exactly when their labels are equal; the metadata
/// fields never take part in equality or hashing, so a node built from a bare
/// label finds the stored node with the same label.
#[derive(Clone, Debug)]
pub struct Node<L> {
    label: L,
    color: Color,
    integer_distance: Option<i64>,
    floating_distance: Option<f64>,
}

impl<L> Node<L> {
    pub fn new(label: L) -> Self {
        Self {
            label,
            color: Color::default(),
            integer_distance: None,
            floating_distance: None,
        }
    }

    pub fn label(&self) -> &L {
        &self.label
    }

    pub fn into_label(self) -> L {
        self.label
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn integer_distance(&self) -> Option<i64> {
        self.integer_distance
    }

    pub fn set_integer_distance(&mut self, distance: Option<i64>) {
        self.integer_distance = distance;
    }

    pub fn floating_distance(&self) -> Option<f64> {
        self.floating_distance
    }

    pub fn set_floating_distance(&mut self, distance: Option<f64>) {
        self.floating_distance = distance;
    }
}

impl<L> From<L> for Node<L> {
    fn from(label: L) -> Self {
        Node::new(label)
    }
}

impl<L: PartialEq> PartialEq for Node<L> {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl<L: Eq> Eq for Node<L> {}

impl<L: Hash> Hash for Node<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
    }
}

impl<L: fmt::Display> fmt::Display for Node<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.label.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn identity_is_the_label() {
        let mut a = Node::new("a");
        a.set_color(Color::Black);
        a.set_integer_distance(Some(7));
        assert_eq!(a, Node::new("a"));
        assert_ne!(a, Node::new("b"));

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(Node::new("a")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn metadata_defaults() {
        let n: Node<u32> = 3.into();
        assert_eq!(n.color(), Color::White);
        assert_eq!(n.integer_distance(), None);
        assert_eq!(n.floating_distance(), None);
        assert_eq!(n.to_string(), "3");
    }
}

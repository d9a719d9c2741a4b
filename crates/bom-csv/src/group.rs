use std::collections::HashMap;

use kicad_netlist::Component;

use crate::designator;

/// How components are ordered before grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Plain byte-wise comparison of references (R1 < R10 < R2)
    #[default]
    Reference,
    /// Letters then number (R1 < R2 < R10)
    Alphanumeric,
}

impl SortOrder {
    /// Stable sort of borrowed components
    pub fn sort(self, components: &mut [&Component]) {
        match self {
            SortOrder::Reference => components.sort_by(|a, b| a.reference().cmp(b.reference())),
            SortOrder::Alphanumeric => {
                components.sort_by(|a, b| designator::compare(a.reference(), b.reference()))
            }
        }
    }
}

/// Components sharing one value of the grouping field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<'a> {
    pub key: &'a str,
    pub members: Vec<&'a Component>,
}

impl<'a> Group<'a> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn first(&self) -> Option<&'a Component> {
        self.members.first().copied()
    }

    pub fn references(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.members.iter().map(|&c| c.reference())
    }
}

/// Result of grouping a component collection by one field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grouping<'a> {
    pub field: String,
    pub groups: Vec<Group<'a>>,
    /// Components whose field was absent or empty
    pub missing: usize,
}

impl<'a> Grouping<'a> {
    /// Sort `components` with `order`, then group them by `field`.
    ///
    /// Groups are emitted in order of first appearance in the sorted sequence.
    /// Components without a non-empty value for `field` are counted in
    /// `missing` and left out of every group.
    pub fn new(components: &'a [Component], order: SortOrder, field: &str) -> Self {
        let mut sorted: Vec<&Component> = components.iter().collect();
        order.sort(&mut sorted);

        let mut groups: Vec<Group<'a>> = Vec::new();
        let mut index = HashMap::<&str, usize>::new();
        let mut missing = 0;

        for component in sorted {
            let key = match component.field(field) {
                Some(key) if !key.is_empty() => key,
                _ => {
                    log::debug!("{} has no '{field}' field", component.reference());
                    missing += 1;
                    continue;
                }
            };

            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Group {
                    key,
                    members: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].members.push(component);
        }

        Self {
            field: field.to_string(),
            groups,
            missing,
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group<'a>> {
        self.groups.iter()
    }
}

//! Element arena shared by every sketch
//!
//! The canvas owns all elements in rendering order (first element is drawn
//! underneath) and indexes them by id. References between elements are
//! plain ids, checked by [`Canvas::validate`] before export.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::element::{Element, ElementId, GroupId, Placeable, Shape};
use super::error::{Result, SketchError};
use super::geometry::Bounds;

/// Ordered, id-indexed collection of elements
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    elements: Vec<Element>,
    index: HashMap<ElementId, usize>,
    groups: Vec<(GroupId, Vec<ElementId>)>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in rendering order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.index.get(id).map(|&i| &self.elements[i])
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        match self.index.get(id) {
            Some(&i) => self.elements.get_mut(i),
            None => None,
        }
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.index.contains_key(id)
    }

    /// Registered groups and their members
    pub fn groups(&self) -> &[(GroupId, Vec<ElementId>)] {
        &self.groups
    }

    /// Append one element or group
    pub fn add(&mut self, shape: impl Into<Shape>) -> Result<()> {
        self.extend(std::iter::once(shape.into()))
    }

    /// Append several shapes.
    ///
    /// The batch is checked as a whole first; on a duplicate id nothing is
    /// appended and the canvas is left unchanged.
    pub fn extend<I, S>(&mut self, shapes: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<Shape>,
    {
        let shapes: Vec<Shape> = shapes.into_iter().map(Into::into).collect();

        let mut incoming = HashSet::new();
        for shape in &shapes {
            let ids: Vec<&ElementId> = match shape {
                Shape::Element(element) => vec![&element.id],
                Shape::Group(group) => group.member_ids().collect(),
            };
            for id in ids {
                if self.index.contains_key(id) || !incoming.insert(id.clone()) {
                    return Err(SketchError::duplicate_element(id.as_str()));
                }
            }
        }

        for shape in shapes {
            match shape {
                Shape::Element(element) => self.push(element),
                Shape::Group(group) => {
                    let group_id = group.id().clone();
                    let members: Vec<ElementId> = group.member_ids().cloned().collect();
                    for element in group.into_elements() {
                        self.push(element);
                    }
                    trace!(group = %group_id, members = members.len(), "Registered group");
                    self.groups.push((group_id, members));
                }
            }
        }
        debug!(element_count = self.elements.len(), "Canvas extended");
        Ok(())
    }

    fn push(&mut self, element: Element) {
        self.index.insert(element.id.clone(), self.elements.len());
        self.elements.push(element);
    }

    /// Group elements that are already on the canvas
    pub fn group_existing(&mut self, group_id: GroupId, members: &[ElementId]) -> Result<()> {
        if let Some(missing) = members.iter().find(|id| !self.contains(id)) {
            return Err(SketchError::invalid_reference(group_id.as_str(), missing.as_str()));
        }
        for id in members {
            if let Some(element) = self.get_mut(id) {
                if !element.group_ids.contains(&group_id) {
                    element.group_ids.push(group_id.clone());
                }
            }
        }
        self.groups.push((group_id, members.to_vec()));
        Ok(())
    }

    /// Mutable access to two distinct elements at once
    pub fn get_pair_mut(
        &mut self,
        first: &ElementId,
        second: &ElementId,
    ) -> Result<(&mut Element, &mut Element)> {
        let i = *self
            .index
            .get(first)
            .ok_or_else(|| SketchError::invalid_reference(second.as_str(), first.as_str()))?;
        let j = *self
            .index
            .get(second)
            .ok_or_else(|| SketchError::invalid_reference(first.as_str(), second.as_str()))?;
        if i == j {
            return Err(SketchError::malformed_input(format!(
                "cannot connect element {} to itself",
                first
            )));
        }
        if i < j {
            let (head, tail) = self.elements.split_at_mut(j);
            Ok((&mut head[i], &mut tail[0]))
        } else {
            let (head, tail) = self.elements.split_at_mut(i);
            Ok((&mut tail[0], &mut head[j]))
        }
    }

    /// Bounding box of everything drawn
    pub fn bounds(&self) -> Option<Bounds> {
        let boxes: Vec<Bounds> = self.elements.iter().map(Placeable::bounds).collect();
        Bounds::enclosing(&boxes)
    }

    /// Check that every id referenced by an element or group is present
    pub fn validate(&self) -> Result<()> {
        for element in &self.elements {
            if let Some(missing) = element.references().into_iter().find(|id| !self.contains(id)) {
                return Err(SketchError::invalid_reference(
                    element.id.as_str(),
                    missing.as_str(),
                ));
            }
        }
        for (group_id, members) in &self.groups {
            if let Some(missing) = members.iter().find(|id| !self.contains(id)) {
                return Err(SketchError::invalid_reference(group_id.as_str(), missing.as_str()));
            }
        }
        Ok(())
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.elements.clear();
        self.index.clear();
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::element::{ElementKind, Group};
    use crate::core::types::Style;

    fn rect(id: &str) -> Element {
        Element::shape(
            ElementId::new(id),
            ElementKind::Rectangle,
            Bounds::new(0.0, 0.0, 10.0, 10.0),
            Style::outline(),
            1,
        )
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut canvas = Canvas::new();
        canvas.add(rect("b")).unwrap();
        canvas.extend([rect("a"), rect("c")]).unwrap();
        let ids: Vec<&str> = canvas.elements().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_batch_leaves_canvas_unchanged() {
        let mut canvas = Canvas::new();
        canvas.add(rect("a")).unwrap();
        let err = canvas.extend([rect("b"), rect("a")]).unwrap_err();
        assert!(matches!(err, SketchError::DuplicateElement { .. }));
        assert_eq!(canvas.len(), 1);
        assert!(!canvas.contains(&ElementId::new("b")));
    }

    #[test]
    fn test_group_is_registered() {
        let mut group = Group::new(GroupId::new("g"));
        group.push(rect("a"));
        group.push(rect("b"));
        let mut canvas = Canvas::new();
        canvas.add(group).unwrap();
        assert_eq!(canvas.len(), 2);
        assert_eq!(canvas.groups()[0].1.len(), 2);
        assert!(canvas.validate().is_ok());
    }

    #[test]
    fn test_group_existing_rejects_missing_member() {
        let mut canvas = Canvas::new();
        canvas.add(rect("a")).unwrap();
        let err = canvas
            .group_existing(GroupId::new("g"), &[ElementId::new("a"), ElementId::new("z")])
            .unwrap_err();
        assert!(matches!(err, SketchError::InvalidReference { .. }));
        assert!(canvas.get(&ElementId::new("a")).unwrap().group_ids.is_empty());
    }

    #[test]
    fn test_validate_catches_dangling_binding() {
        let mut element = rect("a");
        element.bound_elements.push(crate::core::element::BoundElement {
            id: ElementId::new("ghost"),
            kind: crate::core::element::BoundElementKind::Arrow,
        });
        let mut canvas = Canvas::new();
        canvas.add(element).unwrap();
        assert!(matches!(
            canvas.validate(),
            Err(SketchError::InvalidReference { .. })
        ));
    }

    #[test]
    fn test_get_pair_mut() {
        let mut canvas = Canvas::new();
        canvas.extend([rect("a"), rect("b")]).unwrap();
        let (b, a) = canvas
            .get_pair_mut(&ElementId::new("b"), &ElementId::new("a"))
            .unwrap();
        assert_eq!(b.id.as_str(), "b");
        assert_eq!(a.id.as_str(), "a");
        assert!(canvas
            .get_pair_mut(&ElementId::new("a"), &ElementId::new("a"))
            .is_err());
    }
}

//! Arrangement helpers for placing shapes relative to each other

use crate::core::{Bounds, Placeable};

/// Where each item goes relative to the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    Below,
    Above,
    LeftOf,
    RightOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlignment {
    Top,
    Bottom,
}

/// Chain items one after another with `padding` between them.
///
/// The first item stays where it is. `Below` and `Above` keep left edges
/// aligned, `LeftOf` and `RightOf` keep top edges aligned.
pub fn order_sequence<P: Placeable>(items: &mut [P], ordering: Ordering, padding: f64) {
    for i in 1..items.len() {
        let previous = items[i - 1].bounds();
        let current = items[i].bounds();
        let (x, y) = match ordering {
            Ordering::Below => (previous.x, previous.max_y() + padding),
            Ordering::Above => (previous.x, previous.y - padding - current.height),
            Ordering::RightOf => (previous.max_x() + padding, previous.y),
            Ordering::LeftOf => (previous.x - padding - current.width, previous.y),
        };
        items[i].move_to(x, y);
    }
}

/// Align left or right edges on their mean position (truncated)
pub fn horizontal_align<P: Placeable>(items: &mut [P], align: HorizontalAlignment) {
    if items.is_empty() {
        return;
    }
    let edge = |b: &Bounds| match align {
        HorizontalAlignment::Left => b.min_x(),
        HorizontalAlignment::Right => b.max_x(),
    };
    let target = mean(items.iter().map(|i| edge(&i.bounds())), items.len()).trunc();
    for item in items.iter_mut() {
        let dx = target - edge(&item.bounds());
        item.translate(dx, 0.0);
    }
}

/// Align top or bottom edges on their mean position (truncated)
pub fn vertical_align<P: Placeable>(items: &mut [P], align: VerticalAlignment) {
    if items.is_empty() {
        return;
    }
    let edge = |b: &Bounds| match align {
        VerticalAlignment::Top => b.min_y(),
        VerticalAlignment::Bottom => b.max_y(),
    };
    let target = mean(items.iter().map(|i| edge(&i.bounds())), items.len()).trunc();
    for item in items.iter_mut() {
        let dy = target - edge(&item.bounds());
        item.translate(0.0, dy);
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    values.sum::<f64>() / count as f64
}

/// Bounding box of a set of items
pub fn bounds_of<P: Placeable>(items: &[P]) -> Option<Bounds> {
    let boxes: Vec<Bounds> = items.iter().map(Placeable::bounds).collect();
    Bounds::enclosing(&boxes)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Block(Bounds);

    impl Placeable for Block {
        fn bounds(&self) -> Bounds {
            self.0
        }

        fn translate(&mut self, dx: f64, dy: f64) {
            self.0.x += dx;
            self.0.y += dy;
        }
    }

    fn blocks() -> Vec<Block> {
        vec![
            Block(Bounds::new(0.0, 0.0, 10.0, 10.0)),
            Block(Bounds::new(50.0, 50.0, 20.0, 5.0)),
            Block(Bounds::new(-5.0, 3.0, 5.0, 30.0)),
        ]
    }

    #[test]
    fn test_order_below() {
        let mut items = blocks();
        order_sequence(&mut items, Ordering::Below, 4.0);
        assert_eq!(items[1].0, Bounds::new(0.0, 14.0, 20.0, 5.0));
        assert_eq!(items[2].0, Bounds::new(0.0, 23.0, 5.0, 30.0));
    }

    #[test]
    fn test_order_left_of() {
        let mut items = blocks();
        order_sequence(&mut items, Ordering::LeftOf, 2.0);
        assert_eq!(items[1].0, Bounds::new(-22.0, 0.0, 20.0, 5.0));
        assert_eq!(items[2].0, Bounds::new(-29.0, 0.0, 5.0, 30.0));
    }

    #[test]
    fn test_order_above_and_right() {
        let mut items = blocks();
        order_sequence(&mut items, Ordering::Above, 0.0);
        assert_eq!(items[1].0.max_y(), 0.0);

        let mut items = blocks();
        order_sequence(&mut items, Ordering::RightOf, 0.0);
        assert_eq!(items[1].0.x, 10.0);
        assert_eq!(items[2].0.x, 30.0);
    }

    #[test]
    fn test_alignment_uses_truncated_mean() {
        let mut items = blocks();
        horizontal_align(&mut items, HorizontalAlignment::Left);
        // (0 + 50 - 5) / 3 = 15
        assert!(items.iter().all(|b| b.0.x == 15.0));

        let mut items = blocks();
        vertical_align(&mut items, VerticalAlignment::Bottom);
        // (10 + 55 + 33) / 3 = 32.67
        assert!(items.iter().all(|b| b.0.max_y() == 32.0));
        assert_eq!(bounds_of(&items).unwrap().max_y(), 32.0);
    }
}

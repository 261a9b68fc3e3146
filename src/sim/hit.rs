//! Hit-testing projectiles against the host page
//!
//! The overlay does not know what a page element is. The host injects a
//! [`Surface`] that answers "what is stacked at this point" and applies the
//! hit flash.

use glam::Vec2;

use super::state::Projectile;

/// Page-side capabilities the hit test needs.
///
/// All points are surface-local (relative to the overlay's top-left corner).
pub trait Surface {
    type Element;

    /// Every element stacked at `point`, topmost first, across the whole page
    fn elements_at(&self, point: Vec2) -> Vec<Self::Element>;

    /// Whether `element` belongs to the overlay itself
    fn is_own(&self, element: &Self::Element) -> bool;

    /// Visual center of `element`, or `None` if it has no layout box
    fn center_of(&self, element: &Self::Element) -> Option<Vec2>;

    /// Flash `element` and revert it after `revert_after_ms`, even if the
    /// overlay stops ticking in the meantime
    fn disrupt(&mut self, element: &Self::Element, revert_after_ms: u32);
}

/// A projectile touching a foreign element
#[derive(Debug, Clone)]
pub struct Contact<E> {
    pub element: E,
    /// Element center, where the explosion is drawn
    pub point: Vec2,
    pub projectile_id: u32,
}

/// Find every foreign element under every projectile.
///
/// Each element under a projectile yields its own contact; one projectile can
/// score several in the same tick.
pub fn hit_test<S: Surface>(projectiles: &[Projectile], surface: &S) -> Vec<Contact<S::Element>> {
    let mut contacts = Vec::new();
    for p in projectiles {
        for element in surface.elements_at(p.pos) {
            if surface.is_own(&element) {
                continue;
            }
            let Some(point) = surface.center_of(&element) else {
                continue;
            };
            contacts.push(Contact {
                element,
                point,
                projectile_id: p.id,
            });
        }
    }
    contacts
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Axis-aligned page element for tests
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Rect {
        pub id: u32,
        pub min: Vec2,
        pub max: Vec2,
        /// Part of the overlay
        pub own: bool,
    }

    impl Rect {
        pub fn new(id: u32, x: f32, y: f32, w: f32, h: f32) -> Self {
            Self {
                id,
                min: Vec2::new(x, y),
                max: Vec2::new(x + w, y + h),
                own: false,
            }
        }

        pub fn own(mut self) -> Self {
            self.own = true;
            self
        }
    }

    /// Fake page: a stack of rectangles, later entries on top
    #[derive(Debug, Default)]
    pub struct FakePage {
        pub rects: Vec<Rect>,
        pub disrupted: Vec<(u32, u32)>,
    }

    impl Surface for FakePage {
        type Element = Rect;

        fn elements_at(&self, point: Vec2) -> Vec<Rect> {
            self.rects
                .iter()
                .rev()
                .filter(|r| point.cmpge(r.min).all() && point.cmple(r.max).all())
                .copied()
                .collect()
        }

        fn is_own(&self, element: &Rect) -> bool {
            element.own
        }

        fn center_of(&self, element: &Rect) -> Option<Vec2> {
            Some((element.min + element.max) / 2.0)
        }

        fn disrupt(&mut self, element: &Rect, revert_after_ms: u32) {
            self.disrupted.push((element.id, revert_after_ms));
        }
    }

    fn projectile(id: u32, x: f32, y: f32) -> Projectile {
        Projectile {
            id,
            pos: Vec2::new(x, y),
            heading: 0.0,
        }
    }

    #[test]
    fn test_stacked_elements_each_hit() {
        let page = FakePage {
            rects: vec![Rect::new(1, 0.0, 0.0, 200.0, 200.0), Rect::new(2, 40.0, 40.0, 20.0, 20.0)],
            ..Default::default()
        };
        let contacts = hit_test(&[projectile(7, 50.0, 50.0)], &page);
        assert_eq!(contacts.len(), 2);
        // Topmost first
        assert_eq!(contacts[0].element.id, 2);
        assert_eq!(contacts[0].point, Vec2::new(50.0, 50.0));
        assert_eq!(contacts[1].element.id, 1);
        assert_eq!(contacts[1].point, Vec2::new(100.0, 100.0));
        assert!(contacts.iter().all(|c| c.projectile_id == 7));
    }

    #[test]
    fn test_own_elements_skipped() {
        let page = FakePage {
            rects: vec![
                Rect::new(1, 0.0, 0.0, 100.0, 100.0),
                Rect::new(2, 0.0, 0.0, 400.0, 300.0).own(),
            ],
            ..Default::default()
        };
        let contacts = hit_test(&[projectile(0, 10.0, 10.0), projectile(1, 300.0, 200.0)], &page);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].element.id, 1);
        assert_eq!(contacts[0].projectile_id, 0);
    }

    #[test]
    fn test_empty_page_no_contacts() {
        let page = FakePage::default();
        assert!(hit_test(&[projectile(0, 10.0, 10.0)], &page).is_empty());
        assert!(hit_test(&[], &page).is_empty());
    }
}

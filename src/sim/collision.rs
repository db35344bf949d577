//! Collision detection and response
//!
//! Papers are axis-aligned boxes, bins are boxes, power-ups are circles. No
//! contact solving: the only questions are "does this paper touch that bin or
//! power-up", and "which way does a velocity bounce off a wall".

use glam::Vec2;

use super::entity::{Aabb, Bin, BinId, EntityId, Paper, PowerUp};
use super::store::EntityStore;

/// Box vs box overlap (touching edges count)
#[inline]
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.min.x <= b.max.x && a.max.x >= b.min.x && a.min.y <= b.max.y && a.max.y >= b.min.y
}

/// Box vs circle overlap: distance from the circle's center to the closest
/// point of the box
pub fn aabb_circle_overlap(aabb: &Aabb, center: Vec2, radius: f32) -> bool {
    let closest = center.clamp(aabb.min, aabb.max);
    (center - closest).length() <= radius
}

/// What a paper ran into this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Bin { paper: EntityId, bin: BinId },
    PowerUp { paper: EntityId, power_up: EntityId },
}

/// First bin a paper touches, in bin order
pub fn paper_bin_contact(paper: &Paper, bins: &[Bin]) -> Option<BinId> {
    let bounds = paper.bounds();
    bins.iter()
        .find(|bin| aabb_overlap(&bounds, &bin.bounds()))
        .map(|bin| bin.id)
}

/// First power-up a paper touches, in id order, skipping ones already claimed
pub fn paper_power_up_contact(
    paper: &Paper,
    power_ups: &[PowerUp],
    claimed: &[EntityId],
) -> Option<EntityId> {
    let bounds = paper.bounds();
    power_ups
        .iter()
        .filter(|p| !claimed.contains(&p.id))
        .find(|p| aabb_circle_overlap(&bounds, p.pos, p.radius))
        .map(|p| p.id)
}

/// At most one contact per paper per tick: bins win over power-ups, and a
/// power-up already claimed by an earlier paper is skipped.
pub fn detect_contacts(store: &EntityStore, bins: &[Bin]) -> Vec<Contact> {
    let mut contacts = Vec::new();
    let mut claimed: Vec<EntityId> = Vec::new();

    for paper in store.papers() {
        if let Some(bin) = paper_bin_contact(paper, bins) {
            contacts.push(Contact::Bin {
                paper: paper.id,
                bin,
            });
            continue;
        }

        if let Some(power_up) = paper_power_up_contact(paper, store.power_ups(), &claimed) {
            claimed.push(power_up);
            contacts.push(Contact::PowerUp {
                paper: paper.id,
                power_up,
            });
        }
    }

    contacts
}

/// Bounce off a wall, losing speed along the normal.
/// `restitution` 1.0 is a perfect reflection, 0.0 stops dead against the wall.
#[inline]
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    velocity - (1.0 + restitution) * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{PaperKind, PaperSource, PowerUpKind, layout_bins};
    use crate::tuning::ScoringTuning;

    fn paper_at(id: u32, kind: PaperKind, pos: Vec2) -> Paper {
        Paper::new(EntityId(id), kind, PaperSource::Edge, pos, Vec2::ZERO, 0.0, 0)
    }

    fn bins() -> [Bin; 3] {
        layout_bins(1000.0, 800.0, &ScoringTuning::default())
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_center(Vec2::new(15.0, 0.0), Vec2::splat(10.0));
        let c = Aabb::from_center(Vec2::new(25.0, 0.0), Vec2::splat(4.0));
        assert!(aabb_overlap(&a, &b));
        assert!(aabb_overlap(&b, &a));
        assert!(!aabb_overlap(&a, &c));
        // Touching edges
        let d = Aabb::from_center(Vec2::new(20.0, 0.0), Vec2::splat(10.0));
        assert!(aabb_overlap(&a, &d));
    }

    #[test]
    fn test_aabb_circle() {
        let aabb = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        assert!(aabb_circle_overlap(&aabb, Vec2::new(30.0, 0.0), 25.0));
        assert!(!aabb_circle_overlap(&aabb, Vec2::new(40.0, 0.0), 25.0));
        // Corner: distance to (10,10) from (28,28) is ~25.5
        assert!(!aabb_circle_overlap(&aabb, Vec2::new(28.0, 28.0), 25.0));
        assert!(aabb_circle_overlap(&aabb, Vec2::ZERO, 25.0));
    }

    #[test]
    fn test_paper_over_bin() {
        let bins = bins();
        let paper = paper_at(1, PaperKind::Regular, Vec2::new(500.0, 740.0));
        assert_eq!(paper_bin_contact(&paper, &bins), Some(BinId::Recycle));

        let paper = paper_at(2, PaperKind::Regular, Vec2::new(300.0, 740.0));
        assert_eq!(paper_bin_contact(&paper, &bins), None);

        // Edge of the paper just clips the trash bin's right side (x = 160)
        let paper = paper_at(3, PaperKind::Regular, Vec2::new(179.0, 700.0));
        assert_eq!(paper_bin_contact(&paper, &bins), Some(BinId::Trash));
    }

    #[test]
    fn test_one_contact_per_paper() {
        let mut store = EntityStore::new();
        let id = store.next_entity_id();
        store.add_paper(paper_at(id.0, PaperKind::Regular, Vec2::new(500.0, 740.0)));
        let pid = store.next_entity_id();
        store.add_power_up(PowerUp::new(pid, PowerUpKind::Freeze, Vec2::new(500.0, 740.0), Vec2::ZERO, 0));

        let contacts = detect_contacts(&store, &bins());
        assert_eq!(
            contacts,
            vec![Contact::Bin {
                paper: id,
                bin: BinId::Recycle
            }]
        );
    }

    #[test]
    fn test_claimed_power_up_is_skipped() {
        let paper = paper_at(1, PaperKind::Regular, Vec2::new(300.0, 300.0));
        let power_ups = [
            PowerUp::new(EntityId(2), PowerUpKind::Magnet, Vec2::new(300.0, 300.0), Vec2::ZERO, 0),
            PowerUp::new(EntityId(3), PowerUpKind::SlowMo, Vec2::new(310.0, 300.0), Vec2::ZERO, 0),
        ];
        assert_eq!(paper_power_up_contact(&paper, &power_ups, &[]), Some(EntityId(2)));
        assert_eq!(paper_power_up_contact(&paper, &power_ups, &[EntityId(2)]), Some(EntityId(3)));
        assert_eq!(paper_power_up_contact(&paper, &power_ups, &[EntityId(2), EntityId(3)]), None);
    }

    #[test]
    fn test_power_up_claimed_once() {
        let mut store = EntityStore::new();
        let a = store.next_entity_id();
        store.add_paper(paper_at(a.0, PaperKind::Regular, Vec2::new(300.0, 300.0)));
        let b = store.next_entity_id();
        store.add_paper(paper_at(b.0, PaperKind::Sticky, Vec2::new(310.0, 300.0)));
        let p = store.next_entity_id();
        store.add_power_up(PowerUp::new(p, PowerUpKind::Magnet, Vec2::new(305.0, 300.0), Vec2::ZERO, 0));

        let contacts = detect_contacts(&store, &bins());
        assert_eq!(
            contacts,
            vec![Contact::PowerUp {
                paper: a,
                power_up: p
            }]
        );
    }

    #[test]
    fn test_bounce_loses_energy() {
        let v = bounce_velocity(Vec2::new(-10.0, 3.0), Vec2::X, 0.4);
        assert!((v.x - 4.0).abs() < 0.001);
        assert!((v.y - 3.0).abs() < 0.001);
        // Full restitution flips the normal component
        assert_eq!(bounce_velocity(Vec2::new(-10.0, 2.0), Vec2::X, 1.0), Vec2::new(10.0, 2.0));
        // Zero restitution stops it against the wall
        assert_eq!(bounce_velocity(Vec2::new(-10.0, 2.0), Vec2::X, 0.0), Vec2::new(0.0, 2.0));
    }
}

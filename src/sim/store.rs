//! Entity store: sole owner of active papers and power-ups
//!
//! Both lists stay sorted by id so iteration order (and therefore collision
//! tie-breaking) is deterministic.

use super::entity::{EntityId, Paper, PaperStatus, PowerUp};

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    papers: Vec<Paper>,
    power_ups: Vec<PowerUp>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            papers: Vec::new(),
            power_ups: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    pub fn add_paper(&mut self, paper: Paper) {
        // Ids are allocated monotonically, so pushing keeps the order
        debug_assert!(self.papers.last().is_none_or(|p| p.id < paper.id));
        self.papers.push(paper);
    }

    pub fn add_power_up(&mut self, power_up: PowerUp) {
        debug_assert!(self.power_ups.last().is_none_or(|p| p.id < power_up.id));
        self.power_ups.push(power_up);
    }

    /// Remove a paper. Removing something already gone is a no-op.
    pub fn remove_paper(&mut self, id: EntityId) -> Option<Paper> {
        let idx = self.papers.binary_search_by_key(&id, |p| p.id).ok()?;
        Some(self.papers.remove(idx))
    }

    /// Take a paper off the desk in its terminal state
    pub fn retire_paper(&mut self, id: EntityId, status: PaperStatus) -> Option<Paper> {
        debug_assert!(status != PaperStatus::Active);
        let mut paper = self.remove_paper(id)?;
        paper.status = status;
        Some(paper)
    }

    /// Remove a power-up. Removing something already gone is a no-op.
    pub fn remove_power_up(&mut self, id: EntityId) -> Option<PowerUp> {
        let idx = self.power_ups.binary_search_by_key(&id, |p| p.id).ok()?;
        Some(self.power_ups.remove(idx))
    }

    pub fn paper(&self, id: EntityId) -> Option<&Paper> {
        self.papers
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|idx| &self.papers[idx])
    }

    pub fn paper_mut(&mut self, id: EntityId) -> Option<&mut Paper> {
        let idx = self.papers.binary_search_by_key(&id, |p| p.id).ok()?;
        Some(&mut self.papers[idx])
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn papers_mut(&mut self) -> impl Iterator<Item = &mut Paper> {
        self.papers.iter_mut()
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn power_ups_mut(&mut self) -> impl Iterator<Item = &mut PowerUp> {
        self.power_ups.iter_mut()
    }

    pub fn paper_count(&self) -> usize {
        self.papers.len()
    }

    pub fn power_up_count(&self) -> usize {
        self.power_ups.len()
    }

    /// Ids of papers matching a predicate (collect before removing)
    pub fn paper_ids_where(&self, mut pred: impl FnMut(&Paper) -> bool) -> Vec<EntityId> {
        self.papers.iter().filter(|p| pred(p)).map(|p| p.id).collect()
    }

    /// Ids of power-ups matching a predicate (collect before removing)
    pub fn power_up_ids_where(&self, mut pred: impl FnMut(&PowerUp) -> bool) -> Vec<EntityId> {
        self.power_ups.iter().filter(|p| pred(p)).map(|p| p.id).collect()
    }

    pub fn clear(&mut self) {
        self.papers.clear();
        self.power_ups.clear();
    }
}

//! Ordered entity collection
//!
//! Insertion order is update order and draw order, so later entities render
//! on top. Structural removal goes through `retain`-style passes, which visit
//! every element exactly once even while elements are dropped.

use super::entity::{Entity, EntityId};
use super::grid::OccupancyGrid;
use crate::renderer::Frame;

#[derive(Debug, Clone)]
pub struct Handler<T> {
    objects: Vec<T>,
}

impl<T> Default for Handler<T> {
    fn default() -> Self {
        Self { objects: Vec::new() }
    }
}

impl<T: Entity> Handler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: T) {
        self.objects.push(object);
    }

    /// Update every member in order
    pub fn update(&mut self, grid: &mut OccupancyGrid) {
        for object in &mut self.objects {
            object.update(grid);
        }
    }

    /// Draw every member in order
    pub fn draw(&self, frame: &mut Frame) {
        for object in &self.objects {
            object.draw(frame);
        }
    }

    /// Live ordered sequence
    pub fn all(&self) -> &[T] {
        &self.objects
    }

    /// Mutable access for resolvers that remove while scanning
    pub fn all_mut(&mut self) -> &mut Vec<T> {
        &mut self.objects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Remove by identity, returning the removed member
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let index = self.objects.iter().position(|o| o.id() == id)?;
        Some(self.objects.remove(index))
    }

    /// Single pass: hand each member to `keep`, drop those it rejects.
    /// Survivors keep their relative order.
    pub fn retain_mut<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&mut T) -> bool,
    {
        let before = self.objects.len();
        self.objects.retain_mut(keep);
        before - self.objects.len()
    }

    /// Remove every member matching `dead`, calling `destroy` on each exactly once
    pub fn sweep<F>(&mut self, grid: &mut OccupancyGrid, mut dead: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = Vec::new();
        let mut index = 0;
        while index < self.objects.len() {
            if dead(&self.objects[index]) {
                let mut object = self.objects.remove(index);
                object.destroy(grid);
                removed.push(object);
            } else {
                index += 1;
            }
        }
        removed
    }

    /// Destroy and drop everything
    pub fn clear(&mut self, grid: &mut OccupancyGrid) -> usize {
        self.sweep(grid, |_| true).len()
    }
}

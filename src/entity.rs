//! Named entities and the ordered containers that own them
//!
//! Every domain object lives in exactly one [`Container`]. A container hands
//! out a stable [`Id`] on insertion; names are unique per container and may be
//! changed without invalidating ids held elsewhere in the model.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PipeError, PipeResult};

/// Type tag of an entity; together with the name it forms the identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Model,
    Point,
    Element,
    Section,
    Material,
    Insulation,
    Code,
    Sif,
    Support,
    Load,
    LoadCase,
    Report,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Model => "Model",
            EntityKind::Point => "Point",
            EntityKind::Element => "Element",
            EntityKind::Section => "Section",
            EntityKind::Material => "Material",
            EntityKind::Insulation => "Insulation",
            EntityKind::Code => "Code",
            EntityKind::Sif => "SIF",
            EntityKind::Support => "Support",
            EntityKind::Load => "Load",
            EntityKind::LoadCase => "LoadCase",
            EntityKind::Report => "Report",
        };
        f.write_str(name)
    }
}

/// Implemented by every type stored in a [`Container`]
pub trait Entity {
    const KIND: EntityKind;
}

/// Stable handle to an entity inside its container
pub struct Id<T> {
    raw: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub(crate) fn new(raw: u32) -> Self {
        Self {
            raw,
            marker: PhantomData,
        }
    }

    /// Raw numeric value of the handle
    pub fn raw(self) -> u32 {
        self.raw
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.raw)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Id::new)
    }
}

/// Active-selection policy of a container
pub trait Selection<T>: Default {
    /// Drop `id` from the selection (called before the entity is removed)
    fn forget(&mut self, id: Id<T>);

    fn is_selected(&self, id: Id<T>) -> bool;
}

/// No active selection
#[derive(Debug, Default, Clone, Copy)]
pub struct Unselected;

impl<T> Selection<T> for Unselected {
    fn forget(&mut self, _id: Id<T>) {}

    fn is_selected(&self, _id: Id<T>) -> bool {
        false
    }
}

/// At most one active entity
#[derive(Debug)]
pub struct Single<T>(Option<Id<T>>);

impl<T> Default for Single<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> Selection<T> for Single<T> {
    fn forget(&mut self, id: Id<T>) {
        if self.0 == Some(id) {
            self.0 = None;
        }
    }

    fn is_selected(&self, id: Id<T>) -> bool {
        self.0 == Some(id)
    }
}

/// A batch of active entities
#[derive(Debug)]
pub struct Batch<T>(Vec<Id<T>>);

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Selection<T> for Batch<T> {
    fn forget(&mut self, id: Id<T>) {
        self.0.retain(|active| *active != id);
    }

    fn is_selected(&self, id: Id<T>) -> bool {
        self.0.contains(&id)
    }
}

#[derive(Debug)]
struct Slot<T> {
    name: String,
    value: T,
}

/// Ordered, name-keyed registry of one entity kind
#[derive(Debug)]
pub struct Container<T, S = Unselected> {
    next_id: u32,
    order: Vec<Id<T>>,
    entries: HashMap<Id<T>, Slot<T>>,
    names: HashMap<String, Id<T>>,
    selection: S,
}

impl<T: Entity, S: Selection<T>> Default for Container<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity, S: Selection<T>> Container<T, S> {
    /// Create an empty container
    pub fn new() -> Self {
        Self {
            next_id: 0,
            order: Vec::new(),
            entries: HashMap::new(),
            names: HashMap::new(),
            selection: S::default(),
        }
    }

    /// Register `value` under `name`
    pub fn insert(&mut self, name: &str, value: T) -> PipeResult<Id<T>> {
        if self.names.contains_key(name) {
            return Err(PipeError::DuplicateName {
                kind: T::KIND,
                name: name.to_string(),
            });
        }
        let id = Id::new(self.next_id);
        self.next_id += 1;
        self.order.push(id);
        self.names.insert(name.to_string(), id);
        self.entries.insert(
            id,
            Slot {
                name: name.to_string(),
                value,
            },
        );
        Ok(id)
    }

    /// Give an entity a new name; its position and id are kept
    pub fn rename(&mut self, id: Id<T>, new_name: &str) -> PipeResult<()> {
        match self.names.get(new_name) {
            Some(existing) if *existing == id => return Ok(()),
            Some(_) => {
                return Err(PipeError::DuplicateName {
                    kind: T::KIND,
                    name: new_name.to_string(),
                })
            }
            None => {}
        }
        let slot = self.entries.get_mut(&id).ok_or(PipeError::InvalidId {
            kind: T::KIND,
            id: id.raw(),
        })?;
        let old = std::mem::replace(&mut slot.name, new_name.to_string());
        self.names.remove(&old);
        self.names.insert(new_name.to_string(), id);
        Ok(())
    }

    /// Remove an entity, clearing it from the active selection first
    pub fn remove(&mut self, id: Id<T>) -> PipeResult<T> {
        if !self.entries.contains_key(&id) {
            return Err(self.invalid(id));
        }
        self.selection.forget(id);
        self.order.retain(|other| *other != id);
        let slot = self.entries.remove(&id).ok_or_else(|| self.invalid(id))?;
        self.names.remove(&slot.name);
        Ok(slot.value)
    }

    pub fn get(&self, id: Id<T>) -> PipeResult<&T> {
        self.entries
            .get(&id)
            .map(|slot| &slot.value)
            .ok_or_else(|| self.invalid(id))
    }

    pub fn get_mut(&mut self, id: Id<T>) -> PipeResult<&mut T> {
        let kind = T::KIND;
        self.entries
            .get_mut(&id)
            .map(|slot| &mut slot.value)
            .ok_or(PipeError::InvalidId { kind, id: id.raw() })
    }

    /// Resolve a name to its id
    pub fn by_name(&self, name: &str) -> PipeResult<Id<T>> {
        self.names.get(name).copied().ok_or_else(|| PipeError::NotFound {
            kind: T::KIND,
            name: name.to_string(),
        })
    }

    /// Resolve a name to the entity itself
    pub fn lookup(&self, name: &str) -> PipeResult<&T> {
        self.get(self.by_name(name)?)
    }

    pub fn name(&self, id: Id<T>) -> PipeResult<&str> {
        self.entries
            .get(&id)
            .map(|slot| slot.name.as_str())
            .ok_or_else(|| self.invalid(id))
    }

    /// Identity of an entity: its kind tag and current name
    pub fn identity(&self, id: Id<T>) -> PipeResult<(EntityKind, &str)> {
        Ok((T::KIND, self.name(id)?))
    }

    pub fn contains(&self, id: Id<T>) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = Id<T>> + '_ {
        self.order.iter().copied()
    }

    /// Names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|slot| slot.name.as_str())
    }

    /// `(id, name, entity)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &str, &T)> + '_ {
        self.order.iter().filter_map(|id| {
            self.entries
                .get(id)
                .map(|slot| (*id, slot.name.as_str(), &slot.value))
        })
    }

    /// Mutable access to every entity, in no particular order
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.entries.values_mut().map(|slot| &mut slot.value)
    }

    pub fn is_active(&self, id: Id<T>) -> bool {
        self.selection.is_selected(id)
    }

    fn invalid(&self, id: Id<T>) -> PipeError {
        PipeError::InvalidId {
            kind: T::KIND,
            id: id.raw(),
        }
    }
}

impl<T: Entity> Container<T, Single<T>> {
    /// Make `id` the active entity of this container
    pub fn activate(&mut self, id: Id<T>) -> PipeResult<()> {
        if !self.contains(id) {
            return Err(self.invalid(id));
        }
        self.selection.0 = Some(id);
        Ok(())
    }

    pub fn active(&self) -> Option<Id<T>> {
        self.selection.0
    }

    pub fn deactivate(&mut self) {
        self.selection.0 = None;
    }
}

impl<T: Entity> Container<T, Batch<T>> {
    /// Replace the active batch; nothing changes if any id is unknown
    pub fn activate(&mut self, ids: &[Id<T>]) -> PipeResult<()> {
        if let Some(missing) = ids.iter().find(|id| !self.contains(**id)) {
            return Err(self.invalid(*missing));
        }
        self.selection.0 = ids.to_vec();
        Ok(())
    }

    pub fn active(&self) -> &[Id<T>] {
        &self.selection.0
    }

    pub fn deactivate(&mut self) {
        self.selection.0.clear();
    }
}

/// Mutable view of a container that can rename and select entities but not
/// insert or remove them
///
/// Reads go through [`Deref`] to the underlying [`Container`].
#[derive(Debug)]
pub struct Selector<'a, T, S = Unselected> {
    inner: &'a mut Container<T, S>,
}

impl<'a, T: Entity, S: Selection<T>> Selector<'a, T, S> {
    pub(crate) fn new(inner: &'a mut Container<T, S>) -> Self {
        Self { inner }
    }

    pub fn rename(&mut self, id: Id<T>, new_name: &str) -> PipeResult<()> {
        self.inner.rename(id, new_name)
    }
}

impl<T, S> Deref for Selector<'_, T, S> {
    type Target = Container<T, S>;

    fn deref(&self) -> &Container<T, S> {
        &*self.inner
    }
}

impl<T: Entity> Selector<'_, T, Single<T>> {
    pub fn activate(&mut self, id: Id<T>) -> PipeResult<()> {
        self.inner.activate(id)
    }

    pub fn deactivate(&mut self) {
        self.inner.deactivate();
    }
}

impl<T: Entity> Selector<'_, T, Batch<T>> {
    pub fn activate(&mut self, ids: &[Id<T>]) -> PipeResult<()> {
        self.inner.activate(ids)
    }

    pub fn deactivate(&mut self) {
        self.inner.deactivate();
    }
}

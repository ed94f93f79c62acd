//! Collision detection: sparse bitmap colliders and the pairwise manager.
//!
//! Colliders live in a generation-checked slot arena owned by the
//! `CollisionManager`; objects hold stable `ColliderId` handles and free them
//! explicitly on destruction, so a stale handle can never alias a reused
//! slot. The manager itself is a plain value owned by the game state rather
//! than an ambient singleton, which also makes independent worlds trivial to
//! set up in tests.
//!
//! Handler registration is kept order-independent via `TypePair`, but the
//! manager does not store callbacks: `update()` emits one `Contact` record
//! per overlapping instance pair per registered handler, and the game state
//! owns the dispatch table keyed by `HandlerId`. This preserves the
//! observable contract (fire once per pair per tick, subject/other in the
//! registered orientation) without aliasing mutable world state here.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tui_starfire_types::{Point, Rect};

use crate::state::ObjectId;

/// Unordered pair of collider type tags.
///
/// Equality and hashing are order-independent: the pair is canonicalized on
/// construction so `TypePair::new("a", "b") == TypePair::new("b", "a")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypePair {
    lo: String,
    hi: String,
}

impl TypePair {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self {
                lo: a.to_string(),
                hi: b.to_string(),
            }
        } else {
            Self {
                lo: b.to_string(),
                hi: a.to_string(),
            }
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.lo == tag || self.hi == tag
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColliderError {
    /// A collider bitmap must have at least one row.
    #[error("collider bitmap for type '{0}' has no rows")]
    EmptyShape(String),
}

/// A sparse bitmap positioned in world space, tagged with its owner's type.
///
/// Solid cells are the non-blank cells of the bitmap. A collider whose solid
/// set is empty (an all-blank bitmap) is legal and never reports collision
/// with anything.
#[derive(Debug, Clone)]
pub struct Collider {
    tag: String,
    solid: Vec<Point>,
    bbox_w: i32,
    bbox_h: i32,
    pos: Point,
    owner: ObjectId,
}

impl Collider {
    /// Build from a bitmap where any non-space character marks a solid cell.
    pub fn new(
        tag: &str,
        bitmap: &[&str],
        pos: Point,
        owner: ObjectId,
    ) -> Result<Self, ColliderError> {
        if bitmap.is_empty() {
            return Err(ColliderError::EmptyShape(tag.to_string()));
        }
        let mut solid = Vec::new();
        for (y, row) in bitmap.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                if glyph != ' ' {
                    solid.push(Point::new(x as i32, y as i32));
                }
            }
        }
        let bbox_w = bitmap.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let bbox_h = bitmap.len() as i32;
        Ok(Self {
            tag: tag.to_string(),
            solid,
            bbox_w,
            bbox_h,
            pos,
            owner,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    fn world_bbox(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.bbox_w, self.bbox_h)
    }

    fn world_cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.solid.iter().map(move |&c| c + self.pos)
    }
}

/// Stable handle into the collision manager's collider arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId {
    index: u32,
    generation: u32,
}

/// Opaque token identifying one registered handler direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u32);

/// One overlap detected by `CollisionManager::update`.
///
/// `subject` is the collider whose tag matched the handler's subject side;
/// `other` is its counterpart, mirroring the registration direction.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub handler: HandlerId,
    pub subject: ColliderId,
    pub other: ColliderId,
    pub subject_owner: ObjectId,
    pub other_owner: ObjectId,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    collider: Option<Collider>,
}

#[derive(Debug, Clone)]
struct Handler {
    id: HandlerId,
    subject_tag: String,
}

/// Registry of live colliders and registered type-pair handlers.
#[derive(Debug, Default)]
pub struct CollisionManager {
    slots: Vec<Slot>,
    free: Vec<u32>,
    handlers: HashMap<TypePair, Vec<Handler>>,
    next_handler: u32,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            generation: 0,
            collider: None,
        }
    }
}

impl CollisionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a collider into the arena, returning its stable handle.
    pub fn insert(&mut self, collider: Collider) -> ColliderId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.collider = Some(collider);
            ColliderId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                collider: Some(collider),
            });
            ColliderId {
                index,
                generation: 0,
            }
        }
    }

    /// Free a collider. Returns false when the handle is already stale.
    pub fn remove(&mut self, id: ColliderId) -> bool {
        match self.slots.get_mut(id.index as usize) {
            Some(slot) if slot.generation == id.generation && slot.collider.is_some() => {
                slot.collider = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, id: ColliderId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.collider.as_ref())
    }

    /// Push an owner's current position into its collider.
    ///
    /// Owners call this every frame before detection; the manager always
    /// tests against the most recent positions.
    pub fn set_position(&mut self, id: ColliderId, pos: Point) {
        if let Some(slot) = self
            .slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
        {
            if let Some(c) = slot.collider.as_mut() {
                c.pos = pos;
            }
        }
    }

    /// Count of live colliders (test and diagnostics helper).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.collider.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact overlap test between two colliders.
    ///
    /// Bounding boxes are compared first as a cheap rejection; only on
    /// overlap are the solid cell sets intersected in world coordinates.
    /// Symmetric: `check_collision(a, b) == check_collision(b, a)`.
    pub fn check_collision(&self, a: ColliderId, b: ColliderId) -> bool {
        let (ca, cb) = match (self.get(a), self.get(b)) {
            (Some(ca), Some(cb)) => (ca, cb),
            _ => return false,
        };
        Self::overlaps(ca, cb)
    }

    fn overlaps(ca: &Collider, cb: &Collider) -> bool {
        if !ca.world_bbox().intersects(&cb.world_bbox()) {
            return false;
        }
        // Hash the smaller solid set, probe with the larger.
        let (small, large) = if ca.solid.len() <= cb.solid.len() {
            (ca, cb)
        } else {
            (cb, ca)
        };
        let cells: HashSet<Point> = small.world_cells().collect();
        large.world_cells().any(|p| cells.contains(&p))
    }

    /// Register a handler for overlaps between `subject_tag` and `other_tag`.
    ///
    /// Internally keyed by the unordered `TypePair`, so one registration
    /// covers both collision directions; two handlers may coexist for a pair
    /// (one per side), each receiving subject/other in its own orientation.
    pub fn add_handler(&mut self, subject_tag: &str, other_tag: &str) -> HandlerId {
        let id = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.handlers
            .entry(TypePair::new(subject_tag, other_tag))
            .or_default()
            .push(Handler {
                id,
                subject_tag: subject_tag.to_string(),
            });
        id
    }

    /// Run pairwise detection over every registered type pair.
    ///
    /// Emits one `Contact` per overlapping (colliderA, colliderB) instance
    /// pair per registered handler. Detection is mutation-free over a stable
    /// snapshot; callers that destroy objects while dispatching must skip
    /// contacts whose colliders have since been freed (`contains`).
    pub fn update(&self) -> Vec<Contact> {
        // Bucket live collider ids by tag once per tick.
        let mut by_tag: HashMap<&str, Vec<(ColliderId, &Collider)>> = HashMap::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(c) = slot.collider.as_ref() {
                by_tag.entry(c.tag()).or_default().push((
                    ColliderId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    c,
                ));
            }
        }

        let mut contacts = Vec::new();
        for (pair, handlers) in &self.handlers {
            if pair.lo == pair.hi {
                // Same-tag pair: unordered combinations, no self-collision.
                let Some(list) = by_tag.get(pair.lo.as_str()) else {
                    continue;
                };
                for i in 0..list.len() {
                    for j in (i + 1)..list.len() {
                        let (ia, ca) = list[i];
                        let (ib, cb) = list[j];
                        if Self::overlaps(ca, cb) {
                            for h in handlers {
                                contacts.push(Contact {
                                    handler: h.id,
                                    subject: ia,
                                    other: ib,
                                    subject_owner: ca.owner,
                                    other_owner: cb.owner,
                                });
                            }
                        }
                    }
                }
            } else {
                let (Some(lo_list), Some(hi_list)) =
                    (by_tag.get(pair.lo.as_str()), by_tag.get(pair.hi.as_str()))
                else {
                    continue;
                };
                for &(ilo, clo) in lo_list {
                    for &(ihi, chi) in hi_list {
                        if Self::overlaps(clo, chi) {
                            for h in handlers {
                                let (subject, other, s_own, o_own) = if h.subject_tag == pair.lo {
                                    (ilo, ihi, clo.owner, chi.owner)
                                } else {
                                    (ihi, ilo, chi.owner, clo.owner)
                                };
                                contacts.push(Contact {
                                    handler: h.id,
                                    subject,
                                    other,
                                    subject_owner: s_own,
                                    other_owner: o_own,
                                });
                            }
                        }
                    }
                }
            }
        }
        contacts
    }
}

//! Continuous-time gathering detection for one simulation tick.
//!
//! Movement is linearly interpolated between a gatherer's start and end
//! position over the normalized interval [0, 1]. Instead of sampling discrete
//! sub-steps, the detector solves the closest approach between each moving
//! gatherer and each stationary item analytically, so fast gatherers cannot
//! tunnel past small items within a tick.

use crate::geom::Point2D;
use serde::{Deserialize, Serialize};

/// Closest-approach relationship between a moving gatherer and a fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectionResult {
    /// Squared perpendicular distance from the point to the line of travel.
    pub sq_distance: f64,
    /// Fraction of the travel segment at which the closest approach occurs.
    /// Not clamped; values outside [0, 1] mean the closest line point falls
    /// before the start or after the end of travel.
    pub proj_ratio: f64,
}

impl CollectionResult {
    /// Whether the point is captured within `collect_radius` of the traveled
    /// segment. Both the projection range and the radius boundary are
    /// inclusive.
    pub fn is_collected(&self, collect_radius: f64) -> bool {
        self.proj_ratio >= 0.0
            && self.proj_ratio <= 1.0
            && self.sq_distance <= collect_radius * collect_radius
    }
}

/// Computes the closest approach between a point moving linearly from `a` to
/// `b` over one tick and the stationary point `c`.
///
/// A zero-length segment reports the squared distance from `a` with
/// `proj_ratio` 0: a gatherer standing still can only capture at its own
/// position, at the very start of the tick. This is a deliberate special
/// case, not just a divide-by-zero guard.
pub fn try_collect_point(a: Point2D, b: Point2D, c: Point2D) -> CollectionResult {
    let u = a.vector_to(c);
    let v = a.vector_to(b);
    let sq_v = v.sq_length();

    if sq_v == 0.0 {
        return CollectionResult {
            sq_distance: u.sq_length(),
            proj_ratio: 0.0,
        };
    }

    let proj_ratio = u.dot(&v) / sq_v;
    // Pythagorean relation: hypotenuse squared minus the projected leg
    // squared. Algebraically never negative for finite inputs.
    let sq_distance = u.sq_length() - proj_ratio * proj_ratio * sq_v;

    CollectionResult {
        sq_distance,
        proj_ratio,
    }
}

/// A stationary capture target (a lost object or an office).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub position: Point2D,
    /// Diameter of the target; its capture radius is `width / 2`.
    pub width: f64,
}

/// An agent moving in a straight line over one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gatherer {
    pub start_pos: Point2D,
    pub end_pos: Point2D,
    /// Diameter of the agent; its capture radius is `width / 2`.
    pub width: f64,
}

/// Read-only indexed view of the items and gatherers participating in one
/// tick. The detector copies entries out by value and retains nothing, so
/// callers may build a provider per call from ephemeral state.
pub trait ItemGathererProvider {
    fn items_count(&self) -> usize;
    fn item(&self, idx: usize) -> Item;
    fn gatherers_count(&self) -> usize;
    fn gatherer(&self, idx: usize) -> Gatherer;
}

/// Vec-backed provider, sufficient for the per-tick cardinalities of a game
/// session (players plus loot plus offices).
#[derive(Debug, Clone, Default)]
pub struct VecItemGathererProvider {
    items: Vec<Item>,
    gatherers: Vec<Gatherer>,
}

impl VecItemGathererProvider {
    pub fn new(items: Vec<Item>, gatherers: Vec<Gatherer>) -> Self {
        Self { items, gatherers }
    }
}

impl ItemGathererProvider for VecItemGathererProvider {
    fn items_count(&self) -> usize {
        self.items.len()
    }

    fn item(&self, idx: usize) -> Item {
        self.items[idx]
    }

    fn gatherers_count(&self) -> usize {
        self.gatherers.len()
    }

    fn gatherer(&self, idx: usize) -> Gatherer {
        self.gatherers[idx]
    }
}

/// A gatherer reaching an item within the tick.
///
/// Indices refer to the provider the event was produced from; `time` is the
/// fraction of the tick at which the capture happens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GatheringEvent {
    pub item_id: usize,
    pub gatherer_id: usize,
    pub sq_distance: f64,
    pub time: f64,
}

/// Finds every (item, gatherer) pair where the gatherer reaches the item
/// during the tick, sorted ascending by capture time.
///
/// Every qualifying pair is reported, including several gatherers reaching
/// the same item. Exclusivity (an item that may only be picked up once) is
/// the caller's policy: consume the events in order and skip the ones whose
/// item is already gone. The sort is stable, so events with identical times
/// keep gatherer-major, item-minor enumeration order.
pub fn find_gather_events<P: ItemGathererProvider>(provider: &P) -> Vec<GatheringEvent> {
    let mut events = Vec::new();

    for g in 0..provider.gatherers_count() {
        let gatherer = provider.gatherer(g);
        for i in 0..provider.items_count() {
            let item = provider.item(i);
            let result = try_collect_point(gatherer.start_pos, gatherer.end_pos, item.position);
            let collect_radius = item.width / 2.0 + gatherer.width / 2.0;
            if result.is_collected(collect_radius) {
                events.push(GatheringEvent {
                    item_id: i,
                    gatherer_id: g,
                    sq_distance: result.sq_distance,
                    time: result.proj_ratio,
                });
            }
        }
    }

    events.sort_by(|l, r| l.time.total_cmp(&r.time));
    events
}

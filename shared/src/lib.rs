//! Shared game math used by the authoritative server simulation.
//!
//! `geom` holds the 2D primitives, `collision` the continuous-time gathering
//! detector that decides which moving gatherer reaches which stationary item
//! within one tick.

pub mod collision;
pub mod geom;

pub use collision::{
    find_gather_events, try_collect_point, CollectionResult, Gatherer, GatheringEvent, Item,
    ItemGathererProvider, VecItemGathererProvider,
};
pub use geom::{Point2D, Vec2D};

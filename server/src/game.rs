//! Authoritative game state and the per-tick simulation
//!
//! A [`GameSession`] owns the dogs and lost objects playing on one map. Each
//! tick it moves the dogs along the roads, feeds the traveled segments into
//! the shared gathering detector, applies the resulting events in
//! chronological order (loot pickups, office deposits), retires dogs that
//! stand idle for too long, and spawns new loot.

use crate::loot::LootGenerator;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{find_gather_events, Gatherer, Item, Point2D, Vec2D, VecItemGathererProvider};
use std::collections::BTreeMap;
use std::time::Duration;

pub const MILLISECONDS_IN_SECOND: f64 = 1000.0;
/// Full width of a road; dogs may stray half of it off the center line.
pub const ROAD_WIDTH: f64 = 0.8;
/// Lost objects are points, collectable only by overlap with the dog.
pub const ITEM_WIDTH: f64 = 0.0;
pub const DOG_WIDTH: f64 = 0.6;
pub const OFFICE_WIDTH: f64 = 0.5;

/// Movement direction of a dog. The map's y-axis grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Velocity vector for moving in this direction at `speed` units/second.
    pub fn velocity(self, speed: f64) -> Vec2D {
        match self {
            Direction::Up => Vec2D::new(0.0, -speed),
            Direction::Down => Vec2D::new(0.0, speed),
            Direction::Left => Vec2D::new(-speed, 0.0),
            Direction::Right => Vec2D::new(speed, 0.0),
        }
    }
}

/// A lost object waiting on the map to be picked up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Loot {
    pub type_index: usize,
    pub position: Point2D,
}

/// Scoring value of one loot type. Indices into [`Map::loot_types`] are the
/// `type_index` carried by loot and bag slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootType {
    pub value: u64,
}

/// Axis-aligned road segment dogs are allowed to walk on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Road {
    start: Point2D,
    end: Point2D,
}

impl Road {
    pub fn horizontal(start: Point2D, end_x: f64) -> Self {
        Self {
            start,
            end: Point2D::new(end_x, start.y),
        }
    }

    pub fn vertical(start: Point2D, end_y: f64) -> Self {
        Self {
            start,
            end: Point2D::new(start.x, end_y),
        }
    }

    pub fn start(&self) -> Point2D {
        self.start
    }

    pub fn end(&self) -> Point2D {
        self.end
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    /// Walkable area of the road, padded by half the road width on all sides.
    pub fn bounds(&self) -> RoadBounds {
        RoadBounds {
            min_x: self.start.x.min(self.end.x) - ROAD_WIDTH / 2.0,
            max_x: self.start.x.max(self.end.x) + ROAD_WIDTH / 2.0,
            min_y: self.start.y.min(self.end.y) - ROAD_WIDTH / 2.0,
            max_y: self.start.y.max(self.end.y) + ROAD_WIDTH / 2.0,
        }
    }
}

/// Rectangular walkable area, the union of one or more road bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl RoadBounds {
    pub fn contains(&self, point: Point2D) -> bool {
        self.min_x <= point.x
            && point.x <= self.max_x
            && self.min_y <= point.y
            && point.y <= self.max_y
    }

    pub fn merge(&self, other: &RoadBounds) -> RoadBounds {
        RoadBounds {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// A drop-off point. Depositing a bag here converts its contents to score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Office {
    pub position: Point2D,
}

/// Static map description: where dogs may walk, where they deliver, and what
/// the loot is worth. `dog_speed` and `bag_capacity` override the game-wide
/// defaults when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Map {
    pub roads: Vec<Road>,
    pub offices: Vec<Office>,
    pub loot_types: Vec<LootType>,
    pub dog_speed: Option<f64>,
    pub bag_capacity: Option<usize>,
}

/// One picked-up loot object carried in a dog's bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagSlot {
    pub loot_id: u32,
    pub type_index: usize,
}

/// A player's avatar roaming the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dog {
    pub id: u64,
    pub name: String,
    pub pos: Point2D,
    pub dir: Direction,
    /// Current velocity in units/second. Zero while the dog stands still.
    pub speed: Vec2D,
    /// Speed the dog moves at when given a direction.
    pub max_speed: f64,
    pub bag: Vec<BagSlot>,
    pub bag_capacity: usize,
    pub score: u64,
    /// Time spent standing still, counted toward retirement.
    pub time_standing_ms: f64,
    pub time_playing_ms: f64,
    /// Set when a road edge stopped the dog mid-tick; such a dog is not
    /// charged retirement time for that tick.
    pub stopped_this_tick: bool,
}

impl Dog {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            pos: Point2D::default(),
            dir: Direction::Up,
            speed: Vec2D::default(),
            max_speed: 0.0,
            bag: Vec::new(),
            bag_capacity: 0,
            score: 0,
            time_standing_ms: 0.0,
            time_playing_ms: 0.0,
            stopped_this_tick: false,
        }
    }

    /// Starts moving in the given direction, or stops on `None`. Stopping
    /// keeps the current facing.
    pub fn change_direction(&mut self, dir: Option<Direction>) {
        match dir {
            Some(dir) => {
                self.dir = dir;
                self.speed = dir.velocity(self.max_speed);
            }
            None => {
                self.speed = Vec2D::default();
            }
        }
    }
}

/// Record of a dog removed for inactivity. Persisting these (e.g. to a
/// database of retired players) is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetiredDog {
    pub name: String,
    pub score: u64,
    pub play_time_ms: u64,
}

/// Authoritative state of one game session on one map.
#[derive(Debug)]
pub struct GameSession {
    map: Map,
    // Ordered maps keep gatherer and item enumeration deterministic across
    // ticks, which in turn keeps tie-breaking of simultaneous events stable.
    dogs: BTreeMap<u64, Dog>,
    lost_objects: BTreeMap<u32, Loot>,
    next_dog_id: u64,
    next_loot_id: u32,
    dog_speed: f64,
    bag_capacity: usize,
    retirement_time_ms: f64,
}

impl GameSession {
    /// Creates a session for `map`, taking the map's speed and bag capacity
    /// overrides where present and the game-wide defaults otherwise.
    pub fn new(
        map: Map,
        default_dog_speed: f64,
        default_bag_capacity: usize,
        retirement_time_ms: f64,
    ) -> Self {
        let dog_speed = map.dog_speed.unwrap_or(default_dog_speed);
        let bag_capacity = map.bag_capacity.unwrap_or(default_bag_capacity);
        Self {
            map,
            dogs: BTreeMap::new(),
            lost_objects: BTreeMap::new(),
            next_dog_id: 0,
            next_loot_id: 0,
            dog_speed,
            bag_capacity,
            retirement_time_ms,
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn dogs(&self) -> &BTreeMap<u64, Dog> {
        &self.dogs
    }

    pub fn dog(&self, id: u64) -> Option<&Dog> {
        self.dogs.get(&id)
    }

    pub fn dog_mut(&mut self, id: u64) -> Option<&mut Dog> {
        self.dogs.get_mut(&id)
    }

    pub fn lost_objects(&self) -> &BTreeMap<u32, Loot> {
        &self.lost_objects
    }

    /// Adds a dog to the session and returns its id. The dog spawns either
    /// at a random road position or at the start of the first road.
    pub fn add_dog(&mut self, name: &str, randomize_spawn: bool, rng: &mut impl Rng) -> u64 {
        self.next_dog_id += 1;
        let id = self.next_dog_id;

        let pos = if randomize_spawn && !self.map.roads.is_empty() {
            self.random_road_position(rng)
        } else {
            self.map
                .roads
                .first()
                .map(|road| road.start())
                .unwrap_or_default()
        };

        let mut dog = Dog::new(id, name);
        dog.pos = pos;
        dog.max_speed = self.dog_speed;
        dog.bag_capacity = self.bag_capacity;

        info!("Dog {} ({}) joined at ({}, {})", id, name, pos.x, pos.y);
        self.dogs.insert(id, dog);
        id
    }

    /// Removes a dog regardless of retirement state (e.g. player left).
    pub fn remove_dog(&mut self, id: u64) -> Option<Dog> {
        let dog = self.dogs.remove(&id);
        if dog.is_some() {
            info!("Dog {} removed", id);
        }
        dog
    }

    /// Puts a lost object on the map at a fixed position and returns its id.
    pub fn place_loot(&mut self, type_index: usize, position: Point2D) -> u32 {
        let id = self.next_loot_id;
        self.next_loot_id += 1;
        self.lost_objects.insert(id, Loot {
            type_index,
            position,
        });
        id
    }

    /// Advances the session by `delta_ms` of game time.
    ///
    /// Runs one full simulation step: road-bounded movement, gathering
    /// detection over the traveled segments, event application in capture
    /// order, retirement of idle dogs, and loot generation. Returns the dogs
    /// retired during this tick.
    pub fn tick(
        &mut self,
        delta_ms: u64,
        loot_generator: &mut LootGenerator,
        rng: &mut impl Rng,
    ) -> Vec<RetiredDog> {
        let delta = delta_ms as f64;
        let delta_s = delta / MILLISECONDS_IN_SECOND;

        // Move every dog, remembering pre- and post-move positions as its
        // travel segment for the gathering detector.
        let mut gatherers = Vec::with_capacity(self.dogs.len());
        let mut gatherer_to_dog = Vec::with_capacity(self.dogs.len());
        for (id, dog) in self.dogs.iter_mut() {
            let start_pos = dog.pos;

            let mut bounds: Option<RoadBounds> = None;
            for road in &self.map.roads {
                let road_bounds = road.bounds();
                if road_bounds.contains(start_pos) {
                    bounds = Some(match bounds {
                        Some(acc) => acc.merge(&road_bounds),
                        None => road_bounds,
                    });
                }
            }

            dog.pos.x += dog.speed.x * delta_s;
            dog.pos.y += dog.speed.y * delta_s;

            if let Some(bounds) = bounds {
                if dog.pos.x < bounds.min_x {
                    dog.time_standing_ms =
                        (bounds.min_x - dog.pos.x) / dog.speed.x.abs() * MILLISECONDS_IN_SECOND;
                    dog.stopped_this_tick = true;
                    dog.pos.x = bounds.min_x;
                    dog.speed = Vec2D::default();
                }
                if dog.pos.x > bounds.max_x {
                    dog.time_standing_ms =
                        (dog.pos.x - bounds.max_x) / dog.speed.x.abs() * MILLISECONDS_IN_SECOND;
                    dog.stopped_this_tick = true;
                    dog.pos.x = bounds.max_x;
                    dog.speed = Vec2D::default();
                }
                if dog.pos.y < bounds.min_y {
                    dog.time_standing_ms =
                        (bounds.min_y - dog.pos.y) / dog.speed.y.abs() * MILLISECONDS_IN_SECOND;
                    dog.stopped_this_tick = true;
                    dog.pos.y = bounds.min_y;
                    dog.speed = Vec2D::default();
                }
                if dog.pos.y > bounds.max_y {
                    dog.time_standing_ms =
                        (dog.pos.y - bounds.max_y) / dog.speed.y.abs() * MILLISECONDS_IN_SECOND;
                    dog.stopped_this_tick = true;
                    dog.pos.y = bounds.max_y;
                    dog.speed = Vec2D::default();
                }
            }

            gatherers.push(Gatherer {
                start_pos,
                end_pos: dog.pos,
                width: DOG_WIDTH,
            });
            gatherer_to_dog.push(*id);
        }

        // Items for the detector: lost objects first, then one synthetic
        // item per office.
        let mut items = Vec::with_capacity(self.lost_objects.len() + self.map.offices.len());
        let mut item_to_loot = Vec::with_capacity(self.lost_objects.len());
        for (loot_id, loot) in &self.lost_objects {
            items.push(Item {
                position: loot.position,
                width: ITEM_WIDTH,
            });
            item_to_loot.push(*loot_id);
        }
        let loot_item_count = items.len();
        for office in &self.map.offices {
            items.push(Item {
                position: office.position,
                width: OFFICE_WIDTH,
            });
        }

        let provider = VecItemGathererProvider::new(items, gatherers);
        for event in find_gather_events(&provider) {
            let dog_id = gatherer_to_dog[event.gatherer_id];
            let Some(dog) = self.dogs.get_mut(&dog_id) else {
                continue;
            };

            if event.item_id < loot_item_count {
                // Loot pickup: first dog to reach it wins; later events for
                // the same object find it gone and are skipped here, not in
                // the detector.
                let loot_id = item_to_loot[event.item_id];
                if dog.bag.len() < dog.bag_capacity {
                    if let Some(loot) = self.lost_objects.remove(&loot_id) {
                        debug!("Dog {} picked up loot {} (type {})", dog_id, loot_id, loot.type_index);
                        dog.bag.push(BagSlot {
                            loot_id,
                            type_index: loot.type_index,
                        });
                    }
                }
            } else {
                // Office deposit: everything in the bag is scored and the
                // bag emptied.
                if !dog.bag.is_empty() {
                    let gained: u64 = dog
                        .bag
                        .iter()
                        .map(|slot| self.map.loot_types[slot.type_index].value)
                        .sum();
                    dog.score += gained;
                    info!(
                        "Dog {} delivered {} objects for {} points",
                        dog_id,
                        dog.bag.len(),
                        gained
                    );
                    dog.bag.clear();
                }
            }
        }

        // Retirement accounting. Dogs stopped by a road edge this tick only
        // accrue play time; dogs idle by choice accrue standing time until
        // the retirement threshold.
        let mut retired = Vec::new();
        let mut to_retire = Vec::new();
        for (id, dog) in self.dogs.iter_mut() {
            if dog.stopped_this_tick {
                dog.time_playing_ms += delta;
                dog.stopped_this_tick = false;
                continue;
            }
            if dog.speed.x == 0.0 && dog.speed.y == 0.0 {
                if dog.time_standing_ms + delta >= self.retirement_time_ms {
                    dog.time_playing_ms += self.retirement_time_ms - dog.time_standing_ms;
                    to_retire.push(*id);
                } else {
                    dog.time_standing_ms += delta;
                    dog.time_playing_ms += delta;
                }
            } else {
                dog.time_standing_ms = 0.0;
                dog.time_playing_ms += delta;
            }
        }
        for id in to_retire {
            if let Some(dog) = self.dogs.remove(&id) {
                info!("Dog {} ({}) retired with score {}", dog.id, dog.name, dog.score);
                retired.push(RetiredDog {
                    name: dog.name,
                    score: dog.score,
                    play_time_ms: dog.time_playing_ms.round() as u64,
                });
            }
        }

        // Spawn new loot for the next ticks.
        let spawned = loot_generator.generate(
            Duration::from_millis(delta_ms),
            self.lost_objects.len() as u64,
            self.dogs.len() as u64,
        );
        if spawned > 0 && !self.map.loot_types.is_empty() && !self.map.roads.is_empty() {
            for _ in 0..spawned {
                let type_index = rng.gen_range(0..self.map.loot_types.len());
                let position = self.random_road_position(rng);
                self.place_loot(type_index, position);
            }
            debug!("Spawned {} loot objects", spawned);
        }

        retired
    }

    fn random_road_position(&self, rng: &mut impl Rng) -> Point2D {
        let road = &self.map.roads[rng.gen_range(0..self.map.roads.len())];
        let bounds = road.bounds();
        Point2D::new(
            rng.gen_range(bounds.min_x..bounds.max_x),
            rng.gen_range(bounds.min_y..bounds.max_y),
        )
    }
}

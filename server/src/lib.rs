//! # Game Server Core Library
//!
//! This library provides the authoritative server-side simulation for the
//! loot-gathering multiplayer game. Players steer dogs across a map of
//! roads, pick up lost objects, and deliver them to offices for score. The
//! canonical game state lives here; transport, persistence, and scheduling
//! are left to the embedding application.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Simulation
//! Each [`game::GameSession`] owns the definitive state of one map: dog
//! positions and velocities, bags and scores, and the lost objects waiting
//! to be picked up. All gameplay decisions are made inside the session's
//! tick.
//!
//! ### Continuous-Time Gathering
//! Pickups and deposits are resolved with the `shared` crate's gathering
//! detector: each dog's movement within a tick becomes a travel segment, and
//! the closest approach to every object is solved analytically. Events are
//! applied in chronological order, so two dogs racing for the same object
//! are arbitrated by who actually reaches it first, not by enumeration
//! order or sampling luck.
//!
//! ### World Upkeep
//! The session retires dogs that stand idle past a configurable threshold
//! (reporting them to the caller for persistence) and replenishes loot via
//! the [`loot::LootGenerator`], which bounds generation by the shortage of
//! loot relative to the number of dogs hunting it.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The map model (roads, offices, loot types), dogs, and the per-tick
//! simulation: road-bounded movement, gathering event application,
//! retirement, and loot spawning.
//!
//! ### Loot Module (`loot`)
//! Time-decayed probabilistic loot generation, deterministic by default and
//! injectable with a custom random source for testing.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::game::{Direction, GameSession, LootType, Map, Office, Road};
//! use server::loot::LootGenerator;
//! use shared::Point2D;
//! use std::time::Duration;
//!
//! let map = Map {
//!     roads: vec![Road::horizontal(Point2D::new(0.0, 0.0), 20.0)],
//!     offices: vec![Office { position: Point2D::new(0.0, 0.0) }],
//!     loot_types: vec![LootType { value: 10 }],
//!     dog_speed: None,
//!     bag_capacity: None,
//! };
//!
//! let mut session = GameSession::new(map, 4.0, 3, 60_000.0);
//! let mut generator = LootGenerator::new(Duration::from_secs(5), 0.25);
//! let mut rng = rand::thread_rng();
//!
//! let id = session.add_dog("Rex", true, &mut rng);
//! session.dog_mut(id).unwrap().change_direction(Some(Direction::Right));
//!
//! // The caller drives the clock; one 50 ms tick moves the dogs, applies
//! // pickups and deposits in capture order, and reports retired dogs.
//! let retired = session.tick(50, &mut generator, &mut rng);
//! assert!(retired.is_empty());
//! ```
//!
//! ## What This Crate Does Not Do
//!
//! Network transport, HTTP APIs, JSON endpoints, map/config file loading,
//! database persistence of retired players, and tick scheduling all live in
//! the embedding application. The session is synchronous and single-threaded
//! per instance; independent sessions may tick concurrently.

pub mod game;
pub mod loot;

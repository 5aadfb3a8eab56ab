//! Integration tests for the loot-gathering game core
//!
//! These tests validate cross-crate behavior: the server session driving the
//! shared gathering detector over multiple ticks, and the detector's provider
//! abstraction working over caller-defined storage.

use assert_approx_eq::assert_approx_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use server::game::{Direction, GameSession, LootType, Map, Office, Road};
use server::loot::LootGenerator;
use shared::{find_gather_events, Gatherer, Item, ItemGathererProvider, Point2D};
use std::time::Duration;

/// DETECTOR CONTRACT TESTS
mod detector_contract_tests {
    use super::*;

    /// A provider backed by borrowed slices instead of owned vectors; the
    /// detector is generic over anything exposing the four accessors.
    struct SliceProvider<'a> {
        items: &'a [Item],
        gatherers: &'a [Gatherer],
    }

    impl ItemGathererProvider for SliceProvider<'_> {
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

    /// Tests the detector over a caller-defined provider implementation
    #[test]
    fn detector_works_over_custom_provider() {
        let items = [
            Item {
                position: Point2D::new(4.0, 0.0),
                width: 0.0,
            },
            Item {
                position: Point2D::new(2.0, 0.0),
                width: 0.0,
            },
        ];
        let gatherers = [Gatherer {
            start_pos: Point2D::new(0.0, 0.0),
            end_pos: Point2D::new(8.0, 0.0),
            width: 0.6,
        }];

        let events = find_gather_events(&SliceProvider {
            items: &items,
            gatherers: &gatherers,
        });

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].item_id, 1);
        assert_approx_eq!(events[0].time, 0.25, 1e-10);
        assert_eq!(events[1].item_id, 0);
        assert_approx_eq!(events[1].time, 0.5, 1e-10);
    }
}

/// GAMEPLAY INTEGRATION TESTS
mod gameplay_tests {
    use super::*;

    /// Tests a full pickup-and-delivery cycle spread over several ticks
    #[test]
    fn delivery_cycle_across_ticks() {
        let mut rng = test_rng();
        let mut session = GameSession::new(test_map(), 2.0, 3, NO_RETIREMENT);
        let id = session.add_dog("Rex", false, &mut rng);
        session.place_loot(0, Point2D::new(5.0, 0.0));
        session
            .dog_mut(id)
            .unwrap()
            .change_direction(Some(Direction::Right));

        // Tick 1-2: x reaches 4, the object at x = 5 is still ahead.
        session.tick(1000, &mut quiet_generator(), &mut rng);
        session.tick(1000, &mut quiet_generator(), &mut rng);
        assert!(session.dog(id).unwrap().bag.is_empty());
        assert_eq!(session.lost_objects().len(), 1);

        // Tick 3 crosses x = 5: the object moves into the bag.
        session.tick(1000, &mut quiet_generator(), &mut rng);
        assert_eq!(session.dog(id).unwrap().bag.len(), 1);
        assert!(session.lost_objects().is_empty());

        // Tick 4-5 cross the office at x = 9: bag scored and emptied.
        session.tick(1000, &mut quiet_generator(), &mut rng);
        session.tick(1000, &mut quiet_generator(), &mut rng);
        let dog = session.dog(id).unwrap();
        assert_eq!(dog.score, 10);
        assert!(dog.bag.is_empty());
    }

    /// Tests that the dog reaching an object earlier in the tick claims it
    #[test]
    fn closer_dog_wins_the_race_and_delivers() {
        let mut rng = test_rng();
        let mut session = GameSession::new(test_map(), 10.0, 3, NO_RETIREMENT);
        let slow = session.add_dog("Slow", false, &mut rng);
        let fast = session.add_dog("Fast", false, &mut rng);
        session.dog_mut(fast).unwrap().pos = Point2D::new(2.0, 0.0);
        session.place_loot(0, Point2D::new(5.0, 0.0));
        session
            .dog_mut(slow)
            .unwrap()
            .change_direction(Some(Direction::Right));
        session
            .dog_mut(fast)
            .unwrap()
            .change_direction(Some(Direction::Right));

        // Within the single tick the near dog picks the object up first and
        // carries it through the office; the far dog finds nothing left.
        session.tick(1000, &mut quiet_generator(), &mut rng);

        assert_eq!(session.dog(fast).unwrap().score, 10);
        assert!(session.dog(fast).unwrap().bag.is_empty());
        assert_eq!(session.dog(slow).unwrap().score, 0);
        assert!(session.lost_objects().is_empty());
    }

    /// Tests the whole dog lifecycle: deliver, idle out, get reported
    #[test]
    fn dog_delivers_then_retires() {
        let mut rng = test_rng();
        let mut map = test_map();
        map.offices = vec![Office {
            position: Point2D::new(4.0, 0.0),
        }];
        let mut session = GameSession::new(map, 2.0, 3, 3000.0);
        let id = session.add_dog("Rex", false, &mut rng);
        session.place_loot(0, Point2D::new(2.0, 0.0));
        session
            .dog_mut(id)
            .unwrap()
            .change_direction(Some(Direction::Right));

        // Two moving ticks: pick up at x = 2, deliver at the office at x = 4.
        session.tick(1000, &mut quiet_generator(), &mut rng);
        session.tick(1000, &mut quiet_generator(), &mut rng);
        assert_eq!(session.dog(id).unwrap().score, 10);

        // Stop and idle past the 3 s retirement threshold.
        session.dog_mut(id).unwrap().change_direction(None);
        assert!(session
            .tick(1000, &mut quiet_generator(), &mut rng)
            .is_empty());
        assert!(session
            .tick(1000, &mut quiet_generator(), &mut rng)
            .is_empty());
        let retired = session.tick(1000, &mut quiet_generator(), &mut rng);

        assert_eq!(retired.len(), 1);
        assert_eq!(retired[0].name, "Rex");
        assert_eq!(retired[0].score, 10);
        assert_eq!(retired[0].play_time_ms, 5000);
        assert!(session.dogs().is_empty());
    }
}

/// LOOT ECONOMY TESTS
mod loot_economy_tests {
    use super::*;

    /// Tests that loot generation tracks the number of active dogs
    #[test]
    fn loot_spawn_bounded_by_dog_count() {
        let mut rng = test_rng();
        let mut session = GameSession::new(test_map(), 2.0, 3, NO_RETIREMENT);
        let ids = [
            session.add_dog("A", false, &mut rng),
            session.add_dog("B", false, &mut rng),
            session.add_dog("C", false, &mut rng),
        ];

        let mut generator = LootGenerator::new(Duration::from_secs(1), 1.0);
        session.tick(1000, &mut generator, &mut rng);
        assert_eq!(session.lost_objects().len(), 3);

        let bounds = test_map().roads[0].bounds();
        for loot in session.lost_objects().values() {
            assert!(bounds.contains(loot.position));
        }

        // Without looters there is no shortage, so nothing new appears.
        for id in ids {
            session.remove_dog(id);
        }
        session.tick(1000, &mut generator, &mut rng);
        assert_eq!(session.lost_objects().len(), 3);
    }
}

// HELPER FUNCTIONS

const NO_RETIREMENT: f64 = 1e12;

fn test_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn quiet_generator() -> LootGenerator {
    LootGenerator::new(Duration::from_secs(1), 0.0)
}

fn test_map() -> Map {
    Map {
        roads: vec![Road::horizontal(Point2D::new(0.0, 0.0), 10.0)],
        offices: vec![Office {
            position: Point2D::new(9.0, 0.0),
        }],
        loot_types: vec![LootType { value: 10 }, LootType { value: 30 }],
        dog_speed: None,
        bag_capacity: None,
    }
}

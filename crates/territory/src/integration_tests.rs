//! Cross-module scenarios: keys, claims, registry and resolver working
//! against one shared context.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::*;

fn key(text: &str) -> Key {
    Key::parse(text).unwrap()
}

fn world() -> WorldId {
    WorldId(Uuid::from_u128(0xBEEF))
}

fn actor(n: u128) -> ActorId {
    ActorId(Uuid::from_u128(n))
}

#[test]
fn test_common_ancestor_is_longest_shared_prefix() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let alphabet = ["a", "b", "c"];
    let random_key = |rng: &mut ChaCha8Rng| {
        let depth = rng.gen_range(1..5);
        let segments: Vec<&str> = (0..depth)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        key(&segments.join(":"))
    };
    for _ in 0..500 {
        let a = random_key(&mut rng);
        let b = random_key(&mut rng);
        match Key::common_ancestor(&a, &b) {
            None => assert_ne!(a.segments()[0], b.segments()[0]),
            Some(common) => {
                let n = common.depth();
                assert_eq!(common.segments(), &a.segments()[..n]);
                assert_eq!(common.segments(), &b.segments()[..n]);
                // Longest: the next segments differ or one key ends.
                assert!(
                    a.depth() == n || b.depth() == n || a.segments()[n] != b.segments()[n],
                    "{a} / {b} -> {common}"
                );
            }
        }
    }
    assert_eq!(
        Key::common_ancestor(&key("no:ak:os"), &key("no:ak:ls")),
        Some(key("no:ak"))
    );
    assert_eq!(Key::common_ancestor(&key("no:ak"), &key("ch")), None);
}

#[test]
fn test_settlement_lifecycle() {
    let ctx = DomainsContext::in_memory();
    let (mayor, settler, stranger) = (actor(1), actor(2), actor(3));
    let town = key("no");
    let farm = key("no:farm");

    ctx.registry
        .create_domain(town.clone(), Role::Visitor, Some("Town".into()))
        .unwrap();
    ctx.registry
        .grant_title(&town, mayor, "Mayor", Role::Administrator)
        .unwrap();
    assert!(ctx
        .resolver
        .check_in_domain(mayor, &town, Privilege::Administrate)
        .unwrap()
        .is_granted());

    let centre = TileCoord::new(world(), 0, 0);
    ctx.claims.annex_exclusive(centre, &town).unwrap();

    // A farm claims single columns east of the town tile.
    ctx.registry
        .create_domain(farm.clone(), Role::Outsider, None)
        .unwrap();
    ctx.registry
        .grant_title(&farm, settler, "Farmer", Role::Resident)
        .unwrap();
    let east = centre.offset(1, 0);
    for k in 0..4 {
        let column = ColumnIndex::new(0, k).unwrap();
        ctx.claims.annex_column(east, column, &farm).unwrap();
    }

    let town_block = ColumnPos::new(world(), 8, 8);
    let farm_block = ColumnPos::new(world(), 16, 2);
    let wild_block = ColumnPos::new(world(), 20, 20);
    let check = |who, pos, p| ctx.resolver.check(who, pos, p).unwrap();

    assert_eq!(check(stranger, town_block, Privilege::Interact), Access::Granted);
    assert_eq!(check(stranger, town_block, Privilege::Build), Access::Denied);
    assert_eq!(check(mayor, town_block, Privilege::Build), Access::Granted);
    assert_eq!(check(settler, farm_block, Privilege::Build), Access::Granted);
    assert_eq!(check(mayor, farm_block, Privilege::Interact), Access::Denied);
    assert_eq!(check(settler, wild_block, Privilege::Build), Access::NoDomain);

    // The farm joins the town: its columns become town columns.
    ctx.registry.integrate_domain(&farm, &town).unwrap();
    assert_eq!(ctx.resolver.owner_at(farm_block).unwrap(), Some(town.clone()));
    assert_eq!(check(settler, farm_block, Privilege::Build), Access::Denied);
    assert!(ctx.registry.titles_for_actor(settler).unwrap().is_empty());
}

#[test]
fn test_territory_plugin_keeps_existing_context() {
    let ctx = DomainsContext::in_memory();
    ctx.registry
        .create_domain(key("kept"), Role::Outsider, None)
        .unwrap();

    let mut app = App::new();
    app.insert_resource(ctx).add_plugins(TerritoryPlugin);
    let installed = app.world().resource::<DomainsContext>();
    assert_eq!(installed.registry.list_domains().unwrap(), vec![key("kept")]);

    let mut fresh = App::new();
    fresh.add_plugins(TerritoryPlugin);
    let installed = fresh.world().resource::<DomainsContext>();
    assert!(installed.registry.list_domains().unwrap().is_empty());
}

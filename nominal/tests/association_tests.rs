//! Integration tests for the association model

use nominal::prelude::*;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::rc::Rc;

#[test]
fn test_identity_uniqueness() {
    let ids: Vec<Identity> = (0..1000).map(|_| Identity::create()).collect();
    let unique: HashSet<u64> = ids.iter().map(Identity::raw).collect();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.iter().all(|id| !id.is_null()));
}

#[test]
fn test_keyed_isolation() {
    let mut names = KeyedDatum::new();
    let a = Identity::create();
    let b = Identity::create();

    names.associate(a, "alpha".to_string());
    names.associate(b, "beta".to_string());
    if let Some(name) = names.resolve_mut(a) {
        name.push_str("-changed");
    }

    assert_eq!(names.resolve(a).map(String::as_str), Some("alpha-changed"));
    assert_eq!(names.resolve(b).map(String::as_str), Some("beta"));
}

#[test]
fn test_group_visibility() {
    let mut motto = GroupDatum::new("group-value".to_string());
    let a = Identity::create();
    let b = Identity::create();
    let outsider = Identity::create();
    motto.subscribe(a);
    motto.subscribe(b);

    if let Some(text) = motto.resolve_mut(a) {
        *text = "rewritten".to_string();
    }
    assert_eq!(motto.resolve(b).map(String::as_str), Some("rewritten"));
    assert_eq!(motto.resolve(outsider), None);

    motto.unsubscribe(b);
    assert_eq!(motto.resolve(b), None);
    assert_eq!(motto.resolve(a).map(String::as_str), Some("rewritten"));
}

#[test]
fn test_unauthorized_resolve_never_leaks_group_value() {
    let motto = GroupDatum::new("group-value".to_string());
    let x = Identity::create();

    assert_eq!(motto.resolve(x), None);
    assert_eq!(
        motto.require(x).err(),
        Some(AssociationError::NotSubscribed(x))
    );
}

#[test]
fn test_single_owner_exclusivity() {
    let mut crown = SolitaryDatum::new("crown");
    let a = Identity::create();
    let b = Identity::create();

    crown.claim(a);
    crown.claim(b);

    assert_eq!(crown.resolve(a), None);
    assert_eq!(crown.resolve(b), Some(&"crown"));
    assert_eq!(crown.owner(), Some(b));
}

#[test]
fn test_pool_sharing() {
    let mut team = PooledDatum::new();
    let a = Identity::create();
    let b = Identity::create();
    let c = Identity::create();

    team.create_pool(a, vec!["red"]);
    team.join_latest_pool(b);
    team.create_pool(c, vec!["blue"]);

    if let Some(banner) = team.resolve_mut(b) {
        banner.push("shared");
    }

    assert_eq!(team.resolve(a), team.resolve(b));
    assert_eq!(team.resolve(a), Some(&vec!["red", "shared"]));
    assert_eq!(team.resolve(c), Some(&vec!["blue"]));
}

#[test]
fn test_behavior_dispatch_scoping() {
    let mut names = KeyedDatum::new();
    let tester = Identity::create();
    let other = Identity::create();
    names.associate(tester, "Tester".to_string());
    names.associate(other, "Other".to_string());

    let mut read = Behavior::new(|ctx: Dispatch, names: &KeyedDatum<String>| {
        ctx.resolve(names).cloned()
    });
    read.subscribe(tester);

    assert_eq!(read.invoke_all(&names), vec![Some("Tester".to_string())]);
}

#[test]
fn test_unsubscribed_identity_is_left_out_of_broadcast() {
    let mut names = KeyedDatum::new();
    let a = Identity::create();
    let b = Identity::create();
    names.associate(a, "stays");
    names.associate(b, "leaves");

    let mut roll_call = Behavior::new(|ctx: Dispatch, names: &KeyedDatum<&'static str>| {
        (ctx.identity(), ctx.resolve(names).copied())
    });
    roll_call.subscribe(a);
    roll_call.subscribe(b);
    assert!(roll_call.unsubscribe(b));

    assert_eq!(roll_call.invoke_all(&names), vec![(a, Some("stays"))]);
    assert_eq!(roll_call.context(), a);
    assert_eq!(roll_call.metrics().snapshot().dispatches, 1);
}

#[test]
fn test_null_cannot_seed_or_take_stores() {
    let mut loot = PooledDatum::new();
    let mut crown = SolitaryDatum::new("crown");
    let a = Identity::create();

    assert!(loot.create_pool(Identity::NULL, "via-null").is_none());
    assert_eq!(loot.join_latest_pool(a), PoolId::NONE);
    assert_eq!(loot.resolve(a), None);
    assert_eq!(loot.pool_count(), 0);

    crown.claim(a);
    assert!(crown.claim(Identity::NULL).is_none());
    assert_eq!(crown.owner(), Some(a));
    assert_eq!(crown.resolve(a), Some(&"crown"));
}

#[test]
fn test_greeting_scenario() {
    let output = Rc::new(RefCell::new(String::new()));
    let mut name = KeyedDatum::new();

    let sink = Rc::clone(&output);
    let mut print = Behavior::named("print", move |ctx: Dispatch, name: &KeyedDatum<String>| {
        if let Some(text) = ctx.resolve(name) {
            let _ = writeln!(sink.borrow_mut(), "{text}");
        }
    });

    let t1 = Identity::create();
    name.associate(t1, "Tester".to_string());
    print.subscribe(t1);
    print.invoke_all(&name);

    assert_eq!(output.borrow().as_str(), "Tester\n");
}

#[test]
fn test_context_resolves_other_stores_after_dispatch() {
    let mut names = KeyedDatum::new();
    let mut crown = SolitaryDatum::new("crown");
    let mut factory = IdentityFactory::new();
    let king = factory.next_identity().unwrap();
    let peasant = factory.next_identity().unwrap();

    names.associate(king, "Arthur");
    names.associate(peasant, "Dennis");
    crown.claim(king);

    let mut noop = Behavior::new(|_: Dispatch, _: ()| ());
    noop.subscribe(king);
    noop.subscribe(peasant);

    noop.call_for(king, ());
    assert_eq!(noop.resolve_in_context(&names), Some(&"Arthur"));
    assert_eq!(noop.resolve_in_context(&crown), Some(&"crown"));

    noop.invoke_all(());
    assert_eq!(noop.context(), peasant);
    assert_eq!(noop.resolve_in_context(&names), Some(&"Dennis"));
    assert_eq!(noop.resolve_in_context(&crown), None);
}

#[test]
fn test_stores_mix_in_one_behavior() {
    let mut hp = KeyedDatum::new();
    let mut shield = GroupDatum::new(2);
    let mut loot = PooledDatum::new();
    let a = Identity::create();
    let b = Identity::create();

    hp.associate(a, 10);
    hp.associate(b, 10);
    shield.subscribe(a);
    loot.create_pool(a, 0);
    loot.join_latest_pool(b);

    let mut hit = Behavior::named(
        "hit",
        |ctx: Dispatch, (hp, shield, loot): (&mut KeyedDatum<i32>, &GroupDatum<i32>, &mut PooledDatum<i32>)| {
            let blocked = ctx.resolve(shield).copied().unwrap_or(0);
            if let Some(points) = ctx.resolve_mut(hp) {
                *points -= 5 - blocked;
            }
            if let Some(coins) = ctx.resolve_mut(loot) {
                *coins += 1;
            }
        },
    );
    hit.subscribe(a);
    hit.subscribe(b);

    hit.call_for(a, (&mut hp, &shield, &mut loot));
    hit.call_for(b, (&mut hp, &shield, &mut loot));

    assert_eq!(hp.resolve(a), Some(&7));
    assert_eq!(hp.resolve(b), Some(&5));
    assert_eq!(loot.resolve(a), Some(&2));
    assert_eq!(shield.resolve(b), None);
    assert_eq!(hit.metrics().snapshot().dispatches, 2);
}

use indexable_map::prelude::*;

use super::*;

#[test]
fn refresh_indexes() -> eyre::Result<()> {
    let mut map = People::with_config(
        three_people(),
        [by_age(), by_last_name()],
        MapConfig::default().with_indexes_enabled(false),
    )?;

    map.refresh_indexes();

    assert!(!map.indexes_enabled());
    assert!(!map.indexes_are_stale());
    assert_eq!(
        buckets(&map, "byAge"),
        vec![(age(30), vec![1]), (age(59), vec![2]), (age(17), vec![3])]
    );
    assert_eq!(
        buckets(&map, "byLastName"),
        vec![
            (last_name("Ivanova"), vec![1]),
            (last_name("Petrovna"), vec![2]),
            (last_name("Lukov"), vec![3]),
        ]
    );

    Ok(())
}

#[test]
fn refresh_is_idempotent() -> eyre::Result<()> {
    let mut map = People::from_entries(four_people(), [by_age(), by_last_name()])?;
    map.insert(5, person(17, "Olga", "Lukov"));
    map.remove(&2);

    map.refresh_indexes();
    let first = (map.index("byAge").cloned(), map.index("byLastName").cloned());
    map.refresh_indexes();
    let second = (map.index("byAge").cloned(), map.index("byLastName").cloned());

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn refresh_matches_incremental_build() -> eyre::Result<()> {
    let mut disabled = People::with_config(
        [],
        [by_age().filter(|p| p.age < 40), by_last_name()],
        MapConfig::default().with_indexes_enabled(false),
    )?;
    let mut enabled = People::with_indexes([by_age().filter(|p| p.age < 40), by_last_name()])?;

    for (key, value) in four_people() {
        disabled.insert(key, value.clone());
        enabled.insert(key, value);
    }
    disabled.insert(1, person(45, "Galina", "Ivanova"));
    enabled.insert(1, person(45, "Galina", "Ivanova"));
    disabled.remove(&3);
    enabled.remove(&3);

    disabled.refresh_indexes();

    // Removal leaves an empty bucket behind in `enabled` only.
    for name in ["byAge", "byLastName"] {
        assert_eq!(disabled.index(name), enabled.index(name));
    }
    assert_ne!(
        buckets(&disabled, "byAge").len(),
        buckets(&enabled, "byAge").len()
    );

    Ok(())
}

#[test]
fn refresh_drops_stale_keys() -> eyre::Result<()> {
    let mut map = People::from_entries(four_people(), [by_age()])?;

    map.disable_indexes();
    map.remove(&4);
    map.insert(2, person(20, "Zinaida", "Petrovna"));
    assert_eq!(map.keys_by_index("byAge", &age(59)), vec![&2, &4]);

    map.refresh_indexes();

    assert!(map.keys_by_index("byAge", &age(59)).is_empty());
    assert_eq!(map.keys_by_index("byAge", &age(20)), vec![&2]);
    assert!(!map.indexes_enabled());

    Ok(())
}

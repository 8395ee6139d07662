mod refresh;

use indexable_map::prelude::*;

pub type People = IndexableMap<u64, Person, &'static str, PersonField>;

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub age: u32,
    pub first_name: String,
    pub last_name: String,
}

pub fn person(age: u32, first_name: &str, last_name: &str) -> Person {
    Person {
        age,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, From)]
pub enum PersonField {
    Age(u32),
    LastName(String),
}

pub fn age(age: u32) -> PersonField {
    PersonField::Age(age)
}

pub fn last_name(last_name: &str) -> PersonField {
    PersonField::LastName(last_name.to_string())
}

pub fn by_age() -> IndexDefinition<&'static str, Person, PersonField> {
    IndexDefinition::new("byAge", |p: &Person| PersonField::Age(p.age))
}

pub fn by_last_name() -> IndexDefinition<&'static str, Person, PersonField> {
    IndexDefinition::new("byLastName", |p: &Person| {
        PersonField::LastName(p.last_name.clone())
    })
}

pub fn three_people() -> Vec<(u64, Person)> {
    vec![
        (1, person(30, "Galina", "Ivanova")),
        (2, person(59, "Zinaida", "Petrovna")),
        (3, person(17, "Stepan", "Lukov")),
    ]
}

pub fn four_people() -> Vec<(u64, Person)> {
    let mut people = three_people();
    people.push((4, person(59, "Ibragim", "Lukov")));
    people
}

/// Buckets of the index in their order, with keys in bucket order.
pub fn buckets(map: &People, name: &str) -> Vec<(PersonField, Vec<u64>)> {
    map.index(name)
        .map(|index| {
            index
                .iter()
                .map(|(field, keys)| (field.clone(), keys.iter().copied().collect()))
                .collect()
        })
        .unwrap_or_default()
}

/// Asserts that every index holds exactly the keys whose current value passes
/// its filter, under the selected field value and nowhere else.
pub fn assert_consistent(
    map: &People,
    definitions: &[IndexDefinition<&'static str, Person, PersonField>],
) {
    for definition in definitions {
        let index = map.index(definition.name()).expect("index should exist");
        for (key, value) in map.iter() {
            let field = definition.select(value);
            assert_eq!(
                index.contains(&field, key),
                definition.accepts(value),
                "key {key} in {}",
                definition.name()
            );
            for (other, keys) in index.iter() {
                if other != &field {
                    assert!(!keys.contains(key), "key {key} in foreign bucket {other:?}");
                }
            }
        }
        for (_, keys) in index.iter() {
            for key in keys {
                assert!(map.contains_key(key), "removed key {key} still indexed");
            }
        }
    }
}

use std::fmt::{self, Debug};

type Selector<V, F> = Box<dyn Fn(&V) -> F + Send + Sync>;
type Predicate<V> = Box<dyn Fn(&V) -> bool + Send + Sync>;

/// Description of a single secondary index.
///
/// `selector` extracts the field value a record is indexed under and
/// `predicate` decides whether the record takes part in the index at all.
/// A record rejected by the predicate is absent from the index, it is not
/// stored under some "empty" field value.
///
/// ```
/// use indexable_map::IndexDefinition;
///
/// struct Person {
///     age: u32,
/// }
///
/// let adults = IndexDefinition::new("adults_by_age", |p: &Person| p.age).filter(|p| p.age >= 18);
/// assert!(adults.accepts(&Person { age: 30 }));
/// assert!(!adults.accepts(&Person { age: 17 }));
/// ```
pub struct IndexDefinition<I, V, F> {
    name: I,
    selector: Selector<V, F>,
    predicate: Predicate<V>,
}

impl<I, V, F> IndexDefinition<I, V, F> {
    /// Creates definition that indexes every record by `selector`.
    pub fn new<S>(name: I, selector: S) -> Self
    where
        S: Fn(&V) -> F + Send + Sync + 'static,
    {
        Self {
            name,
            selector: Box::new(selector),
            predicate: Box::new(|_| true),
        }
    }

    /// Restricts index to the records accepted by `predicate`. Replaces the
    /// previously set predicate.
    pub fn filter<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.predicate = Box::new(predicate);
        self
    }

    pub fn name(&self) -> &I {
        &self.name
    }

    pub fn select(&self, value: &V) -> F {
        (self.selector)(value)
    }

    pub fn accepts(&self, value: &V) -> bool {
        (self.predicate)(value)
    }
}

impl<I, V, F> Debug for IndexDefinition<I, V, F>
where
    I: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexDefinition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

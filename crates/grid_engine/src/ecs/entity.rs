//! Entity implementation

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// A generational key: identifiers of destroyed entities are never
    /// confused with those of entities created later in the same slot.
    pub struct Entity;
}

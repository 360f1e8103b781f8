use arrayvec::ArrayString;
use bevy_ecs::prelude::Component;

use crate::resources::names::NAME_CAP;

/// Marks the creature entity and carries its name.
#[derive(Component, Debug, Clone)]
pub struct Creature {
    pub name: ArrayString<NAME_CAP>,
}

impl Creature {
    pub fn new(name: ArrayString<NAME_CAP>) -> Self {
        Self { name }
    }
}

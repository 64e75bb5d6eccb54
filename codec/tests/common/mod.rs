//! Schemas shared by the integration tests.
//!
//! Mirrors `lattice-demo`'s `environment` module; keep the two in step.

use lattice_codec::{structure, versioned_structure, Int32Field, OptionalField, VectorField};

structure! {
    /// A bar placed in an environment.
    pub struct Bar {
        pub position_x: Int32Field,
        pub position_y: Int32Field,
        pub direction: Int32Field,
    }
}

versioned_structure! {
    /// First version of the environment.
    pub struct EnvironmentV0(version = 0) {
        pub name: OptionalField<String>,
        pub width: Int32Field,
        pub height: Int32Field,
        pub bars: VectorField<Bar>,
    }
}

versioned_structure! {
    /// Second version: the name is gone and a type is introduced.
    pub struct EnvironmentV1(version = 1, previous = EnvironmentV0) {
        pub kind: Int32Field,
        pub width: Int32Field,
        pub height: Int32Field,
        pub bars: VectorField<Bar>,
    }
}

impl From<EnvironmentV0> for EnvironmentV1 {
    fn from(previous: EnvironmentV0) -> Self {
        Self {
            kind: Int32Field::new(0),
            width: previous.width,
            height: previous.height,
            bars: previous.bars,
        }
    }
}

/// Builds a version 0 environment with `bars` bars at index-derived positions.
pub fn environment_v0(name: &str, width: i32, height: i32, bars: usize) -> EnvironmentV0 {
    let mut environment = EnvironmentV0::default();
    environment.name.set(name.to_string());
    environment.width.set(width);
    environment.height.set(height);
    environment.bars.set(
        (0..bars)
            .map(|index| {
                let index = index as i32;
                Bar {
                    position_x: Int32Field::new(index),
                    position_y: Int32Field::new(index),
                    direction: Int32Field::new(index),
                }
            })
            .collect(),
    );
    environment
}

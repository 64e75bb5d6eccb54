//! The schemas exchanged by the demo.
//!
//! `lattice-codec`'s integration tests declare the same schemas in `tests/common`.

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
    /// The environment as first published.
    pub struct EnvironmentV0(version = 0) {
        pub name: OptionalField<String>,
        pub width: Int32Field,
        pub height: Int32Field,
        pub bars: VectorField<Bar>,
    }
}

versioned_structure! {
    /// The current environment: the name was dropped and a type added.
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

/// Builds a version 0 environment whose bars sit at index-derived positions.
pub fn build(name: &str, width: i32, height: i32, bars: usize) -> EnvironmentV0 {
    let mut environment = EnvironmentV0::default();
    if !name.is_empty() {
        environment.name.set(name.to_string());
    }
    environment.width.set(width);
    environment.height.set(height);
    environment.bars.set(
        (0..bars)
            .map(|index| {
                let index = i32::try_from(index).unwrap_or(i32::MAX);
                Bar {
                    position_x: index.into(),
                    position_y: index.into(),
                    direction: index.into(),
                }
            })
            .collect(),
    );
    environment
}

//! Collision layers, layer masks and the layer-pair collision matrix

use serde::{Deserialize, Serialize};

/// Which of the two mutually exclusive worlds the player is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[default]
    Normal,
    Inverted,
}

impl Dimension {
    pub fn flipped(self) -> Self {
        match self {
            Dimension::Normal => Dimension::Inverted,
            Dimension::Inverted => Dimension::Normal,
        }
    }

    /// Layer that loose pickups of this dimension live on
    pub fn pickup_layer(self) -> Layer {
        match self {
            Dimension::Normal => Layer::Pickup,
            Dimension::Inverted => Layer::InvertedPickup,
        }
    }

    /// Layer that static scenery of this dimension lives on
    pub fn environment_layer(self) -> Layer {
        match self {
            Dimension::Normal => Layer::Environment,
            Dimension::Inverted => Layer::InvertedEnvironment,
        }
    }
}

/// Collision layers used by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Layer {
    Default = 0,
    Player = 1,
    Pickup = 2,
    Environment = 3,
    /// Pickups that have been fused to the body
    Collected = 4,
    InvertedPickup = 5,
    InvertedEnvironment = 6,
    /// Portal trigger volumes
    Portal = 7,
}

impl Layer {
    pub const ALL: [Layer; 8] = [
        Layer::Default,
        Layer::Player,
        Layer::Pickup,
        Layer::Environment,
        Layer::Collected,
        Layer::InvertedPickup,
        Layer::InvertedEnvironment,
        Layer::Portal,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// Bit set of layers (camera culling, collision queries)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);

    pub fn from_layers(layers: &[Layer]) -> Self {
        Self(layers.iter().fold(0, |bits, layer| bits | layer.bit()))
    }

    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }

    pub fn union(self, other: LayerMask) -> Self {
        Self(self.0 | other.0)
    }
}

/// The three layer pairs whose collision rule depends on the active dimension,
/// expressed for the normal dimension
pub const DIMENSION_RULES: [(Layer, Layer); 3] = [
    (Layer::Player, Layer::Pickup),
    (Layer::Player, Layer::Environment),
    (Layer::Collected, Layer::Pickup),
];

/// Map a normal-dimension layer to its counterpart in `dimension`
pub fn counterpart(layer: Layer, dimension: Dimension) -> Layer {
    match (layer, dimension) {
        (Layer::Pickup, Dimension::Inverted) => Layer::InvertedPickup,
        (Layer::Environment, Dimension::Inverted) => Layer::InvertedEnvironment,
        (Layer::InvertedPickup, Dimension::Normal) => Layer::Pickup,
        (Layer::InvertedEnvironment, Dimension::Normal) => Layer::Environment,
        (other, _) => other,
    }
}

/// Symmetric layer-pair collision matrix (true = pair collides)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMatrix {
    rows: [u32; 32],
}

impl Default for CollisionMatrix {
    /// Everything collides, then the inverted dimension is switched off
    fn default() -> Self {
        let mut matrix = Self { rows: [u32::MAX; 32] };
        matrix.apply_dimension(Dimension::Normal);
        // Fused pickups never collide with the player they are fused to
        matrix.set(Layer::Player, Layer::Collected, false);
        matrix
    }
}

impl CollisionMatrix {
    pub fn collides(&self, a: Layer, b: Layer) -> bool {
        self.rows[a.index()] & b.bit() != 0
    }

    pub fn set(&mut self, a: Layer, b: Layer, collides: bool) {
        if collides {
            self.rows[a.index()] |= b.bit();
            self.rows[b.index()] |= a.bit();
        } else {
            self.rows[a.index()] &= !b.bit();
            self.rows[b.index()] &= !a.bit();
        }
    }

    /// Enable the dimension-dependent pairs of `active` and disable the other side
    pub fn apply_dimension(&mut self, active: Dimension) {
        for (a, b) in DIMENSION_RULES {
            self.set(
                counterpart(a, active.flipped()),
                counterpart(b, active.flipped()),
                false,
            );
            self.set(counterpart(a, active), counterpart(b, active), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matrix_is_normal_dimension() {
        let matrix = CollisionMatrix::default();
        assert!(matrix.collides(Layer::Player, Layer::Pickup));
        assert!(matrix.collides(Layer::Collected, Layer::Pickup));
        assert!(!matrix.collides(Layer::Player, Layer::InvertedPickup));
        assert!(!matrix.collides(Layer::Player, Layer::InvertedEnvironment));
        assert!(!matrix.collides(Layer::Player, Layer::Collected));
    }

    #[test]
    fn test_apply_dimension_flips_pairs() {
        let mut matrix = CollisionMatrix::default();
        matrix.apply_dimension(Dimension::Inverted);
        assert!(!matrix.collides(Layer::Player, Layer::Pickup));
        assert!(!matrix.collides(Layer::Pickup, Layer::Collected));
        assert!(matrix.collides(Layer::InvertedPickup, Layer::Player));
        assert!(matrix.collides(Layer::Collected, Layer::InvertedPickup));
        assert!(matrix.collides(Layer::Player, Layer::InvertedEnvironment));
        // Untouched pair
        assert!(matrix.collides(Layer::Player, Layer::Default));
    }

    #[test]
    fn test_layer_mask() {
        let mask = LayerMask::from_layers(&[Layer::Player, Layer::Pickup]);
        assert!(mask.contains(Layer::Player));
        assert!(!mask.contains(Layer::InvertedPickup));
        assert_eq!(mask.union(LayerMask::NONE), mask);
    }
}

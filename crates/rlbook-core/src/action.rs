//! Action abstraction and the standard "vectorized" actions

use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use ndarray::{arr1, Array1};
use serde::{Deserialize, Serialize};

use crate::state::State;
use crate::types::{Reward, Value};

/// An action available to the agent.
///
/// Actions are used as keys of the value tables, so implementations must
/// provide a stable `Eq`/`Hash` identity.
pub trait Action: Clone + Eq + Hash + Debug {
    /// Human-readable name, used when rendering policies
    fn name(&self) -> String {
        format!("{self:?}")
    }

    /// Vector representation of the action
    fn vector(&self) -> Array1<f64>;

    /// Scalar value of the action, the Euclidean norm of its vector by default
    fn magnitude(&self) -> Value {
        let v = self.vector();
        Value(v.dot(&v).sqrt())
    }
}

/// An action that moves the environment from one state to the next.
///
/// The transition must be deterministic given its inputs.
pub trait Transition<S: State>: Action {
    fn transition(&self, state: &S) -> (S, Reward);
}

/// Integer-identified arm of a multi-armed bandit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Arm(pub usize);

impl Action for Arm {
    fn name(&self) -> String {
        format!("arm-{}", self.0)
    }

    fn vector(&self) -> Array1<f64> {
        arr1(&[self.0 as f64])
    }
}

// Geometric actions compare and hash by the bit pattern of their coordinates,
// so `0.0` and `-0.0` are distinct actions.
macro_rules! bitwise_identity {
    ($name:ident { $($field:ident),+ }) => {
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                $(self.$field.to_bits() == other.$field.to_bits())&&+
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                $(self.$field.to_bits().hash(state);)+
            }
        }
    };
}

/// One-dimension action
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Action1D {
    pub parameter: f64,
}

bitwise_identity!(Action1D { parameter });

impl Action1D {
    pub fn new(parameter: f64) -> Self {
        Self { parameter }
    }
}

impl Action for Action1D {
    fn vector(&self) -> Array1<f64> {
        arr1(&[self.parameter])
    }

    /// The signed parameter itself
    fn magnitude(&self) -> Value {
        Value(self.parameter)
    }
}

/// Two-dimension action
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Action2D {
    pub x: f64,
    pub y: f64,
}

bitwise_identity!(Action2D { x, y });

impl Action2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Action for Action2D {
    fn vector(&self) -> Array1<f64> {
        arr1(&[self.x, self.y])
    }
}

/// Three-dimension action
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Action3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

bitwise_identity!(Action3D { x, y, z });

impl Action3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Action for Action3D {
    fn vector(&self) -> Array1<f64> {
        arr1(&[self.x, self.y, self.z])
    }
}

/// Four-dimension action
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Action4D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
}

bitwise_identity!(Action4D { x, y, z, t });

impl Action4D {
    pub fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
        Self { x, y, z, t }
    }
}

impl Action for Action4D {
    fn vector(&self) -> Array1<f64> {
        arr1(&[self.x, self.y, self.z, self.t])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_magnitude() {
        assert_eq!(Action1D::new(-3.0).magnitude(), Value(-3.0));
        assert_eq!(Action2D::new(3.0, 4.0).magnitude(), Value(5.0));
        assert_eq!(Action3D::new(2.0, 3.0, 6.0).magnitude(), Value(7.0));
        assert_eq!(Action4D::new(1.0, 1.0, 1.0, 1.0).magnitude(), Value(2.0));
        assert_eq!(Arm(7).magnitude(), Value(7.0));
    }

    #[test]
    fn test_vector() {
        assert_eq!(Action3D::new(1.0, 2.0, 3.0).vector().to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(Action4D::new(1.0, 2.0, 3.0, 4.0).vector().len(), 4);
    }

    #[test]
    fn test_actions_as_map_keys() {
        let mut table = HashMap::new();
        table.insert(Action2D::new(1.0, 0.0), 1);
        table.insert(Action2D::new(0.0, 1.0), 2);
        table.insert(Action2D::new(1.0, 0.0), 3);

        assert_eq!(table.len(), 2);
        assert_eq!(table[&Action2D::new(1.0, 0.0)], 3);
    }

    #[test]
    fn test_bitwise_identity() {
        assert_ne!(Action1D::new(0.0), Action1D::new(-0.0));
        assert_eq!(Action1D::new(f64::NAN), Action1D::new(f64::NAN));
    }

    #[test]
    fn test_names() {
        assert_eq!(Arm(2).name(), "arm-2");
        assert!(Action1D::new(1.0).name().contains("Action1D"));
    }
}

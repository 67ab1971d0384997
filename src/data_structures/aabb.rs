use cgmath::Vector3;

/// Axis-aligned bounding box in model-local units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl Aabb {
    pub fn new(min: impl Into<Vector3<f64>>, max: impl Into<Vector3<f64>>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Finite on every axis and `min <= max` component-wise.
    pub fn is_valid(&self) -> bool {
        let finite = |v: &Vector3<f64>| v.x.is_finite() && v.y.is_finite() && v.z.is_finite();
        finite(&self.min)
            && finite(&self.max)
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Vector3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vector3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Bottom face first (`z = min`), counter-clockwise, then the top face.
    pub fn corners(&self) -> [Vector3<f64>; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vector3::new(min.x, min.y, min.z),
            Vector3::new(max.x, min.y, min.z),
            Vector3::new(max.x, max.y, min.z),
            Vector3::new(min.x, max.y, min.z),
            Vector3::new(min.x, min.y, max.z),
            Vector3::new(max.x, min.y, max.z),
            Vector3::new(max.x, max.y, max.z),
            Vector3::new(min.x, max.y, max.z),
        ]
    }
}

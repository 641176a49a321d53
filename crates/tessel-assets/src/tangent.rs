use glam::{Vec2, Vec3};

/// Per-triangle tangent frame used for normal mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentBasis {
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

impl TangentBasis {
    pub const ZERO: TangentBasis = TangentBasis {
        tangent: Vec3::ZERO,
        bitangent: Vec3::ZERO,
    };

    /// Solve the UV-to-object-space basis for one triangle.
    ///
    /// Returns `None` when the UV deltas are collinear (the 2x2 determinant has
    /// no finite inverse), leaving the caller to decide what a degenerate
    /// triangle means.
    pub fn from_triangle(positions: [Vec3; 3], uvs: [Vec2; 3]) -> Option<Self> {
        let edge1 = positions[1] - positions[0];
        let edge2 = positions[2] - positions[0];
        let delta_uv1 = uvs[1] - uvs[0];
        let delta_uv2 = uvs[2] - uvs[0];

        let det = delta_uv1.x * delta_uv2.y - delta_uv2.x * delta_uv1.y;
        let f = det.recip();
        if !f.is_finite() {
            return None;
        }

        let tangent = f * (delta_uv2.y * edge1 - delta_uv1.y * edge2);
        let bitangent = f * (-delta_uv2.x * edge1 + delta_uv1.x * edge2);

        Some(Self {
            tangent: tangent.normalize_or_zero(),
            bitangent: bitangent.normalize_or_zero(),
        })
    }
}

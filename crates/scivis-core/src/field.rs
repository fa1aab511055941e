//! Point attribute arrays and their kinds.

use crate::geometry::Vec3;

/// Classification of a point attribute's data layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// A single value per point.
    Scalar,
    /// Three components per point (x, y, z).
    Vector,
}

impl AttributeKind {
    /// Number of `f64` storage slots this kind requires per point.
    pub fn components(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vector => 3,
        }
    }

    /// Infer the kind from a component count, if it is one we store.
    pub fn from_components(n: usize) -> Option<Self> {
        match n {
            1 => Some(Self::Scalar),
            3 => Some(Self::Vector),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Vector => write!(f, "vector"),
        }
    }
}

/// A named-array payload: one tuple of `kind.components()` values per point.
///
/// Values are stored flat and tuple-interleaved (`x0 y0 z0 x1 y1 z1 ...`
/// for vectors). The owning grid checks the tuple count against its
/// point count when the attribute is attached.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    kind: AttributeKind,
    data: Vec<f64>,
}

impl Attribute {
    /// A scalar attribute, one value per point.
    pub fn scalars(values: Vec<f64>) -> Self {
        Self {
            kind: AttributeKind::Scalar,
            data: values,
        }
    }

    /// A vector attribute, one 3-vector per point.
    pub fn vectors(values: &[Vec3]) -> Self {
        let mut data = Vec::with_capacity(values.len() * 3);
        for v in values {
            data.extend_from_slice(&v.to_array());
        }
        Self {
            kind: AttributeKind::Vector,
            data,
        }
    }

    /// Wrap flat tuple-interleaved data.
    ///
    /// Returns `None` if `data.len()` is not a multiple of the kind's
    /// component count.
    pub fn from_flat(kind: AttributeKind, data: Vec<f64>) -> Option<Self> {
        if data.len() % kind.components() != 0 {
            return None;
        }
        Some(Self { kind, data })
    }

    /// The attribute's kind.
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Number of tuples (points) stored.
    pub fn tuple_count(&self) -> usize {
        self.data.len() / self.kind.components()
    }

    /// The raw tuple at `index`, or `None` if out of range.
    pub fn tuple(&self, index: usize) -> Option<&[f64]> {
        let n = self.kind.components();
        self.data.get(index * n..(index + 1) * n)
    }

    /// Scalar value at `index`; `None` for vector attributes or out of range.
    pub fn scalar(&self, index: usize) -> Option<f64> {
        match self.kind {
            AttributeKind::Scalar => self.data.get(index).copied(),
            AttributeKind::Vector => None,
        }
    }

    /// Vector value at `index`; `None` for scalar attributes or out of range.
    pub fn vector(&self, index: usize) -> Option<Vec3> {
        match self.kind {
            AttributeKind::Vector => self
                .tuple(index)
                .map(|t| Vec3::new(t[0], t[1], t[2])),
            AttributeKind::Scalar => None,
        }
    }

    /// The flat value storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Minimum and maximum over all stored values, ignoring NaN.
    ///
    /// For vectors this is the component range, not the magnitude range.
    /// Returns `None` if there are no non-NaN values.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

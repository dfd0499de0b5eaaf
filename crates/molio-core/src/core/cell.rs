use super::error::{Error, Result};
use super::utils::geometry::{cos_degrees, is_diagonal, round_half_away, sin_degrees};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const RIGHT_ANGLES: [f64; 3] = [90.0, 90.0, 90.0];

/// The shape of a simulation box.
///
/// The shape is a tag over the lattice parameters: it decides which setters are
/// legal and which fast paths the geometry can take, but two cells with the
/// same matrix and different shapes are still different cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellShape {
    /// Rectangular box, all angles are exactly 90°.
    Orthorhombic,
    /// Arbitrary parallelepiped.
    Triclinic,
    /// No periodicity at all.
    #[default]
    Infinite,
}

impl fmt::Display for CellShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellShape::Orthorhombic => f.write_str("orthorhombic"),
            CellShape::Triclinic => f.write_str("triclinic"),
            CellShape::Infinite => f.write_str("infinite"),
        }
    }
}

/// A (possibly periodic) simulation box.
///
/// The cell is stored as its lattice parameters, the three vector lengths
/// (a, b, c) and the three angles in degrees (α between b and c, β between a
/// and c, γ between a and b). The lattice matrix is derived from them on
/// demand with the `a` vector along x and the `b` vector in the xy plane. Rows
/// of the matrix are the lattice vectors.
///
/// Lengths and angles are kept when switching to [`CellShape::Infinite`], so a
/// cell can be relabeled back to a periodic shape without losing its geometry.
/// The matrix of an infinite cell is the zero matrix.
///
/// Deserialized cells go through the same checks as the constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CellParameters")]
pub struct UnitCell {
    lengths: [f64; 3],
    angles: [f64; 3],
    shape: CellShape,
}

/// Unchecked lattice parameters, as found in a serialized cell.
#[derive(Deserialize)]
struct CellParameters {
    lengths: [f64; 3],
    angles: [f64; 3],
    shape: CellShape,
}

impl TryFrom<CellParameters> for UnitCell {
    type Error = Error;

    fn try_from(parameters: CellParameters) -> Result<Self> {
        let CellParameters {
            lengths,
            angles,
            shape,
        } = parameters;
        validate_lengths(&lengths)?;
        if shape == CellShape::Orthorhombic && angles != RIGHT_ANGLES {
            return Err(Error::InvalidArgument(format!(
                "an orthorhombic cell must have right angles, got {angles:?}"
            )));
        }
        validate_angles(&angles)?;
        Ok(Self {
            lengths,
            angles,
            shape,
        })
    }
}

impl Default for UnitCell {
    fn default() -> Self {
        Self::infinite()
    }
}

impl UnitCell {
    /// Creates an infinite cell, with zero lengths and right angles.
    pub fn infinite() -> Self {
        Self {
            lengths: [0.0; 3],
            angles: RIGHT_ANGLES,
            shape: CellShape::Infinite,
        }
    }

    /// Creates an orthorhombic cell from the three lengths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if any length is negative or not finite.
    pub fn new(lengths: [f64; 3]) -> Result<Self> {
        validate_lengths(&lengths)?;
        Ok(Self {
            lengths,
            angles: RIGHT_ANGLES,
            shape: CellShape::Orthorhombic,
        })
    }

    /// Creates a triclinic cell from three lengths and three angles in degrees.
    ///
    /// The resulting cell is always [`CellShape::Triclinic`], even when all the
    /// angles are 90°.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if a length is negative, or if the
    /// angles can not describe a parallelepiped: an angle outside of
    /// `(0°, 180°)`, angles summing to 360° or more, or one angle larger than
    /// the sum of the two others.
    pub fn triclinic(lengths: [f64; 3], angles: [f64; 3]) -> Result<Self> {
        validate_lengths(&lengths)?;
        validate_angles(&angles)?;
        Ok(Self {
            lengths,
            angles,
            shape: CellShape::Triclinic,
        })
    }

    pub fn shape(&self) -> CellShape {
        self.shape
    }

    pub fn lengths(&self) -> [f64; 3] {
        self.lengths
    }

    pub fn angles(&self) -> [f64; 3] {
        self.angles
    }

    /// Changes the shape of this cell.
    ///
    /// Switching to [`CellShape::Triclinic`] or [`CellShape::Infinite`] only
    /// relabels the cell. Switching to [`CellShape::Orthorhombic`] requires the
    /// lattice matrix built from the stored lengths and angles to already be
    /// diagonal. For an infinite cell this is the matrix it would have as a
    /// triclinic cell, not the zero matrix returned by [`UnitCell::matrix`]:
    /// an infinite cell keeping non-right angles can not become orthorhombic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] when asked to make a cell with a
    /// non-diagonal matrix orthorhombic.
    pub fn set_shape(&mut self, shape: CellShape) -> Result<()> {
        if shape == CellShape::Orthorhombic {
            if !is_diagonal(&lattice_matrix(&self.lengths, &self.angles)) {
                return Err(Error::InvalidOperation(format!(
                    "can not set the shape of a cell with angles {:?} to orthorhombic",
                    self.angles
                )));
            }
            self.angles = RIGHT_ANGLES;
        }
        debug!("Changing unit cell shape from {} to {}", self.shape, shape);
        self.shape = shape;
        Ok(())
    }

    /// Sets the lengths of the three lattice vectors, keeping their directions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] for an infinite cell, and
    /// [`Error::InvalidArgument`] for negative or non-finite lengths.
    pub fn set_lengths(&mut self, lengths: [f64; 3]) -> Result<()> {
        if self.shape == CellShape::Infinite {
            return Err(Error::InvalidOperation(
                "can not set the lengths of an infinite cell".into(),
            ));
        }
        validate_lengths(&lengths)?;
        self.lengths = lengths;
        Ok(())
    }

    /// Sets the three angles of this cell, in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] unless the cell is triclinic, and
    /// [`Error::InvalidArgument`] for angles that do not describe a
    /// parallelepiped.
    pub fn set_angles(&mut self, angles: [f64; 3]) -> Result<()> {
        if self.shape != CellShape::Triclinic {
            return Err(Error::InvalidOperation(format!(
                "can not set the angles of an {} cell, make it triclinic first",
                self.shape
            )));
        }
        validate_angles(&angles)?;
        self.angles = angles;
        Ok(())
    }

    /// The lattice matrix, with the lattice vectors as rows.
    pub fn matrix(&self) -> Matrix3<f64> {
        match self.shape {
            CellShape::Infinite => Matrix3::zeros(),
            CellShape::Orthorhombic => Matrix3::from_diagonal(&Vector3::from(self.lengths)),
            CellShape::Triclinic => lattice_matrix(&self.lengths, &self.angles),
        }
    }

    pub fn volume(&self) -> f64 {
        match self.shape {
            CellShape::Infinite => 0.0,
            CellShape::Orthorhombic => self.lengths[0] * self.lengths[1] * self.lengths[2],
            CellShape::Triclinic => self.matrix().determinant(),
        }
    }

    /// Converts a cartesian vector to fractional coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] for an infinite cell or a cell with
    /// a singular matrix.
    pub fn fractional(&self, vector: &Vector3<f64>) -> Result<Vector3<f64>> {
        if self.shape == CellShape::Infinite {
            return Err(Error::InvalidOperation(
                "an infinite cell has no fractional coordinates".into(),
            ));
        }
        let inverse = self.matrix().transpose().try_inverse().ok_or_else(|| {
            Error::InvalidOperation(format!(
                "the matrix of a cell with lengths {:?} is not invertible",
                self.lengths
            ))
        })?;
        Ok(inverse * vector)
    }

    /// Converts fractional coordinates back to a cartesian vector.
    pub fn cartesian(&self, fractional: &Vector3<f64>) -> Vector3<f64> {
        self.matrix().transpose() * fractional
    }

    /// Wraps a displacement vector in this cell, using the minimum image
    /// convention.
    ///
    /// The result differs from the input by integer multiples of the lattice
    /// vectors, and its fractional coordinates lie in `[-0.5, 0.5]`. Halfway
    /// values round away from zero, so a fractional coordinate of `0.5` maps
    /// to `-0.5` and `-0.5` maps to `0.5`. Infinite
    /// cells leave the vector untouched, and orthorhombic cells leave axes with
    /// a zero length untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] for a triclinic cell with a singular
    /// matrix.
    pub fn wrap(&self, vector: &Vector3<f64>) -> Result<Vector3<f64>> {
        match self.shape {
            CellShape::Infinite => Ok(*vector),
            CellShape::Orthorhombic => Ok(Vector3::from_fn(|i, _| {
                let length = self.lengths[i];
                if length == 0.0 {
                    vector[i]
                } else {
                    vector[i] - length * round_half_away(vector[i] / length)
                }
            })),
            CellShape::Triclinic => {
                let fractional = self.fractional(vector)?;
                let wrapped = fractional.map(|f| f - round_half_away(f));
                Ok(self.cartesian(&wrapped))
            }
        }
    }
}

impl fmt::Display for UnitCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.lengths;
        let [alpha, beta, gamma] = self.angles;
        write!(
            f,
            "{} cell (a = {a}, b = {b}, c = {c}, alpha = {alpha}, beta = {beta}, gamma = {gamma})",
            self.shape
        )
    }
}

fn lattice_matrix(lengths: &[f64; 3], angles: &[f64; 3]) -> Matrix3<f64> {
    let [a, b, c] = *lengths;
    let [alpha, beta, gamma] = *angles;

    let cos_alpha = cos_degrees(alpha);
    let cos_beta = cos_degrees(beta);
    let cos_gamma = cos_degrees(gamma);
    let sin_gamma = sin_degrees(gamma);

    let cy = (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
    let cz = height_squared(cos_alpha, cos_beta, cos_gamma, sin_gamma)
        .max(0.0)
        .sqrt();

    Matrix3::new(
        a,
        0.0,
        0.0,
        b * cos_gamma,
        b * sin_gamma,
        0.0,
        c * cos_beta,
        c * cy,
        c * cz,
    )
}

/// Squared height of the unit-length `c` vector above the `ab` plane.
fn height_squared(cos_alpha: f64, cos_beta: f64, cos_gamma: f64, sin_gamma: f64) -> f64 {
    let cy = (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
    1.0 - cos_beta * cos_beta - cy * cy
}

fn validate_lengths(lengths: &[f64; 3]) -> Result<()> {
    if lengths.iter().any(|l| !l.is_finite() || *l < 0.0) {
        return Err(Error::InvalidArgument(format!(
            "unit cell lengths must be finite and non-negative, got {lengths:?}"
        )));
    }
    Ok(())
}

fn validate_angles(angles: &[f64; 3]) -> Result<()> {
    if angles
        .iter()
        .any(|a| !a.is_finite() || *a <= 0.0 || *a >= 180.0)
    {
        return Err(Error::InvalidArgument(format!(
            "unit cell angles must be strictly between 0 and 180 degrees, got {angles:?}"
        )));
    }
    if angles.iter().sum::<f64>() >= 360.0 {
        return Err(Error::InvalidArgument(format!(
            "unit cell angles must sum to less than 360 degrees, got {angles:?}"
        )));
    }
    let [alpha, beta, gamma] = *angles;
    let squared = height_squared(
        cos_degrees(alpha),
        cos_degrees(beta),
        cos_degrees(gamma),
        sin_degrees(gamma),
    );
    if squared < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "unit cell angles {angles:?} do not describe a parallelepiped"
        )));
    }
    Ok(())
}

//! Unit cell entry points.
//!
//! Cell handles are created by [`molio_cell`], [`molio_cell_triclinic`],
//! [`molio_cell_copy`] or [`molio_cell_from_frame`] and owned by the caller,
//! who must release each of them exactly once with [`molio_cell_free`].
//! Constructors return NULL on failure. Other functions leave their output
//! untouched when they fail.

use crate::alloc::{free_handle, new_handle};
use crate::frame::molio_frame_t;
use crate::status::{catch, check_not_null, molio_status_t};
use molio::{CellProvider, CellShape, UnitCell};
use nalgebra::Vector3;
use std::ptr;

/// Opaque handle to a unit cell.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone)]
pub struct molio_cell_t {
    pub(crate) inner: UnitCell,
}

impl From<UnitCell> for molio_cell_t {
    fn from(inner: UnitCell) -> Self {
        Self { inner }
    }
}

#[repr(C)]
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum molio_cellshape_t {
    MOLIO_CELL_ORTHORHOMBIC = 0,
    MOLIO_CELL_TRICLINIC = 1,
    MOLIO_CELL_INFINITE = 2,
}

impl From<CellShape> for molio_cellshape_t {
    fn from(shape: CellShape) -> Self {
        match shape {
            CellShape::Orthorhombic => molio_cellshape_t::MOLIO_CELL_ORTHORHOMBIC,
            CellShape::Triclinic => molio_cellshape_t::MOLIO_CELL_TRICLINIC,
            CellShape::Infinite => molio_cellshape_t::MOLIO_CELL_INFINITE,
        }
    }
}

impl From<molio_cellshape_t> for CellShape {
    fn from(shape: molio_cellshape_t) -> Self {
        match shape {
            molio_cellshape_t::MOLIO_CELL_ORTHORHOMBIC => CellShape::Orthorhombic,
            molio_cellshape_t::MOLIO_CELL_TRICLINIC => CellShape::Triclinic,
            molio_cellshape_t::MOLIO_CELL_INFINITE => CellShape::Infinite,
        }
    }
}

fn new_cell<F>(build: F) -> *mut molio_cell_t
where
    F: FnOnce() -> molio::Result<UnitCell>,
{
    let mut cell = ptr::null_mut();
    catch(|| {
        cell = new_handle(|| build().map(molio_cell_t::from))?;
        Ok(())
    });
    cell
}

/// Creates an orthorhombic cell from three lengths.
///
/// # Safety
///
/// `lengths` must be NULL or point to three readable doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell(lengths: *const [f64; 3]) -> *mut molio_cell_t {
    new_cell(|| {
        check_not_null(lengths, "lengths")?;
        UnitCell::new(unsafe { *lengths })
    })
}

/// Creates a triclinic cell from three lengths and three angles in degrees.
///
/// The cell is triclinic even when all the angles are 90°.
///
/// # Safety
///
/// `lengths` and `angles` must be NULL or point to three readable doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_triclinic(
    lengths: *const [f64; 3],
    angles: *const [f64; 3],
) -> *mut molio_cell_t {
    new_cell(|| {
        check_not_null(lengths, "lengths")?;
        check_not_null(angles, "angles")?;
        UnitCell::triclinic(unsafe { *lengths }, unsafe { *angles })
    })
}

/// Creates an independent copy of `cell`.
///
/// # Safety
///
/// `cell` must be NULL or a live cell handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_copy(cell: *const molio_cell_t) -> *mut molio_cell_t {
    new_cell(|| {
        check_not_null(cell, "cell")?;
        Ok(unsafe { &*cell }.inner.clone())
    })
}

/// Creates a copy of the current cell of `frame`.
///
/// # Safety
///
/// `frame` must be NULL or a live frame handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_from_frame(frame: *const molio_frame_t) -> *mut molio_cell_t {
    new_cell(|| {
        check_not_null(frame, "frame")?;
        Ok(unsafe { &*frame }.inner.cell())
    })
}

/// Releases a cell handle. NULL is ignored.
///
/// # Safety
///
/// `cell` must be NULL or a live cell handle, and must not be used
/// afterwards. Releasing the same handle twice is undefined behavior.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_free(cell: *mut molio_cell_t) {
    unsafe { free_handle(cell) };
}

/// Writes the three lengths of `cell` in `lengths`.
///
/// # Safety
///
/// `cell` must be NULL or a live cell handle, `lengths` must be NULL or point
/// to three writable doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_lengths(
    cell: *const molio_cell_t,
    lengths: *mut [f64; 3],
) -> molio_status_t {
    catch(|| {
        check_not_null(cell, "cell")?;
        check_not_null(lengths, "lengths")?;
        unsafe { *lengths = (*cell).inner.lengths() };
        Ok(())
    })
}

/// Sets the three lengths of `cell`, keeping the angles and the shape.
///
/// # Safety
///
/// `cell` must be NULL or a live cell handle, `lengths` must be NULL or point
/// to three readable doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_set_lengths(
    cell: *mut molio_cell_t,
    lengths: *const [f64; 3],
) -> molio_status_t {
    catch(|| {
        check_not_null(cell, "cell")?;
        check_not_null(lengths, "lengths")?;
        unsafe { (*cell).inner.set_lengths(*lengths) }
    })
}

/// Writes the three angles of `cell`, in degrees, in `angles`.
///
/// # Safety
///
/// `cell` must be NULL or a live cell handle, `angles` must be NULL or point
/// to three writable doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_angles(
    cell: *const molio_cell_t,
    angles: *mut [f64; 3],
) -> molio_status_t {
    catch(|| {
        check_not_null(cell, "cell")?;
        check_not_null(angles, "angles")?;
        unsafe { *angles = (*cell).inner.angles() };
        Ok(())
    })
}

/// Sets the three angles of `cell`, in degrees. Only triclinic cells accept
/// new angles.
///
/// # Safety
///
/// `cell` must be NULL or a live cell handle, `angles` must be NULL or point
/// to three readable doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_set_angles(
    cell: *mut molio_cell_t,
    angles: *const [f64; 3],
) -> molio_status_t {
    catch(|| {
        check_not_null(cell, "cell")?;
        check_not_null(angles, "angles")?;
        unsafe { (*cell).inner.set_angles(*angles) }
    })
}

/// Writes the lattice matrix of `cell` in `matrix`, one lattice vector per
/// row.
///
/// # Safety
///
/// `cell` must be NULL or a live cell handle, `matrix` must be NULL or point
/// to nine writable doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_matrix(
    cell: *const molio_cell_t,
    matrix: *mut [[f64; 3]; 3],
) -> molio_status_t {
    catch(|| {
        check_not_null(cell, "cell")?;
        check_not_null(matrix, "matrix")?;
        let lattice = unsafe { &*cell }.inner.matrix();
        let rows: [[f64; 3]; 3] =
            std::array::from_fn(|i| std::array::from_fn(|j| lattice[(i, j)]));
        unsafe { *matrix = rows };
        Ok(())
    })
}

/// Writes the shape of `cell` in `shape`.
///
/// # Safety
///
/// `cell` must be NULL or a live cell handle, `shape` must be NULL or point to
/// a writable `molio_cellshape_t`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_shape(
    cell: *const molio_cell_t,
    shape: *mut molio_cellshape_t,
) -> molio_status_t {
    catch(|| {
        check_not_null(cell, "cell")?;
        check_not_null(shape, "shape")?;
        unsafe { *shape = (*cell).inner.shape().into() };
        Ok(())
    })
}

/// Changes the shape of `cell`.
///
/// Making a cell orthorhombic fails unless its matrix is already diagonal.
///
/// # Safety
///
/// `cell` must be NULL or a live cell handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_set_shape(
    cell: *mut molio_cell_t,
    shape: molio_cellshape_t,
) -> molio_status_t {
    catch(|| {
        check_not_null(cell, "cell")?;
        unsafe { (*cell).inner.set_shape(shape.into()) }
    })
}

/// Writes the volume of `cell` in `volume`.
///
/// # Safety
///
/// `cell` must be NULL or a live cell handle, `volume` must be NULL or point
/// to a writable double.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_volume(
    cell: *const molio_cell_t,
    volume: *mut f64,
) -> molio_status_t {
    catch(|| {
        check_not_null(cell, "cell")?;
        check_not_null(volume, "volume")?;
        unsafe { *volume = (*cell).inner.volume() };
        Ok(())
    })
}

/// Wraps `vector` in `cell` in place, using the minimum image convention.
///
/// # Safety
///
/// `cell` must be NULL or a live cell handle, `vector` must be NULL or point
/// to three readable and writable doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn molio_cell_wrap(
    cell: *const molio_cell_t,
    vector: *mut [f64; 3],
) -> molio_status_t {
    catch(|| {
        check_not_null(cell, "cell")?;
        check_not_null(vector, "vector")?;
        let input = Vector3::from(unsafe { *vector });
        let wrapped = unsafe { &*cell }.inner.wrap(&input)?;
        unsafe { *vector = wrapped.into() };
        Ok(())
    })
}

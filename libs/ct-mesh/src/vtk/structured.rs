//! `STRUCTURED_POINTS` label volumes.

use std::io::Write;

use glam::{DMat3, DVec3};
use tracing::{debug, warn};
use vtkio::model::{
    Attribute, Attributes, DataArrayBase, DataSet, ElementType, Extent, IOBuffer,
    ImageDataPiece, Piece, Vtk,
};

use crate::error::{MeshError, MeshResult};
use crate::volume::{ImageGeometry, LabelVolume};

use super::{inline_piece, legacy_file, scalar_values, write_ascii, ScalarValues};

/// Parses a label volume.
///
/// The first scalar array of the point data holds the labels. Values must
/// be integers that fit in `u16`; whether they are valid labels is checked
/// later, at sampling time.
pub fn read_structured_points(bytes: &[u8]) -> MeshResult<LabelVolume> {
    let vtk = Vtk::parse_legacy_be(bytes)?;
    debug!(version = ?vtk.version, title = %vtk.title, "reading structured points");
    let DataSet::ImageData {
        extent,
        origin,
        spacing,
        pieces,
        ..
    } = vtk.data
    else {
        return Err(MeshError::unsupported(
            "dataset kind (expected STRUCTURED_POINTS)",
        ));
    };

    let dimensions = extent_dimensions(&extent)?;
    let geometry = ImageGeometry::new(dimensions, widen(spacing))?.with_origin(widen(origin))?;

    let piece = inline_piece(pieces)?;
    let labels = piece
        .data
        .point
        .into_iter()
        .find_map(|attribute| match attribute {
            Attribute::DataArray(array) => match array.elem {
                ElementType::Scalars { num_comp, .. } => Some((num_comp, array.data)),
                _ => None,
            },
            Attribute::Field { .. } => None,
        })
        .ok_or_else(|| MeshError::malformed("volume has no scalar point data"))?;
    if labels.0 != 1 {
        return Err(MeshError::malformed(format!(
            "label array has {} components",
            labels.0
        )));
    }
    LabelVolume::new(geometry, label_values(labels.1)?)
}

fn extent_dimensions(extent: &Extent) -> MeshResult<[usize; 3]> {
    match extent {
        Extent::Dims(dims) => Ok(dims.map(|d| d as usize)),
        Extent::Ranges(ranges) => {
            let mut dimensions = [0; 3];
            for (dimension, range) in dimensions.iter_mut().zip(ranges.iter()) {
                let count = i64::from(*range.end()) - i64::from(*range.start()) + 1;
                *dimension = usize::try_from(count)
                    .map_err(|_| MeshError::invalid_volume(format!("empty extent {range:?}")))?;
            }
            Ok(dimensions)
        }
    }
}

fn widen(v: [f32; 3]) -> DVec3 {
    DVec3::new(f64::from(v[0]), f64::from(v[1]), f64::from(v[2]))
}

/// Accepts integral floats such as `2.0` written by float-typed arrays.
pub(super) fn label_values(buffer: IOBuffer) -> MeshResult<Vec<u16>> {
    let not_a_label = |value: String| {
        MeshError::malformed(format!(
            "voxel value {value} is not a 16-bit unsigned integer"
        ))
    };
    match scalar_values(buffer)? {
        ScalarValues::Int(values) => values
            .into_iter()
            .map(|v| u16::try_from(v).map_err(|_| not_a_label(v.to_string())))
            .collect(),
        ScalarValues::Float(values) => values
            .into_iter()
            .map(|v| {
                if v.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&v) {
                    Ok(v as u16)
                } else {
                    Err(not_a_label(v.to_string()))
                }
            })
            .collect(),
    }
}

/// Writes a label volume.
///
/// The legacy format has no orientation field and stores origin and
/// spacing in single precision; a non-identity direction matrix is dropped
/// with a warning.
pub fn write_structured_points<W: Write>(writer: &mut W, volume: &LabelVolume) -> MeshResult<()> {
    let geometry = volume.geometry();
    if geometry.direction() != DMat3::IDENTITY {
        warn!("direction matrix is not stored in STRUCTURED_POINTS files");
    }
    let mut dims = [0u32; 3];
    for (dim, &d) in dims.iter_mut().zip(geometry.dimensions().iter()) {
        *dim = u32::try_from(d)
            .map_err(|_| MeshError::invalid_volume(format!("dimension {d} too large for VTK")))?;
    }

    let labels = Attribute::DataArray(DataArrayBase {
        name: "labels".to_string(),
        elem: ElementType::Scalars {
            num_comp: 1,
            lookup_table: None,
        },
        data: IOBuffer::U16(volume.data().to_vec()),
    });
    let data = DataSet::ImageData {
        extent: Extent::Dims(dims),
        origin: geometry.origin().as_vec3().to_array(),
        spacing: geometry.spacing().as_vec3().to_array(),
        meta: None,
        pieces: vec![Piece::Inline(Box::new(ImageDataPiece {
            extent: Extent::Dims(dims),
            data: Attributes {
                point: vec![labels],
                cell: Vec::new(),
            },
        }))],
    };
    write_ascii(writer, legacy_file("ct-mesh label volume", data))
}

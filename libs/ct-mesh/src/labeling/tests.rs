//! # Material Labeler Tests

use super::*;
use crate::volume::{ImageGeometry, VoxelIndex};
use glam::DVec3;

fn volume_2x2x2(value: u16) -> LabelVolume {
    LabelVolume::filled(ImageGeometry::new([2, 2, 2], DVec3::ONE).unwrap(), value)
}

/// Small tetrahedron whose centroid is `offset + (0.1, 0.1, 0.1)`.
fn corner_tetra(offset: DVec3) -> TetMesh {
    TetMesh::from_parts(
        vec![
            offset,
            offset + DVec3::new(0.4, 0.0, 0.0),
            offset + DVec3::new(0.0, 0.4, 0.0),
            offset + DVec3::new(0.0, 0.0, 0.4),
        ],
        vec![[0, 1, 2, 3]],
    )
}

// =============================================================================
// MATERIAL
// =============================================================================

#[test]
fn test_material_range() {
    assert_eq!(Material::new(0), None);
    assert_eq!(Material::new(1), Some(Material::ONE));
    assert_eq!(Material::new(3), Some(Material::THREE));
    assert_eq!(Material::new(4), None);
}

#[test]
fn test_background_maps_to_material_three() {
    assert_eq!(Material::from_label(Label::Background), Material::THREE);
    assert_eq!(Material::from_label(Label::Class1), Material::ONE);
    assert_eq!(Material::from_label(Label::Class2), Material::TWO);
    assert_eq!(Material::from_label(Label::Class3), Material::THREE);
}

#[test]
fn test_options_from_arguments() {
    let args = MeshingArguments {
        fallback_material: 1,
        ..MeshingArguments::default()
    };
    let options = LabelingOptions::from_arguments(&args).unwrap();
    assert_eq!(options.fallback, Material::ONE);

    let args = MeshingArguments {
        fallback_material: 0,
        ..MeshingArguments::default()
    };
    assert_eq!(
        LabelingOptions::from_arguments(&args),
        Err(ConfigError::InvalidFallbackMaterial(0))
    );
}

// =============================================================================
// LABELING
// =============================================================================

#[test]
fn test_background_centroid_gets_material_three() {
    let labeling =
        label_cells(&corner_tetra(DVec3::ZERO), &volume_2x2x2(0), &LabelingOptions::default())
            .unwrap();
    assert_eq!(labeling.materials, vec![Material::THREE]);
    assert_eq!(labeling.report.background_remapped, 1);
}

#[test]
fn test_label_is_copied_to_material() {
    let labeling =
        label_cells(&corner_tetra(DVec3::ZERO), &volume_2x2x2(2), &LabelingOptions::default())
            .unwrap();
    assert_eq!(labeling.materials, vec![Material::TWO]);
    assert_eq!(labeling.report.per_material, [0, 1, 0]);
}

#[test]
fn test_out_of_bounds_centroid_gets_fallback() {
    let mesh = corner_tetra(DVec3::new(10.0, 0.0, 0.0));
    let labeling = label_cells(&mesh, &volume_2x2x2(1), &LabelingOptions::default()).unwrap();
    assert_eq!(labeling.materials, vec![Material::THREE]);
    assert_eq!(labeling.report.out_of_bounds, 1);

    let options = LabelingOptions {
        fallback: Material::TWO,
    };
    let labeling = label_cells(&mesh, &volume_2x2x2(1), &options).unwrap();
    assert_eq!(labeling.materials, vec![Material::TWO]);
}

#[test]
fn test_unexpected_label_is_fatal() {
    let err = label_cells(&corner_tetra(DVec3::ZERO), &volume_2x2x2(5), &LabelingOptions::default())
        .unwrap_err();
    match err {
        MeshError::LabelIntegrity { cell, value, index } => {
            assert_eq!(cell, 0);
            assert_eq!(value, 5);
            assert_eq!(index, VoxelIndex::new(0, 0, 0));
        }
        other => panic!("expected integrity error, got {other:?}"),
    }
}

#[test]
fn test_first_bad_cell_is_reported() {
    let mut volume = volume_2x2x2(1);
    volume.set(VoxelIndex::new(1, 0, 0), 7);
    volume.set(VoxelIndex::new(0, 1, 0), 9);

    // cells 0 and 2 are fine, 1 hits value 7, 3 hits value 9
    let mut points = Vec::new();
    let mut cells = Vec::new();
    for offset in [
        DVec3::ZERO,
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 1.0),
        DVec3::new(0.0, 1.0, 0.0),
    ] {
        let base = points.len() as u32;
        points.extend_from_slice(corner_tetra(offset).points());
        cells.push([base, base + 1, base + 2, base + 3]);
    }
    let mesh = TetMesh::from_parts(points, cells);

    let err = label_cells(&mesh, &volume, &LabelingOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        MeshError::LabelIntegrity {
            cell: 1,
            value: 7,
            ..
        }
    ));
}

#[test]
fn test_one_material_per_cell() {
    let geometry = ImageGeometry::new([4, 4, 4], DVec3::splat(0.5)).unwrap();
    let volume = LabelVolume::from_fn(geometry, |[i, j, k]| ((i + j + k) % 4) as u16);

    let mut points = Vec::new();
    let mut cells = Vec::new();
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                let offset = DVec3::new(i as f64, j as f64, k as f64) * 0.5;
                let base = points.len() as u32;
                points.extend_from_slice(corner_tetra(offset).points());
                cells.push([base, base + 1, base + 2, base + 3]);
            }
        }
    }
    let mesh = TetMesh::from_parts(points, cells);

    let labeling = label_cells(&mesh, &volume, &LabelingOptions::default()).unwrap();
    assert_eq!(labeling.materials.len(), mesh.cell_count());
    assert!(labeling
        .materials
        .iter()
        .all(|m| (1..=3).contains(&m.id())));
    assert_eq!(labeling.report.per_material.iter().sum::<usize>(), 64);
    assert_eq!(labeling.report.background_remapped, 16);
    assert_eq!(labeling.report.out_of_bounds, 0);
}

#[test]
fn test_empty_mesh_labels_nothing() {
    let labeling =
        label_cells(&TetMesh::default(), &volume_2x2x2(1), &LabelingOptions::default()).unwrap();
    assert!(labeling.materials.is_empty());
    assert_eq!(labeling.report, LabelingReport::default());
}

#[test]
fn test_hand_built_mesh_with_bad_index_is_rejected() {
    let mesh = TetMesh::from_parts(
        vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
        vec![[0, 1, 2, 9]],
    );
    assert!(matches!(
        label_cells(&mesh, &volume_2x2x2(1), &LabelingOptions::default()),
        Err(MeshError::InvalidMesh { .. })
    ));

    let repeated = TetMesh::from_parts(
        vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
        vec![[0, 1, 1, 3]],
    );
    assert!(label_cells(&repeated, &volume_2x2x2(1), &LabelingOptions::default()).is_err());
}

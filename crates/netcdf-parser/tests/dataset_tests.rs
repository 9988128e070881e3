//! Integration tests reading NetCDF files written at test time.

use netcdf_parser::{NetCdfError, OceanDataset};
use test_utils::fixtures::{grid, time};
use test_utils::netcdf_fixtures::{write_ocean_file, OceanFileSpec};
use test_utils::{assert_approx_eq, create_salinity_grid, create_ssh_grid, temp_test_dir};

fn salinity_slices(count: usize) -> Vec<Vec<f32>> {
    let spec = grid::REGIONAL;
    (0..count)
        .map(|i| {
            create_salinity_grid(spec.width, spec.height)
                .into_iter()
                .map(|v| v + i as f32)
                .collect()
        })
        .collect()
}

#[test]
fn test_open_salinity_dataset() {
    let dir = temp_test_dir();
    let path = dir.path().join("mean.nc");
    let depths = [1.5, 10.0];
    let spec = OceanFileSpec::salinity(grid::REGIONAL, &time::TWO_DAYS_HOURS, &depths);
    write_ocean_file(&path, &spec, &salinity_slices(spec.slice_count())).unwrap();

    let dataset = OceanDataset::open(&path).unwrap();
    assert_eq!(dataset.shape(), (grid::REGIONAL.height, grid::REGIONAL.width));
    assert_eq!(dataset.lats()[0], 40.0);
    assert_eq!(dataset.lons()[15], 42.0);
    assert_eq!(dataset.depths(), Some(&[1.5, 10.0][..]));

    let steps = dataset.timesteps();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[1].date_string(), "2021-01-01");
    assert_eq!(steps[1].hour_string(), "12");
    assert_eq!(steps[2].date_string(), "2021-01-02");
}

#[test]
fn test_read_field_selects_time_and_depth() {
    let dir = temp_test_dir();
    let path = dir.path().join("mean.nc");
    let depths = [1.5, 10.0];
    let spec = OceanFileSpec::salinity(grid::REGIONAL, &time::TWO_DAYS_HOURS, &depths);
    let slices = salinity_slices(spec.slice_count());
    write_ocean_file(&path, &spec, &slices).unwrap();

    let dataset = OceanDataset::open(&path).unwrap();
    // time 1, depth 1 is slice 3 (time-major)
    let field = dataset.read_field("vosaline", 1, Some(1)).unwrap();
    assert_eq!(field.rows(), grid::REGIONAL.height);
    assert_approx_eq!(field.get(0, 0), slices[3][0], 1e-5);

    // Land cells are stored as fill values and come back missing
    let land_row = grid::REGIONAL.height - 1;
    assert!(field.get(land_row, 0).is_nan());
    assert_eq!(field.missing_mask().iter().filter(|m| **m).count(), 4 * 2);
}

#[test]
fn test_curvilinear_ssh_dataset() {
    let dir = temp_test_dir();
    let path = dir.path().join("ssh.nc");
    let spec = OceanFileSpec::ssh(grid::TINY, &time::TWO_DAYS_HOURS);
    let slices: Vec<Vec<f32>> = (0..3)
        .map(|_| create_ssh_grid(grid::TINY.width, grid::TINY.height, 2))
        .collect();
    write_ocean_file(&path, &spec, &slices).unwrap();

    let dataset = OceanDataset::open(&path).unwrap();
    assert!(dataset.depths().is_none());
    assert_eq!(&dataset.lats()[..], &[42.0, 43.0, 44.0][..]);
    assert_eq!(&dataset.lons()[..], &[30.0, 31.0, 32.0, 33.0][..]);

    let field = dataset.read_field("sossheig", 2, None).unwrap();
    assert_approx_eq!(field.get(0, 0), 0.02, 1e-6);
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = temp_test_dir();
    let err = OceanDataset::open(dir.path().join("absent.nc")).unwrap_err();
    assert!(matches!(err, NetCdfError::NotFound(_)));
}

#[test]
fn test_missing_variable() {
    let dir = temp_test_dir();
    let path = dir.path().join("ssh.nc");
    let spec = OceanFileSpec::ssh(grid::TINY, &[0.0]);
    write_ocean_file(&path, &spec, &[vec![0.1; grid::TINY.size()]]).unwrap();

    let dataset = OceanDataset::open(&path).unwrap();
    assert!(!dataset.has_variable("vosaline"));
    let err = dataset.read_field("vosaline", 0, None).unwrap_err();
    assert!(matches!(err, NetCdfError::MissingData(_)));
}

#[test]
fn test_dimension_mismatch_against_reference() {
    let dir = temp_test_dir();
    let small = dir.path().join("small.nc");
    let large = dir.path().join("large.nc");
    write_ocean_file(
        &small,
        &OceanFileSpec::ssh(grid::TINY, &[0.0]),
        &[vec![0.0; grid::TINY.size()]],
    )
    .unwrap();
    write_ocean_file(
        &large,
        &OceanFileSpec::ssh(grid::REGIONAL, &[0.0]),
        &[vec![0.0; grid::REGIONAL.size()]],
    )
    .unwrap();

    let reference = OceanDataset::open(&small).unwrap().mesh().unwrap();
    let other = OceanDataset::open(&large).unwrap();
    let err = other
        .read_field_on("sossheig", 0, None, &reference)
        .unwrap_err();
    assert!(matches!(err, NetCdfError::DimensionMismatch { .. }));
}

#[test]
fn test_time_index_out_of_range() {
    let dir = temp_test_dir();
    let path = dir.path().join("ssh.nc");
    write_ocean_file(
        &path,
        &OceanFileSpec::ssh(grid::TINY, &[0.0]),
        &[vec![0.0; grid::TINY.size()]],
    )
    .unwrap();

    let dataset = OceanDataset::open(&path).unwrap();
    let err = dataset.read_field("sossheig", 5, None).unwrap_err();
    assert!(matches!(err, NetCdfError::IndexOutOfRange { axis: "time", .. }));
}

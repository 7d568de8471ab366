use approx::assert_abs_diff_eq;
use forecast_engine::scaler::StandardScaler;
use forecast_engine::ForecastError;
use ndarray::{array, Array2};

#[test]
fn test_standardises_columns() {
    let x = array![[1.0, 10.0], [2.0, 10.0], [3.0, 10.0]];
    let scaler = StandardScaler::fit(&x).unwrap();
    let scaled = scaler.transform(&x).unwrap();

    // Population std of [1, 2, 3] is sqrt(2/3)
    let std = (2.0_f64 / 3.0).sqrt();
    assert_abs_diff_eq!(scaled[[0, 0]], -1.0 / std, epsilon = 1e-12);
    assert_abs_diff_eq!(scaled[[1, 0]], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(scaled[[2, 0]], 1.0 / std, epsilon = 1e-12);

    // Constant column maps to zero
    for v in scaled.column(1) {
        assert_abs_diff_eq!(*v, 0.0);
    }
    assert_eq!(scaler.n_features(), 2);
}

#[test]
fn test_row_transform_matches_matrix_transform() {
    let x = array![[1.0, 4.0], [2.0, 8.0], [6.0, 3.0]];
    let scaler = StandardScaler::fit(&x).unwrap();
    let matrix = scaler.transform(&x).unwrap();

    for (i, row) in x.rows().into_iter().enumerate() {
        let single = scaler.transform_row(row).unwrap();
        for (a, b) in single.iter().zip(matrix.row(i)) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_width_mismatch_and_empty_fit() {
    let scaler = StandardScaler::fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
    assert!(matches!(
        scaler.transform(&array![[1.0, 2.0, 3.0]]),
        Err(ForecastError::DimensionMismatch {
            expected: 2,
            got: 3
        })
    ));

    let empty = Array2::<f64>::zeros((0, 2));
    assert!(matches!(
        StandardScaler::fit(&empty),
        Err(ForecastError::InvalidParameter(_))
    ));
}

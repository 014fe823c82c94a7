use ferreus_geointerp::{
    create_evaluation_grid, generate_random_coordinates, RTree3D, RadialBasisFunction,
    WindowFunction,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Define scattered source points over the North Atlantic
    let num_points = 5_000usize;
    let coordinates = generate_random_coordinates(num_points, (-60.0, 0.0), (20.0, 60.0), Some(42));

    // Assign a synthetic sea-surface-like field to the source points
    let values: Vec<f64> = (0..num_points)
        .map(|row| {
            let lon: f64 = coordinates[(row, 0)];
            let lat: f64 = coordinates[(row, 1)];
            (2.0 * lon.to_radians()).sin() * (3.0 * lat.to_radians()).cos()
        })
        .collect();

    // Index the point cloud on the default WGS-84 spheroid
    let mut mesh = RTree3D::<f64>::new(None);
    mesh.packing(&coordinates.as_ref(), &values)?;

    // Build a 1/2 degree grid of target points to interpolate at
    let targets = create_evaluation_grid(&[(-59.0, -1.0), (21.0, 59.0)], &[117, 77]);

    // Inverse distance weighting over the 8 nearest neighbours
    let (idw, _) = mesh.inverse_distance_weighting(&targets.as_ref(), 8, None, false, 2, 0)?;

    // Radial basis function interpolation over the same neighbourhoods
    let (rbf, _) = mesh.radial_basis_function(
        &targets.as_ref(),
        8,
        None,
        false,
        RadialBasisFunction::ThinPlate,
        None,
        0.0,
        0,
    )?;

    // Window-function averaging within 200 km
    let (smoothed, counts) =
        mesh.window_function(&targets.as_ref(), 16, 200_000.0, false, WindowFunction::Hann, 1.0, 0)?;

    let defined = smoothed.iter().filter(|v| v.is_finite()).count();
    println!("targets        : {}", targets.nrows());
    println!("defined (hann) : {}", defined);
    println!(
        "max |idw - rbf|: {:.6}",
        idw.iter()
            .zip(rbf.iter())
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .fold(0.0f64, |acc, (a, b)| acc.max((a - b).abs()))
    );
    println!(
        "mean neighbours: {:.1}",
        counts.iter().map(|&c| c as f64).sum::<f64>() / counts.len() as f64
    );

    Ok(())
}

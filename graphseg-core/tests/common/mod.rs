use graphseg_core::BandStack;
use graphseg_test_support::synthetic::SyntheticRaster;

#[must_use]
pub fn stack(name: &str, raster: SyntheticRaster) -> BandStack {
    BandStack::from_parts(name, raster.width, raster.height, raster.bands)
}

/// Returns the size of the region containing each pixel.
#[must_use]
pub fn region_size_per_pixel(root_labels: &[usize]) -> Vec<usize> {
    let mut counts = vec![0usize; root_labels.len()];
    for &root in root_labels {
        counts[root] += 1;
    }
    root_labels.iter().map(|&root| counts[root]).collect()
}

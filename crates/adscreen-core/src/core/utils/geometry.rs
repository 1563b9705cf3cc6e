use nalgebra::{DMatrix, Point3};

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

/// Root-mean-square deviation between two ordered coordinate sets, without superposition.
///
/// Returns `None` when the sets differ in length or are empty.
pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// Pairwise contact matrix: `true` where two distinct points lie strictly closer than
/// `threshold`. The diagonal is always `false`.
pub fn contact_map(positions: &[Point3<f64>], threshold: f64) -> DMatrix<bool> {
    let n = positions.len();
    let mut map = DMatrix::from_element(n, n, false);
    for i in 0..n {
        for j in (i + 1)..n {
            let in_contact = distance(&positions[i], &positions[j]) < threshold;
            map[(i, j)] = in_contact;
            map[(j, i)] = in_contact;
        }
    }
    map
}

/// Element-wise `target - reference` over two contact maps of equal shape.
///
/// Entries are `1` for gained contacts, `-1` for lost ones and `0` otherwise.
pub fn contact_map_difference(
    target: &DMatrix<bool>,
    reference: &DMatrix<bool>,
) -> Option<DMatrix<i8>> {
    if target.shape() != reference.shape() {
        return None;
    }
    Some(target.zip_map(reference, |t, r| t as i8 - r as i8))
}

/// Converts a boolean contact map into `0`/`1` integers for tabular output.
pub fn contact_map_as_int(map: &DMatrix<bool>) -> DMatrix<u8> {
    map.map(u8::from)
}

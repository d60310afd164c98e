//! Plain-text export of intersection points.
//!
//! One line per point: `vertex point x y z`, where `vertex` is the seed
//! vertex index and `point` numbers the crossings of that vertex's sphere.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use tracing::debug;

use super::save_error;
use crate::error::Result;

/// Write intersection points per vertex. Returns the number of lines.
///
/// # Example
///
/// ```
/// use msii::io::write_intersections;
/// use nalgebra::Point3;
///
/// let points = vec![Point3::new(1.0, 2.0, 3.0)];
/// let mut out = Vec::new();
/// write_intersections(&mut out, [(7, &points[..])]).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "7 0 1 2 3\n");
/// ```
pub fn write_intersections<'a, W, T>(writer: &mut W, points: T) -> Result<usize>
where
    W: Write,
    T: IntoIterator<Item = (usize, &'a [Point3<f64>])>,
{
    let mut lines = 0;
    for (vertex, points) in points {
        for (index, p) in points.iter().enumerate() {
            writeln!(writer, "{} {} {} {} {}", vertex, index, p.x, p.y, p.z)?;
            lines += 1;
        }
    }
    Ok(lines)
}

/// Save intersection points per vertex to a text file.
///
/// # Errors
///
/// Returns [`MsiiError::SaveError`](crate::error::MsiiError::SaveError) if
/// the file cannot be written.
pub fn save_intersections<'a, P, T>(path: P, points: T) -> Result<()>
where
    P: AsRef<Path>,
    T: IntoIterator<Item = (usize, &'a [Point3<f64>])>,
{
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| save_error(path, e.into()))?;
    let mut writer = BufWriter::new(file);
    let lines = write_intersections(&mut writer, points).map_err(|e| save_error(path, e))?;
    writer.flush().map_err(|e| save_error(path, e.into()))?;

    debug!(path = %path.display(), lines, "saved intersections");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MsiiError;

    #[test]
    fn test_lines_per_point() {
        let first = vec![Point3::new(0.5, 0.0, -1.0), Point3::new(0.0, 0.25, 0.0)];
        let second: Vec<Point3<f64>> = Vec::new();
        let third = vec![Point3::new(2.0, 2.0, 2.0)];

        let mut out = Vec::new();
        let lines = write_intersections(
            &mut out,
            [(0, &first[..]), (1, &second[..]), (2, &third[..])],
        )
        .unwrap();

        assert_eq!(lines, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0 0 0.5 0 -1\n0 1 0 0.25 0\n2 0 2 2 2\n"
        );
    }

    #[test]
    fn test_save_into_missing_directory() {
        let points = vec![Point3::new(1.0, 2.0, 3.0)];
        let path = std::env::temp_dir()
            .join("msii-missing-directory")
            .join("points.txt");
        let result = save_intersections(&path, [(0, &points[..])]);
        assert!(matches!(result, Err(MsiiError::SaveError { path: p, .. }) if p == path));
    }
}

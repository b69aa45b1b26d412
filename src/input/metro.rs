//! Code for reading the metro reference list.
use super::input_err_msg;
use crate::distance::Coordinate;
use crate::metro::{CityID, MetroTable};
use anyhow::{Context, Result, ensure};
use std::fs;
use std::path::Path;

const METROS_FILE_NAME: &str = "metros.txt";

/// Parse a single `Name:Lat,Lon` entry
fn parse_metro_line(line: &str) -> Option<(CityID, Coordinate)> {
    let (name, coords) = line.split_once(':')?;
    let (lat, lon) = coords.split_once(',')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    if !(lat.is_finite() && lon.is_finite()) {
        return None;
    }

    Some((name.into(), Coordinate::new(lat, lon)))
}

/// Read metros from lines of text in the form `Name:Lat,Lon`.
///
/// Blank lines are ignored.
fn read_metros_from_str(contents: &str) -> Result<MetroTable> {
    let mut metros = MetroTable::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let (city_id, coord) = parse_metro_line(line).with_context(|| {
            format!(
                "Malformed metro entry on line {}: \"{line}\". Expected Name:Lat,Lon",
                idx + 1
            )
        })?;
        ensure!(
            metros.insert(city_id.clone(), coord).is_none(),
            "Duplicate metro {city_id} on line {}",
            idx + 1
        );
    }

    ensure!(!metros.is_empty(), "No metros provided");

    Ok(metros)
}

/// Read the metro reference list from the input directory.
///
/// # Arguments
///
/// * `input_dir` - Folder containing input files
///
/// # Returns
///
/// A [`MetroTable`] in file order, or an error.
pub fn read_metros(input_dir: &Path) -> Result<MetroTable> {
    let file_path = input_dir.join(METROS_FILE_NAME);
    let contents = fs::read_to_string(&file_path).with_context(|| input_err_msg(&file_path))?;
    read_metros_from_str(&contents).with_context(|| input_err_msg(&file_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use indexmap::indexmap;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_read_metros_from_str() {
        let contents = "New York:40.7128,-74.0060\n\n  Los Angeles : 34.0522 , -118.2437\n";
        assert_eq!(
            read_metros_from_str(contents).unwrap(),
            indexmap! {
                "New York".into() => Coordinate::new(40.7128, -74.006),
                "Los Angeles".into() => Coordinate::new(34.0522, -118.2437),
            }
        );
    }

    #[test]
    fn test_read_metros_preserves_order() {
        let metros = read_metros_from_str("Z:1,1\nA:2,2\nM:3,3").unwrap();
        let names: Vec<_> = metros.keys().map(ToString::to_string).collect();
        assert_eq!(names, ["Z", "A", "M"]);
    }

    #[rstest]
    #[case("New York 40.7,-74.0", 1)]
    #[case("New York:40.7", 1)]
    #[case("A:1,1\nNew York:north,-74.0", 2)]
    #[case("A:1,1\n\n:40.7,-74.0", 3)]
    #[case("Bad:NaN,0\nA:0,0", 1)]
    #[case("A:0,0\nBad:inf,0", 2)]
    #[case("A:0,0\nBad:0,-inf", 2)]
    fn test_read_metros_from_str_malformed(#[case] contents: &str, #[case] line_num: usize) {
        let line = contents.lines().nth(line_num - 1).unwrap();
        assert_error!(
            read_metros_from_str(contents),
            format!("Malformed metro entry on line {line_num}: \"{line}\". Expected Name:Lat,Lon")
        );
    }

    #[test]
    fn test_read_metros_from_str_duplicate() {
        assert_error!(
            read_metros_from_str("A:1,1\nA:2,2"),
            "Duplicate metro A on line 2"
        );
    }

    #[test]
    fn test_read_metros_from_str_empty() {
        assert_error!(read_metros_from_str("\n\n"), "No metros provided");
    }

    #[test]
    fn test_read_metros() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(METROS_FILE_NAME)).unwrap();
            writeln!(file, "Chicago:41.8781,-87.6298").unwrap();
        }
        let metros = read_metros(dir.path()).unwrap();
        assert_eq!(
            metros.get("Chicago"),
            Some(&Coordinate::new(41.8781, -87.6298))
        );

        assert!(read_metros(tempdir().unwrap().path()).is_err());
    }
}

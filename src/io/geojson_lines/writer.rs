use std::io::Write;

use crate::error::Result;
use crate::io::geojson::table_to_features;
use crate::table::GeoTable;

/// Write a table to newline-delimited GeoJSON
pub fn write_geojson_lines<W: Write>(table: &GeoTable, mut writer: W) -> Result<()> {
    for feature in table_to_features(table)? {
        serde_json::to_writer(&mut writer, &feature)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::geojson_lines::read_geojson_lines;
    use crate::test::fixtures;

    #[test]
    fn one_feature_per_line() {
        let table = fixtures::point_table().with_crs(Some(crate::crs::WGS84));
        let mut buffer = Vec::new();
        write_geojson_lines(&table, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 2);

        let read = read_geojson_lines(text.as_bytes()).unwrap();
        assert_eq!(read.geometry().unwrap(), table.geometry().unwrap());
    }
}

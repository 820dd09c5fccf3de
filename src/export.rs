//! Spreadsheet-friendly export of water quality history.
//!
//! Documents are built as plain strings; the handler only picks the rows
//! and the content type. The CSV variant is prefixed with a UTF-8 BOM so
//! Excel detects the encoding of the Chinese headers. Rows are
//! `SampleRecord`s, so gap-filled synthetic samples export the same way
//! persisted ones do.

use chrono::NaiveDateTime;

use crate::sampling::SampleRecord;

pub const UTF8_BOM: &str = "\u{feff}";

pub const COLUMNS: [&str; 18] = [
    "塘口名称",
    "养殖品种",
    "记录时间",
    "水温(°C)",
    "浊度(NTU)",
    "电导率(μS/cm)",
    "水位(m)",
    "溶解氧(mg/L)",
    "pH值",
    "化学需氧量(mg/L)",
    "氨氮(mg/L)",
    "重金属(mg/L)",
    "余氯(mg/L)",
    "总磷(mg/L)",
    "总氮(mg/L)",
    "大肠杆菌群(CFU/L)",
    "藻类密度(个/L)",
    "生物毒性(%)",
];

/// One exported line: the sample plus the pond it belongs to.
#[derive(Clone, Debug)]
pub struct ExportRow {
    pub pond_name: String,
    pub species: String,
    pub sample: SampleRecord,
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn csv_document(rows: &[ExportRow]) -> String {
    let mut out = String::from(UTF8_BOM);
    out.push_str(&COLUMNS.join(","));
    out.push('\n');

    for row in rows {
        let s = &row.sample;
        let line = [
            row.pond_name.clone(),
            row.species.clone(),
            s.timestamp().format("%Y-%m-%d %H:%M").to_string(),
            s.temperature().to_string(),
            opt(s.turbidity()),
            opt(s.conductivity()),
            opt(s.water_level()),
            s.dissolved_oxygen().to_string(),
            s.ph().to_string(),
            opt(s.cod()),
            s.ammonia().to_string(),
            opt(s.heavy_metals()),
            opt(s.residual_chlorine()),
            opt(s.total_phosphorus()),
            opt(s.total_nitrogen()),
            opt(s.coliform()),
            opt(s.algae()),
            opt(s.biotoxicity()),
        ]
        .join(",");
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// `{pond}_水质数据_{start}_{end}`, with `所有塘口` standing in when the
/// export spans every pond.
pub fn export_filename(
    pond_name: Option<&str>,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> String {
    format!(
        "{}_水质数据_{}_{}",
        pond_name.unwrap_or("所有塘口"),
        start.format("%Y%m%d"),
        end.format("%Y%m%d"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::water_quality;
    use chrono::NaiveDate;

    fn sample(ts: NaiveDateTime) -> SampleRecord {
        SampleRecord::Persisted(water_quality::Model {
            id: 1,
            pond_id: 1,
            timestamp: ts,
            temperature: 25.3,
            dissolved_oxygen: 6.1,
            ph: 7.8,
            ammonia: 0.2,
            turbidity: Some(12.5),
            conductivity: Some(540.0),
            water_level: Some(2.1),
            cod: Some(18.4),
            heavy_metals: None,
            residual_chlorine: None,
            total_phosphorus: Some(0.3),
            total_nitrogen: Some(1.2),
            coliform: Some(450.0),
            algae: Some(5200.0),
            biotoxicity: Some(9.8),
        })
    }

    #[test]
    fn document_starts_with_bom_and_headers() {
        let doc = csv_document(&[]);
        assert!(doc.starts_with(UTF8_BOM));
        let header = doc.trim_start_matches(UTF8_BOM).lines().next().unwrap();
        assert_eq!(header.split(',').count(), 18);
        assert!(header.starts_with("塘口名称,养殖品种,记录时间"));
    }

    #[test]
    fn missing_probes_export_as_empty_cells() {
        let ts = NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let rows = vec![ExportRow {
            pond_name: "1号塘".to_string(),
            species: "南美白对虾".to_string(),
            sample: sample(ts),
        }];

        let doc = csv_document(&rows);
        let line = doc.trim_start_matches(UTF8_BOM).lines().nth(1).unwrap();
        let cells: Vec<&str> = line.split(',').collect();
        assert_eq!(cells.len(), 18);
        assert_eq!(cells[0], "1号塘");
        assert_eq!(cells[2], "2026-03-10 08:00");
        assert_eq!(cells[3], "25.3");
        // heavy metals and residual chlorine were not probed
        assert_eq!(cells[11], "");
        assert_eq!(cells[12], "");
    }

    #[test]
    fn synthetic_rows_export_every_cell() {
        let ts = NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let generated = crate::synthetic::sample_at(
            crate::synthetic::Baseline::Species(crate::synthetic::SpeciesProfile::ShrimpLike),
            &crate::synthetic::STANDARD,
            ts,
        );
        let rows = vec![ExportRow {
            pond_name: "1号塘".to_string(),
            species: "南美白对虾".to_string(),
            sample: SampleRecord::Synthetic(generated),
        }];

        let doc = csv_document(&rows);
        let line = doc.trim_start_matches(UTF8_BOM).lines().nth(1).unwrap();
        assert!(line.split(',').all(|cell| !cell.is_empty()));
    }

    #[test]
    fn filename_names_the_pond_or_all_ponds() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 3)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            export_filename(Some("1号塘"), start, end),
            "1号塘_水质数据_20260303_20260310"
        );
        assert_eq!(
            export_filename(None, start, end),
            "所有塘口_水质数据_20260303_20260310"
        );
    }
}

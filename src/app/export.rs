use crate::domain::model::{Leaderboard, OutputFile, SCORED_CRITERIA};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub fn to_json(leaderboard: &Leaderboard) -> Result<String> {
    Ok(serde_json::to_string_pretty(leaderboard)?)
}

/// 每個名次一列；缺少的評分項目留空
pub fn to_csv(leaderboard: &Leaderboard) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![
        "rank".to_string(),
        "project_id".to_string(),
        "team_name".to_string(),
    ];
    header.extend(SCORED_CRITERIA.map(|id| format!("criteria{}", id)));
    header.push("average".to_string());
    writer.write_record(&header)?;

    for standing in &leaderboard.standings {
        let mut row = vec![
            standing.rank.to_string(),
            standing.project_id.clone(),
            standing.team_name.clone(),
        ];
        row.extend(SCORED_CRITERIA.map(|id| {
            standing
                .criterion(id)
                .map(|total| total.to_string())
                .unwrap_or_default()
        }));
        row.push(format!("{:.1}", standing.average));
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 把所有輸出檔案打包成 ZIP
pub fn bundle(files: &[OutputFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for file in files {
        zip.start_file::<_, ()>(file.filename.as_str(), FileOptions::default())?;
        zip.write_all(&file.content)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ProjectStanding;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use std::io::Read;

    fn sample() -> Leaderboard {
        let mut criteria = BTreeMap::new();
        criteria.insert(1, 8.0);
        criteria.insert(2, 6.0);

        Leaderboard {
            title: "KNOWCODE 2.0 Leaderboard".to_string(),
            generated_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            standings: vec![
                ProjectStanding {
                    rank: 1,
                    project_id: "P1".to_string(),
                    team_name: "Alpha, Inc".to_string(),
                    criteria,
                    average: 7.0,
                },
                ProjectStanding {
                    rank: 2,
                    project_id: "P2".to_string(),
                    team_name: "Project P2".to_string(),
                    criteria: BTreeMap::new(),
                    average: 0.0,
                },
            ],
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "rank,project_id,team_name,criteria1,criteria2,criteria3,criteria4,criteria5,average"
        );
        assert_eq!(lines[1], "1,P1,\"Alpha, Inc\",8,6,,,,7.0");
        assert_eq!(lines[2], "2,P2,Project P2,,,,,,0.0");
    }

    #[test]
    fn test_json_contains_standings() {
        let json = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "KNOWCODE 2.0 Leaderboard");
        assert_eq!(value["standings"][0]["team_name"], "Alpha, Inc");
        assert_eq!(value["standings"][0]["average"], 7.0);
        assert_eq!(value["standings"][0]["criteria"]["1"], 8.0);
    }

    #[test]
    fn test_bundle_contains_every_file() {
        let files = vec![
            OutputFile {
                filename: "leaderboard.html".to_string(),
                content: b"<html></html>".to_vec(),
            },
            OutputFile {
                filename: "leaderboard.csv".to_string(),
                content: b"rank\n".to_vec(),
            },
        ];

        let data = bundle(&files).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut html = String::new();
        archive
            .by_name("leaderboard.html")
            .unwrap()
            .read_to_string(&mut html)
            .unwrap();
        assert_eq!(html, "<html></html>");
    }
}

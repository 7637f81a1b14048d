//! 評分彙總與排名
//!
//! 依專案分組，合併同一評分項目的分數，
//! 以 1–5 號評分項目中總分為正者計算平均 (四捨五入到小數一位)，
//! 再依平均分遞減排序；平均分相同時依專案 id 遞增排序。

use crate::domain::model::{
    CriterionMerge, ProjectStanding, Rating, TeamNames, SCORED_CRITERIA,
};
use std::collections::BTreeMap;

/// 找不到隊名時使用的顯示名稱
pub fn fallback_team_name(project_id: &str) -> String {
    format!("Project {}", project_id)
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 1–5 號評分項目中總分為正者的算術平均；沒有任何正分時為 0
pub fn average_score(criteria: &BTreeMap<u32, f64>) -> f64 {
    let positive: Vec<f64> = SCORED_CRITERIA
        .filter_map(|id| criteria.get(&id).copied())
        .filter(|total| *total > 0.0)
        .collect();

    if positive.is_empty() {
        return 0.0;
    }

    round_one_decimal(positive.iter().sum::<f64>() / positive.len() as f64)
}

#[derive(Default)]
struct CriterionAccumulator {
    total: f64,
    count: usize,
}

/// 依專案彙總評分；只有至少一筆評分的專案會出現在結果中。
/// 回傳順序依專案 id，rank 尚未指定。
pub fn aggregate(
    ratings: &[Rating],
    team_names: &TeamNames,
    merge: CriterionMerge,
) -> Vec<ProjectStanding> {
    let mut grouped: BTreeMap<&str, BTreeMap<u32, CriterionAccumulator>> = BTreeMap::new();

    for rating in ratings {
        let criteria = grouped.entry(rating.project_id.as_str()).or_default();

        if !rating.score.is_finite() {
            tracing::warn!(
                "Ignoring non-finite score for project {} criterion {}",
                rating.project_id,
                rating.criterion_id
            );
            continue;
        }

        let acc = criteria.entry(rating.criterion_id).or_default();
        acc.total += rating.score;
        acc.count += 1;
    }

    grouped
        .into_iter()
        .map(|(project_id, accumulators)| {
            let criteria: BTreeMap<u32, f64> = accumulators
                .into_iter()
                .map(|(id, acc)| {
                    let value = match merge {
                        CriterionMerge::Sum => acc.total,
                        CriterionMerge::Mean => acc.total / acc.count as f64,
                    };
                    (id, value)
                })
                .collect();

            let team_name = team_names
                .get(project_id)
                .filter(|name| !name.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| fallback_team_name(project_id));

            ProjectStanding {
                rank: 0,
                project_id: project_id.to_string(),
                team_name,
                average: average_score(&criteria),
                criteria,
            }
        })
        .collect()
}

/// 依平均分遞減排序並指定名次 (從 1 開始)
pub fn assign_ranks(mut standings: Vec<ProjectStanding>) -> Vec<ProjectStanding> {
    standings.sort_by(|a, b| {
        b.average
            .total_cmp(&a.average)
            .then_with(|| a.project_id.cmp(&b.project_id))
    });

    for (index, standing) in standings.iter_mut().enumerate() {
        standing.rank = index + 1;
    }

    standings
}

pub fn rank(
    ratings: &[Rating],
    team_names: &TeamNames,
    merge: CriterionMerge,
) -> Vec<ProjectStanding> {
    assign_ranks(aggregate(ratings, team_names, merge))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Project, RawData};

    fn names(pairs: &[(&str, &str)]) -> TeamNames {
        pairs
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect()
    }

    #[test]
    fn test_single_project_example() {
        let ratings = vec![Rating::new("P1", 1, 8.0), Rating::new("P1", 2, 6.0)];
        let standings = rank(&ratings, &names(&[("P1", "Alpha")]), CriterionMerge::Sum);

        assert_eq!(standings.len(), 1);
        let alpha = &standings[0];
        assert_eq!(alpha.project_id, "P1");
        assert_eq!(alpha.team_name, "Alpha");
        assert_eq!(alpha.criterion(1), Some(8.0));
        assert_eq!(alpha.criterion(2), Some(6.0));
        assert_eq!(alpha.criterion(3), None);
        assert_eq!(alpha.average, 7.0);
        assert_eq!(alpha.rank, 1);
    }

    #[test]
    fn test_repeated_criterion_is_summed() {
        let ratings = vec![
            Rating::new("P1", 1, 4.0),
            Rating::new("P1", 1, 5.0),
            Rating::new("P1", 1, 3.0),
            Rating::new("P1", 2, 2.0),
        ];
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Sum);

        assert_eq!(standings[0].criterion(1), Some(12.0));
        assert_eq!(standings[0].criterion(2), Some(2.0));
        assert_eq!(standings[0].average, 7.0);
    }

    #[test]
    fn test_repeated_criterion_mean_mode() {
        let ratings = vec![
            Rating::new("P1", 1, 4.0),
            Rating::new("P1", 1, 5.0),
            Rating::new("P1", 1, 3.0),
            Rating::new("P1", 2, 2.0),
        ];
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Mean);

        assert_eq!(standings[0].criterion(1), Some(4.0));
        assert_eq!(standings[0].average, 3.0);
    }

    #[test]
    fn test_totals_match_raw_sums() {
        let ratings: Vec<Rating> = (0..60)
            .map(|i| {
                Rating::new(
                    format!("P{}", i % 4),
                    (i % 5 + 1) as u32,
                    ((i * 7) % 11) as f64,
                )
            })
            .collect();
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Sum);

        for standing in &standings {
            for (criterion, total) in &standing.criteria {
                let raw: f64 = ratings
                    .iter()
                    .filter(|r| r.project_id == standing.project_id && r.criterion_id == *criterion)
                    .map(|r| r.score)
                    .sum();
                assert_eq!(*total, raw);
            }
        }
    }

    #[test]
    fn test_all_five_positive_average() {
        let ratings: Vec<Rating> = [3.0, 4.0, 5.0, 4.0, 5.0]
            .iter()
            .enumerate()
            .map(|(i, score)| Rating::new("P1", i as u32 + 1, *score))
            .collect();
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Sum);

        // 21 / 5 = 4.2
        assert_eq!(standings[0].average, 4.2);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        let ratings = vec![
            Rating::new("P1", 1, 1.0),
            Rating::new("P1", 2, 1.0),
            Rating::new("P1", 3, 2.0),
        ];
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Sum);

        // 4 / 3 = 1.333...
        assert_eq!(standings[0].average, 1.3);
    }

    #[test]
    fn test_zero_positive_totals_average_zero() {
        let ratings = vec![Rating::new("P1", 1, 0.0), Rating::new("P1", 2, 0.0)];
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Sum);

        assert_eq!(standings.len(), 1);
        assert_eq!(standings[0].average, 0.0);
    }

    #[test]
    fn test_non_positive_totals_excluded_from_average() {
        let ratings = vec![
            Rating::new("P1", 1, 8.0),
            Rating::new("P1", 2, 0.0),
            Rating::new("P1", 3, -2.0),
        ];
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Sum);

        assert_eq!(standings[0].average, 8.0);
    }

    #[test]
    fn test_criteria_outside_scored_range_do_not_count() {
        let ratings = vec![Rating::new("P1", 1, 6.0), Rating::new("P1", 9, 100.0)];
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Sum);

        assert_eq!(standings[0].criterion(9), Some(100.0));
        assert_eq!(standings[0].average, 6.0);
    }

    #[test]
    fn test_sorted_by_average_descending() {
        let ratings = vec![
            Rating::new("low", 1, 2.0),
            Rating::new("high", 1, 9.0),
            Rating::new("mid", 1, 5.0),
            Rating::new("mid", 2, 6.0),
        ];
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Sum);

        let order: Vec<&str> = standings.iter().map(|s| s.project_id.as_str()).collect();
        assert_eq!(order, vec!["high", "mid", "low"]);
        assert!(standings.windows(2).all(|w| w[0].average >= w[1].average));
        assert_eq!(
            standings.iter().map(|s| s.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_ties_broken_by_project_id() {
        let ratings = vec![
            Rating::new("zeta", 1, 5.0),
            Rating::new("alpha", 1, 5.0),
            Rating::new("mu", 1, 5.0),
        ];
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Sum);

        let order: Vec<&str> = standings.iter().map(|s| s.project_id.as_str()).collect();
        assert_eq!(order, vec!["alpha", "mu", "zeta"]);
    }

    #[test]
    fn test_unrated_project_absent() {
        let ratings = vec![Rating::new("P1", 1, 5.0)];
        let standings = rank(
            &ratings,
            &names(&[("P1", "Alpha"), ("P2", "Beta")]),
            CriterionMerge::Sum,
        );

        assert_eq!(standings.len(), 1);
        assert!(standings.iter().all(|s| s.project_id != "P2"));
    }

    #[test]
    fn test_unknown_project_falls_back_to_synthesized_name() {
        let ratings = vec![Rating::new("xyz", 1, 5.0)];
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Sum);

        assert_eq!(standings[0].team_name, "Project xyz");
    }

    #[test]
    fn test_blank_team_name_falls_back_to_synthesized_name() {
        let ratings = vec![Rating::new("P1", 1, 5.0), Rating::new("P2", 1, 4.0)];
        let standings = rank(
            &ratings,
            &names(&[("P1", ""), ("P2", "  ")]),
            CriterionMerge::Sum,
        );

        assert_eq!(standings[0].team_name, "Project P1");
        assert_eq!(standings[1].team_name, "Project P2");
    }

    #[test]
    fn test_blank_project_document_falls_back_to_synthesized_name() {
        let data = RawData {
            ratings: vec![Rating::new("P1", 1, 5.0)],
            projects: vec![Project {
                id: "P1".to_string(),
                team_name: Some(String::new()),
            }],
        };
        let standings = rank(&data.ratings, &data.team_names(), CriterionMerge::Sum);

        assert_eq!(standings[0].team_name, "Project P1");
    }

    // 四捨五入作用在 f64 上 (遠離零)，與 JS toFixed 可能不同：1.15 在這裡得到 1.2
    #[test]
    fn test_rounding_of_binary_midpoint() {
        let ratings = vec![Rating::new("P1", 1, 1.2), Rating::new("P1", 2, 1.1)];
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Sum);

        assert_eq!(standings[0].average, 1.2);
    }

    #[test]
    fn test_non_finite_scores_ignored() {
        let ratings = vec![Rating::new("P1", 1, f64::NAN), Rating::new("P1", 2, 4.0)];
        let standings = rank(&ratings, &TeamNames::new(), CriterionMerge::Sum);

        assert_eq!(standings[0].criterion(1), None);
        assert_eq!(standings[0].average, 4.0);
    }

    #[test]
    fn test_empty_ratings() {
        assert!(rank(&[], &TeamNames::new(), CriterionMerge::Sum).is_empty());
    }
}

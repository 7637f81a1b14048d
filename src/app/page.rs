//! 排行榜頁面 (HTML)
//!
//! 影片背景 + 暗色遮罩，前三名以頒獎台卡片呈現 (金 / 鑽石 / 銅)，
//! 第四名之後以清單呈現。所有插入的文字都會做 HTML 跳脫。

use crate::config::toml_config::PageConfig;
use crate::domain::model::{Leaderboard, ProjectStanding};

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

struct PodiumStyle {
    medal: &'static str,
    card: &'static str,
    rank_text: &'static str,
    name_text: &'static str,
}

const PODIUM: [PodiumStyle; 3] = [
    PodiumStyle {
        medal: "1.png",
        card: "bg-yellow-900/70 border-yellow-600",
        rank_text: "text-yellow-300",
        name_text: "text-yellow-100",
    },
    PodiumStyle {
        medal: "diamond.png",
        card: "bg-blue-400/40 border-cyan-500",
        rank_text: "text-cyan-300",
        name_text: "text-cyan-100",
    },
    PodiumStyle {
        medal: "3.png",
        card: "bg-amber-900/50 border-amber-700 ml-64",
        rank_text: "text-orange-400",
        name_text: "text-amber-100",
    },
];

fn asset_url(base: &str, file: &str) -> String {
    if base.is_empty() || base.ends_with('/') {
        format!("{}{}", base, file)
    } else {
        format!("{}/{}", base, file)
    }
}

fn score_line(standing: &ProjectStanding, page: &PageConfig) -> String {
    if page.show_scores {
        format!(
            r#"<span class="text-gray-200 text-xl font-minecraft mb-2">{:.1}</span>"#,
            standing.average
        )
    } else {
        String::new()
    }
}

fn podium_card(out: &mut String, place: usize, standing: &ProjectStanding, page: &PageConfig) {
    let style = &PODIUM[place];
    out.push_str(&format!(
        r#"<div class="{card} rounded-lg p-2 flex flex-col items-center justify-center transition-colors w-72 border-4 relative" data-project-id="{id}">
  <img src="{medal}" alt="{rank}" class="absolute -top-8 left-1/2 transform -translate-x-1/2 z-10" width="64">
  <span class="{rank_text} text-4xl font-minecraft mt-8 mb-2">{rank}</span>
  <span class="{name_text} text-3xl font-minecraft mb-2">{name}</span>
  {score}
</div>
"#,
        card = style.card,
        id = escape_html(&standing.project_id),
        medal = escape_html(&asset_url(&page.asset_base, style.medal)),
        rank = standing.rank,
        rank_text = style.rank_text,
        name_text = style.name_text,
        name = escape_html(&standing.team_name),
        score = score_line(standing, page),
    ));
}

fn list_row(out: &mut String, standing: &ProjectStanding, page: &PageConfig) {
    out.push_str(&format!(
        r#"<div class="bg-gray-700/90 rounded-lg p-6 flex items-center justify-between hover:bg-gray-600/90 transition-colors w-[75%] mb-4 border-4 border-gray-600" data-project-id="{id}">
  <span class="text-gray-100 text-4xl font-minecraft">{rank}</span>
  <span class="text-gray-100 text-3xl font-minecraft flex items-center justify-center w-full">{name}</span>
  {score}
</div>
"#,
        id = escape_html(&standing.project_id),
        rank = standing.rank,
        name = escape_html(&standing.team_name),
        score = score_line(standing, page),
    ));
}

fn page_shell(title: &str, page: &PageConfig, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<script src="https://cdn.tailwindcss.com"></script>
<style>.font-minecraft {{ font-family: "Minecraft", "Press Start 2P", monospace; }}</style>
</head>
<body class="bg-black">
<div class="relative min-h-screen w-full">
<video autoplay loop muted playsinline class="fixed top-0 left-0 w-full h-screen object-cover">
  <source src="{video}" type="video/mp4">
  Your browser does not support the video tag.
</video>
<div class="absolute inset-0 bg-black/60 z-10"></div>
<div class="relative z-20 h-full w-full flex flex-col items-center justify-start">
<div class="text-center mb-10 w-full max-w-6xl p-6">
  <h1 class="text-6xl font-minecraft text-gray-100">{title}</h1>
</div>
<div class="max-w-6xl w-full p-6">
{body}</div>
</div>
</div>
</body>
</html>
"#,
        title = escape_html(title),
        video = escape_html(&page.video_src),
        body = body,
    )
}

pub fn render_page(leaderboard: &Leaderboard, page: &PageConfig) -> String {
    let mut body = String::new();

    if leaderboard.is_empty() {
        body.push_str(
            r#"<p class="text-center text-gray-300 text-3xl font-minecraft">No ratings yet</p>
"#,
        );
        return page_shell(&leaderboard.title, page, &body);
    }

    body.push_str("<div class=\"flex flex-col items-center\">\n");

    let podium = leaderboard.podium();
    body.push_str("<div class=\"flex justify-center mb-2 relative\">\n");
    if let Some(first) = podium.first() {
        podium_card(&mut body, 0, first, page);
    }
    body.push_str("</div>\n");

    if podium.len() > 1 {
        body.push_str("<div class=\"flex justify-center w-full mb-2 mt-4\">\n");
        for (offset, standing) in podium[1..].iter().enumerate() {
            podium_card(&mut body, offset + 1, standing, page);
        }
        body.push_str("</div>\n");
    }

    let rest = leaderboard.rest();
    if !rest.is_empty() {
        body.push_str("<div class=\"flex flex-col items-center w-full mt-4\">\n");
        for standing in rest {
            list_row(&mut body, standing, page);
        }
        body.push_str("</div>\n");
    }

    body.push_str("</div>\n");
    body.push_str(&format!(
        "<p class=\"text-center text-gray-400 text-sm mt-6\">Updated {}</p>\n",
        leaderboard.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    page_shell(&leaderboard.title, page, &body)
}

/// 讀取失敗時的錯誤頁面，保留相同外觀並顯示錯誤訊息
pub fn render_error_page(title: &str, message: &str, page: &PageConfig) -> String {
    let body = format!(
        r#"<div role="alert" class="bg-red-900/80 border-4 border-red-600 rounded-lg p-6 text-center">
  <p class="text-red-100 text-3xl font-minecraft mb-4">Leaderboard unavailable</p>
  <p class="text-red-200 text-lg">{}</p>
</div>
"#,
        escape_html(message)
    );

    page_shell(title, page, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn standing(rank: usize, id: &str, name: &str, average: f64) -> ProjectStanding {
        ProjectStanding {
            rank,
            project_id: id.to_string(),
            team_name: name.to_string(),
            criteria: BTreeMap::new(),
            average,
        }
    }

    fn leaderboard(standings: Vec<ProjectStanding>) -> Leaderboard {
        Leaderboard {
            title: "KNOWCODE 2.0 Leaderboard".to_string(),
            generated_at: Utc::now(),
            standings,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_podium_and_list() {
        let board = leaderboard(vec![
            standing(1, "a", "Alpha", 9.0),
            standing(2, "b", "Beta", 8.0),
            standing(3, "c", "Gamma", 7.0),
            standing(4, "d", "Delta", 6.0),
            standing(5, "e", "Epsilon", 5.0),
        ]);

        let html = render_page(&board, &PageConfig::default());

        assert!(html.contains("KNOWCODE 2.0 Leaderboard"));
        assert!(html.contains(r#"<source src="/v1.mp4" type="video/mp4">"#));
        assert!(html.contains(r#"src="/1.png""#));
        assert!(html.contains(r#"src="/diamond.png""#));
        assert!(html.contains(r#"src="/3.png""#));
        assert!(html.contains("border-yellow-600"));
        assert_eq!(html.matches("bg-gray-700/90").count(), 2);

        let alpha = html.find("Alpha").unwrap();
        let beta = html.find("Beta").unwrap();
        let delta = html.find("Delta").unwrap();
        let epsilon = html.find("Epsilon").unwrap();
        assert!(alpha < beta && beta < delta && delta < epsilon);
    }

    #[test]
    fn test_partial_podium_has_no_empty_cards() {
        let board = leaderboard(vec![standing(1, "a", "Alpha", 9.0)]);
        let html = render_page(&board, &PageConfig::default());

        assert!(html.contains(r#"src="/1.png""#));
        assert!(!html.contains("diamond.png"));
        assert!(!html.contains("3.png"));
        assert!(!html.contains("bg-gray-700/90"));
    }

    #[test]
    fn test_team_names_are_escaped() {
        let board = leaderboard(vec![standing(1, "x", "<script>alert(1)</script>", 1.0)]);
        let html = render_page(&board, &PageConfig::default());

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_scores_shown_only_when_enabled() {
        let board = leaderboard(vec![standing(1, "a", "Alpha", 7.25)]);

        let hidden = render_page(&board, &PageConfig::default());
        assert!(!hidden.contains("7.2"));

        let page = PageConfig {
            show_scores: true,
            ..PageConfig::default()
        };
        let shown = render_page(&board, &page);
        assert!(shown.contains(">7.2<") || shown.contains(">7.3<"));
    }

    #[test]
    fn test_empty_leaderboard_placeholder() {
        let html = render_page(&leaderboard(vec![]), &PageConfig::default());
        assert!(html.contains("No ratings yet"));
    }

    #[test]
    fn test_custom_asset_base() {
        let page = PageConfig {
            asset_base: "https://cdn.example.com/medals".to_string(),
            ..PageConfig::default()
        };
        let html = render_page(&leaderboard(vec![standing(1, "a", "Alpha", 9.0)]), &page);

        assert!(html.contains(r#"src="https://cdn.example.com/medals/1.png""#));
    }

    #[test]
    fn test_error_page_shows_message() {
        let html = render_error_page(
            "KNOWCODE 2.0 Leaderboard",
            "API returned status 403",
            &PageConfig::default(),
        );

        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("API returned status 403"));
        assert!(html.contains("/v1.mp4"));
    }
}

//! Extraction of players from a consensus rankings page.
//!
//! The page carries one ranking table. Its first row is a header; every
//! other row names a player in its second cell as
//! `<a>Name</a> <small>(TEAM - POS)</small>`.

use scraper::{ElementRef, Html, Selector};
use tradegrader_core::error::DomainError;
use tradegrader_core::model::Player;

/// Table selectors tried in order; the first match wins.
const TABLE_SELECTORS: [&str; 4] = [
    "table#ranking-table",
    "table#players-table",
    "table.player-table",
    "table.table",
];

fn selector(css: &str) -> Result<Selector, DomainError> {
    Selector::parse(css)
        .map_err(|e| DomainError::Infrastructure(format!("invalid selector {css}: {e:?}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Splits `(KC - QB)` into team and position. Without a separator the
/// whole text is the position.
fn split_team_position(raw: &str) -> (String, String) {
    let inner = raw.trim().trim_matches(|c| c == '(' || c == ')').trim();
    match inner.split_once(" - ") {
        Some((team, position)) => (team.trim().to_owned(), position.trim().to_owned()),
        None => (String::new(), inner.to_owned()),
    }
}

/// Parses the players listed in a rankings page, in ranking order.
///
/// Rows without a linked name or a team/position tag are skipped.
///
/// # Errors
///
/// Returns `DomainError::Upstream` if the page has no ranking table or the
/// table lists no players.
pub fn parse_rankings_html(html: &str) -> Result<Vec<Player>, DomainError> {
    let document = Html::parse_document(html);

    let mut table = None;
    for css in TABLE_SELECTORS {
        if let Some(found) = document.select(&selector(css)?).next() {
            table = Some(found);
            break;
        }
    }
    let table = table.ok_or_else(|| {
        DomainError::Upstream("rankings page has no player table".to_owned())
    })?;

    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;
    let name_sel = selector("a")?;
    let tag_sel = selector("small")?;

    let players: Vec<Player> = table
        .select(&row_sel)
        .skip(1)
        .filter_map(|row| {
            let cell = row.select(&cell_sel).nth(1)?;
            let name = text_of(cell.select(&name_sel).next()?);
            let tag = text_of(cell.select(&tag_sel).next()?);
            if name.is_empty() {
                return None;
            }
            let (team, position) = split_team_position(&tag);
            Some(Player::new(&name, &team, &position))
        })
        .collect();

    if players.is_empty() {
        return Err(DomainError::Upstream(
            "rankings table lists no players".to_owned(),
        ));
    }
    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html><body>
        <table id="ranking-table">
          <thead><tr><th>RK</th><th>Player</th><th>Bye</th></tr></thead>
          <tbody>
            <tr><td>1</td><td><a href="#">Christian McCaffrey</a> <small>(SF - RB)</small></td><td>9</td></tr>
            <tr class="tier-row"><td colspan="3">Tier 2</td></tr>
            <tr><td>2</td><td><a href="#">Ja'Marr Chase</a> <small>(CIN - WR)</small></td><td>12</td></tr>
            <tr><td>3</td><td>Unlinked Player <small>(DAL - WR)</small></td><td>7</td></tr>
          </tbody>
        </table>
        </body></html>
    "##;

    #[test]
    fn test_parses_players_in_ranking_order() {
        let players = parse_rankings_html(PAGE).unwrap();

        let displays: Vec<&str> = players.iter().map(|p| p.display.as_str()).collect();
        assert_eq!(
            displays,
            vec!["Christian McCaffrey (SF - RB)", "Ja'Marr Chase (CIN - WR)"]
        );
        assert_eq!(players[1].team, "CIN");
        assert_eq!(players[1].position, "WR");
    }

    #[test]
    fn test_uses_later_selector_when_ranking_table_is_absent() {
        let html = r#"<table class="player-table">
            <tr><th>#</th><th>Name</th></tr>
            <tr><td>1</td><td><a>Josh Allen</a><small>(BUF - QB)</small></td></tr>
        </table>"#;

        let players = parse_rankings_html(html).unwrap();

        assert_eq!(players, vec![Player::new("Josh Allen", "BUF", "QB")]);
    }

    #[test]
    fn test_tag_without_team_is_position_only() {
        assert_eq!(
            split_team_position("(DST)"),
            (String::new(), "DST".to_owned())
        );
        assert_eq!(
            split_team_position(" (KC - QB) "),
            ("KC".to_owned(), "QB".to_owned())
        );
    }

    #[test]
    fn test_page_without_table_is_upstream_error() {
        let err = parse_rankings_html("<html><body><p>Access denied</p></body></html>").unwrap_err();

        assert!(matches!(err, DomainError::Upstream(_)));
        assert!(err.to_string().contains("no player table"));
    }

    #[test]
    fn test_table_without_player_rows_is_upstream_error() {
        let html = r#"<table id="ranking-table"><tr><th>RK</th><th>Player</th></tr></table>"#;

        let err = parse_rankings_html(html).unwrap_err();

        assert!(matches!(err, DomainError::Upstream(_)));
    }
}

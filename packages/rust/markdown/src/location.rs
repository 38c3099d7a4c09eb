//! Location hierarchy parsing and rendering.
//!
//! A location field encodes a shallow tree:
//!
//! ```text
//! Forest - Clearing, River. Town - Market
//! ```
//!
//! Top-level segments are separated by `". "`. Inside a segment, the text
//! before the first `" - "` is the major location; each later `" - "` part is a
//! `", "`-separated list of sub-locations.

/// Separates top-level location segments.
const SEGMENT_SEP: &str = ". ";
/// Separates a major location from its sub-location lists.
const MAJOR_SEP: &str = " - ";
/// Separates sub-locations within one list.
const MINOR_SEP: &str = ", ";

/// One major location and the sub-locations nested under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub children: Vec<String>,
}

/// Parse a location string. Pieces are kept exactly as split, so a blank
/// field yields one empty location and `"Forest - "` keeps an empty child.
pub fn parse_location(text: &str) -> Vec<Location> {
    text.split(SEGMENT_SEP)
        .map(|segment| {
            let mut parts = segment.split(MAJOR_SEP);
            let name = parts.next().unwrap_or_default().to_string();
            let children = parts
                .flat_map(|list| list.split(MINOR_SEP))
                .map(String::from)
                .collect();
            Location { name, children }
        })
        .collect()
}

/// Render a location string as a two-level markdown bullet list.
pub fn render_location(text: &str) -> String {
    let mut out = String::new();
    for loc in parse_location(text) {
        out.push_str(&format!(" - {}\n", loc.name));
        for child in &loc.children {
            out.push_str(&format!("     - {child}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_location_is_single_bullet() {
        assert_eq!(render_location("Harbour"), " - Harbour\n");
        let parsed = parse_location("Harbour");
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].children.is_empty());
    }

    #[test]
    fn sub_locations_nest_under_major() {
        assert_eq!(
            render_location("Forest - Clearing, River"),
            " - Forest\n     - Clearing\n     - River\n"
        );
    }

    #[test]
    fn multiple_segments_and_lists() {
        let parsed = parse_location("Forest - Clearing, River. Town - Market - Docks, Pier");
        assert_eq!(
            parsed,
            vec![
                Location {
                    name: "Forest".into(),
                    children: vec!["Clearing".into(), "River".into()],
                },
                Location {
                    name: "Town".into(),
                    children: vec!["Market".into(), "Docks".into(), "Pier".into()],
                },
            ]
        );
    }

    #[test]
    fn pieces_are_kept_as_split() {
        assert_eq!(render_location(""), " - \n");
        assert_eq!(render_location("Forest. "), " - Forest\n - \n");
        assert_eq!(render_location("Forest - "), " - Forest\n     - \n");
        assert_eq!(
            render_location(" Forest -  Clearing"),
            " -  Forest\n     -  Clearing\n"
        );
    }

    #[test]
    fn separators_need_surrounding_spaces() {
        // A hyphenated name and a trailing full stop are not separators.
        assert_eq!(render_location("Old-Town."), " - Old-Town.\n");
    }
}

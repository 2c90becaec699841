//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

/// Intent classification prompt (stage 1)
pub const CLASSIFY: &str = include_str!("../../prompts/classify.pmt");

/// Place-search extraction prompt (stage 3)
pub const PLACE_SEARCH: &str = include_str!("../../prompts/place-search.pmt");

/// Route-info extraction prompt (stage 4)
pub const ROUTE_EXTRACT: &str = include_str!("../../prompts/route-extract.pmt");

/// Final response formulation prompt (re-entrant pass)
pub const RESPOND: &str = include_str!("../../prompts/respond.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "classify" => Some(CLASSIFY),
        "place-search" => Some(PLACE_SEARCH),
        "route-extract" => Some(ROUTE_EXTRACT),
        "respond" => Some(RESPOND),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_classify() {
        let prompt = get_embedded("classify").unwrap();
        assert!(prompt.contains("ONTOPIC"));
        assert!(prompt.contains("OFFTOPIC"));
        assert!(prompt.contains("{{{state}}}"));
        assert!(prompt.contains("{{{history}}}"));
        assert!(prompt.contains("{{{message}}}"));
    }

    #[test]
    fn test_get_embedded_place_search() {
        let prompt = get_embedded("place-search").unwrap();
        assert!(prompt.contains("restaurant"));
        assert!(prompt.contains("rest_area"));
        assert!(prompt.contains("hotel"));
    }

    #[test]
    fn test_get_embedded_route_extract() {
        let prompt = get_embedded("route-extract").unwrap();
        assert!(prompt.contains("maxDrivingHoursPerDay"));
        assert!(prompt.contains("endAtStart"));
        assert!(prompt.contains("waypoints"));
    }

    #[test]
    fn test_get_embedded_respond() {
        assert!(get_embedded("respond").unwrap().contains("\"response\""));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}

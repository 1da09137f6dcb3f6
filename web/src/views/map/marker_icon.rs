use shared_types::stats::rating_color;
use shared_types::{MarkerState, Pool};

pub const NORMAL_COLOR: &str = "#007bff";
pub const SELECTED_COLOR: &str = "#28a745";

/// Pixel size of the marker pin for each state; selected pins are larger.
pub fn marker_size(state: MarkerState) -> (u32, u32) {
    match state {
        MarkerState::Normal => (25, 41),
        MarkerState::Selected => (32, 52),
    }
}

/// Inline SVG pin used as the `html` of a leaflet `divIcon`.
pub fn marker_icon_html(state: MarkerState) -> String {
    let color = match state {
        MarkerState::Normal => NORMAL_COLOR,
        MarkerState::Selected => SELECTED_COLOR,
    };
    let (width, height) = marker_size(state);

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 25 41\">\
         <path fill=\"{color}\" stroke=\"#ffffff\" stroke-width=\"1.5\" \
         d=\"M12.5 1C6.2 1 1 6.2 1 12.5c0 9 11.5 27 11.5 27S24 21.5 24 12.5C24 6.2 18.8 1 12.5 1z\"/>\
         <circle cx=\"12.5\" cy=\"12.5\" r=\"4.5\" fill=\"#ffffff\"/></svg>"
    )
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Popup shown over a marker. Every pool-provided string is escaped because
/// leaflet inserts the popup content as raw HTML.
pub fn popup_html(pool: &Pool) -> String {
    let rating = match pool.rating {
        Some(rating) => format!(
            "<span style=\"color: {}; font-weight: 600;\">{:.1} / 5</span>",
            rating_color(rating),
            rating
        ),
        None => "<span>Not rated</span>".to_string(),
    };
    let status_class = if pool.is_healthy() {
        "pool-popup__status--healthy"
    } else {
        "pool-popup__status--unhealthy"
    };

    format!(
        "<div class=\"pool-popup\">\
         <strong class=\"pool-popup__name\">{name}</strong>\
         <p class=\"pool-popup__district\">{district}</p>\
         <p class=\"pool-popup__address\">{address}</p>\
         <p class=\"pool-popup__status {status_class}\">{status}</p>\
         <p class=\"pool-popup__rating\">{rating}</p>\
         </div>",
        name = escape_html(pool.display_name()),
        district = escape_html(&pool.district),
        address = escape_html(&pool.address),
        status = pool.current_state.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{HealthState, PoolId};

    fn pool() -> Pool {
        Pool {
            id: PoolId(7),
            commercial_name: Some("Piscina <Sol>".to_string()),
            district: "Yanahuara".to_string(),
            rating: Some(4.5),
            current_state: HealthState::Healthy,
            ..Pool::default()
        }
    }

    #[test]
    fn selected_icon_is_green_and_larger() {
        let normal = marker_icon_html(MarkerState::Normal);
        let selected = marker_icon_html(MarkerState::Selected);

        assert!(normal.contains(NORMAL_COLOR));
        assert!(selected.contains(SELECTED_COLOR));
        assert!(marker_size(MarkerState::Selected).1 > marker_size(MarkerState::Normal).1);
    }

    #[test]
    fn popup_escapes_pool_text() {
        let html = popup_html(&pool());
        assert!(html.contains("Piscina &lt;Sol&gt;"));
        assert!(!html.contains("<Sol>"));
        assert!(html.contains("Yanahuara"));
        assert!(html.contains("4.5 / 5"));
    }

    #[test]
    fn unrated_pool_says_so() {
        let mut unrated = pool();
        unrated.rating = None;
        assert!(popup_html(&unrated).contains("Not rated"));
    }
}

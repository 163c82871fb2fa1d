use crate::models::StylingRequest;

// Static prompt-text tables. Wording here is provider tuning content; the
// composer contract is deterministic assembly with verbatim fallback for
// unrecognized mood/palette/layout values.

const BASE: &str = "Photoreal event styling moodboard. Bright, airy, daylight-balanced lighting. \
Premium event design, realistic venue materials, no text, no logos, no watermark.";

const ARCHITECTURE_LOCK: &str = "Keep the existing architecture, walls, windows, ceiling and \
fixed features exactly as they are. Do not move or re-angle the camera.";

const ALLOWED_CHANGES: &str = "Only change the furniture, linens, florals, tableware, \
lighting accents and decor styling.";

const COMPOSITION: &str = "Wide editorial composition, eye-level perspective, \
the full room visible in frame.";

const AV_BLOCK: &str = "Discreet AV production: slim LED screen, low-profile speakers on \
subtle stands, cabling fully hidden, staging blended into the decor.";

fn mood_text(mood: &str) -> &str {
    match mood {
        "Editorial" => "Editorial styling, high-end magazine look, crisp composition.",
        "Luxe" => "Luxe styling, layered linens, refined textures, elegant tableware.",
        "Minimal" => "Minimal styling, clean lines, negative space, calm sophistication.",
        "Mediterranean" => "Mediterranean styling, sun-warmed textures, relaxed elegance.",
        "Manhattan" => "Manhattan styling, modern architecture, polished details.",
        other => other,
    }
}

fn palette_text(palette: &str) -> &str {
    match palette {
        "Terracotta" => "Terracotta, warm sand, clay accents, soft brass.",
        "Champagne" => "Champagne, ivory, warm whites, soft gold.",
        "Slate" => "Slate grey, cool stone, airy contrast.",
        "Coastal Neutral" => "Driftwood, sand, linen white, warm greys.",
        other => other,
    }
}

fn layout_text(layout: &str) -> &str {
    match layout {
        "Cocktail" => "Cocktail layout, lounge clusters, relaxed mingling.",
        "Long Tables" => "Long tables, continuous runs, layered centre styling.",
        "Banquet" => "Round banquet tables, balanced centrepieces.",
        "Theatre" => "Theatre seating, refined aisle moments.",
        other => other,
    }
}

// Deterministic request -> prompt text mapping. Unknown mood/palette/layout
// values are echoed verbatim rather than rejected.
pub fn compose_prompt(req: &StylingRequest) -> String {
    let mut lines = vec![
        BASE.to_string(),
        ARCHITECTURE_LOCK.to_string(),
        ALLOWED_CHANGES.to_string(),
        COMPOSITION.to_string(),
        mood_text(&req.mood).to_string(),
    ];
    if let Some(palette) = &req.palette {
        lines.push(palette_text(palette).to_string());
    }
    lines.push(layout_text(&req.layout).to_string());
    lines.push(match &req.room {
        Some(room) => format!("Designed for the venue room: {room}."),
        None => "Designed for a modern event venue.".to_string(),
    });
    if req.av_equipment {
        lines.push(AV_BLOCK.to_string());
    }
    if let Some(colour) = &req.uplighting_colour {
        lines.push(format!("Uplighting accents in {colour} washing the perimeter walls."));
    }
    lines.join("\n")
}

// Global "do not change" constraints, applied whenever a reference image is
// reworked by a model that honours a negative prompt.
const NEGATIVE_GLOBAL: &[&str] = &[
    "changed architecture",
    "moved walls or windows",
    "different room",
    "warped perspective",
    "text",
    "logos",
    "watermark",
    "people",
    "blurry",
    "low quality",
];

fn negative_layout_lines(layout: &str) -> &'static [&'static str] {
    match layout {
        "Cocktail" => &["long banquet runs", "theatre rows", "blurry"],
        "Long Tables" => &["round tables", "lounge clusters", "low quality"],
        "Banquet" => &["empty room", "long continuous tables", "blurry"],
        "Theatre" => &["dining tables", "lounge furniture", "low quality"],
        _ => &[],
    }
}

// Global block plus layout-conditional block, deduplicated by exact line
// match with first-seen order preserved.
pub fn compose_negative_prompt(layout: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in NEGATIVE_GLOBAL.iter().chain(negative_layout_lines(layout)) {
        if !lines.contains(line) {
            lines.push(line);
        }
    }
    lines.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> StylingRequest {
        StylingRequest {
            mood: "Minimal".into(),
            palette: Some("Slate".into()),
            layout: "Theatre".into(),
            room: None,
            venue_image_url: None,
            av_equipment: false,
            uplighting_colour: None,
        }
    }

    #[test]
    fn composition_is_deterministic() {
        assert_eq!(compose_prompt(&request()), compose_prompt(&request()));
    }

    #[test]
    fn unknown_mood_is_echoed_verbatim() {
        let mut req = request();
        req.mood = "Brutalist Disco".into();
        let prompt = compose_prompt(&req);
        assert!(prompt.contains("Brutalist Disco"));
    }

    #[test]
    fn known_mood_uses_table_text() {
        let prompt = compose_prompt(&request());
        assert!(prompt.contains("Minimal styling, clean lines"));
        assert!(prompt.contains("Theatre seating"));
    }

    #[test]
    fn room_line_varies_by_presence() {
        let without = compose_prompt(&request());
        assert!(without.contains("Designed for a modern event venue."));

        let mut req = request();
        req.room = Some("Grand Ballroom".into());
        let with = compose_prompt(&req);
        assert!(with.contains("Designed for the venue room: Grand Ballroom."));
    }

    #[test]
    fn optional_blocks_appear_only_when_requested() {
        let plain = compose_prompt(&request());
        assert!(!plain.contains("AV production"));
        assert!(!plain.contains("Uplighting"));

        let mut req = request();
        req.av_equipment = true;
        req.uplighting_colour = Some("amber".into());
        let styled = compose_prompt(&req);
        assert!(styled.contains("Discreet AV production"));
        assert!(styled.contains("Uplighting accents in amber"));
    }

    #[test]
    fn negative_prompt_deduplicates_preserving_order() {
        // "blurry" appears in both the global and the Cocktail block
        let neg = compose_negative_prompt("Cocktail");
        assert_eq!(neg.matches("blurry").count(), 1);
        assert!(neg.contains("long banquet runs"));
        // global lines come first
        assert!(neg.find("changed architecture").unwrap() < neg.find("theatre rows").unwrap());
    }

    #[test]
    fn unknown_layout_gets_only_global_negatives() {
        assert_eq!(
            compose_negative_prompt("Amphitheatre"),
            NEGATIVE_GLOBAL.join(", ")
        );
    }
}

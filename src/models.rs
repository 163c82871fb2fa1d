use serde::{Deserialize, Serialize};

// Incoming styling request
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StylingRequest {
    pub mood: String,
    #[serde(default)]
    pub palette: Option<String>,
    pub layout: String,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub venue_image_url: Option<String>,
    #[serde(default)]
    pub av_equipment: bool,
    #[serde(default)]
    pub uplighting_colour: Option<String>,
}

impl StylingRequest {
    // Boundary validation; past this point the core treats the value as trusted
    pub fn validate(&self) -> Result<(), String> {
        check_len("mood", &self.mood, 2, 40)?;
        if let Some(palette) = &self.palette {
            check_len("palette", palette, 2, 40)?;
        }
        check_len("layout", &self.layout, 2, 40)?;
        if let Some(room) = &self.room {
            if room.chars().count() > 80 {
                return Err("room must be at most 80 characters".to_string());
            }
        }
        if let Some(colour) = &self.uplighting_colour {
            check_len("uplightingColour", colour, 2, 40)?;
        }
        Ok(())
    }
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(format!("{field} must be between {min} and {max} characters"));
    }
    Ok(())
}

// Outgoing response
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub image_data_url: String,
    pub prompt: String,
    pub cache_hit: bool,
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
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn short_mood_rejected() {
        let mut req = request();
        req.mood = "M".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn overlong_room_rejected() {
        let mut req = request();
        req.room = Some("r".repeat(81));
        assert!(req.validate().is_err());
    }

    #[test]
    fn camel_case_wire_format() {
        let json = r#"{"mood":"Luxe","layout":"Banquet","venueImageUrl":"https://example.com/a.jpg","avEquipment":true}"#;
        let req: StylingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.venue_image_url.as_deref(), Some("https://example.com/a.jpg"));
        assert!(req.av_equipment);
        assert!(req.palette.is_none());
    }
}

// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use inkleaf_geom::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Document, Stroke};

/// Errors produced while saving or loading a note.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The note JSON could not be read or written.
    #[error("malformed note JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A stroke colour was not a `#rrggbb` or `#rrggbbaa` string.
    #[error("invalid colour string {0:?}")]
    InvalidColour(String),
}

/// The note save format.
///
/// Strokes persist their raw sample points, colour, and pen thickness;
/// outlines are derived and rebuilt on load. Backgrounds persist only their
/// source strings, as the host resolves page dimensions when it reloads the
/// images.
#[derive(Debug, Deserialize, Serialize)]
struct SavedNote {
    strokes: Vec<SavedStroke>,
    backgrounds: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct SavedStroke {
    points: Vec<[f64; 3]>,
    colour: String,
    thickness: f64,
}

/// A note read back from its saved form.
#[derive(Debug)]
pub struct LoadedNote {
    /// Strokes with their outlines rebuilt from the saved points.
    pub strokes: Vec<Stroke>,
    /// Background source strings, top to bottom, awaiting host resolution.
    pub backgrounds: Vec<String>,
}

/// Serializes `document` to the note JSON format.
pub fn save_note(document: &Document) -> Result<String, DocumentError> {
    let saved = SavedNote {
        strokes: document
            .strokes()
            .iter()
            .map(|stroke| SavedStroke {
                points: stroke
                    .points()
                    .iter()
                    .map(|p| [p.x, p.y, p.pressure])
                    .collect(),
                colour: colour_to_hex(stroke.colour()),
                thickness: stroke.thickness(),
            })
            .collect(),
        backgrounds: document
            .pages()
            .iter()
            .map(|page| page.source.clone())
            .collect(),
    };
    Ok(serde_json::to_string(&saved)?)
}

/// Parses the note JSON format, rebuilding stroke outlines.
pub fn load_note(json: &str) -> Result<LoadedNote, DocumentError> {
    let saved: SavedNote = serde_json::from_str(json)?;
    let strokes = saved
        .strokes
        .into_iter()
        .map(|stroke| {
            let points = stroke
                .points
                .iter()
                .map(|&[x, y, pressure]| Point::with_pressure(x, y, pressure))
                .collect();
            let colour = colour_from_hex(&stroke.colour)?;
            Ok(Stroke::new(points, colour, stroke.thickness))
        })
        .collect::<Result<Vec<_>, DocumentError>>()?;
    Ok(LoadedNote {
        strokes,
        backgrounds: saved.backgrounds,
    })
}

fn colour_to_hex(colour: Color) -> String {
    let rgba = colour.to_rgba8();
    if rgba.a == 255 {
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

fn colour_from_hex(text: &str) -> Result<Color, DocumentError> {
    let invalid = || DocumentError::InvalidColour(text.to_owned());
    let hex = text.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.is_ascii() || !matches!(hex.len(), 6 | 8) {
        return Err(invalid());
    }
    let byte = |range| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
    let r = byte(0..2)?;
    let g = byte(2..4)?;
    let b = byte(4..6)?;
    let a = if hex.len() == 8 { byte(6..8)? } else { 255 };
    Ok(Color::from_rgba8(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PageImage;

    #[test]
    fn round_trips_points_colour_and_thickness() {
        let mut doc = Document::new();
        doc.commit(Stroke::new(
            vec![
                Point::with_pressure(0.0, 0.0, 0.25),
                Point::with_pressure(10.5, -3.0, 0.75),
            ],
            Color::from_rgba8(0x12, 0x34, 0x56, 0xff),
            4.0,
        ));
        doc.set_pages(vec![PageImage {
            source: String::from("page-1.png"),
            width: 100.0,
            height: 200.0,
        }]);

        let json = save_note(&doc).unwrap();
        let loaded = load_note(&json).unwrap();

        assert_eq!(loaded.backgrounds, vec![String::from("page-1.png")]);
        assert_eq!(loaded.strokes.len(), 1);
        let stroke = &loaded.strokes[0];
        assert_eq!(stroke.thickness(), 4.0);
        assert_eq!(stroke.colour().to_rgba8().r, 0x12);
        assert_eq!(stroke.points()[1].x, 10.5);
        assert_eq!(stroke.points()[1].pressure, 0.75);
    }

    #[test]
    fn saved_json_uses_the_expected_shape() {
        let mut doc = Document::new();
        doc.commit(Stroke::new(
            vec![Point::with_pressure(1.0, 2.0, 0.5)],
            Color::from_rgba8(0, 0, 0, 255),
            5.0,
        ));
        let json = save_note(&doc).unwrap();
        assert_eq!(
            json,
            r##"{"strokes":[{"points":[[1.0,2.0,0.5]],"colour":"#000000","thickness":5.0}],"backgrounds":[]}"##
        );
    }

    #[test]
    fn translucent_colours_save_eight_digits() {
        let mut doc = Document::new();
        doc.commit(Stroke::new(
            vec![Point::new(0.0, 0.0)],
            Color::from_rgba8(0xff, 0x00, 0x00, 0x80),
            5.0,
        ));
        let json = save_note(&doc).unwrap();
        assert!(json.contains(r##""colour":"#ff000080""##));
        let loaded = load_note(&json).unwrap();
        assert_eq!(loaded.strokes[0].colour().to_rgba8().a, 0x80);
    }

    #[test]
    fn bad_colour_strings_are_rejected() {
        for colour in ["123456", "#12345", "#gg0000", "#", ""] {
            let json = format!(
                r#"{{"strokes":[{{"points":[[0.0,0.0,0.5]],"colour":"{colour}","thickness":5.0}}],"backgrounds":[]}}"#
            );
            assert!(load_note(&json).is_err(), "colour {colour:?} should fail");
        }
    }

    #[test]
    fn malformed_json_is_a_typed_error() {
        assert!(matches!(
            load_note("not json"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn outlines_are_rebuilt_on_load() {
        let mut doc = Document::new();
        doc.commit(Stroke::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(20.0, 5.0),
                Point::new(30.0, 5.0),
            ],
            Color::BLACK,
            5.0,
        ));
        let json = save_note(&doc).unwrap();
        let loaded = load_note(&json).unwrap();
        assert!(!loaded.strokes[0].outline().is_empty());
    }
}

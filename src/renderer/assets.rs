//! Sprite images declared in the page
//!
//! Loading never blocks the game: an image that is missing or fails to
//! decode is logged and left out, and the renderer draws its fallback shape.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlImageElement};

use crate::sim::ThreatKind;

/// Sprites used in the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Interceptor,
    Ballistic,
    Cruise,
    Drone,
    IronDome,
    Background,
}

impl SpriteKind {
    pub const ALL: [SpriteKind; 6] = [
        SpriteKind::Interceptor,
        SpriteKind::Ballistic,
        SpriteKind::Cruise,
        SpriteKind::Drone,
        SpriteKind::IronDome,
        SpriteKind::Background,
    ];

    /// `id` of the `<img>` element holding this sprite
    pub fn element_id(&self) -> &'static str {
        match self {
            SpriteKind::Interceptor => "interceptorImg",
            SpriteKind::Ballistic => "ballisticThreatImg",
            SpriteKind::Cruise => "cruiseThreatImg",
            SpriteKind::Drone => "droneThreatImg",
            SpriteKind::IronDome => "ironDomeImg",
            SpriteKind::Background => "backgroundImg",
        }
    }

    pub fn for_threat(kind: ThreatKind) -> Self {
        match kind {
            ThreatKind::Drone => SpriteKind::Drone,
            ThreatKind::Cruise => SpriteKind::Cruise,
            ThreatKind::Ballistic => SpriteKind::Ballistic,
        }
    }

    fn index(&self) -> usize {
        match self {
            SpriteKind::Interceptor => 0,
            SpriteKind::Ballistic => 1,
            SpriteKind::Cruise => 2,
            SpriteKind::Drone => 3,
            SpriteKind::IronDome => 4,
            SpriteKind::Background => 5,
        }
    }
}

/// Loaded sprite images; `None` entries use fallback drawing
#[derive(Debug, Default)]
pub struct Assets {
    images: [Option<HtmlImageElement>; 6],
}

impl Assets {
    /// Wait for every sprite to load or fail
    pub async fn load(document: &Document) -> Self {
        let mut assets = Self::default();
        for kind in SpriteKind::ALL {
            match load_image(document, kind).await {
                Ok(img) => {
                    log::info!("{} loaded", kind.element_id());
                    assets.images[kind.index()] = Some(img);
                }
                Err(e) => log::error!("Failed to load image {}: {:?}", kind.element_id(), e),
            }
        }

        let missing = assets.images.iter().filter(|i| i.is_none()).count();
        if missing > 0 {
            log::warn!("{} assets failed to load, proceeding with fallback shapes", missing);
        } else {
            log::info!("All game assets loaded");
        }
        assets
    }

    pub fn get(&self, kind: SpriteKind) -> Option<&HtmlImageElement> {
        self.images[kind.index()].as_ref()
    }

    /// Launch height above the ground when the dome sprite is present
    pub fn launcher_offset(&self) -> Option<f32> {
        self.get(SpriteKind::IronDome)
            .map(|img| img.natural_height() as f32 / 3.0)
    }
}

async fn load_image(document: &Document, kind: SpriteKind) -> Result<HtmlImageElement, JsValue> {
    let img: HtmlImageElement = document
        .get_element_by_id(kind.element_id())
        .ok_or_else(|| JsValue::from_str("no such element"))?
        .dyn_into()?;

    // Already decoded (e.g. from cache)
    if img.complete() && img.natural_height() != 0 {
        return Ok(img);
    }

    JsFuture::from(img.decode()).await?;
    if img.natural_height() == 0 {
        return Err(JsValue::from_str("image has no pixels"));
    }
    Ok(img)
}

use bevy::prelude::*;

/// Load progress of a sprite sheet image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetStatus {
    Loading,
    /// Image is available with the given pixel size
    Ready(UVec2),
    Failed,
}

/// An image plus the knowledge needed to cut regions out of it
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub image: Handle<Image>,
    pub status: SheetStatus,
}

impl SpriteSheet {
    pub fn new(image: Handle<Image>) -> Self {
        Self {
            image,
            status: SheetStatus::Loading,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SheetStatus::Loading
    }

    /// Source rectangle for `rect`, if the sheet is loaded and contains it
    pub fn region(&self, rect: IRect) -> Option<Rect> {
        let SheetStatus::Ready(size) = self.status else {
            return None;
        };
        if !region_within(size, rect) {
            return None;
        }
        Some(Rect::new(
            rect.min.x as f32,
            rect.min.y as f32,
            rect.max.x as f32,
            rect.max.y as f32,
        ))
    }

    /// Sprite showing `rect` of this sheet drawn at `display_size`
    pub fn sprite_at(&self, rect: IRect, display_size: Vec2) -> Option<Sprite> {
        self.region(rect).map(|region| Sprite {
            image: self.image.clone(),
            rect: Some(region),
            custom_size: Some(display_size),
            ..default()
        })
    }
}

/// Check that a pixel rectangle lies inside an image of the given size
pub fn region_within(size: UVec2, rect: IRect) -> bool {
    rect.min.x >= 0
        && rect.min.y >= 0
        && rect.max.x <= size.x as i32
        && rect.max.y <= size.y as i32
        && rect.width() > 0
        && rect.height() > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_within() {
        let size = UVec2::new(128, 64);
        assert!(region_within(size, IRect::new(0, 0, 32, 32)));
        assert!(region_within(size, IRect::new(96, 32, 128, 64)));
        assert!(!region_within(size, IRect::new(96, 64, 128, 96)));
        assert!(!region_within(size, IRect::new(128, 0, 160, 32)));
    }

    #[test]
    fn test_region_requires_ready_sheet() {
        let mut sheet = SpriteSheet::new(Handle::default());
        let rect = IRect::new(32, 32, 64, 64);
        assert!(sheet.is_pending());
        assert_eq!(sheet.region(rect), None);

        sheet.status = SheetStatus::Ready(UVec2::new(64, 64));
        assert_eq!(sheet.region(rect), Some(Rect::new(32.0, 32.0, 64.0, 64.0)));

        sheet.status = SheetStatus::Failed;
        assert_eq!(sheet.region(rect), None);
    }

    #[test]
    fn test_sprite_at_sets_region_and_size() {
        let mut sheet = SpriteSheet::new(Handle::default());
        sheet.status = SheetStatus::Ready(UVec2::new(64, 64));

        let sprite = sheet
            .sprite_at(IRect::new(0, 0, 32, 32), Vec2::splat(64.0))
            .unwrap();
        assert_eq!(sprite.rect, Some(Rect::new(0.0, 0.0, 32.0, 32.0)));
        assert_eq!(sprite.custom_size, Some(Vec2::splat(64.0)));
    }
}

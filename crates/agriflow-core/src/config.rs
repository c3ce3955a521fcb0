//! Designer configuration.

use crate::invoice::{Amount, TotalsPolicy};
use crate::shapes::{ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH, SerializableColor};
use crate::storage::{self, CONFIG_KEY, Storage};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Smallest grid spacing drawn, in pixels.
pub const MIN_GRID_STEP: f64 = 4.0;
/// Largest accepted surface side, in pixels.
pub const MAX_SURFACE_SIDE: u32 = 4096;

/// Fixed geometry and colors of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSpec {
    /// Surface size in pixels.
    pub width: u32,
    pub height: u32,
    pub background: SerializableColor,
    /// Grid spacing in pixels.
    pub grid_step: f64,
    pub grid_color: SerializableColor,
    pub grid_width: f64,
    /// Layout guide drawn on every frame; not a shape.
    pub boundary: Rect,
    pub boundary_color: SerializableColor,
    pub boundary_width: f64,
    /// Arrowhead barb length in pixels.
    pub arrow_length: f64,
    /// Angle between each barb and the reversed line direction, in radians.
    pub arrow_angle: f64,
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 700,
            background: SerializableColor::white(),
            grid_step: 20.0,
            grid_color: SerializableColor::new(0xdb, 0xe7, 0xdb, 255),
            grid_width: 1.0,
            boundary: Rect::new(120.0, 120.0, 640.0, 520.0),
            boundary_color: SerializableColor::black(),
            boundary_width: 2.0,
            arrow_length: ARROW_HEAD_LENGTH,
            arrow_angle: ARROW_HEAD_ANGLE,
        }
    }
}

impl SurfaceSpec {
    /// Replace out-of-range size and grid values with their defaults.
    ///
    /// Persisted configs may carry values that parse but cannot be drawn,
    /// such as a zero-sized surface or a sub-pixel grid step.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(1..=MAX_SURFACE_SIDE).contains(&self.width) || !(1..=MAX_SURFACE_SIDE).contains(&self.height) {
            log::warn!(
                "Surface size {}x{} out of range, using {}x{}",
                self.width,
                self.height,
                defaults.width,
                defaults.height
            );
            self.width = defaults.width;
            self.height = defaults.height;
        }
        if !self.grid_step.is_finite() || self.grid_step < MIN_GRID_STEP {
            log::warn!("Grid step {} out of range, using {}", self.grid_step, defaults.grid_step);
            self.grid_step = defaults.grid_step;
        }
        self
    }
}

/// Session-wide settings, persisted under [`CONFIG_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    pub surface: SurfaceSpec,
    pub totals: TotalsPolicy,
    /// Invoice-level tax rate for new documents.
    pub default_tax_percent: Amount,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceSpec::default(),
            totals: TotalsPolicy::default(),
            default_tax_percent: Amount::from(18),
        }
    }
}

impl DesignerConfig {
    /// Load the stored configuration; absent or unreadable data gives defaults.
    pub async fn load(storage: &dyn Storage) -> Self {
        let config: Self = storage::load_or_default(storage, CONFIG_KEY).await;
        config.sanitized()
    }

    /// The config with an undrawable surface spec repaired.
    pub fn sanitized(mut self) -> Self {
        self.surface = self.surface.sanitized();
        self
    }

    pub async fn save(&self, storage: &dyn Storage) -> storage::StorageResult<()> {
        storage::save_json(storage, CONFIG_KEY, self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{RoundingPolicy, TaxMode};
    use crate::storage::MemoryStorage;
    use pollster::block_on;
    use serde_json::json;

    #[test]
    fn test_default_surface() {
        let spec = SurfaceSpec::default();
        assert_eq!((spec.width, spec.height), (1000, 700));
        assert_eq!(spec.boundary.origin(), kurbo::Point::new(120.0, 120.0));
        assert_eq!(spec.boundary.size(), kurbo::Size::new(520.0, 400.0));
        assert_eq!(spec.grid_color.to_hex(), "#dbe7db");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: DesignerConfig =
            serde_json::from_value(json!({"totals": {"rounding": "nearest_whole"}})).unwrap();
        assert_eq!(config.totals.rounding, RoundingPolicy::NearestWhole);
        assert_eq!(config.totals.tax_mode, TaxMode::InvoiceRate);
        assert_eq!(config.surface, SurfaceSpec::default());
        assert_eq!(config.default_tax_percent, Amount::from(18));
    }

    #[test]
    fn test_load_missing_and_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(block_on(DesignerConfig::load(&storage)), DesignerConfig::default());

        let mut config = DesignerConfig::default();
        config.surface.grid_step = 40.0;
        config.totals.tax_mode = TaxMode::PerItem;
        block_on(config.save(&storage)).unwrap();
        assert_eq!(block_on(DesignerConfig::load(&storage)), config);
    }

    #[test]
    fn test_load_undrawable_surface_repaired() {
        let storage = MemoryStorage::new();
        let stored = json!({"surface": {"grid_step": 1e-9, "width": 0, "height": 100000, "grid_width": 3.0}});
        block_on(storage.save(CONFIG_KEY, &stored)).unwrap();
        let config = block_on(DesignerConfig::load(&storage));
        let defaults = SurfaceSpec::default();
        assert_eq!(config.surface.grid_step, defaults.grid_step);
        assert_eq!((config.surface.width, config.surface.height), (defaults.width, defaults.height));
        assert_eq!(config.surface.grid_width, 3.0);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let spec = SurfaceSpec {
            width: 300,
            height: 200,
            grid_step: MIN_GRID_STEP,
            ..SurfaceSpec::default()
        };
        assert_eq!(spec.sanitized(), spec);
        let nan = SurfaceSpec {
            grid_step: f64::NAN,
            ..SurfaceSpec::default()
        };
        assert_eq!(nan.sanitized().grid_step, 20.0);
    }

    #[test]
    fn test_load_malformed_falls_back() {
        let storage = MemoryStorage::new();
        block_on(storage.save(CONFIG_KEY, &json!("garbage"))).unwrap();
        assert_eq!(block_on(DesignerConfig::load(&storage)), DesignerConfig::default());
    }
}

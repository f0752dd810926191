use thiserror::Error;

/// Errors detected while validating startup configuration.
///
/// All of these are construction-time failures: the renderer refuses to
/// start rather than producing NaN matrices or garbage shading.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("camera eye and target positions coincide")]
    DegenerateCamera,
    #[error("camera up vector is zero or parallel to the view direction")]
    DegenerateUpVector,
    #[error("{name} must be non-negative, got {value}")]
    NegativeMaterialValue { name: &'static str, value: f32 },
    #[error("gamma must be a positive finite value, got {0}")]
    InvalidGamma(f32),
    #[error("window dimensions must be non-zero, got {width}x{height}")]
    ZeroWindowArea { width: u32, height: u32 },
    #[error("normal coloring and procedural coloring cannot both be enabled")]
    ConflictingShadingModes,
}

/// Startup parameters for the renderer.
///
/// These are fixed for the lifetime of a run; nothing in the per-frame
/// contract mutates them.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Post-process correction value. 1.0 applies no correction.
    pub gamma: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            vsync: false,
            gamma: 1.0,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroWindowArea {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(ConfigError::InvalidGamma(self.gamma));
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_startup_contract() {
        let config = RenderConfig::default();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert!(!config.vsync);
        assert_eq!(config.gamma, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_gamma_is_rejected() {
        let config = RenderConfig {
            gamma: 0.0,
            ..RenderConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidGamma(0.0)));
    }

    #[test]
    fn nan_gamma_is_rejected() {
        let config = RenderConfig {
            gamma: f32::NAN,
            ..RenderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_area_window_is_rejected() {
        let config = RenderConfig {
            width: 0,
            ..RenderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroWindowArea { .. })
        ));
    }
}

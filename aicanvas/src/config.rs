use aicanvas_core::{
    brush::{BrushConfig, BrushSampling, Tool},
    color::Color,
    stroke::Smoothing,
    CanvasSettings,
};

const DOCUMENTATION: &str = r##"# AI Canvas preferences. You may edit this file, but be aware that formatting and comments will not
# be preserved, and all keys and values are case sensitive.

# width, height: size of the drawing element in logical pixels.
# density: device pixel ratio. The surface is width*density by height*density pixels.
# smoothing: "linear" passes through every sampled point, "midpoint" draws quadratic curves between midpoints.
# sampling: "stroke_start" fixes color and width when a stroke begins, "per_segment" follows toolbar changes mid-stroke.
# stroke_settle_ms, template_settle_ms: quiet period before a snapshot is handed off for analysis.
# template_size: base size of template shapes in logical pixels.
# seed: optional, makes template placement reproducible.
# output_dir: where snapshots and final images are written.

# Example:
# [brush]
# tool = "pen"
# color = "#2563eb"
# width = 3

"##;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BrushPreferences {
    pub tool: String,
    pub color: String,
    pub width: u32,
}
impl Default for BrushPreferences {
    fn default() -> Self {
        let brush = BrushConfig::default();
        Self {
            tool: brush.tool.to_string(),
            color: brush.color.to_string(),
            width: brush.width(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Preferences {
    pub width: f32,
    pub height: f32,
    pub density: f32,
    pub smoothing: String,
    pub sampling: String,
    pub stroke_settle_ms: u64,
    pub template_settle_ms: u64,
    pub template_size: f32,
    pub seed: Option<u64>,
    pub output_dir: std::path::PathBuf,
    pub brush: BrushPreferences,
}
impl Default for Preferences {
    fn default() -> Self {
        let settings = CanvasSettings::default();
        Self {
            width: settings.logical_width,
            height: settings.logical_height,
            density: settings.density,
            smoothing: settings.smoothing.as_ref().to_owned(),
            sampling: settings.sampling.as_ref().to_owned(),
            stroke_settle_ms: duration_ms(settings.stroke_settle),
            template_settle_ms: duration_ms(settings.template_settle),
            template_size: settings.template_size,
            seed: settings.seed,
            output_dir: "aicanvas-out".into(),
            brush: BrushPreferences::default(),
        }
    }
}
fn duration_ms(duration: std::time::Duration) -> u64 {
    duration.as_millis().try_into().unwrap_or(u64::MAX)
}

impl Preferences {
    const FILENAME: &'static str = "canvas.toml";
    /// Load from the user's preference directory, or defaults if unavailable.
    /// The second value is false if loading failed.
    #[must_use]
    pub fn load() -> (Self, bool) {
        match Self::path() {
            None => {
                log::warn!("No preferences dir, defaulting.");
                (Self::default(), false)
            }
            Some(path) => Self::load_or_default(&path),
        }
    }
    #[must_use]
    pub fn path() -> Option<std::path::PathBuf> {
        let mut path = preferences_dir()?;
        path.push(Self::FILENAME);
        Some(path)
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> (Self, bool) {
        let preferences: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let preferences: Self = toml::from_str(&string)?;
            // Reject bad values now rather than at first use.
            preferences.canvas_settings()?;

            Ok(preferences)
        };

        match preferences {
            Ok(preferences) => (preferences, true),
            Err(e) => {
                log::warn!("Preferences at {path:?} weren't usable, defaulting: {e:#}");
                (Self::default(), false)
            }
        }
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let dir = preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        let _ = std::fs::DirBuilder::new().create(&dir);

        let preferences = dir.join(Self::FILENAME);
        std::fs::write(preferences, self.to_documented_toml()?)?;
        Ok(())
    }
    /// The file contents [`Preferences::save`] writes.
    pub fn to_documented_toml(&self) -> Result<String, toml::ser::Error> {
        Ok(DOCUMENTATION.to_owned() + &toml::ser::to_string_pretty(self)?)
    }
    /// Parse the stringly parts into what the canvas wants.
    pub fn canvas_settings(&self) -> anyhow::Result<CanvasSettings> {
        use anyhow::Context;
        let tool: Tool = self
            .brush
            .tool
            .parse()
            .with_context(|| format!("unknown tool {:?}", self.brush.tool))?;
        let color: Color = self.brush.color.parse()?;
        let smoothing: Smoothing = self
            .smoothing
            .parse()
            .with_context(|| format!("unknown smoothing {:?}", self.smoothing))?;
        let sampling: BrushSampling = self
            .sampling
            .parse()
            .with_context(|| format!("unknown sampling {:?}", self.sampling))?;
        // Surface size is validated when the canvas is built.
        Ok(CanvasSettings {
            logical_width: self.width,
            logical_height: self.height,
            density: self.density,
            smoothing,
            sampling,
            stroke_settle: std::time::Duration::from_millis(self.stroke_settle_ms),
            template_settle: std::time::Duration::from_millis(self.template_settle_ms),
            template_size: self.template_size,
            seed: self.seed,
            brush: BrushConfig::new(tool, color, self.brush.width),
        })
    }
}

#[cfg(test)]
mod test {
    use super::Preferences;
    use aicanvas_core::{
        brush::{BrushSampling, Tool},
        color::Color,
        stroke::Smoothing,
        CanvasSettings,
    };

    #[test]
    fn defaults_match_canvas() {
        let settings = Preferences::default().canvas_settings().unwrap();
        assert_eq!(settings, CanvasSettings::default());
    }
    #[test]
    fn partial_file() {
        let preferences: Preferences = toml::from_str(
            r##"
            density = 2.0
            smoothing = "midpoint"
            seed = 7

            [brush]
            tool = "eraser"
            color = "#ff0000"
            width = 80
            "##,
        )
        .unwrap();
        let settings = preferences.canvas_settings().unwrap();
        assert_eq!(settings.logical_width, 800.0);
        assert_eq!(settings.density, 2.0);
        assert_eq!(settings.smoothing, Smoothing::Midpoint);
        assert_eq!(settings.sampling, BrushSampling::StrokeStart);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.brush.tool, Tool::Eraser);
        assert_eq!(settings.brush.color, Color::rgb(255, 0, 0));
        // Clamped.
        assert_eq!(settings.brush.width(), 50);
    }
    #[test]
    fn bad_values_rejected() {
        let preferences: Preferences = toml::from_str(r#"smoothing = "wobbly""#).unwrap();
        assert!(preferences.canvas_settings().is_err());
        let preferences: Preferences = toml::from_str("[brush]\ncolor = \"chartreuse\"").unwrap();
        assert!(preferences.canvas_settings().is_err());
    }
    #[test]
    fn unreadable_file_defaults() {
        let path = std::env::temp_dir().join(format!(
            "aicanvas-prefs-{}-missing.toml",
            std::process::id()
        ));
        let (preferences, loaded) = Preferences::load_or_default(&path);
        assert!(!loaded);
        assert_eq!(preferences, Preferences::default());
    }
    #[test]
    fn documented_file_reads_back() {
        let mut preferences = Preferences::default();
        preferences.seed = Some(42);
        let string = preferences.to_documented_toml().unwrap();
        assert!(string.starts_with("# AI Canvas preferences."));
        // The example in the header is commented out, not a real table.
        assert!(string.contains("# color = \"#2563eb\""));
        let parsed: Preferences = toml::from_str(&string).unwrap();
        assert_eq!(parsed, preferences);
    }
    #[test]
    fn serializes_back() {
        let string = toml::ser::to_string_pretty(&Preferences::default()).unwrap();
        let parsed: Preferences = toml::from_str(&string).unwrap();
        assert_eq!(parsed, Preferences::default());
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub sections: SectionsConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub marquee: MarqueeConfig,
    #[serde(default)]
    pub magnet: MagnetConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for log files written while the TUI owns the terminal
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

/// Easing curve identifiers.
///
/// Names follow the curves the page animations are tuned with: `ease_out` is
/// the exponential `1 - 2^(-10t)` curve, `cubic`/`quartic` correspond to the
/// power2/power3 out curves, `back_out` and `elastic_out` overshoot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump to the end value on completion
    None,
    Linear,
    Quad,
    Cubic,
    Quartic,
    Quintic,
    #[default]
    EaseOut,
    EaseIn,
    EaseInOut,
    BackOut,
    ElasticOut,
}

/// Smooth scrolling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Enable inertial scrolling; when disabled every request jumps
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Duration of programmatic scroll-to animations
    #[serde(default = "default_scroll_duration")]
    pub animation_duration_ms: u64,
    /// Easing for programmatic scroll-to animations
    #[serde(default)]
    pub easing: EasingType,
    /// Frame rate used by drivers that pace their own ticks
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Per-frame (at 60fps) fraction of the remaining distance covered after input
    #[serde(default = "default_lerp")]
    pub lerp: f64,
    /// Multiplier applied to wheel deltas
    #[serde(default = "default_multiplier")]
    pub wheel_multiplier: f64,
    /// Multiplier applied to touch deltas
    #[serde(default = "default_multiplier")]
    pub touch_multiplier: f64,
    /// Smooth touch input too (touch jumps directly otherwise)
    #[serde(default)]
    pub smooth_touch: bool,
    /// Distance below which the virtual offset snaps onto its goal
    #[serde(default = "default_settle_epsilon")]
    pub settle_epsilon: f64,
    /// Units scrolled per wheel notch or key press in adapters
    #[serde(default = "default_scroll_step")]
    pub scroll_step: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: true,
            animation_duration_ms: default_scroll_duration(),
            easing: EasingType::EaseOut,
            animation_fps: default_animation_fps(),
            lerp: default_lerp(),
            wheel_multiplier: default_multiplier(),
            touch_multiplier: default_multiplier(),
            smooth_touch: false,
            settle_epsilon: default_settle_epsilon(),
            scroll_step: default_scroll_step(),
        }
    }
}

/// A named page region, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub id: String,
    pub label: String,
}

impl SectionEntry {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionsConfig {
    /// Forward lookahead added to the scroll offset before section lookup
    #[serde(default = "default_activation_bias")]
    pub activation_bias: f64,
    /// Ordered sections of the page
    #[serde(default = "default_sections")]
    pub entries: Vec<SectionEntry>,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            activation_bias: default_activation_bias(),
            entries: default_sections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Duration of section entrance tweens
    #[serde(default = "default_reveal_duration")]
    pub duration_ms: u64,
    /// Easing of section entrance tweens
    #[serde(default)]
    pub easing: EasingType,
    /// Viewport start notation for section triggers, e.g. "top 80%"
    #[serde(default = "default_reveal_start")]
    pub start: String,
    /// Write the initial values as soon as a tween is scheduled
    #[serde(default = "default_true")]
    pub immediate_render: bool,
    /// Per-character stagger of the hero title reveal
    #[serde(default = "default_text_stagger")]
    pub text_stagger_ms: u64,
    /// Duration of each character's reveal
    #[serde(default = "default_text_duration")]
    pub text_duration_ms: u64,
    /// Delay before the first character starts
    #[serde(default = "default_text_delay")]
    pub text_delay_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_reveal_duration(),
            easing: EasingType::EaseOut,
            start: default_reveal_start(),
            immediate_render: true,
            text_stagger_ms: default_text_stagger(),
            text_duration_ms: default_text_duration(),
            text_delay_ms: default_text_delay(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarqueeConfig {
    /// Seconds for one full content cycle to pass
    #[serde(default = "default_loop_duration")]
    pub loop_duration_secs: f64,
    /// Gap between consecutive items
    #[serde(default = "default_marquee_gap")]
    pub gap: f64,
    /// Item width used before the content has been measured
    #[serde(default = "default_item_width")]
    pub fallback_item_width: f64,
    /// Pause while the pointer is over the strip
    #[serde(default = "default_true")]
    pub pause_on_hover: bool,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            loop_duration_secs: default_loop_duration(),
            gap: default_marquee_gap(),
            fallback_item_width: default_item_width(),
            pause_on_hover: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagnetConfig {
    /// Fraction of the pointer offset the element follows
    #[serde(default = "default_magnet_strength")]
    pub strength: f64,
    /// Scale while the pointer is over the element
    #[serde(default = "default_hover_scale")]
    pub hover_scale: f64,
    /// Duration of the springy offset follow
    #[serde(default = "default_offset_duration")]
    pub offset_duration_ms: u64,
    /// Duration of the scale change
    #[serde(default = "default_scale_duration")]
    pub scale_duration_ms: u64,
    /// Degrees of tilt per element width of horizontal offset
    #[serde(default = "default_rotation_factor")]
    pub rotation_factor: f64,
}

impl Default for MagnetConfig {
    fn default() -> Self {
        Self {
            strength: default_magnet_strength(),
            hover_scale: default_hover_scale(),
            offset_duration_ms: default_offset_duration(),
            scale_duration_ms: default_scale_duration(),
            rotation_factor: default_rotation_factor(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorConfig {
    /// Show the custom cursor
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Follow duration of the outer ring
    #[serde(default = "default_ring_duration")]
    pub ring_duration_ms: u64,
    /// Follow duration of the inner dot
    #[serde(default = "default_dot_duration")]
    pub dot_duration_ms: u64,
    /// Ring scale while hovering an interactive element
    #[serde(default = "default_ring_hover_scale")]
    pub ring_hover_scale: f64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ring_duration_ms: default_ring_duration(),
            dot_duration_ms: default_dot_duration(),
            ring_hover_scale: default_ring_hover_scale(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Input poll interval in milliseconds when nothing is animating
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Play the loading sequence on startup
    #[serde(default = "default_true")]
    pub show_intro: bool,
    /// Show frame statistics in the status bar
    #[serde(default)]
    pub show_stats: bool,
    /// Color theme: gruvbox-dark, nord or dracula
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            show_intro: true,
            show_stats: false,
            theme: default_theme(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
}

fn default_true() -> bool {
    true
}

fn default_scroll_duration() -> u64 {
    1500
}

fn default_animation_fps() -> u32 {
    60
}

fn default_lerp() -> f64 {
    0.1
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_settle_epsilon() -> f64 {
    0.5
}

fn default_scroll_step() -> f64 {
    3.0
}

fn default_activation_bias() -> f64 {
    150.0
}

fn default_sections() -> Vec<SectionEntry> {
    vec![
        SectionEntry::new("hero", "Home"),
        SectionEntry::new("about", "About"),
        SectionEntry::new("achievements", "Achievements"),
        SectionEntry::new("projects", "Projects"),
        SectionEntry::new("skills", "Skills"),
        SectionEntry::new("contact", "Contact"),
    ]
}

fn default_reveal_duration() -> u64 {
    1200
}

fn default_reveal_start() -> String {
    "top 80%".to_string()
}

fn default_text_stagger() -> u64 {
    30
}

fn default_text_duration() -> u64 {
    1400
}

fn default_text_delay() -> u64 {
    500
}

fn default_loop_duration() -> f64 {
    30.0
}

fn default_marquee_gap() -> f64 {
    32.0
}

fn default_item_width() -> f64 {
    400.0
}

fn default_magnet_strength() -> f64 {
    0.5
}

fn default_hover_scale() -> f64 {
    1.05
}

fn default_offset_duration() -> u64 {
    600
}

fn default_scale_duration() -> u64 {
    400
}

fn default_rotation_factor() -> f64 {
    5.0
}

fn default_ring_duration() -> u64 {
    500
}

fn default_dot_duration() -> u64 {
    150
}

fn default_ring_hover_scale() -> f64 {
    1.8
}

fn default_theme() -> String {
    "gruvbox-dark".to_string()
}

fn default_tick_rate() -> u64 {
    100
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Self =
                toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/folio/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("folio")
            .join("config.toml")
    }

    /// Get the log file path used while the TUI is running
    pub fn log_path(&self) -> PathBuf {
        self.general.data_dir.join("folio.log")
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        let scroll = &self.scroll;
        if !(scroll.lerp > 0.0 && scroll.lerp <= 1.0) {
            return Err(crate::Error::Config(format!(
                "scroll.lerp must be in (0, 1], got {}",
                scroll.lerp
            )));
        }
        if scroll.settle_epsilon < 0.0 || !scroll.settle_epsilon.is_finite() {
            return Err(crate::Error::Config(
                "scroll.settle_epsilon must be a non-negative number".to_string(),
            ));
        }
        if !self.sections.activation_bias.is_finite() {
            return Err(crate::Error::Config(
                "sections.activation_bias must be finite".to_string(),
            ));
        }
        if self.reveal.duration_ms == 0 || self.reveal.text_duration_ms == 0 {
            return Err(crate::Error::Config(
                "reveal durations must be positive".to_string(),
            ));
        }
        self.reveal
            .start
            .parse::<crate::timeline::ViewportAnchor>()
            .map_err(|e| crate::Error::Config(format!("reveal.start: {}", e)))?;
        if self.marquee.loop_duration_secs <= 0.0 {
            return Err(crate::Error::Config(
                "marquee.loop_duration_secs must be positive".to_string(),
            ));
        }
        if !(self.magnet.strength > 0.0 && self.magnet.strength < 1.0) {
            return Err(crate::Error::Config(format!(
                "magnet.strength must be in (0, 1), got {}",
                self.magnet.strength
            )));
        }
        Ok(())
    }
}
